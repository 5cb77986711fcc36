use std::sync::Arc;

use chart_bridge::core::{ChartConfig, SurfaceHandle};
use chart_bridge::library::HeadlessLibrary;
use chart_bridge::loader::{LibraryRegistry, PreloadedScriptHost};
use chart_bridge::{ChartComponent, ChartComponentConfig};
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChartConfig::from_value(json!({
        "type": "line",
        "data": {
            "labels": ["t0", "t1", "t2", "t3", "t4"],
            "datasets": [{ "label": "load", "data": [0.42, 0.44, 0.48, 0.47, 0.51] }]
        },
        "options": { "responsive": true }
    }))?;

    let registry = Arc::new(LibraryRegistry::new());
    let library = HeadlessLibrary::new();
    let ledger = library.ledger();
    let host = PreloadedScriptHost::new(Arc::clone(&registry), Arc::new(library));

    let component_config =
        ChartComponentConfig::new(SurfaceHandle::new("load-chart"), config);
    let mut component = ChartComponent::new(component_config, registry, Arc::new(host));
    component.mount().await?;

    for tick in 0..20 {
        let sample = 0.5 + f64::from(tick) * 0.01;
        component.push_data_and_shift(0, sample).await?;
    }

    let options = component.get_options().await?;
    let rendered = ledger.last_rendered().ok_or("nothing rendered")?;
    println!("chart updates: {}", ledger.updates());
    println!("options: {options}");
    println!("window: {}", rendered["data"]["datasets"][0]["data"]);

    component.dispose().await?;
    println!("charts destroyed: {}", ledger.charts_destroyed());
    Ok(())
}
