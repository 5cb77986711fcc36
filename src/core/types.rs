use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque reference to the host-side drawing surface a chart mounts on.
///
/// The bridge never interprets the canvas id; it is handed verbatim to the
/// charting engine. The optional height is a passthrough styling hint for
/// embedders that size the surface from the component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    pub canvas_id: String,
    pub height_px: Option<f64>,
}

impl SurfaceHandle {
    #[must_use]
    pub fn new(canvas_id: impl Into<String>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            height_px: None,
        }
    }

    #[must_use]
    pub fn with_height_px(mut self, height_px: f64) -> Self {
        self.height_px = Some(height_px);
        self
    }
}

/// Category-axis key of a tuple-form sample: a display label or a numeric
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Label(String),
    Position(f64),
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::Label(label.to_owned())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<f64> for Category {
    fn from(position: f64) -> Self {
        Self::Position(position)
    }
}

/// Tuple-form sample: a category-or-label `x` paired with a numeric `y`.
///
/// Serializes to the `{"x": ..., "y": ...}` object shape charting engines
/// accept directly inside dataset arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub x: Category,
    pub y: f64,
}

impl LabeledPoint {
    #[must_use]
    pub fn new(x: impl Into<Category>, y: f64) -> Self {
        Self { x: x.into(), y }
    }

    /// Renders the point as the `{"x": ..., "y": ...}` JSON object stored in
    /// the dataset array. Non-finite numbers become `null`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One dataset sample on the wire: a bare number or a tuple point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Point(LabeledPoint),
}

impl DataValue {
    /// Renders the sample as the JSON value stored in the dataset array.
    ///
    /// Non-finite numbers become `null`; JSON has no NaN or infinity.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<LabeledPoint> for DataValue {
    fn from(point: LabeledPoint) -> Self {
        Self::Point(point)
    }
}

/// Resolution policy for dataset indices that do not exist yet.
///
/// The two observed adapter generations disagreed on this; both behaviors
/// are kept selectable per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DatasetIndexPolicy {
    /// Synthesize an empty dataset at the index on first write.
    #[default]
    AutoCreate,
    /// Fail the operation with `InvalidDatasetIndex`.
    Reject,
}
