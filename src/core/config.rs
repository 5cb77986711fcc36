use serde_json::{Value, json};
use tracing::warn;

use crate::core::types::DatasetIndexPolicy;
use crate::error::{BridgeError, BridgeResult};

/// Chart configuration document (`type` / `data` / `options`).
///
/// The document is carried opaquely: the engine receives it verbatim, and the
/// bridge only ever touches the paths it mutates (`data.datasets[i].data`,
/// `data.labels`, `options`). Everything else round-trips untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    root: Value,
}

impl ChartConfig {
    /// Largest dataset index `AutoCreate` will pad up to.
    ///
    /// Synthesis fills every hole below the requested index, so the cap
    /// bounds the allocation a single write can trigger.
    pub const MAX_SYNTHESIZED_INDEX: usize = 1024;

    pub fn from_value(root: Value) -> BridgeResult<Self> {
        if !root.is_object() {
            return Err(BridgeError::InvalidConfig(
                "configuration document must be a JSON object".to_owned(),
            ));
        }
        Ok(Self { root })
    }

    pub fn from_json_str(input: &str) -> BridgeResult<Self> {
        let root: Value = serde_json::from_str(input).map_err(|e| {
            BridgeError::InvalidConfig(format!("failed to parse configuration document: {e}"))
        })?;
        Self::from_value(root)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn to_json_string(&self) -> BridgeResult<String> {
        serde_json::to_string(&self.root).map_err(|e| {
            BridgeError::InvalidConfig(format!("failed to serialize configuration document: {e}"))
        })
    }

    #[must_use]
    pub fn chart_type(&self) -> Option<&str> {
        self.root.get("type").and_then(Value::as_str)
    }

    /// Checks that the subtrees the bridge mutates have usable shapes.
    ///
    /// Absent or `null` subtrees are fine (they are synthesized lazily); a
    /// present subtree of the wrong JSON kind is rejected up front so a
    /// malformed document fails at construction instead of mid-mutation.
    pub fn validate_shape(&self) -> BridgeResult<()> {
        if let Some(data) = self.root.get("data") {
            if !data.is_null() && !data.is_object() {
                return Err(BridgeError::InvalidConfig(
                    "\"data\" must be a JSON object".to_owned(),
                ));
            }
        }
        if let Some(labels) = self.root.pointer("/data/labels") {
            if !labels.is_null() && !labels.is_array() {
                return Err(BridgeError::InvalidConfig(
                    "\"data.labels\" must be a JSON array".to_owned(),
                ));
            }
        }
        if let Some(options) = self.root.get("options") {
            if !options.is_null() && !options.is_object() {
                return Err(BridgeError::InvalidConfig(
                    "\"options\" must be a JSON object".to_owned(),
                ));
            }
        }
        match self.root.pointer("/data/datasets") {
            None => Ok(()),
            Some(datasets) if datasets.is_null() => Ok(()),
            Some(datasets) => {
                let Some(entries) = datasets.as_array() else {
                    return Err(BridgeError::InvalidConfig(
                        "\"data.datasets\" must be a JSON array".to_owned(),
                    ));
                };
                for (index, entry) in entries.iter().enumerate() {
                    if entry.is_null() {
                        continue;
                    }
                    let Some(entry) = entry.as_object() else {
                        return Err(BridgeError::InvalidConfig(format!(
                            "dataset entry {index} must be a JSON object"
                        )));
                    };
                    if let Some(values) = entry.get("data") {
                        if !values.is_null() && !values.is_array() {
                            return Err(BridgeError::InvalidConfig(format!(
                                "dataset {index} \"data\" must be a JSON array"
                            )));
                        }
                    }
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn dataset_count(&self) -> usize {
        self.root
            .pointer("/data/datasets")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    #[must_use]
    pub fn dataset_values(&self, index: usize) -> Option<&Vec<Value>> {
        self.root
            .pointer(&format!("/data/datasets/{index}/data"))
            .and_then(Value::as_array)
    }

    #[must_use]
    pub fn dataset_len(&self, index: usize) -> Option<usize> {
        self.dataset_values(index).map(Vec::len)
    }

    /// Clone of the full dataset entry, used for interop reply payloads.
    #[must_use]
    pub fn dataset_snapshot(&self, index: usize) -> Option<Value> {
        self.root.pointer(&format!("/data/datasets/{index}")).cloned()
    }

    /// Resolves the value array of dataset `index` for writing.
    ///
    /// Under `AutoCreate`, missing indices (and `null` holes) are synthesized
    /// as empty datasets before the write proceeds, up to
    /// [`Self::MAX_SYNTHESIZED_INDEX`]; under `Reject` they fail with
    /// `InvalidDatasetIndex`. An existing entry whose `data` key is absent or
    /// `null` gets an empty array under either policy.
    pub fn dataset_values_mut(
        &mut self,
        index: usize,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<&mut Vec<Value>> {
        let datasets = self.datasets_mut()?;
        let dataset_count = datasets.len();

        if index >= dataset_count {
            match policy {
                DatasetIndexPolicy::AutoCreate => {
                    if index > Self::MAX_SYNTHESIZED_INDEX {
                        warn!(index, dataset_count, "dataset index exceeds the synthesis cap");
                        return Err(BridgeError::InvalidDatasetIndex {
                            index,
                            dataset_count,
                        });
                    }
                    warn!(
                        index,
                        dataset_count,
                        "dataset index does not exist; synthesizing empty datasets"
                    );
                    while datasets.len() <= index {
                        datasets.push(json!({ "data": [] }));
                    }
                }
                DatasetIndexPolicy::Reject => {
                    return Err(BridgeError::InvalidDatasetIndex {
                        index,
                        dataset_count,
                    });
                }
            }
        }

        let entry = &mut datasets[index];
        if entry.is_null() {
            match policy {
                DatasetIndexPolicy::AutoCreate => {
                    warn!(index, "dataset entry is null; synthesizing empty dataset");
                    *entry = json!({ "data": [] });
                }
                DatasetIndexPolicy::Reject => {
                    return Err(BridgeError::InvalidDatasetIndex {
                        index,
                        dataset_count,
                    });
                }
            }
        }

        let Some(entry) = entry.as_object_mut() else {
            return Err(BridgeError::InvalidConfig(format!(
                "dataset entry {index} must be a JSON object"
            )));
        };

        let values = entry
            .entry("data")
            .or_insert_with(|| Value::Array(Vec::new()));
        if values.is_null() {
            *values = Value::Array(Vec::new());
        }
        values.as_array_mut().ok_or_else(|| {
            BridgeError::InvalidConfig(format!("dataset {index} \"data\" must be a JSON array"))
        })
    }

    #[must_use]
    pub fn labels(&self) -> Option<&Vec<Value>> {
        self.root.pointer("/data/labels").and_then(Value::as_array)
    }

    /// Replaces the label sequence wholesale.
    ///
    /// No label/data length parity is enforced anywhere in the bridge.
    pub fn set_labels(&mut self, labels: Vec<Value>) -> BridgeResult<()> {
        let data = self.data_object_mut()?;
        data.insert("labels".to_owned(), Value::Array(labels));
        Ok(())
    }

    /// Appends one label, creating `data.labels` on demand.
    pub fn push_label(&mut self, label: Value) -> BridgeResult<()> {
        let data = self.data_object_mut()?;
        let labels = data
            .entry("labels")
            .or_insert_with(|| Value::Array(Vec::new()));
        if labels.is_null() {
            *labels = Value::Array(Vec::new());
        }
        let Some(labels) = labels.as_array_mut() else {
            return Err(BridgeError::InvalidConfig(
                "\"data.labels\" must be a JSON array".to_owned(),
            ));
        };
        labels.push(label);
        Ok(())
    }

    /// Current options subtree; an empty object when the document has none.
    #[must_use]
    pub fn options(&self) -> Value {
        self.root
            .get("options")
            .filter(|options| !options.is_null())
            .cloned()
            .unwrap_or_else(|| json!({}))
    }

    /// Replaces the options subtree wholesale.
    pub fn set_options(&mut self, options: Value) -> BridgeResult<()> {
        if !options.is_object() {
            return Err(BridgeError::InvalidConfig(
                "options document must be a JSON object".to_owned(),
            ));
        }
        let root = self.root_object_mut()?;
        root.insert("options".to_owned(), options);
        Ok(())
    }

    fn root_object_mut(&mut self) -> BridgeResult<&mut serde_json::Map<String, Value>> {
        self.root.as_object_mut().ok_or_else(|| {
            BridgeError::InvalidConfig("configuration document must be a JSON object".to_owned())
        })
    }

    fn data_object_mut(&mut self) -> BridgeResult<&mut serde_json::Map<String, Value>> {
        let root = self.root_object_mut()?;
        let data = root.entry("data").or_insert_with(|| json!({}));
        if data.is_null() {
            *data = json!({});
        }
        data.as_object_mut().ok_or_else(|| {
            BridgeError::InvalidConfig("\"data\" must be a JSON object".to_owned())
        })
    }

    fn datasets_mut(&mut self) -> BridgeResult<&mut Vec<Value>> {
        let data = self.data_object_mut()?;
        let datasets = data
            .entry("datasets")
            .or_insert_with(|| Value::Array(Vec::new()));
        if datasets.is_null() {
            *datasets = Value::Array(Vec::new());
        }
        datasets.as_array_mut().ok_or_else(|| {
            BridgeError::InvalidConfig("\"data.datasets\" must be a JSON array".to_owned())
        })
    }
}
