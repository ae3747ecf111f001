use crate::types::{FlattenConfig, Record};
use anyhow::Result;
use serde_json::Value;

/// Turns one nested record into a single-level record of scalar values
pub trait Flattener {
    fn flatten(&self, record: &Record) -> Result<Record>;
}

impl<F> Flattener for F
where
    F: Fn(&Record) -> Result<Record>,
{
    fn flatten(&self, record: &Record) -> Result<Record> {
        self(record)
    }
}

/// Flattens nested objects and arrays into separator-joined paths.
///
/// `{"user": {"name": "a"}, "tags": ["x"]}` becomes
/// `{"user.name": "a", "tags.0": "x"}`. Empty objects and arrays are kept
/// as-is under their path, and sub-trees deeper than `max_depth` are kept as
/// a single compact JSON string.
#[derive(Debug, Clone, Default)]
pub struct DotFlattener {
    config: FlattenConfig,
}

impl DotFlattener {
    pub fn new(config: FlattenConfig) -> Self {
        DotFlattener { config }
    }

    fn flatten_value(&self, path: String, value: &Value, depth: usize, out: &mut Record) {
        match value {
            Value::Object(obj) if !obj.is_empty() && depth < self.config.max_depth => {
                for (key, nested) in obj {
                    let nested_path = self.join(&path, key);
                    self.flatten_value(nested_path, nested, depth + 1, out);
                }
            }
            Value::Array(arr) if !arr.is_empty() && depth < self.config.max_depth => {
                for (idx, nested) in arr.iter().enumerate() {
                    let nested_path = self.join(&path, &idx.to_string());
                    self.flatten_value(nested_path, nested, depth + 1, out);
                }
            }
            Value::Object(obj) if !obj.is_empty() => {
                out.insert(path, Value::String(value.to_string()));
            }
            Value::Array(arr) if !arr.is_empty() => {
                out.insert(path, Value::String(value.to_string()));
            }
            _ => {
                out.insert(path, value.clone());
            }
        }
    }

    fn join(&self, prefix: &str, key: &str) -> String {
        format!("{}{}{}", prefix, self.config.separator, key)
    }
}

impl Flattener for DotFlattener {
    fn flatten(&self, record: &Record) -> Result<Record> {
        let mut out = Record::new();
        for (key, value) in record {
            self.flatten_value(key.clone(), value, 1, &mut out);
        }
        Ok(out)
    }
}
