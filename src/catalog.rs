use serde_json::Value;
use thiserror::Error;

/// Task name to model names, in the order the backend listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Vec<String>)>,
}

#[derive(Error, Debug)]
#[error("expected a JSON object of task names, found {found}")]
pub struct CatalogShapeError {
    pub found: &'static str,
}

impl Catalog {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// `null` is treated as an empty catalog. Values that are not arrays become
    /// empty model lists and non-string models are skipped.
    pub fn from_json(value: &Value) -> Result<Self, CatalogShapeError> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(CatalogShapeError {
                    found: json_kind(other),
                })
            }
        };

        let entries = object
            .iter()
            .map(|(task, models)| {
                let models = match models {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|m| m.as_str().map(str::to_string))
                        .collect(),
                    _ => vec![],
                };
                (task.clone(), models)
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(task, _)| task.as_str())
    }

    pub fn first_task(&self) -> Option<&str> {
        self.tasks().next()
    }

    pub fn models(&self, task: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(t, _)| t == task)
            .map(|(_, models)| models.as_slice())
    }

    pub fn contains_task(&self, task: &str) -> bool {
        self.models(task).is_some()
    }

    /// First model of `task`, or empty when the task has no models or is unknown.
    pub fn default_model(&self, task: &str) -> String {
        self.models(task)
            .and_then(|models| models.first())
            .cloned()
            .unwrap_or_default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
