//! Form-fill domain types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::task::{FromCompletedTask, Task};

/// Terminal result of a form-fill task
///
/// Every field is optional: a fill that reports no fields or no screenshot
/// is still a successful fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormFillOutcome {
    #[serde(default, deserialize_with = "string_map")]
    pub filled_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
    /// Some backends report one screenshot per step instead
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshot_urls: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub application_url: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl FormFillOutcome {
    /// Screenshot to show, preferring the single final screenshot
    pub fn screenshot(&self) -> Option<&str> {
        self.screenshot_url
            .as_deref()
            .or_else(|| self.screenshot_urls.last().map(String::as_str))
            .filter(|url| !url.trim().is_empty())
    }
}

impl FromCompletedTask for FormFillOutcome {
    fn from_completed_task(task: Task) -> Result<Self, String> {
        let mut result = match task.result {
            Some(Value::Object(map)) => map,
            Some(Value::Null) | None => Map::new(),
            Some(other) => return Err(format!("unexpected form fill result: {}", other)),
        };

        let has_fields = result
            .get("filled_fields")
            .is_some_and(|fields| !fields.is_null());
        if !has_fields {
            if let Some(fields) = task.filled_fields {
                result.insert("filled_fields".to_string(), fields);
            }
        }

        serde_json::from_value(Value::Object(result))
            .map_err(|e| format!("unexpected form fill result: {}", e))
    }
}

/// Reads a JSON object into a string map, stringifying scalar values
///
/// Automation backends report things like `"submitted": true` next to the
/// text fields; those are kept rather than rejected.
fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => Ok(map
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "filled_fields must be an object, got {}",
            other
        ))),
    }
}
