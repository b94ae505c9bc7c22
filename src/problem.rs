// ABOUTME: Problem records and the JSON loader
// ABOUTME: Reads a JSON array of quiz problems, defaulting any missing field

use crate::errors::{Result, SlideError};
use crate::utils::require_file;
use log::info;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One quiz problem, mapped onto one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProblemRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub number: String,

    #[serde(deserialize_with = "lenient_string")]
    pub slide_title: String,

    #[serde(deserialize_with = "lenient_string")]
    pub question: String,

    #[serde(deserialize_with = "lenient_list")]
    pub choices: Vec<String>,

    #[serde(deserialize_with = "lenient_path")]
    pub included_picture: Option<String>,
}

/// Accept strings, numbers and booleans as text; anything else reads as empty.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(value_to_text).collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_text(other)],
    })
}

fn lenient_path<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = value_to_text(Value::deserialize(deserializer)?);
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse problem records from JSON text. The top level must be an array.
pub fn parse_problems(json: &str) -> Result<Vec<ProblemRecord>> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(SlideError::ValidationError(
            "problem data must be a JSON array".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Load problem records from a JSON file
pub fn load_problems(path: &Path) -> Result<Vec<ProblemRecord>> {
    info!("Loading problems from {:?}", path);

    require_file(path)?;

    let content = fs::read_to_string(path).map_err(SlideError::FileReadError)?;
    let problems = parse_problems(content.trim_start_matches('\u{feff}'))?;

    info!("Loaded {} problems", problems.len());
    Ok(problems)
}
