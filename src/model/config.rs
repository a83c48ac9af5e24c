use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::task::Priority;

/// Default reference offset: Asia/Tokyo, which observes no DST
pub const DEFAULT_UTC_OFFSET: &str = "+09:00";

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the todo.txt file. A leading `~` means the home directory.
    pub file_path: String,
    /// Fixed UTC offset used for every "today" computation
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// A reusable bundle of tags applied when capturing a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default, deserialize_with = "tag_names")]
    pub projects: Vec<String>,
    #[serde(default, deserialize_with = "tag_names")]
    pub contexts: Vec<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Projects and contexts are single description words: non-empty, no whitespace
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn tag_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let names = Vec::<String>::deserialize(deserializer)?;
    match names.iter().find(|name| !is_valid_tag_name(name)) {
        Some(bad) => Err(D::Error::custom(format!(
            "invalid project or context {:?}: must be non-empty with no whitespace",
            bad
        ))),
        None => Ok(names),
    }
}

fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}

impl Config {
    /// Position of the template called `name`
    pub fn template_position(&self, name: &str) -> Option<usize> {
        self.templates.iter().position(|t| t.name == name)
    }
}
