use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A todo.txt priority: a single uppercase letter `A`–`Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(char);

impl Priority {
    /// The highest priority, the only one the urgent view singles out
    pub const A: Priority = Priority('A');

    /// Accept an uppercase ASCII letter
    pub fn from_char(c: char) -> Option<Priority> {
        c.is_ascii_uppercase().then_some(Priority(c))
    }

    /// Parse user input. Case-insensitive, exactly one ASCII letter.
    pub fn parse(s: &str) -> Option<Priority> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Some(Priority(c.to_ascii_uppercase())),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Priority::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid priority {:?}", s)))
    }
}

/// A new task, built in memory and handed to the line serializer.
/// Never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub completed: bool,
    pub priority: Option<Priority>,
    pub creation_date: NaiveDate,
    /// Free text, including any `+project`, `@context` and `key:value` tokens
    pub description: String,
    /// Projects in template order (without the `+` prefix)
    pub projects: Vec<String>,
    /// Contexts in template order (without the `@` prefix)
    pub contexts: Vec<String>,
    /// `key:value` tags; `due` here must also appear verbatim in `description`
    pub tags: BTreeMap<String, String>,
}

impl TaskRecord {
    /// Create an active task with no tags
    pub fn new(description: String, creation_date: NaiveDate) -> Self {
        TaskRecord {
            completed: false,
            priority: None,
            creation_date,
            description,
            projects: Vec::new(),
            contexts: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn due(&self) -> Option<&str> {
        self.tags.get("due").map(|s| s.as_str())
    }
}

/// Fields recovered from an active (not completed) line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLine {
    pub priority: Option<Priority>,
    pub creation_date: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
    /// The line minus its priority and creation-date prefixes
    pub desc: String,
}

/// Classification of one raw line of the task file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or whitespace-only
    Blank,
    /// Starts with `x `
    Completed {
        completion_date: Option<NaiveDate>,
        body: String,
    },
    Active(ActiveLine),
}

impl ParsedLine {
    pub fn is_completed(&self) -> bool {
        matches!(self, ParsedLine::Completed { .. })
    }
}

/// A task selected by the urgency ranker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentItem {
    pub priority: Option<Priority>,
    pub due: Option<NaiveDate>,
    pub desc: String,
    pub is_overdue: bool,
    /// Zero-based position in the file snapshot this item was read from
    pub line_index: usize,
}

/// An active task as shown by the full listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedTask {
    pub line_index: usize,
    pub priority: Option<Priority>,
    pub due: Option<NaiveDate>,
    pub desc: String,
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    /// `key:value` tokens; the first occurrence of a key wins
    pub tags: BTreeMap<String, String>,
}
