use chrono::NaiveDate;

use crate::model::task::{ActiveLine, ParsedLine, Priority};

/// Length of a `YYYY-MM-DD` date
const DATE_LEN: usize = 10;

/// Prefix of the due-date tag
const DUE_KEY: &str = "due:";

/// Parse one raw line of a todo.txt file.
///
/// Grammar, applied left to right on a working copy of the trimmed line:
///
/// ```text
/// line      := completed | active
/// completed := "x " date? body
/// active    := priority? date? desc
/// priority  := "(" [A-Z] ") "
/// date      := YYYY-MM-DD " "
/// ```
///
/// `due:YYYY-MM-DD` is looked up anywhere in the line and left in `desc`.
/// Malformed input never fails; it just yields fewer fields.
pub fn parse_line(raw: &str) -> ParsedLine {
    let line = raw.trim();
    if line.is_empty() {
        return ParsedLine::Blank;
    }

    if let Some(rest) = completion_marker(line) {
        let (completion_date, body) = match date_prefix(rest) {
            Some((date, body)) => (Some(date), body),
            None => (None, rest),
        };
        return ParsedLine::Completed {
            completion_date,
            body: body.trim().to_string(),
        };
    }

    let mut rest = line;
    let priority = priority_prefix(rest).map(|(p, after)| {
        rest = after;
        p
    });
    let creation_date = date_prefix(rest).map(|(d, after)| {
        rest = after;
        d
    });

    ParsedLine::Active(ActiveLine {
        priority,
        creation_date,
        due: find_due(line),
        desc: rest.trim().to_string(),
    })
}

/// `"x "` at the very start of the line
fn completion_marker(s: &str) -> Option<&str> {
    s.strip_prefix("x ")
}

/// `"(X) "` where X is an uppercase letter
fn priority_prefix(s: &str) -> Option<(Priority, &str)> {
    let rest = s.strip_prefix('(')?;
    let mut chars = rest.chars();
    let letter = chars.next()?;
    let priority = Priority::from_char(letter)?;
    let rest = chars.as_str().strip_prefix(") ")?;
    Some((priority, rest))
}

/// `"YYYY-MM-DD "` at the start of `s`
fn date_prefix(s: &str) -> Option<(NaiveDate, &str)> {
    let date = parse_date(s.get(..DATE_LEN)?)?;
    let rest = s[DATE_LEN..].strip_prefix(' ')?;
    Some((date, rest))
}

/// Strict `YYYY-MM-DD`: fixed-width digits and a real calendar day
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != DATE_LEN {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// First well-formed `due:YYYY-MM-DD` anywhere in the line
fn find_due(line: &str) -> Option<NaiveDate> {
    line.match_indices(DUE_KEY).find_map(|(at, _)| {
        let start = at + DUE_KEY.len();
        line.get(start..start + DATE_LEN).and_then(parse_date)
    })
}

/// Tokens embedded in a description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescTokens {
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    pub tags: Vec<(String, String)>,
}

impl DescTokens {
    pub fn has_project(&self, name: &str) -> bool {
        self.projects.iter().any(|p| p == name)
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.contexts.iter().any(|c| c == name)
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags.iter().any(|(k, v)| k == key && v == value)
    }
}

/// Collect `+project`, `@context` and `key:value` tokens from a description
pub fn extract_tokens(desc: &str) -> DescTokens {
    let mut tokens = DescTokens::default();
    for word in desc.split_whitespace() {
        if let Some(project) = word.strip_prefix('+') {
            if !project.is_empty() {
                tokens.projects.push(project.to_string());
            }
        } else if let Some(context) = word.strip_prefix('@') {
            if !context.is_empty() {
                tokens.contexts.push(context.to_string());
            }
        } else if let Some((key, value)) = word.split_once(':')
            && !key.is_empty()
            && !value.is_empty()
        {
            tokens.tags.push((key.to_string(), value.to_string()));
        }
    }
    tokens
}
