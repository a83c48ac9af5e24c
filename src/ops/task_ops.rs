use chrono::NaiveDate;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("line index {index} out of range (file has {line_count} lines)")]
    OutOfRange { index: i64, line_count: usize },
    #[error("line {0} is blank or already completed")]
    AlreadyCompleted(usize),
    #[error("invalid priority {0:?}: expected a single letter A-Z")]
    InvalidPriority(String),
}

/// Result of marking one line done
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Full file text with the one line rewritten
    pub text: String,
    /// The rewritten line
    pub line: String,
}

/// Mark the line at `index` done: drop any `(X) ` priority and prefix
/// `x <today> ` after the line's indentation. Every other byte of `text` is
/// preserved, including the presence or absence of a trailing newline.
pub fn complete_task(text: &str, index: i64, today: NaiveDate) -> Result<Completion, TaskError> {
    let lines: Vec<&str> = text.split('\n').collect();
    // A trailing newline leaves an empty final segment that is not a line
    let line_count = match lines.last() {
        Some(last) if last.is_empty() => lines.len() - 1,
        _ => lines.len(),
    };
    let Some(index) = usize::try_from(index).ok().filter(|&i| i < line_count) else {
        return Err(TaskError::OutOfRange { index, line_count });
    };

    let raw = lines[index];
    let target = raw.trim_start();
    if target.trim().is_empty() || target.starts_with("x ") {
        return Err(TaskError::AlreadyCompleted(index));
    }

    let indent = &raw[..raw.len() - target.len()];
    let line = format!(
        "{}x {} {}",
        indent,
        today.format("%Y-%m-%d"),
        strip_priority(target)
    );
    let text = lines
        .iter()
        .enumerate()
        .map(|(i, l)| if i == index { line.as_str() } else { *l })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Completion {
        line: line.trim().to_string(),
        text,
    })
}

/// Remove a leading `(X) ` priority, if any
fn strip_priority(line: &str) -> &str {
    let bytes = line.as_bytes();
    if bytes.len() >= 4
        && bytes[0] == b'('
        && bytes[1].is_ascii_uppercase()
        && bytes[2] == b')'
        && bytes[3] == b' '
    {
        &line[4..]
    } else {
        line
    }
}
