use crate::model::task::TaskRecord;
use crate::parse::line_parser::extract_tokens;

/// Render a task record as one canonical todo.txt line.
///
/// Projects, contexts and tags already present in the description are not
/// repeated.
pub fn format_task_line(record: &TaskRecord) -> String {
    let mut line = String::new();

    if record.completed {
        line.push_str("x ");
    }
    if let Some(priority) = record.priority {
        line.push_str(&format!("({}) ", priority));
    }
    line.push_str(&record.creation_date.format("%Y-%m-%d").to_string());
    if !record.description.is_empty() {
        line.push(' ');
        line.push_str(&record.description);
    }

    let present = extract_tokens(&record.description);
    for project in &record.projects {
        let token = format!("+{}", project);
        if !present.has_project(project) && !mentions(&record.description, &token) {
            line.push(' ');
            line.push_str(&token);
        }
    }
    for context in &record.contexts {
        let token = format!("@{}", context);
        if !present.has_context(context) && !mentions(&record.description, &token) {
            line.push(' ');
            line.push_str(&token);
        }
    }
    for (key, value) in &record.tags {
        if !present.has_tag(key, value) {
            line.push_str(&format!(" {}:{}", key, value));
        }
    }

    line
}

/// `token` occurs in `text` bounded by whitespace or either end. Unlike
/// word matching this also finds tokens that contain spaces.
fn mentions(text: &str, token: &str) -> bool {
    text.match_indices(token).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + token.len()..].chars().next();
        before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
    })
}

/// Append a new task line to the (already trimmed) file text
pub fn append_task_to_text(existing_trimmed: &str, record: &TaskRecord) -> String {
    let line = format_task_line(record);
    if existing_trimmed.is_empty() {
        line
    } else {
        format!("{}\n{}", existing_trimmed, line)
    }
}
