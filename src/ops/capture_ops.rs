use chrono::NaiveDate;

use crate::model::config::Template;
use crate::model::task::{Priority, TaskRecord};
use crate::ops::task_ops::TaskError;
use crate::parse::append_task_to_text;

/// A quick-capture request as it arrives from the shell
#[derive(Debug, Clone, Default)]
pub struct ComposeRequest {
    /// Raw user input
    pub text: String,
    /// Priority letter; `None` or empty means "none given"
    pub priority: Option<String>,
    /// Tag the task `due:<today>`
    pub due_today: bool,
    /// Index into the configured templates; anything out of range means no template
    pub template_index: i64,
}

/// Result of appending a captured task to the file text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub record: TaskRecord,
    /// Full new file text, always ending in exactly one newline
    pub text: String,
}

/// Build the task record for a capture request.
pub fn compose_record(
    request: &ComposeRequest,
    template: Option<&Template>,
    today: NaiveDate,
) -> Result<TaskRecord, TaskError> {
    let explicit = match request.priority.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(
            Priority::parse(s).ok_or_else(|| TaskError::InvalidPriority(s.to_string()))?,
        ),
    };

    let mut description = request.text.trim().to_string();
    let mut record = TaskRecord::new(String::new(), today);

    if let Some(template) = template {
        let tags: Vec<String> = template
            .projects
            .iter()
            .map(|p| format!("+{}", p))
            .chain(template.contexts.iter().map(|c| format!("@{}", c)))
            .collect();
        push_word(&mut description, &tags.join(" "));
        record.projects = template.projects.clone();
        record.contexts = template.contexts.clone();
    }

    if request.due_today {
        let due = today.format("%Y-%m-%d").to_string();
        push_word(&mut description, &format!("due:{}", due));
        record.tags.insert("due".to_string(), due);
    }

    record.priority = explicit.or(template.and_then(|t| t.priority));
    record.description = description;
    Ok(record)
}

/// Compose a task and append it to `text`.
pub fn capture(
    text: &str,
    request: &ComposeRequest,
    templates: &[Template],
    today: NaiveDate,
) -> Result<Capture, TaskError> {
    let template = template_at(templates, request.template_index);
    let record = compose_record(request, template, today)?;
    let text = append_record(text, &record);
    Ok(Capture { record, text })
}

/// The template at `index`; negative or past-the-end means none
pub fn template_at(templates: &[Template], index: i64) -> Option<&Template> {
    usize::try_from(index).ok().and_then(|i| templates.get(i))
}

/// Append the record's line after the file's existing content, ending
/// the file in exactly one newline
pub fn append_record(text: &str, record: &TaskRecord) -> String {
    let mut text = append_task_to_text(text.trim_end(), record);
    text.push('\n');
    text
}

/// Append `word` separated by a single space, skipping empty input
fn push_word(s: &mut String, word: &str) {
    if word.is_empty() {
        return;
    }
    if !s.is_empty() {
        s.push(' ');
    }
    s.push_str(word);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn march_1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn request(text: &str) -> ComposeRequest {
        ComposeRequest {
            text: text.to_string(),
            template_index: -1,
            ..Default::default()
        }
    }

    fn work() -> Template {
        Template {
            name: "work".into(),
            projects: vec!["work".into()],
            contexts: vec!["meeting".into()],
            priority: None,
        }
    }

    #[test]
    fn test_plain_text() {
        let record = compose_record(&request("  Buy milk  "), None, march_1()).unwrap();
        assert_eq!(record.description, "Buy milk");
        assert!(record.projects.is_empty());
        assert!(record.contexts.is_empty());
        assert!(record.tags.is_empty());
        assert_eq!(record.priority, None);
        assert_eq!(record.creation_date, march_1());
    }

    #[test]
    fn test_written_line_matches_description_for_odd_template_names() {
        let odd = Template {
            name: "odd".into(),
            projects: vec!["my proj".into()],
            contexts: vec!["".into()],
            priority: None,
        };
        let request = ComposeRequest {
            template_index: 0,
            ..request("Sync")
        };
        let out = capture("", &request, &[odd], march_1()).unwrap();
        assert_eq!(out.record.description, "Sync +my proj @");
        assert_eq!(out.text, "2024-03-01 Sync +my proj @\n");
    }

    #[test]
    fn test_template_projects_before_contexts() {
        let record = compose_record(&request("Sync"), Some(&work()), march_1()).unwrap();
        assert_eq!(record.description, "Sync +work @meeting");
        assert_eq!(record.projects, vec!["work"]);
        assert_eq!(record.contexts, vec!["meeting"]);
    }

    #[test]
    fn test_due_today_after_template_tags() {
        let mut req = request("Sync");
        req.due_today = true;
        let record = compose_record(&req, Some(&work()), march_1()).unwrap();
        assert_eq!(record.description, "Sync +work @meeting due:2024-03-01");
        assert_eq!(record.due(), Some("2024-03-01"));
    }

    #[test]
    fn test_empty_template_adds_nothing() {
        let empty = Template {
            name: "blank".into(),
            projects: vec![],
            contexts: vec![],
            priority: None,
        };
        let record = compose_record(&request("Sync"), Some(&empty), march_1()).unwrap();
        assert_eq!(record.description, "Sync");
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let record = compose_record(&request("   "), None, march_1()).unwrap();
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_priority_resolution() {
        let mut tpl = work();
        tpl.priority = Priority::from_char('C');

        let record = compose_record(&request("x"), Some(&tpl), march_1()).unwrap();
        assert_eq!(record.priority, Priority::from_char('C'));

        let mut req = request("x");
        req.priority = Some("a".into());
        let record = compose_record(&req, Some(&tpl), march_1()).unwrap();
        assert_eq!(record.priority, Some(Priority::A));

        req.priority = Some(String::new());
        let record = compose_record(&req, None, march_1()).unwrap();
        assert_eq!(record.priority, None);
    }

    #[test]
    fn test_invalid_priority() {
        let mut req = request("x");
        req.priority = Some("AA".into());
        let err = compose_record(&req, None, march_1()).unwrap_err();
        assert!(matches!(err, TaskError::InvalidPriority(p) if p == "AA"));
    }

    #[test]
    fn test_capture_appends_with_trailing_newline() {
        let mut req = request("Sync");
        req.template_index = 0;
        req.due_today = true;
        let out = capture("(A) Existing\n\n\n", &req, &[work()], march_1()).unwrap();
        assert_eq!(
            out.text,
            "(A) Existing\n2024-03-01 Sync +work @meeting due:2024-03-01\n"
        );
    }

    #[test]
    fn test_capture_into_empty_file() {
        let out = capture("", &request("Buy milk"), &[], march_1()).unwrap();
        assert_eq!(out.text, "2024-03-01 Buy milk\n");
    }

    #[test]
    fn test_capture_out_of_range_template_is_ignored() {
        let mut req = request("Sync");
        req.template_index = 7;
        let out = capture("", &req, &[work()], march_1()).unwrap();
        assert_eq!(out.record.description, "Sync");
    }

    #[test]
    fn test_template_at() {
        let templates = [work()];
        assert!(template_at(&templates, 0).is_some());
        assert!(template_at(&templates, 1).is_none());
        assert!(template_at(&templates, -1).is_none());
    }

    #[test]
    fn test_capture_keeps_leading_lines() {
        let text = "\n  indented\n(B) other";
        let out = capture(text, &request("New"), &[], march_1()).unwrap();
        assert_eq!(out.text, "\n  indented\n(B) other\n2024-03-01 New\n");
    }
}
