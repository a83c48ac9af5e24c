//! Read-compute-write shell around the pure task operations.
//!
//! Every call re-reads the task file and treats it as the only source of
//! truth; nothing parsed is kept between calls.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::io::todo_io::{
    TodoError, expand_tilde, read_existing_todo_file, read_todo_file, write_todo_file,
};
use crate::model::config::{Config, Template};
use crate::model::task::{ListedTask, UrgentItem};
use crate::ops::capture_ops::{self, ComposeRequest};
use crate::ops::{list_ops, task_ops, urgent};
use crate::parse::format_task_line;
use crate::util::clock::Clock;

/// The task file plus everything needed to operate on it
pub struct TodoService<C: Clock> {
    file_path: PathBuf,
    templates: Vec<Template>,
    clock: C,
}

impl<C: Clock> TodoService<C> {
    /// Build a service from config. `home` replaces a leading `~` in the file path.
    pub fn new(config: &Config, clock: C, home: Option<&Path>) -> Self {
        TodoService {
            file_path: expand_tilde(&config.file_path, home),
            templates: config.templates.clone(),
            clock,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Append a new task built from `request`, returning the appended line.
    /// A missing file is created.
    pub fn compose(&self, request: &ComposeRequest) -> Result<String, TodoError> {
        let text = read_todo_file(&self.file_path)?.unwrap_or_default();
        let today = self.clock.today();
        let capture = capture_ops::capture(&text, request, &self.templates, today)?;
        write_todo_file(&self.file_path, &capture.text)?;
        info!(
            path = %self.file_path.display(),
            description = %capture.record.description,
            "captured task"
        );
        Ok(format_task_line(&capture.record))
    }

    /// Urgent tasks in display order. A missing file has none.
    pub fn list_urgent(&self) -> Result<Vec<UrgentItem>, TodoError> {
        let Some(text) = read_todo_file(&self.file_path)? else {
            debug!(path = %self.file_path.display(), "task file missing, nothing urgent");
            return Ok(Vec::new());
        };
        let items = urgent::list_urgent(&text, self.clock.today());
        debug!(count = items.len(), "ranked urgent tasks");
        Ok(items)
    }

    /// Every active task with its tokens, in file order. A missing file has none.
    pub fn list_active(&self) -> Result<Vec<ListedTask>, TodoError> {
        let Some(text) = read_todo_file(&self.file_path)? else {
            debug!(path = %self.file_path.display(), "task file missing, nothing to list");
            return Ok(Vec::new());
        };
        Ok(list_ops::list_active(&text))
    }

    /// Mark the task at `line_index` done, returning the rewritten line.
    pub fn complete(&self, line_index: i64) -> Result<String, TodoError> {
        let text = read_existing_todo_file(&self.file_path)?;
        let completion = task_ops::complete_task(&text, line_index, self.clock.today())?;
        write_todo_file(&self.file_path, &completion.text)?;
        info!(path = %self.file_path.display(), line_index, "completed task");
        Ok(completion.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::task_ops::TaskError;
    use crate::util::clock::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn service(dir: &Path, day: (i32, u32, u32)) -> TodoService<FixedClock> {
        let config: Config = toml::from_str(
            r#"
file_path = "~/todo.txt"

[[templates]]
name = "work"
projects = ["work"]
contexts = ["meeting"]
"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap();
        TodoService::new(&config, FixedClock(today), Some(dir))
    }

    fn request(text: &str, template_index: i64, due_today: bool) -> ComposeRequest {
        ComposeRequest {
            text: text.to_string(),
            priority: None,
            due_today,
            template_index,
        }
    }

    #[test]
    fn test_file_path_expands_home() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 3, 1));
        assert_eq!(svc.file_path(), tmp.path().join("todo.txt"));
        assert_eq!(svc.templates().len(), 1);
    }

    #[test]
    fn test_compose_creates_and_appends() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 3, 1));

        svc.compose(&request("Buy milk", -1, false)).unwrap();
        let line = svc.compose(&request("Sync", 0, true)).unwrap();
        assert_eq!(line, "2024-03-01 Sync +work @meeting due:2024-03-01");

        let text = fs::read_to_string(svc.file_path()).unwrap();
        assert_eq!(
            text,
            "2024-03-01 Buy milk\n2024-03-01 Sync +work @meeting due:2024-03-01\n"
        );
    }

    #[test]
    fn test_compose_invalid_priority_leaves_file() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 3, 1));
        fs::write(svc.file_path(), "keep me").unwrap();

        let mut req = request("x", -1, false);
        req.priority = Some("42".into());
        let err = svc.compose(&req).unwrap_err();
        assert!(matches!(err, TodoError::Task(TaskError::InvalidPriority(_))));
        assert_eq!(fs::read_to_string(svc.file_path()).unwrap(), "keep me");
    }

    #[test]
    fn test_list_urgent_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 1, 10));
        assert!(svc.list_urgent().unwrap().is_empty());
    }

    #[test]
    fn test_list_urgent_rereads_file() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 1, 10));
        fs::write(svc.file_path(), "(A) First\n").unwrap();
        assert_eq!(svc.list_urgent().unwrap().len(), 1);

        // Edited by another program in between
        fs::write(svc.file_path(), "Plain\n(A) First\n(A) Second\n").unwrap();
        let items = svc.list_urgent().unwrap();
        assert_eq!(
            items.iter().map(|i| i.line_index).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_list_active() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 1, 10));
        assert!(svc.list_active().unwrap().is_empty());

        fs::write(svc.file_path(), "x 2024-01-01 old\n(B) Plan +garden\n").unwrap();
        let tasks = svc.list_active().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].line_index, 1);
        assert_eq!(tasks[0].projects, vec!["garden".to_string()]);
    }

    #[test]
    fn test_complete_round() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 5, 5));
        fs::write(svc.file_path(), "Keep\n(B) 2024-01-01 Call bank\n").unwrap();

        let line = svc.complete(1).unwrap();
        assert_eq!(line, "x 2024-05-05 2024-01-01 Call bank");
        assert_eq!(
            fs::read_to_string(svc.file_path()).unwrap(),
            "Keep\nx 2024-05-05 2024-01-01 Call bank\n"
        );

        let err = svc.complete(1).unwrap_err();
        assert!(matches!(err, TodoError::Task(TaskError::AlreadyCompleted(1))));
    }

    #[test]
    fn test_complete_out_of_range_leaves_file() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 5, 5));
        let original = "one\ntwo\n";
        fs::write(svc.file_path(), original).unwrap();

        let err = svc.complete(2).unwrap_err();
        assert!(matches!(err, TodoError::Task(TaskError::OutOfRange { .. })));
        assert_eq!(fs::read_to_string(svc.file_path()).unwrap(), original);
    }

    #[test]
    fn test_complete_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let svc = service(tmp.path(), (2024, 5, 5));
        assert!(matches!(svc.complete(0), Err(TodoError::NotFound(_))));
    }
}
