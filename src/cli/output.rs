use serde::Serialize;

use crate::model::config::Template;
use crate::model::task::{ListedTask, Priority, UrgentItem};
use chrono::NaiveDate;
use crate::util::unicode::truncate_to_width;

/// Descriptions are never squeezed below this many cells
const MIN_DESC_WIDTH: usize = 10;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// Structured reply for every command: `{"ok": true, ...}` or
/// `{"ok": false, "error": "..."}`
#[derive(Debug, Serialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<UrgentItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<ListedTask>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<TemplateJson>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn ok() -> Self {
        Reply {
            ok: true,
            todos: None,
            tasks: None,
            line: None,
            templates: None,
            error: None,
        }
    }

    pub fn with_line(line: String) -> Self {
        Reply {
            line: Some(line),
            ..Reply::ok()
        }
    }

    pub fn with_todos(todos: Vec<UrgentItem>) -> Self {
        Reply {
            todos: Some(todos),
            ..Reply::ok()
        }
    }

    pub fn with_tasks(tasks: Vec<ListedTask>) -> Self {
        Reply {
            tasks: Some(tasks),
            ..Reply::ok()
        }
    }

    pub fn with_templates(templates: &[Template]) -> Self {
        Reply {
            templates: Some(
                templates
                    .iter()
                    .enumerate()
                    .map(|(index, t)| TemplateJson {
                        index,
                        template: t.clone(),
                    })
                    .collect(),
            ),
            ..Reply::ok()
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Reply {
            ok: false,
            error: Some(error.to_string()),
            ..Reply::ok()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateJson {
    pub index: usize,
    #[serde(flatten)]
    pub template: Template,
}

// ---------------------------------------------------------------------------
// Human-readable rendering
// ---------------------------------------------------------------------------

/// One row per urgent item: line index, overdue mark, priority, due date,
/// then the description cut to fit `width` cells.
pub fn render_urgent(items: &[UrgentItem], width: usize) -> String {
    if items.is_empty() {
        return "(nothing urgent)".to_string();
    }

    let index_width = index_column_width(items.iter().map(|i| i.line_index));
    items
        .iter()
        .map(|item| {
            let mark = if item.is_overdue { '!' } else { ' ' };
            let prefix = format!(
                "{:>w$}  {} {} {} ",
                item.line_index,
                mark,
                priority_cell(item.priority),
                due_cell(item.due),
                w = index_width
            );
            fit_row(&prefix, &item.desc, width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every active task: line index, priority, due date, description
pub fn render_list(tasks: &[ListedTask], width: usize) -> String {
    if tasks.is_empty() {
        return "(no open tasks)".to_string();
    }

    let index_width = index_column_width(tasks.iter().map(|t| t.line_index));
    tasks
        .iter()
        .map(|task| {
            let prefix = format!(
                "{:>w$}  {} {} ",
                task.line_index,
                priority_cell(task.priority),
                due_cell(task.due),
                w = index_width
            );
            fit_row(&prefix, &task.desc, width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn index_column_width(indices: impl Iterator<Item = usize>) -> usize {
    indices.map(|i| i.to_string().len()).max().unwrap_or(1)
}

fn priority_cell(priority: Option<Priority>) -> String {
    match priority {
        Some(p) => format!("({})", p),
        None => "   ".to_string(),
    }
}

fn due_cell(due: Option<NaiveDate>) -> String {
    match due {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => " ".repeat(10),
    }
}

/// `prefix` then `desc` cut to what is left of `width`
fn fit_row(prefix: &str, desc: &str, width: usize) -> String {
    let desc_width = width.saturating_sub(prefix.len()).max(MIN_DESC_WIDTH);
    let row = format!("{}{}", prefix, truncate_to_width(desc, desc_width));
    row.trim_end().to_string()
}

/// Template list, one per line with its index
pub fn render_templates(templates: &[Template]) -> String {
    if templates.is_empty() {
        return "(no templates configured)".to_string();
    }
    templates
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mut row = format!("{}  {}", i, t.name);
            if let Some(p) = t.priority {
                row.push_str(&format!(" ({})", p));
            }
            for project in &t.projects {
                row.push_str(&format!(" +{}", project));
            }
            for context in &t.contexts {
                row.push_str(&format!(" @{}", context));
            }
            row
        })
        .collect::<Vec<_>>()
        .join("\n")
}
