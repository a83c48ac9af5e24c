use std::collections::BTreeMap;

use crate::model::task::{ListedTask, ParsedLine};
use crate::parse::{extract_tokens, parse_line};

/// Every active line of `text`, in file order, with its description tokens
pub fn list_active(text: &str) -> Vec<ListedTask> {
    text.lines()
        .enumerate()
        .filter_map(|(line_index, raw)| match parse_line(raw) {
            ParsedLine::Active(line) => Some((line_index, line)),
            ParsedLine::Blank | ParsedLine::Completed { .. } => None,
        })
        .map(|(line_index, line)| {
            let tokens = extract_tokens(&line.desc);
            let mut tags = BTreeMap::new();
            for (key, value) in tokens.tags {
                tags.entry(key).or_insert(value);
            }
            ListedTask {
                line_index,
                priority: line.priority,
                due: line.due,
                projects: tokens.projects,
                contexts: tokens.contexts,
                tags,
                desc: line.desc,
            }
        })
        .collect()
}
