pub mod line_parser;
pub mod line_serializer;

pub use line_parser::{extract_tokens, parse_date, parse_line};
pub use line_serializer::{append_task_to_text, format_task_line};
