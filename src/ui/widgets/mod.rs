//! UI widgets

pub mod column;
pub mod connections;
pub mod prompt;

pub use column::ColumnWidget;
pub use connections::{line_cells, ConnectionsLayer, Stroke};
pub use prompt::{Prompt, PromptTarget, PromptWidget};

/// Truncate a string to fit within max_len characters, adding "…" if truncated
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else if max_len == 0 {
        String::new()
    } else if max_len == 1 {
        "…".to_string()
    } else {
        let truncated: String = name.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    }
}
