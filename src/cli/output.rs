use serde::Serialize;

use crate::model::todo::{Direction, Todo};
use crate::ops::views::CategoryGroups;

/// Shown in place of an empty name
pub const UNNAMED: &str = "Unnamed Todo";

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SessionJson {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

#[derive(Serialize)]
pub struct GroupJson<'a> {
    /// `None` for the todos without any label
    pub category: Option<&'a str>,
    pub todos: Vec<&'a Todo>,
}

pub fn groups_to_json<'a>(grouped: &CategoryGroups<'a>) -> Vec<GroupJson<'a>> {
    let mut out: Vec<GroupJson<'a>> = grouped
        .groups
        .iter()
        .map(|(label, todos)| GroupJson {
            category: Some(*label),
            todos: todos.clone(),
        })
        .collect();
    if !grouped.uncategorized.is_empty() {
        out.push(GroupJson {
            category: None,
            todos: grouped.uncategorized.clone(),
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

pub fn display_name(todo: &Todo) -> &str {
    if todo.name.is_empty() {
        UNNAMED
    } else {
        &todo.name
    }
}

/// Format a single todo as a one-line summary
pub fn format_todo_line(todo: &Todo) -> String {
    let check = if todo.done { 'x' } else { ' ' };
    let labels = if todo.category.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            todo.category
                .iter()
                .map(|c| format!("#{}", c))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };
    format!("[{}] {} {}{}", check, todo.id, display_name(todo), labels)
}

/// Summary line followed by the body text, indented
pub fn format_todo_detail(todo: &Todo, indent: usize) -> Vec<String> {
    let prefix = "  ".repeat(indent);
    let mut lines = vec![format!("{}{}", prefix, format_todo_line(todo))];
    for line in todo.text.lines() {
        lines.push(format!("{}    {}", prefix, line).trim_end().to_string());
    }
    lines
}

pub fn format_listing<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Vec<String> {
    let mut lines = Vec::new();
    for todo in todos {
        lines.extend(format_todo_detail(todo, 0));
    }
    if lines.is_empty() {
        lines.push("no todos".to_string());
    }
    lines
}

pub fn format_groups(grouped: &CategoryGroups<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let sections = grouped
        .groups
        .iter()
        .map(|(label, todos)| (format!("#{}", label), todos))
        .chain(
            (!grouped.uncategorized.is_empty())
                .then(|| ("(no category)".to_string(), &grouped.uncategorized)),
        );
    for (heading, todos) in sections {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(heading);
        for todo in todos {
            lines.extend(format_todo_detail(todo, 1));
        }
    }
    if lines.is_empty() {
        lines.push("no todos".to_string());
    }
    lines
}

/// Parse a direction string into Direction
pub fn parse_direction(s: &str) -> Result<Direction, String> {
    match s {
        "up" | "u" => Ok(Direction::Up),
        "down" | "d" => Ok(Direction::Down),
        _ => Err(format!("unknown direction '{}' (expected: up, down)", s)),
    }
}
