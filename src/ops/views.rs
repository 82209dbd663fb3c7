//! Read-only views over the display sequence, and category edits.

use indexmap::IndexMap;

use crate::model::todo::{Todo, TodoPatch};

/// Todos grouped under their category labels.
#[derive(Debug, Default)]
pub struct CategoryGroups<'a> {
    /// Label → todos, labels in order of first appearance
    pub groups: IndexMap<&'a str, Vec<&'a Todo>>,
    /// Todos with no label at all
    pub uncategorized: Vec<&'a Todo>,
}

/// Group todos by label, walking them in the given (display) order.
/// A todo with several labels is listed under each of them, once.
pub fn group_by_category(todos: &[Todo]) -> CategoryGroups<'_> {
    let mut result = CategoryGroups::default();
    for todo in todos {
        if todo.category.is_empty() {
            result.uncategorized.push(todo);
            continue;
        }
        for label in &todo.category {
            let group = result.groups.entry(label.as_str()).or_default();
            if !group.iter().any(|t| t.id == todo.id) {
                group.push(todo);
            }
        }
    }
    result
}

/// Todos carrying `label`, display order kept.
pub fn filter_by_category<'a>(todos: &'a [Todo], label: &str) -> Vec<&'a Todo> {
    todos.iter().filter(|t| t.has_category(label)).collect()
}

/// Every distinct label, in order of first appearance.
pub fn categories(todos: &[Todo]) -> Vec<&str> {
    let mut seen: IndexMap<&str, ()> = IndexMap::new();
    for todo in todos {
        for label in &todo.category {
            seen.entry(label.as_str()).or_insert(());
        }
    }
    seen.into_keys().collect()
}

// ---------------------------------------------------------------------------
// Category edits
// ---------------------------------------------------------------------------

/// Patch appending `label` to the todo's labels. Blank labels are refused;
/// a label already present is added again.
pub fn add_category(base: &Todo, label: &str) -> Option<TodoPatch> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let mut category = base.category.clone();
    category.push(label.to_string());
    Some(TodoPatch {
        category: Some(category),
        ..Default::default()
    })
}

/// Patch removing every occurrence of `label`, or `None` if it is absent.
pub fn remove_category(base: &Todo, label: &str) -> Option<TodoPatch> {
    if !base.has_category(label) {
        return None;
    }
    let category = base
        .category
        .iter()
        .filter(|c| c.as_str() != label)
        .cloned()
        .collect();
    Some(TodoPatch {
        category: Some(category),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::TodoId;
    use pretty_assertions::assert_eq;

    fn todo(id: u64, name: &str, labels: &[&str]) -> Todo {
        Todo {
            id: TodoId::Number(id),
            name: name.to_string(),
            text: String::new(),
            done: false,
            category: labels.iter().map(|s| s.to_string()).collect(),
            rank: 0,
        }
    }

    fn group_names<'a>(groups: &CategoryGroups<'a>, label: &str) -> Vec<&'a str> {
        groups.groups[label].iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_group_by_category() {
        let todos = vec![
            todo(1, "milk", &["home", "errands"]),
            todo(2, "report", &["work"]),
            todo(3, "nothing", &[]),
            todo(4, "stamps", &["errands", "errands"]),
        ];
        let grouped = group_by_category(&todos);
        let labels: Vec<&str> = grouped.groups.keys().copied().collect();
        assert_eq!(labels, vec!["home", "errands", "work"]);
        assert_eq!(group_names(&grouped, "errands"), vec!["milk", "stamps"]);
        assert_eq!(grouped.uncategorized.len(), 1);
        assert_eq!(grouped.uncategorized[0].name, "nothing");
    }

    #[test]
    fn test_filter_and_categories() {
        let todos = vec![
            todo(1, "milk", &["home"]),
            todo(2, "report", &["work", "home"]),
        ];
        let home: Vec<&str> = filter_by_category(&todos, "home")
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(home, vec!["milk", "report"]);
        assert!(filter_by_category(&todos, "garden").is_empty());
        assert_eq!(categories(&todos), vec!["home", "work"]);
    }

    #[test]
    fn test_add_category() {
        let base = todo(1, "milk", &["home"]);
        let patch = add_category(&base, " home ").unwrap();
        assert_eq!(
            patch.category,
            Some(vec!["home".to_string(), "home".to_string()])
        );
        assert!(add_category(&base, "   ").is_none());
        assert_eq!(base.category, vec!["home"]);
    }

    #[test]
    fn test_remove_category_removes_all_occurrences() {
        let base = todo(1, "milk", &["home", "shop", "home"]);
        let patch = remove_category(&base, "home").unwrap();
        assert_eq!(patch.category, Some(vec!["shop".to_string()]));
        assert!(remove_category(&base, "work").is_none());
    }
}
