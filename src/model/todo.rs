use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned todo identifier.
///
/// Opaque to the client. The wire form (JSON number or string) is kept so
/// the id is echoed back exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => write!(f, "{}", n),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for TodoId {
    type Err = Infallible;

    /// All-digit input becomes a numeric id, anything else a text id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => TodoId::Number(n),
            Err(_) => TodoId::Text(s.to_string()),
        })
    }
}

impl From<u64> for TodoId {
    fn from(n: u64) -> Self {
        TodoId::Number(n)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

/// A single todo as held by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub done: bool,
    /// Free-text labels, in display order. Duplicates are kept.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: Vec<String>,
    /// Ordering key; higher ranks are shown first.
    #[serde(default)]
    pub rank: i64,
}

impl Todo {
    pub fn has_category(&self, label: &str) -> bool {
        self.category.iter().any(|c| c == label)
    }
}

/// The server encodes an empty label list as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a create request. `id` and `rank` are assigned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTodo {
    pub done: bool,
    pub name: String,
    pub text: String,
    pub category: Vec<String>,
}

impl NewTodo {
    pub fn named(name: impl Into<String>) -> Self {
        NewTodo {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A partial edit. Unset fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub done: Option<bool>,
    pub category: Option<Vec<String>>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.text.is_none() && self.done.is_none() && self.category.is_none()
    }

    /// Build the candidate entity for an update request. `base` is not touched.
    pub fn apply_to(&self, base: &Todo) -> Todo {
        let mut candidate = base.clone();
        if let Some(ref name) = self.name {
            candidate.name = name.clone();
        }
        if let Some(ref text) = self.text {
            candidate.text = text.clone();
        }
        if let Some(done) = self.done {
            candidate.done = done;
        }
        if let Some(ref category) = self.category {
            candidate.category = category.clone();
        }
        candidate
    }
}

/// Direction of a one-step reorder in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the top of the list (higher rank)
    Up,
    /// Towards the bottom of the list (lower rank)
    Down,
}

impl Direction {
    /// Wire value of the `upOrDown` field.
    pub fn wire_value(self) -> i8 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}
