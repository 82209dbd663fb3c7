use crate::model::todo::{Direction, Todo, TodoId};

// ---------------------------------------------------------------------------
// Display order
// ---------------------------------------------------------------------------

/// Sort in place by rank, highest first. Stable: equal ranks keep their
/// relative order.
pub fn sort_by_rank(todos: &mut [Todo]) {
    todos.sort_by(|a, b| b.rank.cmp(&a.rank));
}

/// The display sequence for an arbitrarily ordered collection.
pub fn display_order(todos: &[Todo]) -> Vec<Todo> {
    let mut ordered = todos.to_vec();
    sort_by_rank(&mut ordered);
    ordered
}

/// True when no todo is ranked above the one before it.
pub fn is_rank_ordered(todos: &[Todo]) -> bool {
    todos.windows(2).all(|pair| pair[0].rank >= pair[1].rank)
}

/// Where a todo of `rank` goes: before the first todo ranked at or below it.
pub fn insertion_index(todos: &[Todo], rank: i64) -> usize {
    todos
        .iter()
        .position(|t| t.rank <= rank)
        .unwrap_or(todos.len())
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

pub fn position_of(todos: &[Todo], id: &TodoId) -> Option<usize> {
    todos.iter().position(|t| &t.id == id)
}

/// Index of the todo directly above (`Up`) or below (`Down`) `idx`, if any.
pub fn neighbor_index(len: usize, idx: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Up => idx.checked_sub(1),
        Direction::Down => {
            let below = idx + 1;
            (below < len).then_some(below)
        }
    }
}

/// Put the server's copy of a moved todo back into the sequence.
///
/// Without a neighbor the todo is replaced where it stands. With one, the
/// two swap positions: the neighbor keeps its previous local copy and the
/// moved todo takes the neighbor's slot. Ranks are not consulted.
pub fn splice_moved(todos: &mut [Todo], idx: usize, neighbor: Option<usize>, moved: Todo) {
    todos[idx] = moved;
    if let Some(neighbor) = neighbor {
        todos.swap(idx, neighbor);
    }
}

/// Drop later todos whose id was already seen. Returns how many were dropped.
pub fn dedup_by_id(todos: &mut Vec<Todo>) -> usize {
    let before = todos.len();
    let mut seen = std::collections::HashSet::new();
    todos.retain(|t| seen.insert(t.id.clone()));
    before - todos.len()
}
