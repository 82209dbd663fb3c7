pub mod ordering;
pub mod store;
pub mod views;

pub use store::{StoreError, TodoStore};
