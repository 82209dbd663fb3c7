pub mod todo;
pub mod session;
pub mod config;

pub use todo::*;
pub use session::*;
pub use config::*;
