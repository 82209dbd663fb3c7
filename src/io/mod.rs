pub mod config_io;
pub mod http;
pub mod memory;
pub mod service;

pub use service::{ListService, ServiceError};
