//! Client for shared todo lists kept on a remote list server.
//!
//! A list is named by an opaque 32-character token; whoever holds the token
//! can read and change the list. [`ops::TodoStore`] keeps the todos of one
//! list in display order and sends every change to the server through an
//! [`io::ListService`].

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
