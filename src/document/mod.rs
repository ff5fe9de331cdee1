//! Document Module
//!
//! The in-memory form of the store.
//!
//! ## Responsibilities
//! - Hold the root object of the store
//! - Path-addressed get/set/delete over nested objects
//! - Report the root key count used for the capacity limit
//!
//! ## Lifetime
//! A `Document` is rebuilt from the backing file for every operation and
//! dropped afterwards. Nothing is cached between requests.

mod path;
mod tree;

pub use path::Path;
pub use tree::{Document, Object};
