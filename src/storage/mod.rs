//! Storage Module
//!
//! Whole-document persistence and the lock that serializes access to it.
//!
//! ## Components
//! - `DocumentFile`: load/save the document as one JSON file
//! - `GuardedStore`: reader/writer lock around the file
//!
//! ## File Format
//! ```text
//! {"key":"value","nested":{"inner":[1,2,3]}}
//! ```
//! The file holds the entire root object and is rewritten on every mutation.
//! It does not exist until the first successful write.

mod file;
mod guard;

pub use file::DocumentFile;
pub use guard::GuardedStore;
