//! # TreeKV
//!
//! A single-node hierarchical key-value store with:
//! - One JSON document as the whole store, addressed by key or key path
//! - Whole-file snapshot persistence, reloaded per operation
//! - Process-wide reader/writer lock around every access
//! - Length-prefixed TCP protocol, one exchange per connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (accept loop + fixed worker pool)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ frame → request text
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │            (decode, dispatch, build response)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!               ┌───────▼───────┐
//!               │ GuardedStore  │  (RwLock)
//!               └───────┬───────┘
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │  Document   │          │ DocumentFile │
//!   │ (path ops)  │          │ (db.json)    │
//!   └─────────────┘          └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod document;
pub mod storage;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TreeKvError};
pub use config::{Config, ResponseEncoding};
pub use document::{Document, Path};
pub use engine::{Engine, Outcome, Reply};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TreeKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
