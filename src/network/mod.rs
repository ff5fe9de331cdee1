//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept, polls a shutdown flag)
//! - Fixed worker pool sized to CPU parallelism
//! - One request/response exchange per connection
//! - Commands routed through Engine

mod server;
mod connection;
mod pool;
mod client;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
pub use pool::WorkerPool;
pub use client::Client;
