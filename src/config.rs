//! Configuration for TreeKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::error::{Result, TreeKvError};

/// Main configuration for a TreeKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Backing JSON file holding the whole document.
    /// Parent directories are created on the first save.
    pub db_path: PathBuf,

    /// fsync the file after every save
    pub sync_writes: bool,

    /// Maximum number of direct keys on the root object
    pub max_root_keys: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Size of the fixed connection worker pool
    pub worker_threads: usize,

    /// How long in-flight connections may run after shutdown (milliseconds)
    pub shutdown_grace_ms: u64,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    /// How response objects are placed into frames
    pub response_encoding: ResponseEncoding,
}

/// Response frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseEncoding {
    /// Response JSON text wrapped once more as a JSON string literal.
    /// This is what deployed clients expect.
    #[default]
    DoubleEncoded,

    /// Response JSON text placed in the frame as-is
    Plain,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/db.json"),
            sync_writes: false,
            max_root_keys: 1000,
            listen_addr: "127.0.0.1:34567".to_string(),
            worker_threads: default_worker_threads(),
            shutdown_grace_ms: 10_000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            response_encoding: ResponseEncoding::DoubleEncoded,
        }
    }
}

fn default_worker_threads() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(TreeKvError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_root_keys == 0 {
            return Err(TreeKvError::Config(
                "max_root_keys must be at least 1".to_string(),
            ));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(TreeKvError::Config("listen_addr is empty".to_string()));
        }
        Ok(())
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing document file
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// fsync after every save
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    /// Set the root key capacity
    pub fn max_root_keys(mut self, count: usize) -> Self {
        self.config.max_root_keys = count;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the shutdown grace period (in milliseconds)
    pub fn shutdown_grace_ms(mut self, ms: u64) -> Self {
        self.config.shutdown_grace_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Choose how responses are framed
    pub fn response_encoding(mut self, encoding: ResponseEncoding) -> Self {
        self.config.response_encoding = encoding;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
