//! Engine Module
//!
//! Applies commands to the document and builds responses.
//!
//! ## Responsibilities
//! - Decode request text into a command
//! - Dispatch get/set/delete/exit
//! - Enforce the root key capacity
//! - Turn domain failures into ERROR responses
//!
//! ## Request flow
//! ```text
//! Decode → Dispatch → {Get | Set | Delete | Exit | Unknown} → BuildResponse
//! ```
//! A response is built for every command, including failing ones and
//! `exit`. Nothing carries over between requests.

use serde_json::Value;

use crate::config::Config;
use crate::document::Path;
use crate::error::{Result, TreeKvError};
use crate::protocol::{Command, Request, Response};
use crate::storage::{DocumentFile, GuardedStore};

/// What the caller should do after sending the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep serving
    Continue,

    /// Stop accepting new connections
    Terminate,
}

/// Response to send plus what happens afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub response: Response,
    pub outcome: Outcome,
}

impl Reply {
    fn new(response: Response) -> Self {
        Self {
            response,
            outcome: Outcome::Continue,
        }
    }

    fn terminate(response: Response) -> Self {
        Self {
            response,
            outcome: Outcome::Terminate,
        }
    }
}

/// The command processor
///
/// ## Concurrency Model
///
/// - **Reads** (get): load under the shared lock, traverse the private
///   snapshot afterwards.
///
/// - **Writes** (set/delete): one exclusive critical section spanning load,
///   capacity/lookup checks, mutation and save.
///
/// The document is reloaded from disk by every operation; the file is the
/// only state shared between connections.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Document file behind the process-wide lock
    store: GuardedStore,
}

impl Engine {
    /// Create an engine over the configured document file.
    ///
    /// The file itself is not touched until the first command runs.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let store = GuardedStore::new(DocumentFile::new(&config.db_path, config.sync_writes));
        tracing::debug!(
            "Engine ready: document={}, max_root_keys={}",
            config.db_path.display(),
            config.max_root_keys
        );

        Ok(Self { config, store })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified document file
    pub fn open_path(path: &std::path::Path) -> Result<Self> {
        Self::open(Config::builder().db_path(path).build())
    }

    /// Decode request text and execute it.
    ///
    /// Text that is not a request object still gets an ERROR reply.
    pub fn handle_request(&self, text: &str) -> Result<Reply> {
        match Request::from_json(text) {
            Ok(request) => self.execute(Command::from(request)),
            Err(e) => {
                tracing::debug!("Rejecting request: {}", e);
                Ok(Reply::new(Response::from(&e)))
            }
        }
    }

    /// Execute a command
    ///
    /// Domain failures become ERROR replies. I/O failures and a corrupt
    /// document file are returned as errors; no response is built for them.
    pub fn execute(&self, command: Command) -> Result<Reply> {
        let result = match command {
            Command::Get { key } => self.get_json(&key).map(Response::with_value),
            Command::Set { key, value } => self.set_json(&key, value).map(|_| Response::ok()),
            Command::Delete { key } => self.delete_json(&key).map(|_| Response::ok()),
            Command::Exit => return Ok(Reply::terminate(Response::ok())),
            Command::Unknown(kind) => {
                tracing::debug!("Unknown command type {:?}", kind);
                Err(TreeKvError::UnknownCommand)
            }
        };

        match result {
            Ok(response) => Ok(Reply::new(response)),
            Err(e) if e.is_domain() => Ok(Reply::new(Response::from(&e))),
            Err(e) => Err(e),
        }
    }

    fn get_json(&self, key: &Value) -> Result<Value> {
        self.get(&Path::from_json(key)?)
    }

    fn set_json(&self, key: &Value, value: Value) -> Result<()> {
        self.set(&Path::from_json_scalar(key)?, value)
    }

    fn delete_json(&self, key: &Value) -> Result<()> {
        self.delete(&Path::from_json(key)?).map(|_| ())
    }

    /// Get the value at `path`
    pub fn get(&self, path: &Path) -> Result<Value> {
        self.store.read(|document| document.get_at(path).cloned())
    }

    /// Store `value` at `path`
    ///
    /// Refused with `StorageFull` while the root object already holds
    /// `max_root_keys` keys, whatever the depth of `path` and even when the
    /// key already exists.
    pub fn set(&self, path: &Path, value: Value) -> Result<()> {
        let max_root_keys = self.config.max_root_keys;
        self.store.update(|document| {
            if document.root_key_count() >= max_root_keys {
                return Err(TreeKvError::StorageFull);
            }
            document.set_at(path, value)
        })
    }

    /// Remove the value at `path`, returning it
    pub fn delete(&self, path: &Path) -> Result<Value> {
        self.store.update(|document| document.delete_at(path))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of direct keys on the stored root object
    pub fn root_key_count(&self) -> Result<usize> {
        self.store.read(|document| Ok(document.root_key_count()))
    }

    /// Get the document file path
    pub fn db_path(&self) -> &std::path::Path {
        &self.config.db_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
