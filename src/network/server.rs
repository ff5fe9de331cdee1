//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::engine::{Engine, Outcome};
use crate::error::Result;
use super::{Connection, WorkerPool};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Stops a running server's accept loop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// TCP server for TreeKV
///
/// One connection carries exactly one request and one response. Each
/// accepted connection becomes a job on the worker pool. After a worker has
/// answered an `exit` command the accept loop stops, the pool gets
/// `shutdown_grace_ms` to finish in-flight jobs, and `run` returns.
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the configured listen address
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Run the accept loop until shutdown (blocking)
    pub fn run(self) -> Result<()> {
        let pool = WorkerPool::new(self.config.worker_threads)?;
        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()?,
            pool.size()
        );

        let mut last_error = None::<io::ErrorKind>;
        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    last_error = None;
                    tracing::trace!("Accepted connection from {}", peer);
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", peer, e);
                        continue;
                    }
                    let job = self.connection_job(stream);
                    pool.execute(job)?;
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_BACKOFF);
                }
                Err(e) => {
                    if last_error != Some(e.kind()) {
                        tracing::warn!("Accept error: {}", e);
                    }
                    last_error = Some(e.kind());
                    thread::sleep(ERROR_BACKOFF);
                }
            }
        }

        tracing::info!("No longer accepting connections, waiting for workers");
        let abandoned = pool.shutdown(self.config.shutdown_grace());
        if abandoned > 0 {
            tracing::warn!(
                "{} worker(s) still busy after {}ms grace period; abandoning them",
                abandoned,
                self.config.shutdown_grace_ms
            );
        }

        Ok(())
    }

    fn connection_job(&self, stream: TcpStream) -> impl FnOnce() + Send + 'static {
        let engine = Arc::clone(&self.engine);
        let shutdown = self.shutdown.clone();
        let encoding = self.config.response_encoding;
        let (read_ms, write_ms) = (self.config.read_timeout_ms, self.config.write_timeout_ms);

        move || {
            let result = Connection::new(stream, engine).and_then(|mut connection| {
                connection.set_timeouts(read_ms, write_ms)?;
                connection.handle(encoding)
            });

            match result {
                Ok(Outcome::Terminate) => {
                    tracing::info!("Exit command received, shutting down");
                    shutdown.shutdown();
                }
                Ok(Outcome::Continue) => {}
                Err(e) => tracing::error!("Connection failed: {}", e),
            }
        }
    }
}
