//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ResponseEncoding;
use crate::engine::{Engine, Outcome};
use crate::error::{Result, TreeKvError};
use crate::protocol::{encode_response_text, read_request_text, write_frame};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the command processor
    engine: Arc<Engine>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            engine,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle one request/response exchange (blocking)
    ///
    /// Returns `Outcome::Terminate` once the response to an `exit` command
    /// has been written.
    pub fn handle(&mut self, encoding: ResponseEncoding) -> Result<Outcome> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let request = match read_request_text(&mut self.reader) {
            Ok(text) => text,
            Err(TreeKvError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Client {} went away before sending a request", self.peer_addr);
                return Ok(Outcome::Continue);
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                return Err(e);
            }
        };

        tracing::debug!("Received: {}", request);

        let reply = self.engine.handle_request(&request)?;
        let text = encode_response_text(&reply.response, encoding)?;

        if let Err(e) = write_frame(&mut self.writer, &text) {
            // If the client disconnected before we could send the response,
            // log and exit gracefully rather than treating it as a server error.
            if let TreeKvError::Io(ref io_err) = e {
                if is_disconnect(io_err.kind()) {
                    tracing::debug!(
                        "Client {} disconnected before response could be sent: {}",
                        self.peer_addr, e
                    );
                    return Ok(reply.outcome);
                }
            }
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            return Err(e);
        }

        tracing::debug!("Sent: {}", text);
        Ok(reply.outcome)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
