//! TCP Client
//!
//! Sends one request per connection and reads the reply.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::ResponseEncoding;
use crate::error::Result;
use crate::protocol::{read_frame, unwrap_response_text, write_frame, Request, Response};

/// Client for a TreeKV server
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    encoding: ResponseEncoding,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            encoding: ResponseEncoding::default(),
            timeout: None,
        }
    }

    /// Response encoding the server uses
    pub fn with_encoding(mut self, encoding: ResponseEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Socket read/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send a request and parse the response object
    pub fn send(&self, request: &Request) -> Result<Response> {
        let text = self.send_raw(&request.to_json()?)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send request text verbatim and return the response object's JSON text
    pub fn send_raw(&self, request: &str) -> Result<String> {
        let stream = TcpStream::connect(&self.addr)?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        let mut writer = BufWriter::new(stream.try_clone()?);
        let mut reader = BufReader::new(stream);

        write_frame(&mut writer, request)?;
        let text = read_frame(&mut reader)?;
        unwrap_response_text(&text, self.encoding)
    }
}
