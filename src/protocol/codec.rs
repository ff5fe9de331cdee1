//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Frame
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │      UTF-8 text (Len)       │
//! └──────────┴─────────────────────────────┘
//! ```
//! Length is big-endian; one frame per direction per exchange.
//!
//! ### Request text
//! The request object as JSON: `{"type":"get","key":"a"}`
//!
//! ### Response text
//! With [`ResponseEncoding::DoubleEncoded`] the response JSON is serialized
//! a second time as a JSON string:
//! ```text
//! "{\"response\":\"OK\"}"
//! ```
//! With [`ResponseEncoding::Plain`] the response JSON goes in unchanged.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::ResponseEncoding;
use crate::error::{Result, TreeKvError};
use super::{Request, Response};

/// Header size: 2 bytes length
pub const HEADER_SIZE: usize = 2;

/// Maximum text size of one frame
pub const MAX_FRAME_SIZE: usize = u16::MAX as usize;

// =============================================================================
// Frame Encoding/Decoding
// =============================================================================

/// Encode text into a frame
///
/// Format: len (2) + text
pub fn encode_frame(text: &str) -> Result<Bytes> {
    let payload = text.as_bytes();
    if payload.len() > MAX_FRAME_SIZE {
        return Err(TreeKvError::FrameTooLarge(payload.len()));
    }

    let mut frame = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    frame.put_u16(payload.len() as u16);
    frame.put_slice(payload);

    Ok(frame.freeze())
}

/// Decode a complete frame back into its text
pub fn decode_frame(bytes: &[u8]) -> Result<String> {
    if bytes.len() < HEADER_SIZE {
        return Err(TreeKvError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    let total_len = HEADER_SIZE + len;
    if bytes.len() < total_len {
        return Err(TreeKvError::Protocol(format!(
            "Incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    utf8(bytes[HEADER_SIZE..total_len].to_vec())
}

fn utf8(payload: Vec<u8>) -> Result<String> {
    String::from_utf8(payload)
        .map_err(|e| TreeKvError::Protocol(format!("Frame is not valid UTF-8: {}", e)))
}

// =============================================================================
// Response Text Encoding/Decoding
// =============================================================================

/// Turn a response into the text carried by its frame
pub fn encode_response_text(response: &Response, encoding: ResponseEncoding) -> Result<String> {
    let json = serde_json::to_string(response)?;
    match encoding {
        ResponseEncoding::Plain => Ok(json),
        ResponseEncoding::DoubleEncoded => Ok(serde_json::to_string(&json)?),
    }
}

/// Undo the string layer (if any) and return the response object's JSON text
pub fn unwrap_response_text(text: &str, encoding: ResponseEncoding) -> Result<String> {
    match encoding {
        ResponseEncoding::Plain => Ok(text.to_string()),
        ResponseEncoding::DoubleEncoded => serde_json::from_str::<String>(text).map_err(|e| {
            TreeKvError::Protocol(format!("Response is not a JSON string literal: {}", e))
        }),
    }
}

/// Parse a response frame's text
pub fn decode_response_text(text: &str, encoding: ResponseEncoding) -> Result<Response> {
    let json = unwrap_response_text(text, encoding)?;
    serde_json::from_str(&json)
        .map_err(|e| TreeKvError::Protocol(format!("Invalid response object: {}", e)))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame from a stream
///
/// Blocks until the whole frame is received or an error occurs
pub fn read_frame<R: Read>(reader: &mut R) -> Result<String> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let len = u16::from_be_bytes(header) as usize;
    let mut payload = vec![0u8; len];
    if len > 0 {
        reader.read_exact(&mut payload)?;
    }

    utf8(payload)
}

/// Write one frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let frame = encode_frame(text)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    write_frame(writer, &request.to_json()?)
}

/// Read a request frame, returning the raw request text
pub fn read_request_text<R: Read>(reader: &mut R) -> Result<String> {
    read_frame(reader)
}

/// Write a response to a stream
pub fn write_response<W: Write>(
    writer: &mut W,
    response: &Response,
    encoding: ResponseEncoding,
) -> Result<()> {
    write_frame(writer, &encode_response_text(response, encoding)?)
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R, encoding: ResponseEncoding) -> Result<Response> {
    let text = read_frame(reader)?;
    decode_response_text(&text, encoding)
}
