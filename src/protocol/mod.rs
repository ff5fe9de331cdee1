//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format
//!
//! ### Frame Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │         UTF-8 text          │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - `{"type":"get","key":K}`
//! - `{"type":"set","key":K,"value":V}`
//! - `{"type":"delete","key":K}`
//! - `{"type":"exit"}`
//!
//! where `K` is a string or an array of strings.
//!
//! ### Responses
//! - `{"response":"OK"}` / `{"response":"OK","value":V}`
//! - `{"response":"ERROR","reason":"No such key"}`

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType, Request};
pub use response::{Response, Status};
pub use codec::{
    decode_frame, decode_response_text, encode_frame, encode_response_text, read_frame,
    read_request_text, read_response, unwrap_response_text, write_frame, write_request,
    write_response, HEADER_SIZE, MAX_FRAME_SIZE,
};
