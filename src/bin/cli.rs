//! TreeKV CLI Client
//!
//! Command-line interface for interacting with TreeKV.

use std::fs;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use treekv::network::Client;
use treekv::protocol::Request;
use treekv::{ResponseEncoding, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// TreeKV CLI
#[derive(Parser, Debug)]
#[command(name = "treekv-cli")]
#[command(about = "CLI for the TreeKV key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:34567")]
    server: String,

    /// Command type (get, set, delete, exit)
    #[arg(short = 't', long = "type", required_unless_present = "input")]
    kind: Option<String>,

    /// Key
    #[arg(short, long)]
    key: Option<String>,

    /// Value (sent as a JSON string unless --json-value is given)
    #[arg(short, long)]
    value: Option<String>,

    /// Send the contents of this request file verbatim
    #[arg(long = "in", conflicts_with_all = ["kind", "key", "value"])]
    input: Option<String>,

    /// Parse --value as JSON
    #[arg(long)]
    json_value: bool,

    /// Server sends response JSON without the extra string encoding
    #[arg(long)]
    plain_responses: bool,

    /// Socket timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    println!("Client started!");

    let request = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => build_request(&args)?.to_json()?,
    };

    let encoding = if args.plain_responses {
        ResponseEncoding::Plain
    } else {
        ResponseEncoding::DoubleEncoded
    };
    let client = Client::new(&args.server)
        .with_encoding(encoding)
        .with_timeout(Duration::from_millis(args.timeout_ms));

    println!("Sent: {}", request);
    let response = client.send_raw(&request)?;
    println!("Received: {}", response);

    Ok(())
}

fn build_request(args: &Args) -> Result<Request> {
    let kind = args.kind.clone().unwrap_or_default();
    let mut request = Request::new(kind.as_str());

    if matches!(kind.as_str(), "get" | "set" | "delete") {
        request = request.with_key(args.key.clone().unwrap_or_default());
    }
    if kind == "set" {
        let value = match &args.value {
            Some(raw) if args.json_value => serde_json::from_str(raw)?,
            Some(raw) => Value::String(raw.clone()),
            None => Value::Null,
        };
        request = request.with_value(value);
    }

    Ok(request)
}
