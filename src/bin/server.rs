//! TreeKV Server Binary
//!
//! Starts the TCP server for TreeKV.

use std::sync::Arc;

use clap::Parser;
use treekv::network::Server;
use treekv::{Config, Engine, ResponseEncoding};
use tracing_subscriber::{fmt, EnvFilter};

/// TreeKV Server
#[derive(Parser, Debug)]
#[command(name = "treekv-server")]
#[command(about = "Hierarchical JSON key-value store")]
#[command(version)]
struct Args {
    /// Document file
    #[arg(short, long, default_value = "./data/db.json")]
    db_path: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:34567")]
    listen: String,

    /// Worker threads (defaults to available CPU parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Maximum number of top-level keys
    #[arg(long, default_value = "1000")]
    max_root_keys: usize,

    /// Grace period for in-flight requests after exit, in milliseconds
    #[arg(long, default_value = "10000")]
    grace_ms: u64,

    /// fsync the document file after every write
    #[arg(long)]
    sync_writes: bool,

    /// Send response JSON without the extra string encoding
    #[arg(long)]
    plain_responses: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,treekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("TreeKV Server v{}", treekv::VERSION);
    tracing::info!("Document file: {}", args.db_path);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let mut builder = Config::builder()
        .db_path(&args.db_path)
        .listen_addr(&args.listen)
        .max_root_keys(args.max_root_keys)
        .shutdown_grace_ms(args.grace_ms)
        .sync_writes(args.sync_writes);
    if let Some(workers) = args.workers {
        builder = builder.worker_threads(workers);
    }
    if args.plain_responses {
        builder = builder.response_encoding(ResponseEncoding::Plain);
    }
    let config = builder.build();

    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server started!");

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
