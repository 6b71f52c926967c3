//! Stub comments service binary entry point
//!
//! Run with: proctor-stub [--host HOST] [--port PORT] [--config FILE]
//!
//! Serves canned discussion fixtures over HTTP so acceptance tests can run
//! without the real comments backend.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use proctor::stub::{self, StubConfig};
use proctor::version::PROCTOR_VERSION;

/// HTTP stub of the discussion/comments backend
#[derive(Parser, Debug)]
#[command(name = "proctor-stub")]
#[command(version = PROCTOR_VERSION)]
#[command(about = "HTTP stub of the discussion/comments backend", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on (0 picks a free port)
    #[arg(long, default_value_t = 4567)]
    port: u16,

    /// JSON file seeding the fixture store
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize structured logging with env-based filter, defaulting to info
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match stub::load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => StubConfig::default(),
    };

    let addr = SocketAddr::new(args.host, args.port);
    if let Err(e) = stub::serve(addr, config).await {
        eprintln!("{e}");
        process::exit(1);
    }
}
