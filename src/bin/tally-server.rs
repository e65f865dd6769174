#![forbid(unsafe_code)]
//! HTTP node for tallychain: owns the ledger and serves the REST API.

use clap::Parser;
use rand::RngCore;
use std::net::SocketAddr;
use std::sync::Arc;
use tallychain::api::{run_api_server, Node};
use tallychain::config::load_config;
use tallychain::ledger::Ledger;

#[derive(Parser)]
#[command(name = "tally-server", about = "Run a tallychain ledger node")]
struct Args {
    /// Port to listen on (overrides config.toml)
    #[arg(long)]
    port: Option<u16>,
}

/// Process-unique node identifier, 32 hex chars.
fn generate_node_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = load_config()?;
    let port = args.port.unwrap_or(config.network.api_port);
    let addr: SocketAddr = format!("{}:{}", config.network.bind, port).parse()?;

    let node_id = generate_node_id();
    println!("Node identifier: {}", node_id);

    let ledger = Ledger::new()?;
    let node = Arc::new(Node::new(ledger, node_id));

    run_api_server(node, addr).await
}
