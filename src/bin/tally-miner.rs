#![forbid(unsafe_code)]
//! Miner CLI: brute-force a proof for the node's last block and submit it.

use clap::Parser;
use colored::*;
use rand::RngCore;
use serde_json::json;
use std::time::Instant;
use tallychain::api::LastBlockResponse;
use tallychain::config::load_config;
use tallychain::hashing::canonical_serialize;
use tallychain::proof::find_proof;

#[derive(Parser)]
#[command(name = "tally-miner", about = "Mine blocks against a tallychain node")]
struct Args {
    /// Node base URL (overrides config.toml)
    #[arg(long)]
    node: Option<String>,

    /// Miner identifier credited with rewards (random if omitted)
    #[arg(long)]
    id: Option<String>,

    /// Number of blocks to mine before exiting
    #[arg(long, default_value_t = 1)]
    blocks: u64,
}

fn generate_miner_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = load_config()?;
    let node_url = args.node.unwrap_or(config.client.node_url);
    let miner_id = args.id.unwrap_or_else(generate_miner_id);

    println!("{}", "⛏️  tallychain miner".cyan().bold());
    println!("Node: {}", node_url);
    println!("Miner id: {}", miner_id);

    let client = reqwest::Client::new();

    for round in 1..=args.blocks {
        let response: LastBlockResponse = client
            .get(format!("{}/last_block", node_url))
            .send()
            .await?
            .json()
            .await?;

        let block_string = canonical_serialize(&response.last_block)?;
        println!(
            "\n[{}/{}] Searching proof for block {}...",
            round, args.blocks, response.last_block.index
        );

        let started = Instant::now();
        // The search is pure CPU; keep it off the async runtime.
        let proof = tokio::task::spawn_blocking(move || find_proof(&block_string)).await?;
        let elapsed = started.elapsed().as_secs_f64();
        let hash_rate = (proof + 1) as f64 / elapsed.max(f64::EPSILON);

        println!(
            "Found proof {} in {:.2}s ({:.0} H/s)",
            proof, elapsed, hash_rate
        );

        let reply: serde_json::Value = client
            .post(format!("{}/mine", node_url))
            .json(&json!({ "proof": proof, "id": miner_id }))
            .send()
            .await?
            .json()
            .await?;

        let message = reply["message"].as_str().unwrap_or("(no message)");
        if message == "New Block Forged" {
            println!(
                "{}",
                format!("✅ {} (block {})", message, reply["index"]).green()
            );
        } else {
            // Someone else may have sealed a block while we were searching.
            println!("{}", format!("❌ {}", message).red());
        }
    }

    Ok(())
}
