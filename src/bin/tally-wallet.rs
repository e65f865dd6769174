#![forbid(unsafe_code)]
//! Wallet CLI: fetch the chain from a node and report one account's balance
//! and activity.

use clap::Parser;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use tallychain::api::ChainResponse;
use tallychain::config::load_config;
use tallychain::wallet::{account_activity, ActivityEntry};

#[derive(Parser)]
#[command(name = "tally-wallet", about = "Show balance and activity for an account")]
struct Args {
    /// Account identifier to look up
    id: String,

    /// Node base URL (overrides config.toml)
    #[arg(long)]
    node: Option<String>,
}

fn activity_table(header: &str, entries: &[ActivityEntry], color: TableColor) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new(header)
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Amount")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.counterparty).fg(TableColor::White),
            Cell::new(entry.amount.to_string()).fg(color),
        ]);
    }
    table
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config()?;
    let node_url = args.node.unwrap_or(config.client.node_url);

    let response: ChainResponse = reqwest::get(format!("{}/chain", node_url))
        .await?
        .json()
        .await?;

    let activity = account_activity(&response.chain, &args.id);

    println!();
    println!("{}", format!("📒 Account: {}", args.id).cyan());
    println!(
        "{}",
        format!("⛓️  Chain length: {}", response.length).cyan()
    );
    println!();
    println!(
        "{}",
        format!("Your current balance is: {}", activity.balance)
            .green()
            .bold()
    );

    if !activity.debits.is_empty() {
        println!();
        println!("{}", "Debit Activity".red().bold());
        println!("{}", activity_table("Sent to", &activity.debits, TableColor::Red));
    }

    if !activity.credits.is_empty() {
        println!();
        println!("{}", "Credit Activity".green().bold());
        println!(
            "{}",
            activity_table("Received from", &activity.credits, TableColor::Green)
        );
    }

    Ok(())
}
