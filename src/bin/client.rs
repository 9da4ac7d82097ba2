use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use auction_house::client::failover::FailoverClient;
use auction_house::node::context::{BACKUP_PORT, PRIMARY_PORT};

#[derive(Debug)]
struct ClientArgs {
    primary_url: String,
    backup_url: String,
}

fn parse_args(args: &[String]) -> anyhow::Result<ClientArgs> {
    let mut parsed = ClientArgs {
        primary_url: format!("http://127.0.0.1:{}", PRIMARY_PORT),
        backup_url: format!("http://127.0.0.1:{}", BACKUP_PORT),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--primary" => {
                parsed.primary_url = args
                    .get(i + 1)
                    .context("--primary requires a value")?
                    .clone();
                i += 2;
            }
            "--backup" => {
                parsed.backup_url = args
                    .get(i + 1)
                    .context("--backup requires a value")?
                    .clone();
                i += 2;
            }
            "--help" => {
                eprintln!("Usage: {} [--primary <url>] [--backup <url>]", args[0]);
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let client_args = parse_args(&args)?;

    let id = Uuid::new_v4().to_string();
    let mut client = FailoverClient::new(client_args.primary_url, client_args.backup_url)?;

    tracing::info!(
        "(CLIENT-{}) Write 'bid <amount>' to bid and/or start an auction; write 'result' to see the latest auction",
        id
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if let Some(raw_amount) = input.strip_prefix("bid ") {
            match raw_amount.trim().parse::<i64>() {
                Ok(amount) => match client.bid(&id, amount).await {
                    Ok(response) => tracing::info!("{}", response.message),
                    Err(e) => {
                        tracing::error!("(CLIENT-{}) {}", id, e);
                        std::process::exit(1);
                    }
                },
                Err(_) => {
                    tracing::info!("(CLIENT-{}) 'bid' command requires a valid number as amount", id);
                }
            }
        } else if input == "result" {
            match client.result().await {
                Ok(response) => tracing::info!("{}", response.message),
                Err(e) => {
                    tracing::error!("(CLIENT-{}) {}", id, e);
                    std::process::exit(1);
                }
            }
        } else {
            tracing::info!("(CLIENT-{}) Invalid command - try 'result' or 'bid <amount>'", id);
        }
    }

    Ok(())
}
