use anyhow::Context;
use std::net::IpAddr;
use std::sync::Arc;

use auction_house::auction::service::AuctionService;
use auction_house::auction::state::Role;
use auction_house::node::context::{bind_with_fallback, build_router, BACKUP_PORT, PRIMARY_PORT};
use auction_house::replication;

const REPLICATION_QUEUE_CAPACITY: usize = 64;

#[derive(Debug)]
struct NodeArgs {
    host: IpAddr,
    primary_port: u16,
    backup_port: u16,
}

fn parse_args(args: &[String]) -> anyhow::Result<NodeArgs> {
    let mut parsed = NodeArgs {
        host: "127.0.0.1".parse()?,
        primary_port: PRIMARY_PORT,
        backup_port: BACKUP_PORT,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                parsed.host = args
                    .get(i + 1)
                    .context("--host requires a value")?
                    .parse()?;
                i += 2;
            }
            "--primary-port" => {
                parsed.primary_port = args
                    .get(i + 1)
                    .context("--primary-port requires a value")?
                    .parse()?;
                i += 2;
            }
            "--backup-port" => {
                parsed.backup_port = args
                    .get(i + 1)
                    .context("--backup-port requires a value")?
                    .parse()?;
                i += 2;
            }
            "--help" => {
                eprintln!(
                    "Usage: {} [--host <ip>] [--primary-port <port>] [--backup-port <port>]",
                    args[0]
                );
                eprintln!("Binds the primary port, or the backup port if it is taken.");
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
    let node_args = parse_args(&args)?;

    // 1. Role election by port convention:
    let (listener, context) = bind_with_fallback(
        node_args.host,
        node_args.primary_port,
        node_args.backup_port,
    )
    .await?;

    let label = match context.role {
        Role::Active => "PRIMARY-SERVER",
        Role::Backup => "BACKUP-SERVER",
    };
    tracing::info!("({}) Auction house started on {}", label, context.listen_addr);

    // 2. Replication worker. Wired on both roles for symmetry, but only an
    //    active node ever enqueues pushes.
    let (sink, worker) = replication::replicator::channel(
        context.peer_url(),
        REPLICATION_QUEUE_CAPACITY,
    )?;
    tokio::spawn(worker.run());

    // 3. Auction service and HTTP surface:
    let service = Arc::new(AuctionService::new(context.role, Arc::new(sink)));
    let app = build_router(service);

    axum::serve(listener, app).await?;

    Ok(())
}
