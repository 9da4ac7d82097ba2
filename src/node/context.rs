use anyhow::Result;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::auction::handlers::{handle_bid, handle_result, handle_update};
use crate::auction::protocol::{ENDPOINT_BID, ENDPOINT_RESULT, ENDPOINT_UPDATE};
use crate::auction::service::AuctionService;
use crate::auction::state::Role;

/// Port the active node binds by convention.
pub const PRIMARY_PORT: u16 = 3000;
/// Port a second process falls back to, marking itself the backup.
pub const BACKUP_PORT: u16 = 3001;

/// Everything a node knows about its own deployment, fixed at startup.
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub role: Role,
    pub listen_addr: SocketAddr,
    pub peer_addr: SocketAddr,
}

impl NodeContext {
    pub fn peer_url(&self) -> String {
        format!("http://{}", self.peer_addr)
    }
}

/// Elects the node's role by port convention: try the primary port first;
/// if it is already bound, bind the backup port instead and run as backup.
/// Failing both is a startup error that terminates the process.
pub async fn bind_with_fallback(
    host: IpAddr,
    primary_port: u16,
    backup_port: u16,
) -> Result<(TcpListener, NodeContext)> {
    let primary_addr = SocketAddr::new(host, primary_port);

    match TcpListener::bind(primary_addr).await {
        Ok(listener) => {
            let listen_addr = listener.local_addr()?;
            Ok((
                listener,
                NodeContext {
                    role: Role::Active,
                    listen_addr,
                    peer_addr: SocketAddr::new(host, backup_port),
                },
            ))
        }
        Err(e) => {
            tracing::info!(
                "Primary port {} taken ({}), running as backup on port {}",
                primary_port,
                e,
                backup_port
            );
            let listener = TcpListener::bind(SocketAddr::new(host, backup_port)).await?;
            let listen_addr = listener.local_addr()?;
            Ok((
                listener,
                NodeContext {
                    role: Role::Backup,
                    listen_addr,
                    peer_addr: primary_addr,
                },
            ))
        }
    }
}

/// Assembles a node's HTTP surface around its auction service.
pub fn build_router(service: Arc<AuctionService>) -> Router {
    Router::new()
        .route(ENDPOINT_BID, post(handle_bid))
        .route(ENDPOINT_RESULT, get(handle_result))
        .route(ENDPOINT_UPDATE, post(handle_update))
        .layer(Extension(service))
}
