use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::network::tiers::TierTable;
use crate::settings::Settings;

mod http;
mod members;
mod network;

#[derive(Debug, thiserror::Error)]
enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(pool: PgPool, settings: Settings) -> Result<(), anyhow::Error> {
    let (member_tx, mut member_rx) = mpsc::channel(512);
    let (network_tx, mut network_rx) = mpsc::channel(512);

    let mut member_service = members::MemberService::new();
    let mut network_service = network::NetworkService::new();

    let mut tier_table = TierTable::new(settings.network.tiers.clone());
    if tier_table.is_empty() {
        tier_table = TierTable::heaven_club_defaults();
    }

    log::info!("Starting member service.");
    let member_pool_clone = pool.clone();
    tokio::spawn(async move {
        member_service
            .run(
                members::MemberRequestHandler::new(member_pool_clone),
                &mut member_rx,
            )
            .await;
    });

    log::info!("Starting network service.");
    let network_pool_clone = pool.clone();
    let visited_cap = settings.network.visited_cap;
    tokio::spawn(async move {
        network_service
            .run(
                network::NetworkRequestHandler::new(network_pool_clone, tier_table, visited_cap),
                &mut network_rx,
            )
            .await;
    });

    log::info!("Starting HTTP server on {}.", settings.server.listen);
    http::start_http_server(settings.server.listen, member_tx, network_tx).await?;

    Ok(())
}
