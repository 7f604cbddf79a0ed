use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use super::members::MemberRequest;
use super::network::NetworkRequest;
use super::ServiceError;

mod members;
mod network;

#[derive(Clone)]
struct AppState {
    member_channel: mpsc::Sender<MemberRequest>,
    network_channel: mpsc::Sender<NetworkRequest>,
}

fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::DataIntegrity(_) | ServiceError::Database(_) | ServiceError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn start_http_server(
    listen: String,
    member_channel: mpsc::Sender<MemberRequest>,
    network_channel: mpsc::Sender<NetworkRequest>,
) -> Result<(), anyhow::Error> {
    let app_state = AppState {
        member_channel,
        network_channel,
    };

    let app = Router::new()
        .route("/members", post(members::register_member))
        .route("/members/{id}", get(members::get_member))
        .route("/members/{id}/club", post(members::join_club))
        .route("/network/graph", get(network::get_network_graph))
        .route("/network/leaders", get(network::list_leaders))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
