use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

use crate::services::network::NetworkRequest;

use super::status_for;

#[derive(Deserialize)]
pub struct GraphQuery {
    #[serde(rename = "targetUserId")]
    target_user_id: String,
}

#[derive(Deserialize)]
pub struct LeadersQuery {
    search: Option<String>,
}

pub async fn get_network_graph(
    State(state): State<super::AppState>,
    Query(query): Query<GraphQuery>,
) -> impl IntoResponse {
    let (report_tx, report_rx) = oneshot::channel();

    let send_result = state
        .network_channel
        .send(NetworkRequest::GetReport {
            target_user_id: query.target_user_id,
            response: report_tx,
        })
        .await;
    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error",
                "details": e.to_string()
            })),
        );
    }

    match report_rx.await {
        Ok(Ok(report)) => (StatusCode::OK, Json(json!(report))),
        Ok(Err(service_error)) => (
            status_for(&service_error),
            Json(json!({
                "error": "Could not compute network report",
                "details": service_error.to_string()
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error",
                "details": e.to_string()
            })),
        ),
    }
}

pub async fn list_leaders(
    State(state): State<super::AppState>,
    Query(query): Query<LeadersQuery>,
) -> impl IntoResponse {
    let (leaders_tx, leaders_rx) = oneshot::channel();

    let send_result = state
        .network_channel
        .send(NetworkRequest::ListLeaders {
            search: query.search,
            response: leaders_tx,
        })
        .await;
    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error",
                "details": e.to_string()
            })),
        );
    }

    match leaders_rx.await {
        Ok(Ok(leaders)) => (StatusCode::OK, Json(json!(leaders))),
        Ok(Err(service_error)) => (
            status_for(&service_error),
            Json(json!({
                "error": "Could not list leaders",
                "details": service_error.to_string()
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error",
                "details": e.to_string()
            })),
        ),
    }
}
