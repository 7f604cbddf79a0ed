use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::members::NewMember;
use crate::services::members::MemberRequest;

use super::status_for;

pub async fn register_member(
    State(state): State<super::AppState>,
    Json(req): Json<NewMember>,
) -> impl IntoResponse {
    let (member_tx, member_rx) = oneshot::channel();

    let send_result = state
        .member_channel
        .send(MemberRequest::Register {
            new: req,
            response: member_tx,
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

    match member_rx.await {
        Ok(Ok(member)) => (StatusCode::CREATED, Json(json!(member))),
        Ok(Err(service_error)) => (
            status_for(&service_error),
            Json(json!({
                "error": "Could not register member",
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

pub async fn get_member(
    State(state): State<super::AppState>,
    Path(member_id): Path<String>,
) -> impl IntoResponse {
    let (member_tx, member_rx) = oneshot::channel();

    let send_result = state
        .member_channel
        .send(MemberRequest::GetMember {
            id: member_id,
            response: member_tx,
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

    match member_rx.await {
        Ok(Ok(member)) => (StatusCode::OK, Json(json!(member))),
        Ok(Err(service_error)) => (
            status_for(&service_error),
            Json(json!({
                "error": "Could not fetch member",
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

pub async fn join_club(
    State(state): State<super::AppState>,
    Path(member_id): Path<String>,
) -> impl IntoResponse {
    let (club_tx, club_rx) = oneshot::channel();

    let send_result = state
        .member_channel
        .send(MemberRequest::JoinClub {
            id: member_id,
            response: club_tx,
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

    match club_rx.await {
        Ok(Ok(())) => (StatusCode::OK, Json(json!({"status": "joined"}))),
        Ok(Err(service_error)) => (
            status_for(&service_error),
            Json(json!({
                "error": "Could not join club",
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
