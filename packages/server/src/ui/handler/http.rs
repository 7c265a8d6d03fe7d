//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{HealthDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::QueryRoomsError,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let stats = state.query_rooms.stats().await;
    Json(HealthDto {
        status: "ok",
        connections: stats.connections,
        rooms: stats.rooms,
        waiting: stats.waiting,
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.query_rooms.list().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.query_rooms.detail(&name).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(&room))),
        Err(QueryRoomsError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}
