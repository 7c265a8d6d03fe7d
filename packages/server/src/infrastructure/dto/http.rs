//! HTTP API response DTOs.

use serde::Serialize;

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub kind: RoomKindDto,
    pub member_count: usize,
    pub created_at: String,
}

/// Response of `GET /api/rooms/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub kind: RoomKindDto,
    pub admin: Option<String>,
    pub members: Vec<MemberDto>,
    pub players: Option<Vec<String>>,
    pub history_len: usize,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDto {
    pub connection_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKindDto {
    Named,
    Matched,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub connections: usize,
    pub rooms: usize,
    pub waiting: usize,
}
