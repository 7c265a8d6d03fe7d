//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{EventRouter, QueryRoomsUseCase};

/// Shared application state
pub struct AppState {
    /// EventRouter（接続からのイベント処理）
    pub router: Arc<EventRouter>,
    /// QueryRoomsUseCase（ルーム参照のユースケース）
    pub query_rooms: Arc<QueryRoomsUseCase>,
}
