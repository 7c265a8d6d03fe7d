//! UseCase: ルームの参照（HTTP API 向け）

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Coordinator, Room, RoomName};

use super::error::QueryRoomsError;

/// サーバー全体の統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStats {
    pub connections: usize,
    pub rooms: usize,
    pub waiting: usize,
}

/// ルーム参照のユースケース
pub struct QueryRoomsUseCase {
    coordinator: Arc<Mutex<Coordinator>>,
}

impl QueryRoomsUseCase {
    pub fn new(coordinator: Arc<Mutex<Coordinator>>) -> Self {
        Self { coordinator }
    }

    /// 全ルーム（名前順）
    pub async fn list(&self) -> Vec<Room> {
        let coordinator = self.coordinator.lock().await;
        coordinator.rooms().cloned().collect()
    }

    /// 指定したルーム
    pub async fn detail(&self, name: &str) -> Result<Room, QueryRoomsError> {
        let coordinator = self.coordinator.lock().await;
        coordinator
            .room(&RoomName::from(name))
            .cloned()
            .ok_or_else(|| QueryRoomsError::RoomNotFound(name.to_string()))
    }

    pub async fn stats(&self) -> ServerStats {
        let coordinator = self.coordinator.lock().await;
        ServerStats {
            connections: coordinator.connection_count(),
            rooms: coordinator.rooms().count(),
            waiting: coordinator.waiting_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientEvent, ConnectionId, Timestamp, UserId};

    fn create_usecase() -> (QueryRoomsUseCase, Arc<Mutex<Coordinator>>) {
        let coordinator = Arc::new(Mutex::new(Coordinator::new(10)));
        (QueryRoomsUseCase::new(coordinator.clone()), coordinator)
    }

    #[tokio::test]
    async fn test_list_and_detail() {
        // テスト項目: 作成されたルームが一覧と詳細で参照できる
        // given (前提条件):
        let (usecase, coordinator) = create_usecase();
        {
            let mut coordinator = coordinator.lock().await;
            let id = ConnectionId::from("a");
            coordinator.connect(id.clone(), Timestamp::new(0));
            coordinator.handle(
                &id,
                ClientEvent::JoinRoom {
                    room: RoomName::from("lobby"),
                    user_id: UserId::from("alice"),
                },
                Timestamp::new(0),
            );
        }

        // when (操作):
        let rooms = usecase.list().await;
        let detail = usecase.detail("lobby").await;
        let stats = usecase.stats().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(detail.unwrap().admin, Some(ConnectionId::from("a")));
        assert_eq!(
            stats,
            ServerStats {
                connections: 1,
                rooms: 1,
                waiting: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_detail_of_missing_room() {
        // テスト項目: 存在しないルームの詳細は RoomNotFound になる
        // given (前提条件):
        let (usecase, _) = create_usecase();

        // when (操作):
        let result = usecase.detail("ghost").await;

        // then (期待する結果):
        assert_eq!(result, Err(QueryRoomsError::RoomNotFound("ghost".to_string())));
    }
}
