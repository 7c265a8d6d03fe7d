//! Connection Registry
//!
//! 接続ごとの識別子・参加中ルーム・userId を管理します。
//! ルームへの出入りそのもの（Room Store 側の副作用）は扱いません。

use std::collections::HashMap;

use super::{
    entity::{Connection, RoomBinding},
    value_object::{ConnectionId, RoomName, Timestamp, UserId},
};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ルーム未参加・userId なしの接続を登録
    pub fn register(&mut self, id: ConnectionId, connected_at: Timestamp) -> &Connection {
        self.connections
            .entry(id.clone())
            .or_insert_with(|| Connection::new(id, connected_at))
    }

    /// 参加中ルームと userId を記録（Room Store には触れない）
    pub fn set_room(&mut self, id: &ConnectionId, room: RoomName, user_id: UserId) {
        if let Some(connection) = self.connections.get_mut(id) {
            connection.binding = Some(RoomBinding { room, user_id });
        }
    }

    /// ルームとの紐付けを解除し、解除前の紐付けを返す
    pub fn clear_room(&mut self, id: &ConnectionId) -> Option<RoomBinding> {
        self.connections
            .get_mut(id)
            .and_then(|connection| connection.binding.take())
    }

    /// 接続を削除。ルーム退出の副作用は呼び出し側で済ませておくこと
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(id)
    }

    pub fn lookup(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// 接続中の全ての接続 ID（ソート済み）
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.connections.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
