//! エンティティ

use super::value_object::{ConnectionId, RoomName, Timestamp, UserId};

/// 接続中のクライアント
///
/// Connection Registry だけが所有します。Room Store はメンバーとして接続 ID を参照するのみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    /// 現在参加している名前付きルーム（同時に参加できるのは 1 つまで）
    pub binding: Option<RoomBinding>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            binding: None,
            connected_at,
        }
    }

    pub fn room(&self) -> Option<&RoomName> {
        self.binding.as_ref().map(|binding| &binding.room)
    }
}

/// 接続とルームの紐付け（join 時に名乗った userId と一緒に保持する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomBinding {
    pub room: RoomName,
    pub user_id: UserId,
}

/// チャットメッセージ
///
/// タイムスタンプも ID も持たず、順序は履歴バッファへの挿入順のみで決まります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_id: UserId,
    pub message: String,
    pub room: RoomName,
}

impl ChatMessage {
    pub fn new(user_id: UserId, message: impl Into<String>, room: RoomName) -> Self {
        Self {
            user_id,
            message: message.into(),
            room,
        }
    }
}

/// マッチング待ちのエントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingEntry {
    pub user_id: UserId,
    pub connection_id: ConnectionId,
}
