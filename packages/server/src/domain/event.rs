//! 受信イベントと配信指示
//!
//! クライアントからのイベントは `ClientEvent` のタグ付き列挙で表し、
//! Coordinator がそれを処理した結果を `Delivery` の列として返します。

use super::{
    entity::ChatMessage,
    value_object::{ConnectionId, RoomName, UserId},
};

/// クライアントから届くイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    JoinRoom { room: RoomName, user_id: UserId },
    FindOpponent { user_id: UserId },
    LeaveRoom,
    Message(ChatMessage),
    RequestLastMessages { room: RoomName, count: i64 },
    RequestRooms,
}

impl ClientEvent {
    /// ログ用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join-room",
            Self::FindOpponent { .. } => "find-opponent",
            Self::LeaveRoom => "leave-room",
            Self::Message(_) => "message",
            Self::RequestLastMessages { .. } => "request-last-messages",
            Self::RequestRooms => "request-rooms",
        }
    }
}

/// クライアントへ送る通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    RoomList(Vec<RoomName>),
    Joined { room: RoomName, user_id: UserId },
    Message(ChatMessage),
    FoundOpponent { room_id: RoomName, users: [UserId; 2] },
    LastMessages(Vec<ChatMessage>),
}

/// 通知の宛先（通知を作った時点で解決済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// イベントを送ってきた接続だけ
    Caller(ConnectionId),
    /// ルームの購読者、または全接続
    Connections(Vec<ConnectionId>),
}

impl Audience {
    pub fn recipients(&self) -> Vec<ConnectionId> {
        match self {
            Self::Caller(id) => vec![id.clone()],
            Self::Connections(ids) => ids.clone(),
        }
    }
}

/// 1 件の配信指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub audience: Audience,
    pub notification: Notification,
}

impl Delivery {
    pub fn new(audience: Audience, notification: Notification) -> Self {
        Self {
            audience,
            notification,
        }
    }
}
