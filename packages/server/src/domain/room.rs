//! Room エンティティ
//!
//! 名前付きルームとマッチングルームは形が異なります。
//!
//! - 名前付きルーム: 接続 ID → userId のメンバー表と、作成した接続の `admin` を持つ
//! - マッチングルーム: 2 人の userId（`players`）を持ち、`admin` は持たない
//!
//! 両者は同じルーム表に同居し、同じ名前で両方の形を併せ持つこともあります。

use std::collections::BTreeMap;

use super::{
    entity::ChatMessage,
    history::MessageHistory,
    value_object::{ConnectionId, RoomName, Timestamp, UserId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: RoomName,
    /// 名前付きルームを作成した接続
    pub admin: Option<ConnectionId>,
    /// 名前付きルームのメンバー（接続 ID → userId）
    pub members: BTreeMap<ConnectionId, UserId>,
    /// マッチングルームの 2 人（userId）
    pub players: Option<[UserId; 2]>,
    pub history: MessageHistory,
    pub created_at: Timestamp,
}

impl Room {
    /// 名前付きルームを作成（作成者が admin になる）
    pub fn named(
        name: RoomName,
        admin: ConnectionId,
        history_capacity: usize,
        created_at: Timestamp,
    ) -> Self {
        Self {
            name,
            admin: Some(admin),
            members: BTreeMap::new(),
            players: None,
            history: MessageHistory::new(history_capacity),
            created_at,
        }
    }

    /// マッチングルームを作成（admin なし）
    pub fn matched(
        name: RoomName,
        players: [UserId; 2],
        history_capacity: usize,
        created_at: Timestamp,
    ) -> Self {
        Self {
            name,
            admin: None,
            members: BTreeMap::new(),
            players: Some(players),
            history: MessageHistory::new(history_capacity),
            created_at,
        }
    }

    /// メンバーを追加（同じ接続 ID なら userId を上書き）
    pub fn add_member(&mut self, connection_id: ConnectionId, user_id: UserId) {
        self.members.insert(connection_id, user_id);
    }

    /// メンバーを削除。メンバーでなければ `false`
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id).is_some()
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains_key(connection_id)
    }

    pub fn is_matched(&self) -> bool {
        self.players.is_some()
    }

    /// 誰も参照していないルームは存在してはならない
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.players.is_none()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member_user_ids(&self) -> Vec<UserId> {
        self.members.values().cloned().collect()
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.history.push(message);
    }
}
