//! Broadcast Groups
//!
//! ルームごとの配信グループ（どの接続がそのルーム宛てのイベントを受け取るか）。
//! Room Store のメンバー表とは独立しており、マッチングルームでは
//! Room Store に接続メンバーを持たないまま 2 つの接続が購読します。

use std::collections::{BTreeMap, BTreeSet};

use super::value_object::{ConnectionId, RoomName};

#[derive(Debug, Default)]
pub struct BroadcastGroups {
    groups: BTreeMap<RoomName, BTreeSet<ConnectionId>>,
}

impl BroadcastGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, room: &RoomName, connection_id: &ConnectionId) {
        self.groups
            .entry(room.clone())
            .or_default()
            .insert(connection_id.clone());
    }

    pub fn unsubscribe(&mut self, room: &RoomName, connection_id: &ConnectionId) {
        if let Some(group) = self.groups.get_mut(room) {
            group.remove(connection_id);
            if group.is_empty() {
                self.groups.remove(room);
            }
        }
    }

    /// 接続を全グループから外し、外れたグループのうち空になったルーム名を返す
    pub fn unsubscribe_all(&mut self, connection_id: &ConnectionId) -> Vec<RoomName> {
        let mut emptied = Vec::new();
        self.groups.retain(|room, group| {
            if group.remove(connection_id) && group.is_empty() {
                emptied.push(room.clone());
            }
            !group.is_empty()
        });
        emptied
    }

    /// ルームの購読者（空グループや未知のルームなら空）
    pub fn members(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.groups
            .get(room)
            .map(|group| group.iter().cloned().collect())
            .unwrap_or_default()
    }
}
