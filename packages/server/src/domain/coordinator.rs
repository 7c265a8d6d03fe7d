//! Coordinator
//!
//! Connection Registry・Room Store・Matchmaking Queue・Broadcast Groups を
//! 一手に所有し、全ての状態遷移を逐次的に適用します。
//!
//! 各操作は同期的に完了し、その時点で宛先を解決した `Delivery` の列を返します。
//! 送信そのものは呼び出し側（UseCase 層）の責務です。
//!
//! ## 接続ごとの状態
//!
//! ```text
//! Unbound ──join(room)──▶ Bound(room) ──leave / disconnect──▶ Unbound
//!                          │
//!                          └──join(other)──▶ Bound(other)   (先に退出の副作用が発生)
//! ```

use super::{
    broadcast::BroadcastGroups,
    entity::{ChatMessage, RoomBinding},
    event::{Audience, ClientEvent, Delivery, Notification},
    matchmaking::{MatchOutcome, MatchmakingQueue},
    registry::ConnectionRegistry,
    room::Room,
    room_store::RoomStore,
    value_object::{ConnectionId, RoomName, Timestamp, UserId},
};

/// システムメッセージの送信者として使う userId
pub const SYSTEM_USER_ID: &str = "servidor";

/// ルームから抜けた理由（システムメッセージの文面が変わる）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeaveReason {
    Left,
    Disconnected,
}

impl LeaveReason {
    fn notice(self, user_id: &UserId) -> String {
        match self {
            Self::Left => format!("{user_id} ha abandonado la sala."),
            Self::Disconnected => format!("{user_id} se ha desconectado."),
        }
    }
}

#[derive(Debug)]
pub struct Coordinator {
    registry: ConnectionRegistry,
    rooms: RoomStore,
    queue: MatchmakingQueue,
    groups: BroadcastGroups,
}

impl Coordinator {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            rooms: RoomStore::new(history_capacity),
            queue: MatchmakingQueue::new(),
            groups: BroadcastGroups::new(),
        }
    }

    /// 新しい接続を登録し、現在のルーム一覧を本人に返す
    pub fn connect(&mut self, id: ConnectionId, now: Timestamp) -> Vec<Delivery> {
        self.registry.register(id.clone(), now);
        vec![self.to_caller(&id, self.room_list())]
    }

    /// クライアントからのイベントを処理
    ///
    /// 未登録（切断済み）の接続からのイベントは何もしない。
    pub fn handle(
        &mut self,
        id: &ConnectionId,
        event: ClientEvent,
        now: Timestamp,
    ) -> Vec<Delivery> {
        if !self.registry.contains(id) {
            tracing::debug!(
                "Ignoring '{}' from unknown connection '{}'",
                event.name(),
                id
            );
            return Vec::new();
        }

        match event {
            ClientEvent::JoinRoom { room, user_id } => self.join_room(id, room, user_id, now),
            ClientEvent::FindOpponent { user_id } => self.find_opponent(id, user_id, now),
            ClientEvent::LeaveRoom => self.leave_room(id),
            ClientEvent::Message(message) => self.send_message(message),
            ClientEvent::RequestLastMessages { room, count } => {
                let history = self.rooms.history(&room, count);
                vec![self.to_caller(id, Notification::LastMessages(history))]
            }
            ClientEvent::RequestRooms => vec![self.to_caller(id, self.room_list())],
        }
    }

    /// 切断処理
    ///
    /// `leave` と同じ副作用に加え、マッチング待ちの取り消しと
    /// 誰も購読しなくなったマッチングルームの解放を行う。
    /// 未知の接続なら `None`（二重の切断は何もしない）。
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<Vec<Delivery>> {
        let connection = self.registry.unregister(id)?;
        let emptied = self.groups.unsubscribe_all(id);
        let pruned = self.queue.remove_connection(id);
        if pruned > 0 {
            tracing::info!("Removed {} waiting entries of connection '{}'", pruned, id);
        }

        let mut deliveries = Vec::new();
        let mut room_list_changed = false;
        if let Some(binding) = &connection.binding
            && let Some(notice) = self.vacate(id, binding, LeaveReason::Disconnected)
        {
            deliveries.push(notice);
            room_list_changed = true;
        }
        for room in &emptied {
            room_list_changed |= self.release_if_abandoned(room);
        }
        if room_list_changed {
            deliveries.push(self.to_all(self.room_list()));
        }

        Some(deliveries)
    }

    fn join_room(
        &mut self,
        id: &ConnectionId,
        room: RoomName,
        user_id: UserId,
        now: Timestamp,
    ) -> Vec<Delivery> {
        let mut deliveries = Vec::new();

        let current = self.registry.lookup(id).and_then(|c| c.binding.clone());
        if let Some(binding) = current.filter(|binding| binding.room != room) {
            if let Some(notice) = self.vacate(id, &binding, LeaveReason::Left) {
                deliveries.push(notice);
                deliveries.push(self.to_all(self.room_list()));
            }
            self.registry.clear_room(id);
        }

        self.registry.set_room(id, room.clone(), user_id.clone());
        let snapshot = self.rooms.join(&room, id, user_id.clone(), now);
        self.groups.subscribe(&room, id);
        tracing::info!(
            "'{}' ({}) joined room '{}' ({} members, created: {})",
            user_id,
            id,
            room,
            snapshot.members.len(),
            snapshot.created
        );

        let greeting = system_message(format!("{user_id} se ha unido a la sala."), room.clone());
        deliveries.push(self.to_room(
            &room,
            Notification::Joined {
                room: room.clone(),
                user_id,
            },
        ));
        deliveries.push(self.to_room(&room, Notification::Message(greeting)));
        deliveries.push(self.to_all(self.room_list()));
        deliveries
    }

    fn find_opponent(
        &mut self,
        id: &ConnectionId,
        user_id: UserId,
        now: Timestamp,
    ) -> Vec<Delivery> {
        match self.queue.find_or_wait(user_id.clone(), id.clone()) {
            MatchOutcome::Waiting => {
                tracing::info!("'{}' is waiting for an opponent", user_id);
                Vec::new()
            }
            MatchOutcome::Paired { room_id, opponent } => {
                self.groups.subscribe(&room_id, id);
                self.groups.subscribe(&room_id, &opponent.connection_id);
                self.rooms.create_matched_room(
                    &room_id,
                    opponent.user_id.clone(),
                    user_id.clone(),
                    now,
                );
                tracing::info!(
                    "Match started between '{}' and '{}' in room '{}'",
                    opponent.user_id,
                    user_id,
                    room_id
                );

                let notification = Notification::FoundOpponent {
                    room_id: room_id.clone(),
                    users: [opponent.user_id, user_id],
                };
                vec![self.to_room(&room_id, notification)]
            }
        }
    }

    fn leave_room(&mut self, id: &ConnectionId) -> Vec<Delivery> {
        let Some(binding) = self.registry.lookup(id).and_then(|c| c.binding.clone()) else {
            tracing::debug!("Connection '{}' is not in a room, ignoring leave", id);
            return Vec::new();
        };

        let notice = self.vacate(id, &binding, LeaveReason::Left);
        self.registry.clear_room(id);
        match notice {
            Some(notice) => vec![notice, self.to_all(self.room_list())],
            None => Vec::new(),
        }
    }

    fn send_message(&mut self, message: ChatMessage) -> Vec<Delivery> {
        let delivery = self.to_room(&message.room, Notification::Message(message.clone()));
        let room = message.room.clone();
        if !self.rooms.post_message(message) {
            tracing::debug!("Room '{}' does not exist, message not kept in history", room);
        }
        vec![delivery]
    }

    /// 名前付きルームからの退出
    ///
    /// 退出の通知は退出者を含む購読者宛てに、メンバー削除より先に解決する。
    /// メンバーでなければ何もせず `None`。
    fn vacate(
        &mut self,
        id: &ConnectionId,
        binding: &RoomBinding,
        reason: LeaveReason,
    ) -> Option<Delivery> {
        if !self.rooms.is_member(&binding.room, id) {
            return None;
        }

        let text = reason.notice(&binding.user_id);
        let notice = self.to_room(
            &binding.room,
            Notification::Message(system_message(text, binding.room.clone())),
        );

        let outcome = self.rooms.leave(&binding.room, id);
        self.groups.unsubscribe(&binding.room, id);
        self.release_if_abandoned(&binding.room);
        tracing::info!(
            "'{}' ({}) left room '{}' ({:?}, deleted: {})",
            binding.user_id,
            id,
            binding.room,
            reason,
            outcome.room_deleted
        );

        Some(notice)
    }

    /// 購読者のいなくなったマッチングルームを解放。ルームが消えたら `true`
    fn release_if_abandoned(&mut self, room: &RoomName) -> bool {
        if !self.rooms.is_matched(room) || !self.groups.members(room).is_empty() {
            return false;
        }
        let deleted = self.rooms.release_matched_room(room);
        tracing::info!("Released matched room '{}' (deleted: {})", room, deleted);
        deleted
    }

    fn room_list(&self) -> Notification {
        Notification::RoomList(self.rooms.room_names())
    }

    fn to_room(&self, room: &RoomName, notification: Notification) -> Delivery {
        Delivery::new(
            Audience::Connections(self.groups.members(room)),
            notification,
        )
    }

    fn to_all(&self, notification: Notification) -> Delivery {
        Delivery::new(
            Audience::Connections(self.registry.connection_ids()),
            notification,
        )
    }

    fn to_caller(&self, id: &ConnectionId, notification: Notification) -> Delivery {
        Delivery::new(Audience::Caller(id.clone()), notification)
    }

    // ========================================
    // 読み取り専用のアクセサ
    // ========================================

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.rooms()
    }

    pub fn room(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn subscribers(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.groups.members(room)
    }

    pub fn current_room(&self, id: &ConnectionId) -> Option<&RoomName> {
        self.registry.lookup(id).and_then(|c| c.room())
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }
}

fn system_message(text: String, room: RoomName) -> ChatMessage {
    ChatMessage::new(UserId::from(SYSTEM_USER_ID), text, room)
}
