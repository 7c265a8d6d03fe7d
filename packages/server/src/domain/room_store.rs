//! Room Store
//!
//! ルームのライフサイクル（初回 join で作成、最後のメンバーが抜けたら削除）と
//! ルームごとのメッセージ履歴を管理します。
//!
//! 存在しないルームに対する操作はエラーにせず、空の結果を返します。

use std::collections::BTreeMap;

use super::{
    entity::ChatMessage,
    history::DEFAULT_HISTORY_CAPACITY,
    room::Room,
    value_object::{ConnectionId, RoomName, Timestamp, UserId},
};

/// join 後のルームの状態（ブロードキャスト用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub room: RoomName,
    pub members: Vec<UserId>,
    /// この join でルームが作成されたか
    pub created: bool,
}

/// leave の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeaveOutcome {
    pub removed: bool,
    pub room_deleted: bool,
}

#[derive(Debug)]
pub struct RoomStore {
    rooms: BTreeMap<RoomName, Room>,
    history_capacity: usize,
}

impl RoomStore {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            rooms: BTreeMap::new(),
            history_capacity,
        }
    }

    /// 名前付きルームに参加
    ///
    /// ルームがなければ作成し、この接続を admin にする。
    /// 別ルームからの暗黙の退出は Coordinator 側で先に済ませておくこと。
    pub fn join(
        &mut self,
        room: &RoomName,
        connection_id: &ConnectionId,
        user_id: UserId,
        now: Timestamp,
    ) -> RoomSnapshot {
        let capacity = self.history_capacity;
        let created = !self.rooms.contains_key(room);
        let entry = self
            .rooms
            .entry(room.clone())
            .or_insert_with(|| Room::named(room.clone(), connection_id.clone(), capacity, now));
        entry.add_member(connection_id.clone(), user_id);

        RoomSnapshot {
            room: room.clone(),
            members: entry.member_user_ids(),
            created,
        }
    }

    /// 名前付きルームから退出
    ///
    /// メンバーでなければ何もしない（切断と明示的な退出が競合しうるため）。
    pub fn leave(&mut self, room: &RoomName, connection_id: &ConnectionId) -> LeaveOutcome {
        let Some(entry) = self.rooms.get_mut(room) else {
            return LeaveOutcome::default();
        };
        if !entry.remove_member(connection_id) {
            return LeaveOutcome::default();
        }

        let room_deleted = entry.is_empty();
        if room_deleted {
            self.rooms.remove(room);
        }
        LeaveOutcome {
            removed: true,
            room_deleted,
        }
    }

    /// メッセージを履歴に追加。ルームが存在しなければ `false`
    pub fn post_message(&mut self, message: ChatMessage) -> bool {
        match self.rooms.get_mut(&message.room) {
            Some(entry) => {
                entry.push_message(message);
                true
            }
            None => false,
        }
    }

    /// 直近 `count` 件の履歴（古い順）。ルームがない場合や `count <= 0` は空
    pub fn history(&self, room: &RoomName, count: i64) -> Vec<ChatMessage> {
        self.rooms
            .get(room)
            .map(|entry| entry.history.last(count))
            .unwrap_or_default()
    }

    /// 全ルーム名（ソート済み）
    pub fn room_names(&self) -> Vec<RoomName> {
        self.rooms.keys().cloned().collect()
    }

    /// マッチングルームを作成
    ///
    /// 同名のルームが既にあれば履歴とメンバーを残したまま 2 人を記録する。
    pub fn create_matched_room(
        &mut self,
        room: &RoomName,
        first: UserId,
        second: UserId,
        now: Timestamp,
    ) {
        let players = [first, second];
        match self.rooms.get_mut(room) {
            Some(entry) => entry.players = Some(players),
            None => {
                self.rooms.insert(
                    room.clone(),
                    Room::matched(room.clone(), players, self.history_capacity, now),
                );
            }
        }
    }

    /// マッチングルームを解放。空になったルームは削除し、削除したら `true`
    pub fn release_matched_room(&mut self, room: &RoomName) -> bool {
        let Some(entry) = self.rooms.get_mut(room) else {
            return false;
        };
        entry.players = None;
        if entry.is_empty() {
            self.rooms.remove(room);
            return true;
        }
        false
    }

    pub fn is_member(&self, room: &RoomName, connection_id: &ConnectionId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|entry| entry.is_member(connection_id))
    }

    pub fn is_matched(&self, room: &RoomName) -> bool {
        self.rooms.get(room).is_some_and(Room::is_matched)
    }

    pub fn get(&self, room: &RoomName) -> Option<&Room> {
        self.rooms.get(room)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::from(id)
    }

    fn user(id: &str) -> UserId {
        UserId::from(id)
    }

    fn lobby() -> RoomName {
        RoomName::from("lobby")
    }

    #[test]
    fn test_join_creates_room_with_admin() {
        // テスト項目: 存在しないルームへの join でルームが作成され、参加者が admin になる
        // given (前提条件):
        let mut store = RoomStore::default();

        // when (操作):
        let snapshot = store.join(&lobby(), &conn("a"), user("alice"), Timestamp::new(0));

        // then (期待する結果):
        assert!(snapshot.created);
        assert_eq!(snapshot.members, vec![user("alice")]);
        let room = store.get(&lobby()).unwrap();
        assert_eq!(room.admin, Some(conn("a")));
    }

    #[test]
    fn test_second_join_keeps_first_admin() {
        // テスト項目: 2 人目の join ではルームは作り直されず admin も変わらない
        // given (前提条件):
        let mut store = RoomStore::default();
        store.join(&lobby(), &conn("a"), user("alice"), Timestamp::new(0));

        // when (操作):
        let snapshot = store.join(&lobby(), &conn("b"), user("bob"), Timestamp::new(1));

        // then (期待する結果):
        assert!(!snapshot.created);
        assert_eq!(snapshot.members.len(), 2);
        assert_eq!(store.get(&lobby()).unwrap().admin, Some(conn("a")));
    }

    #[test]
    fn test_room_exists_iff_it_has_members() {
        // テスト項目: join/leave の列に対し、ルームはメンバーがいる間だけ存在する
        // given (前提条件):
        let mut store = RoomStore::default();
        let steps: [(bool, &str); 7] = [
            (true, "a"),
            (true, "b"),
            (false, "a"),
            (true, "a"),
            (false, "b"),
            (false, "b"),
            (false, "a"),
        ];

        for (is_join, id) in steps {
            // when (操作):
            if is_join {
                store.join(&lobby(), &conn(id), user(id), Timestamp::new(0));
            } else {
                store.leave(&lobby(), &conn(id));
            }

            // then (期待する結果):
            let count = store.get(&lobby()).map(Room::member_count).unwrap_or(0);
            assert_eq!(store.get(&lobby()).is_some(), count > 0);
        }
        assert!(store.room_names().is_empty());
    }

    #[test]
    fn test_leave_by_non_member_is_noop() {
        // テスト項目: メンバーでない接続の leave はエラーにならず何も変えない
        // given (前提条件):
        let mut store = RoomStore::default();
        store.join(&lobby(), &conn("a"), user("alice"), Timestamp::new(0));

        // when (操作):
        let outcome = store.leave(&lobby(), &conn("stranger"));
        let missing_room = store.leave(&RoomName::from("nowhere"), &conn("a"));

        // then (期待する結果):
        assert_eq!(outcome, LeaveOutcome::default());
        assert!(!outcome.removed);
        assert_eq!(missing_room, LeaveOutcome::default());
        assert_eq!(store.get(&lobby()).unwrap().member_count(), 1);
    }

    #[test]
    fn test_leave_last_member_deletes_room() {
        // テスト項目: 最後のメンバーの leave でルームが同期的に削除される
        // given (前提条件):
        let mut store = RoomStore::default();
        store.join(&lobby(), &conn("a"), user("alice"), Timestamp::new(0));

        // when (操作):
        let outcome = store.leave(&lobby(), &conn("a"));

        // then (期待する結果):
        assert_eq!(
            outcome,
            LeaveOutcome {
                removed: true,
                room_deleted: true,
            }
        );
        assert!(store.get(&lobby()).is_none());
        assert!(store.room_names().is_empty());
    }

    #[test]
    fn test_post_message_to_missing_room_is_not_stored() {
        // テスト項目: 存在しないルームへの投稿は履歴に残らない
        // given (前提条件):
        let mut store = RoomStore::default();

        // when (操作):
        let accepted = store.post_message(ChatMessage::new(user("alice"), "hola", lobby()));

        // then (期待する結果):
        assert!(!accepted);
        assert!(store.history(&lobby(), 10).is_empty());
    }

    #[test]
    fn test_history_returns_last_messages() {
        // テスト項目: 12 件投稿後に直近 5 件を要求すると 8〜12 件目が返る
        // given (前提条件):
        let mut store = RoomStore::default();
        store.join(&lobby(), &conn("a"), user("alice"), Timestamp::new(0));
        for n in 1..=12 {
            store.post_message(ChatMessage::new(user("alice"), format!("m{n}"), lobby()));
        }

        // when (操作):
        let history = store.history(&lobby(), 5);

        // then (期待する結果):
        let texts: Vec<&str> = history.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["m8", "m9", "m10", "m11", "m12"]);
    }

    #[test]
    fn test_matched_room_has_no_admin_and_survives_named_leave() {
        // テスト項目: マッチングルームは admin を持たず、名前付きの退出では削除されない
        // given (前提条件):
        let mut store = RoomStore::default();
        let room = RoomName::from("alice-bob");
        store.create_matched_room(&room, user("alice"), user("bob"), Timestamp::new(0));
        store.join(&room, &conn("c"), user("carol"), Timestamp::new(1));

        // when (操作):
        let outcome = store.leave(&room, &conn("c"));

        // then (期待する結果):
        assert!(outcome.removed);
        assert!(!outcome.room_deleted);
        let entry = store.get(&room).unwrap();
        assert_eq!(entry.players, Some([user("alice"), user("bob")]));
        assert_eq!(store.room_names(), vec![room]);
    }

    #[test]
    fn test_release_matched_room_deletes_when_unused() {
        // テスト項目: マッチングルームの解放で、名前付きメンバーがいなければ削除される
        // given (前提条件):
        let mut store = RoomStore::default();
        let room = RoomName::from("alice-bob");
        store.create_matched_room(&room, user("alice"), user("bob"), Timestamp::new(0));

        // when (操作):
        let deleted = store.release_matched_room(&room);

        // then (期待する結果):
        assert!(deleted);
        assert!(store.get(&room).is_none());
    }

    #[test]
    fn test_room_names_are_sorted() {
        // テスト項目: ルーム名一覧はソートされて返る
        // given (前提条件):
        let mut store = RoomStore::default();
        store.join(&RoomName::from("zeta"), &conn("a"), user("a"), Timestamp::new(0));
        store.join(&RoomName::from("alpha"), &conn("b"), user("b"), Timestamp::new(0));

        // when (操作):
        let names = store.room_names();

        // then (期待する結果):
        assert_eq!(names, vec![RoomName::from("alpha"), RoomName::from("zeta")]);
    }
}
