//! Matchmaking Queue
//!
//! 対戦相手を探す接続を 1 本の FIFO キューで待たせ、次に来た接続と組み合わせます。
//! 重複は排除しません（同じ userId が何度並んでもよい）。

use std::collections::VecDeque;

use super::{
    entity::WaitingEntry,
    value_object::{ConnectionId, RoomName, UserId},
};

/// find_or_wait の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// 待っていた相手と組み合わされた
    Paired {
        room_id: RoomName,
        opponent: WaitingEntry,
    },
    /// キューに並んだ
    Waiting,
}

#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    waiting: VecDeque<WaitingEntry>,
}

impl MatchmakingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最も古い待機エントリと組み合わせる。誰も待っていなければ並ぶ
    pub fn find_or_wait(&mut self, user_id: UserId, connection_id: ConnectionId) -> MatchOutcome {
        match self.waiting.pop_front() {
            Some(opponent) => MatchOutcome::Paired {
                room_id: RoomName::matched(&opponent.user_id, &user_id),
                opponent,
            },
            None => {
                self.waiting.push_back(WaitingEntry {
                    user_id,
                    connection_id,
                });
                MatchOutcome::Waiting
            }
        }
    }

    /// 切断した接続の待機エントリを取り除き、取り除いた件数を返す
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> usize {
        let before = self.waiting.len();
        self.waiting
            .retain(|entry| &entry.connection_id != connection_id);
        before - self.waiting.len()
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
