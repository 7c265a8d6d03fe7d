//! ルームごとのメッセージ履歴（固定長の FIFO バッファ）

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// 履歴バッファのデフォルト容量
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// 直近のメッセージを保持するリングバッファ
///
/// 容量を超えた挿入では最も古いメッセージから捨てます。
/// 読み出しは順序に影響しません（LRU ではなく挿入順のみ）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHistory {
    capacity: usize,
    messages: VecDeque<ChatMessage>,
}

impl MessageHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// 直近 `count` 件を古い順に返す
    ///
    /// `count <= 0` の場合は空。
    pub fn last(&self, count: i64) -> Vec<ChatMessage> {
        if count <= 0 {
            return Vec::new();
        }
        let take = usize::try_from(count)
            .unwrap_or(usize::MAX)
            .min(self.messages.len());
        self.messages
            .iter()
            .skip(self.messages.len() - take)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
