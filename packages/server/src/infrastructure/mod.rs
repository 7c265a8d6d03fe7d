//! Infrastructure 層
//!
//! - `dto`: WebSocket / HTTP のワイヤーフォーマット
//! - `message_pusher`: `MessagePusher` trait の実装

pub mod dto;
pub mod message_pusher;
