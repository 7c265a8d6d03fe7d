//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum InboundEvent {
    JoinRoom {
        room: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    FindOpponent {
        #[serde(rename = "userId")]
        user_id: String,
    },
    LeaveRoom,
    Message(ChatMessageDto),
    RequestLastMessages {
        room: String,
        count: i64,
    },
    RequestRooms,
}

/// Events sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundEvent {
    Rooms(Vec<String>),
    JoinRoom {
        room: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    Message(ChatMessageDto),
    FoundOpponent {
        #[serde(rename = "roomId")]
        room_id: String,
        users: Vec<String>,
    },
    LastMessages(Vec<ChatMessageDto>),
}

/// Chat message payload (`{userId, message, room}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub user_id: String,
    pub message: String,
    pub room: String,
}
