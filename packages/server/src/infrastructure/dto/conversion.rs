//! Conversion logic between DTOs and domain types.

use tertulia_shared::time::millis_to_rfc3339;

use crate::domain::{ChatMessage, ClientEvent, Notification, Room, RoomName, UserId};
use crate::infrastructure::dto::{
    http::{MemberDto, RoomDetailDto, RoomKindDto, RoomSummaryDto},
    websocket::{ChatMessageDto, InboundEvent, OutboundEvent},
};

// ========================================
// DTO → Domain
// ========================================

impl From<InboundEvent> for ClientEvent {
    fn from(dto: InboundEvent) -> Self {
        match dto {
            InboundEvent::JoinRoom { room, user_id } => Self::JoinRoom {
                room: RoomName::new(room),
                user_id: UserId::new(user_id),
            },
            InboundEvent::FindOpponent { user_id } => Self::FindOpponent {
                user_id: UserId::new(user_id),
            },
            InboundEvent::LeaveRoom => Self::LeaveRoom,
            InboundEvent::Message(message) => Self::Message(message.into()),
            InboundEvent::RequestLastMessages { room, count } => Self::RequestLastMessages {
                room: RoomName::new(room),
                count,
            },
            InboundEvent::RequestRooms => Self::RequestRooms,
        }
    }
}

impl From<ChatMessageDto> for ChatMessage {
    fn from(dto: ChatMessageDto) -> Self {
        Self::new(UserId::new(dto.user_id), dto.message, RoomName::new(dto.room))
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            user_id: model.user_id.into_string(),
            message: model.message,
            room: model.room.into_string(),
        }
    }
}

impl From<Notification> for OutboundEvent {
    fn from(model: Notification) -> Self {
        match model {
            Notification::RoomList(names) => {
                Self::Rooms(names.into_iter().map(RoomName::into_string).collect())
            }
            Notification::Joined { room, user_id } => Self::JoinRoom {
                room: room.into_string(),
                user_id: user_id.into_string(),
            },
            Notification::Message(message) => Self::Message(message.into()),
            Notification::FoundOpponent { room_id, users } => Self::FoundOpponent {
                room_id: room_id.into_string(),
                users: users.into_iter().map(UserId::into_string).collect(),
            },
            Notification::LastMessages(messages) => {
                Self::LastMessages(messages.into_iter().map(Into::into).collect())
            }
        }
    }
}

fn room_kind(room: &Room) -> RoomKindDto {
    if room.is_matched() {
        RoomKindDto::Matched
    } else {
        RoomKindDto::Named
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            kind: room_kind(room),
            member_count: room.member_count(),
            created_at: millis_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            kind: room_kind(room),
            admin: room.admin.as_ref().map(|id| id.as_str().to_string()),
            members: room
                .members
                .iter()
                .map(|(connection_id, user_id)| MemberDto {
                    connection_id: connection_id.as_str().to_string(),
                    user_id: user_id.as_str().to_string(),
                })
                .collect(),
            players: room
                .players
                .as_ref()
                .map(|players| players.iter().map(|p| p.as_str().to_string()).collect()),
            history_len: room.history.len(),
            created_at: millis_to_rfc3339(room.created_at.value()),
        }
    }
}
