//! ドメイン層
//!
//! 接続・ルーム・マッチメイキングの状態とその遷移を扱います。
//! I/O を持たない純粋なロジックで構成され、外部への通知は `Delivery` として返します。

pub mod broadcast;
pub mod coordinator;
pub mod entity;
pub mod event;
pub mod history;
pub mod matchmaking;
pub mod pusher;
pub mod registry;
pub mod room;
pub mod room_store;
pub mod value_object;

pub use broadcast::BroadcastGroups;
pub use coordinator::{Coordinator, SYSTEM_USER_ID};
pub use entity::{ChatMessage, Connection, RoomBinding, WaitingEntry};
pub use event::{Audience, ClientEvent, Delivery, Notification};
pub use history::{DEFAULT_HISTORY_CAPACITY, MessageHistory};
pub use matchmaking::{MatchOutcome, MatchmakingQueue};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use registry::ConnectionRegistry;
pub use room::Room;
pub use room_store::{LeaveOutcome, RoomSnapshot, RoomStore};
pub use value_object::{ConnectionId, RoomName, Timestamp, UserId};
