//! UseCase 層
//!
//! - `router`: 接続からのイベントを Coordinator に流し、結果を配信する
//! - `dispatcher`: 配信指示を JSON にして MessagePusher へ渡す
//! - `query_rooms`: HTTP API 向けの読み取り専用クエリ

mod dispatcher;
mod error;
mod query_rooms;
mod router;

pub use dispatcher::BroadcastDispatcher;
pub use error::QueryRoomsError;
pub use query_rooms::{QueryRoomsUseCase, ServerStats};
pub use router::EventRouter;
