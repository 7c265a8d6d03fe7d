//! UseCase 層のエラー

use thiserror::Error;

/// ルーム参照のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryRoomsError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}
