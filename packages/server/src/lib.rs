//! Real-time room and matchmaking server.
//!
//! Tracks live WebSocket connections, groups them into named rooms, pairs
//! anonymous players into matched rooms and keeps a short message history per
//! room for late joiners.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
