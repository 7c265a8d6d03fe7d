//! Utilities shared by the Tertulia packages.

pub mod logger;
pub mod time;
