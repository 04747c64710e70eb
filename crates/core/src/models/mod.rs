//! Data models for RoomLoop

mod user;
mod room;
mod message;

pub use user::*;
pub use room::*;
pub use message::*;
