//! Room storage and the operations built on it

mod filter;
mod refresher;
mod rooms;
mod service;

pub use filter::RoomFilter;
pub use refresher::spawn_status_refresher;
pub use rooms::{RoomStore, StatusChange};
pub use service::RoomService;
