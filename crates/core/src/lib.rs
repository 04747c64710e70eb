//! RoomLoop Core Library
//!
//! Room lifecycle and access rules, the in-memory room and session stores,
//! and the simulated request layer in front of them.

pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod seed;
pub mod session;
pub mod simulate;
pub mod store;
pub mod window;

pub use config::{Config, LatencyConfig};
pub use error::{Error, Result};
pub use models::*;
pub use permissions::*;
pub use session::{FileSession, MemorySession, SessionPersistence, SessionStore};
pub use simulate::{Request, Simulator};
pub use store::{spawn_status_refresher, RoomFilter, RoomService, RoomStore, StatusChange};
pub use window::TimeWindow;
