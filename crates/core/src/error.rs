//! Error types for RoomLoop Core

use thiserror::Error;

use crate::models::RoomStatus;

#[derive(Error, Debug)]
pub enum Error {
    #[error("You must be logged in to {0}")]
    NotAuthenticated(&'static str),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Cannot join a room that is {0}")]
    NotLive(RoomStatus),

    #[error("You are already in this room")]
    AlreadyParticipant,

    #[error("You are not invited to this room")]
    NotInvited,

    #[error("This room is full")]
    RoomFull,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Request failed: {0}")]
    Simulated(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
