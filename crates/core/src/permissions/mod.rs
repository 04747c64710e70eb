//! Access policy for Room operations
//!
//! Pure predicates used to gate actions. Nothing here is a security
//! boundary; the store re-checks the same rules when it mutates.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Room, RoomStatus};

/// Actions that can be performed on a Room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomAction {
    View,
    Join,
    Leave,

    // Chat
    SendMessage,
    React,

    // Management
    Invite,
    UpdateStatus,
}

/// Access rules for user/room pairs
pub struct AccessPolicy;

impl AccessPolicy {
    /// Public rooms are open to everyone; private rooms to owner and invitees
    pub fn can_view(user_id: Uuid, room: &Room) -> bool {
        room.is_public() || room.is_owner(user_id) || room.is_invited(user_id)
    }

    /// True if `check_join` would succeed
    pub fn can_join(user_id: Uuid, room: &Room, now: DateTime<Utc>) -> bool {
        Self::check_join(user_id, room, now).is_ok()
    }

    /// Check join eligibility, reporting the first rule that fails
    pub fn check_join(user_id: Uuid, room: &Room, now: DateTime<Utc>) -> Result<()> {
        let status = room.window.status_at(now);
        if status != RoomStatus::Live {
            return Err(Error::NotLive(status));
        }

        if room.is_participant(user_id) {
            return Err(Error::AlreadyParticipant);
        }

        if !Self::can_view(user_id, room) {
            return Err(Error::NotInvited);
        }

        if room.is_full() {
            return Err(Error::RoomFull);
        }

        Ok(())
    }

    /// Check if a user may perform an action on a Room at `now`
    pub fn can_perform(user_id: Uuid, room: &Room, action: RoomAction, now: DateTime<Utc>) -> bool {
        match action {
            RoomAction::View => Self::can_view(user_id, room),
            RoomAction::Join => Self::can_join(user_id, room, now),

            RoomAction::Leave => room.is_participant(user_id),

            // Chat is open to participants while the room is live
            RoomAction::SendMessage | RoomAction::React => {
                room.is_participant(user_id) && room.window.is_live_at(now)
            }

            // Owner and participants can bring others in until the room closes
            RoomAction::Invite => {
                (room.is_owner(user_id) || room.is_participant(user_id))
                    && room.window.status_at(now) != RoomStatus::Closed
            }

            // Owner only
            RoomAction::UpdateStatus => room.is_owner(user_id),
        }
    }
}
