//! In-memory room storage
//!
//! `RoomStore` is the only owner of Room, Message and Reaction records.
//! Mutations take the acting user and the current time explicitly so the
//! rules can be exercised against any clock.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants::assert_room_invariants;
use crate::models::{Message, NewRoom, Reaction, Room, RoomStatus, User};
use crate::permissions::{AccessPolicy, RoomAction};

/// A Room whose derived status moved during a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub room_id: Uuid,
    pub title: String,
    pub status: RoomStatus,
}

#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: Vec<Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rooms (seed data)
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        for room in &rooms {
            assert_room_invariants(room);
        }
        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, room_id: Uuid) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    fn get_mut(&mut self, room_id: Uuid) -> Result<&mut Room> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or(Error::NotFound("Room"))
    }

    /// All rooms in creation order
    pub fn all(&self) -> &[Room] {
        &self.rooms
    }

    /// Rooms created by the user
    pub fn owned_by(&self, user_id: Uuid) -> Vec<&Room> {
        self.rooms.iter().filter(|r| r.is_owner(user_id)).collect()
    }

    /// Rooms the user is invited to, excluding their own
    pub fn invited_to(&self, user_id: Uuid) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| r.is_invited(user_id) && !r.is_owner(user_id))
            .collect()
    }

    /// Public rooms created by someone else (everything when signed out)
    pub fn public_for(&self, user_id: Option<Uuid>) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| r.is_public() && user_id.map_or(true, |uid| !r.is_owner(uid)))
            .collect()
    }

    /// Create a new Room owned by `owner`
    #[instrument(skip(self, owner, fields), fields(owner_id = %owner.id))]
    pub fn create(&mut self, owner: &User, fields: NewRoom, now: DateTime<Utc>) -> Result<Room> {
        let room = fields.build(owner.id, now)?;
        assert_room_invariants(&room);

        info!(room_id = %room.id, title = %room.title, status = %room.status, "Room created");
        self.rooms.push(room.clone());
        Ok(room)
    }

    /// Add the user to the Room's participants
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn join(&mut self, room_id: Uuid, user: &User, now: DateTime<Utc>) -> Result<()> {
        let room = self.get_mut(room_id)?;
        AccessPolicy::check_join(user.id, room, now)?;

        room.participants.push(user.id);
        assert_room_invariants(room);

        info!(participants = room.participants.len(), "Joined room");
        Ok(())
    }

    /// Remove the user from the Room. Returns false if they were not in it.
    #[instrument(skip(self))]
    pub fn leave(&mut self, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        let room = self.get_mut(room_id)?;
        let before = room.participants.len();
        room.participants.retain(|id| *id != user_id);

        let removed = room.participants.len() != before;
        if removed {
            info!(participants = room.participants.len(), "Left room");
        } else {
            debug!("Leave ignored, user was not a participant");
        }
        Ok(removed)
    }

    /// Append a chat message. Blank text is ignored and yields `None`.
    #[instrument(skip(self, author, text), fields(user_id = %author.id))]
    pub fn send_message(
        &mut self,
        room_id: Uuid,
        author: &User,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Message>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let room = self.get_mut(room_id)?;
        if !AccessPolicy::can_perform(author.id, room, RoomAction::SendMessage, now) {
            return Err(Self::chat_denied(room, author.id, now));
        }

        let message = Message::new(room_id, author, text.to_string(), now);
        room.messages.push(message.clone());
        debug!(message_id = %message.id, "Message sent");
        Ok(Some(message))
    }

    /// Record an emoji reaction
    #[instrument(skip(self))]
    pub fn send_reaction(
        &mut self,
        room_id: Uuid,
        user_id: Uuid,
        emoji: &str,
        now: DateTime<Utc>,
    ) -> Result<Reaction> {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(Error::InvalidOperation("Reaction cannot be empty".to_string()));
        }

        let room = self.get_mut(room_id)?;
        if !AccessPolicy::can_perform(user_id, room, RoomAction::React, now) {
            return Err(Self::chat_denied(room, user_id, now));
        }

        let reaction = Reaction::new(room_id, user_id, emoji.to_string(), now);
        room.reactions.push(reaction.clone());
        Ok(reaction)
    }

    fn chat_denied(room: &Room, user_id: Uuid, now: DateTime<Utc>) -> Error {
        if room.is_participant(user_id) {
            Error::PermissionDenied(format!(
                "the room is {}, chat is only open while it is live",
                room.window.status_at(now)
            ))
        } else {
            Error::PermissionDenied("join the room to take part".to_string())
        }
    }

    /// Grant join rights to users. Returns how many were newly invited.
    #[instrument(skip(self, actor, invitees), fields(actor_id = %actor.id, count = invitees.len()))]
    pub fn invite(
        &mut self,
        room_id: Uuid,
        actor: &User,
        invitees: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let room = self.get_mut(room_id)?;
        if !AccessPolicy::can_perform(actor.id, room, RoomAction::Invite, now) {
            return Err(Error::PermissionDenied(
                "only the owner and participants can invite before the room closes".to_string(),
            ));
        }

        let mut added = 0;
        for &user_id in invitees {
            if room.is_owner(user_id) || room.is_invited(user_id) {
                continue;
            }
            room.invited.push(user_id);
            added += 1;
        }

        info!(added, "Users invited");
        Ok(added)
    }

    /// Owner override of the displayed status, until the next refresh
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub fn update_status(
        &mut self,
        room_id: Uuid,
        actor: &User,
        status: RoomStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let room = self.get_mut(room_id)?;
        if !AccessPolicy::can_perform(actor.id, room, RoomAction::UpdateStatus, now) {
            return Err(Error::PermissionDenied(
                "only the owner can change the room status".to_string(),
            ));
        }

        room.status = status;
        info!("Room status changed");
        Ok(())
    }

    /// Recompute every Room's status; returns the Rooms that changed
    #[instrument(skip(self))]
    pub fn refresh(&mut self, now: DateTime<Utc>) -> Vec<StatusChange> {
        let mut changed = Vec::new();
        for room in &mut self.rooms {
            if room.refresh_status(now) {
                info!(room_id = %room.id, status = %room.status, "Room status transitioned");
                changed.push(StatusChange {
                    room_id: room.id,
                    title: room.title.clone(),
                    status: room.status,
                });
            }
        }
        changed
    }
}
