//! Async room operations for the signed-in user
//!
//! Each call stands in for a network request: it resolves the acting user
//! from the session, waits out the simulated latency, then applies the
//! change to the shared [`RoomStore`]. Failures are returned to the caller
//! as-is; nothing is retried.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use super::{RoomFilter, RoomStore, StatusChange};
use crate::error::{Error, Result};
use crate::models::{Message, NewRoom, Reaction, Room, RoomStatus};
use crate::session::SessionStore;
use crate::simulate::{Request, Simulator};

#[derive(Clone)]
pub struct RoomService {
    store: Arc<RwLock<RoomStore>>,
    session: SessionStore,
    simulator: Simulator,
}

impl RoomService {
    pub fn new(store: RoomStore, session: SessionStore, simulator: Simulator) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            session,
            simulator,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Load the room list, with statuses brought up to date
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Vec<Room>> {
        self.simulator.round_trip(Request::Fetch).await?;

        let mut store = self.store.write().await;
        store.refresh(Utc::now());
        Ok(store.all().to_vec())
    }

    /// Snapshot of one Room, without a simulated round-trip
    pub async fn get(&self, room_id: Uuid) -> Option<Room> {
        self.store.read().await.get(room_id).cloned()
    }

    /// Snapshot of every Room
    pub async fn rooms(&self) -> Vec<Room> {
        self.store.read().await.all().to_vec()
    }

    /// Rooms created by the current user
    pub async fn user_rooms(&self, filter: &RoomFilter) -> Vec<Room> {
        let Some(user) = self.session.current_user() else {
            return Vec::new();
        };
        let store = self.store.read().await;
        filter.apply(store.owned_by(user.id)).into_iter().cloned().collect()
    }

    /// Rooms the current user was invited to by someone else
    pub async fn invited_rooms(&self, filter: &RoomFilter) -> Vec<Room> {
        let Some(user) = self.session.current_user() else {
            return Vec::new();
        };
        let store = self.store.read().await;
        filter.apply(store.invited_to(user.id)).into_iter().cloned().collect()
    }

    /// Public rooms not owned by the current user
    pub async fn public_rooms(&self, filter: &RoomFilter) -> Vec<Room> {
        let user_id = self.session.current_user().map(|u| u.id);
        let store = self.store.read().await;
        filter.apply(store.public_for(user_id)).into_iter().cloned().collect()
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: NewRoom) -> Result<Room> {
        let user = self.session.require_user("create a room")?;
        self.simulator.round_trip(Request::Create).await?;

        self.store.write().await.create(&user, fields, Utc::now())
    }

    #[instrument(skip(self))]
    pub async fn join(&self, room_id: Uuid) -> Result<Room> {
        let user = self.session.require_user("join a room")?;
        self.simulator.round_trip(Request::Join).await?;

        let mut store = self.store.write().await;
        store.join(room_id, &user, Utc::now())?;
        store.get(room_id).cloned().ok_or(Error::NotFound("Room"))
    }

    /// Returns false if the user was not a participant
    #[instrument(skip(self))]
    pub async fn leave(&self, room_id: Uuid) -> Result<bool> {
        let user = self.session.require_user("leave a room")?;
        self.simulator.round_trip(Request::Leave).await?;

        self.store.write().await.leave(room_id, user.id)
    }

    /// Blank text returns `Ok(None)` immediately
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, room_id: Uuid, text: &str) -> Result<Option<Message>> {
        let user = self.session.require_user("send a message")?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.simulator.round_trip(Request::Message).await?;

        self.store
            .write()
            .await
            .send_message(room_id, &user, text, Utc::now())
    }

    #[instrument(skip(self))]
    pub async fn send_reaction(&self, room_id: Uuid, emoji: &str) -> Result<Reaction> {
        let user = self.session.require_user("react")?;
        self.simulator.round_trip(Request::Reaction).await?;

        self.store
            .write()
            .await
            .send_reaction(room_id, user.id, emoji, Utc::now())
    }

    /// Invite users by id; returns the number newly invited
    #[instrument(skip(self, invitees), fields(count = invitees.len()))]
    pub async fn invite(&self, room_id: Uuid, invitees: &[Uuid]) -> Result<usize> {
        let user = self.session.require_user("invite people")?;
        if invitees.is_empty() {
            return Err(Error::InvalidOperation(
                "Please add at least one person to invite".to_string(),
            ));
        }
        self.simulator.round_trip(Request::Invite).await?;

        self.store
            .write()
            .await
            .invite(room_id, &user, invitees, Utc::now())
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, room_id: Uuid, status: RoomStatus) -> Result<()> {
        let user = self.session.require_user("change a room")?;
        self.simulator.round_trip(Request::UpdateStatus).await?;

        self.store
            .write()
            .await
            .update_status(room_id, &user, status, Utc::now())
    }

    /// User-triggered refresh, with a simulated round-trip
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<StatusChange>> {
        self.simulator.round_trip(Request::Refresh).await?;
        Ok(self.refresh_now().await)
    }

    /// Re-derive statuses immediately; used by the background refresher
    pub async fn refresh_now(&self) -> Vec<StatusChange> {
        self.store.write().await.refresh(Utc::now())
    }
}
