//! Room model - the time-boxed micro-event

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Message, Reaction};
use crate::error::Error;
use crate::window::TimeWindow;

/// Who may see and join a Room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Public,
    /// Owner and invited users only
    #[default]
    Private,
}

impl RoomType {
    pub fn display_name(&self) -> &'static str {
        match self {
            RoomType::Public => "Public Room",
            RoomType::Private => "Private Room",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomType::Public => write!(f, "public"),
            RoomType::Private => write!(f, "private"),
        }
    }
}

impl FromStr for RoomType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(RoomType::Public),
            "private" => Ok(RoomType::Private),
            other => Err(Error::InvalidOperation(format!("Unknown room type '{}'", other))),
        }
    }
}

/// Topic label shown on room cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoomTag {
    Hangout,
    Work,
    Brainstorm,
    Wellness,
    #[default]
    Other,
}

impl RoomTag {
    pub fn all() -> &'static [RoomTag] {
        &[
            RoomTag::Hangout,
            RoomTag::Work,
            RoomTag::Brainstorm,
            RoomTag::Wellness,
            RoomTag::Other,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoomTag::Hangout => "Hangout",
            RoomTag::Work => "Work",
            RoomTag::Brainstorm => "Brainstorm",
            RoomTag::Wellness => "Wellness",
            RoomTag::Other => "Other",
        }
    }
}

impl std::fmt::Display for RoomTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for RoomTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomTag::all()
            .iter()
            .copied()
            .find(|tag| tag.display_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidOperation(format!("Unknown tag '{}'", s)))
    }
}

/// Temporal state of a Room, derived from its time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Scheduled,
    Live,
    Closed,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Scheduled => write!(f, "scheduled"),
            RoomStatus::Live => write!(f, "live"),
            RoomStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for RoomStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scheduled" => Ok(RoomStatus::Scheduled),
            "live" => Ok(RoomStatus::Live),
            "closed" => Ok(RoomStatus::Closed),
            other => Err(Error::InvalidOperation(format!("Unknown status '{}'", other))),
        }
    }
}

/// A time-boxed Room with membership rules and a chat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub room_type: RoomType,
    pub window: TimeWindow,
    /// Capacity; `None` means unlimited
    pub max_participants: Option<u32>,
    pub tag: RoomTag,
    /// Cached status, only authoritative as of the last refresh
    pub status: RoomStatus,
    pub owner_id: Uuid,
    pub participants: Vec<Uuid>,
    pub invited: Vec<Uuid>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }

    pub fn is_invited(&self, user_id: Uuid) -> bool {
        self.invited.contains(&user_id)
    }

    pub fn is_public(&self) -> bool {
        self.room_type == RoomType::Public
    }

    /// True once the participant count has reached capacity
    pub fn is_full(&self) -> bool {
        match self.max_participants {
            Some(max) => self.participants.len() >= max as usize,
            None => false,
        }
    }

    /// Recompute the cached status for `now`; returns true if it changed
    pub fn refresh_status(&mut self, now: DateTime<Utc>) -> bool {
        let status = self.window.status_at(now);
        if status == self.status {
            return false;
        }
        self.status = status;
        true
    }
}

/// Fields for a new Room; unset fields take the creation defaults
#[derive(Debug, Clone, Default)]
pub struct NewRoom {
    pub title: Option<String>,
    pub description: String,
    pub room_type: Option<RoomType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub max_participants: Option<u32>,
    pub tag: Option<RoomTag>,
    pub invited: Vec<Uuid>,
}

impl NewRoom {
    /// Title used when none is given
    pub const DEFAULT_TITLE: &'static str = "Untitled Room";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, room_type: RoomType) -> Self {
        self.room_type = Some(room_type);
        self
    }

    pub fn with_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_capacity(mut self, max: u32) -> Self {
        self.max_participants = Some(max);
        self
    }

    pub fn with_tag(mut self, tag: RoomTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_invited(mut self, invited: Vec<Uuid>) -> Self {
        self.invited = invited;
        self
    }

    /// Build the Room for `owner_id`, validating the form fields
    pub fn build(self, owner_id: Uuid, now: DateTime<Utc>) -> crate::Result<Room> {
        let title = match self.title {
            Some(title) if title.trim().is_empty() => {
                return Err(Error::InvalidOperation("Title is required".to_string()));
            }
            Some(title) => title.trim().to_string(),
            None => Self::DEFAULT_TITLE.to_string(),
        };

        if self.max_participants == Some(0) {
            return Err(Error::InvalidOperation(
                "Maximum participants must be at least 1".to_string(),
            ));
        }

        let start = self.start.unwrap_or(now);
        let end = self.end.unwrap_or(start + Duration::hours(1));
        let window = TimeWindow::new(start, end)?;

        let room_type = self.room_type.unwrap_or_default();
        let mut invited = Vec::new();
        if room_type == RoomType::Private {
            for user_id in self.invited {
                if user_id != owner_id && !invited.contains(&user_id) {
                    invited.push(user_id);
                }
            }
        }

        Ok(Room {
            id: Uuid::new_v4(),
            title,
            description: self.description,
            room_type,
            status: window.status_at(now),
            window,
            max_participants: self.max_participants,
            tag: self.tag.unwrap_or_default(),
            owner_id,
            participants: vec![owner_id],
            invited,
            messages: Vec::new(),
            reactions: Vec::new(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let room = NewRoom::default().build(owner, now).unwrap();

        assert_eq!(room.title, "Untitled Room");
        assert_eq!(room.room_type, RoomType::Private);
        assert_eq!(room.tag, RoomTag::Other);
        assert_eq!(room.window.start, now);
        assert_eq!(room.window.end, now + Duration::hours(1));
        assert_eq!(room.status, RoomStatus::Live);
        assert_eq!(room.participants, vec![owner]);
    }

    #[test]
    fn test_build_rejects_blank_title() {
        let err = NewRoom::new("   ").build(Uuid::new_v4(), Utc::now()).unwrap_err();
        assert!(err.to_string().contains("Title is required"));
    }

    #[test]
    fn test_build_rejects_inverted_window() {
        let now = Utc::now();
        let err = NewRoom::new("Standup")
            .with_window(now + Duration::hours(2), now + Duration::hours(1))
            .build(Uuid::new_v4(), now)
            .unwrap_err();
        assert!(err.to_string().contains("End time must be after start time"));
    }

    #[test]
    fn test_public_room_drops_invites() {
        let owner = Uuid::new_v4();
        let room = NewRoom::new("Open mic")
            .with_type(RoomType::Public)
            .with_invited(vec![Uuid::new_v4()])
            .build(owner, Utc::now())
            .unwrap();
        assert!(room.invited.is_empty());
    }

    #[test]
    fn test_private_room_dedupes_invites() {
        let owner = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let room = NewRoom::new("Retro")
            .with_invited(vec![guest, guest, owner])
            .build(owner, Utc::now())
            .unwrap();
        assert_eq!(room.invited, vec![guest]);
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!("wellness".parse::<RoomTag>().unwrap(), RoomTag::Wellness);
        assert!("party".parse::<RoomTag>().is_err());
        assert_eq!("LIVE".parse::<RoomStatus>().unwrap(), RoomStatus::Live);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RoomStatus::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");
        let json = serde_json::to_string(&RoomType::Public).unwrap();
        assert_eq!(json, "\"public\"");
    }
}
