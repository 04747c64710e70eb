//! Chat messages and reactions posted inside a Room

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// A chat message in a Room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    /// Author name captured at send time
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(room_id: Uuid, author: &User, content: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            user_id: author.id,
            username: author.username.clone(),
            content,
            created_at,
        }
    }

    pub fn format_timestamp(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// An emoji reaction sent to a live Room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(room_id: Uuid, user_id: Uuid, emoji: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            user_id,
            emoji,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_uses_local_time() {
        let author = User::new("jane".to_string(), "jane@example.com".to_string());
        let sent = Utc.with_ymd_and_hms(2025, 5, 15, 19, 30, 0).unwrap();
        let message = Message::new(Uuid::new_v4(), &author, "hi".to_string(), sent);

        let local = sent.with_timezone(&Local);
        assert_eq!(message.format_timestamp(), local.format("%H:%M").to_string());
        assert_eq!(message.username, "jane");
    }
}
