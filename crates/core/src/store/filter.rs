//! Room list filtering for the explore and dashboard views

use crate::models::{Room, RoomStatus, RoomTag};

/// Criteria for narrowing a room list; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub status: Option<RoomStatus>,
    pub tag: Option<RoomTag>,
    /// Case-insensitive match against title or description
    pub search: Option<String>,
}

impl RoomFilter {
    pub fn with_status(mut self, status: RoomStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tag(mut self, tag: RoomTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.search = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    pub fn matches(&self, room: &Room) -> bool {
        if let Some(status) = self.status {
            if room.status != status {
                return false;
            }
        }

        if let Some(tag) = self.tag {
            if room.tag != tag {
                return false;
            }
        }

        if let Some(query) = &self.search {
            let query = query.to_lowercase();
            if !room.title.to_lowercase().contains(&query)
                && !room.description.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        true
    }

    /// Apply the filter to a list of rooms, keeping order
    pub fn apply<'a, I>(&self, rooms: I) -> Vec<&'a Room>
    where
        I: IntoIterator<Item = &'a Room>,
    {
        rooms.into_iter().filter(|room| self.matches(room)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewRoom, RoomType};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn rooms() -> Vec<Room> {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        vec![
            NewRoom::new("Friday Night Doodles")
                .with_description("Casual drawing session")
                .with_type(RoomType::Public)
                .with_tag(RoomTag::Hangout)
                .with_window(now - Duration::minutes(30), now + Duration::minutes(90))
                .build(owner, now)
                .unwrap(),
            NewRoom::new("Meditation Circle")
                .with_description("Guided meditation for beginners")
                .with_type(RoomType::Public)
                .with_tag(RoomTag::Wellness)
                .with_window(now + Duration::hours(1), now + Duration::hours(2))
                .build(owner, now)
                .unwrap(),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let rooms = rooms();
        assert_eq!(RoomFilter::default().apply(&rooms).len(), 2);
    }

    #[test]
    fn test_status_and_tag() {
        let rooms = rooms();
        let live = RoomFilter::default().with_status(RoomStatus::Live).apply(&rooms);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].title, "Friday Night Doodles");

        let wellness = RoomFilter::default().with_tag(RoomTag::Wellness).apply(&rooms);
        assert_eq!(wellness.len(), 1);
        assert_eq!(wellness[0].title, "Meditation Circle");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let rooms = rooms();
        let found = RoomFilter::default().with_search("DRAWING").apply(&rooms);
        assert_eq!(found.len(), 1);

        let blank = RoomFilter::default().with_search("   ");
        assert!(blank.search.is_none());
    }
}
