//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{Message, Room};

/// Validate that a Room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    debug_assert!(
        !room.title.trim().is_empty(),
        "Room {} has empty title",
        room.id
    );

    debug_assert!(
        room.window.start < room.window.end,
        "Room {} window ends before it starts",
        room.id
    );

    debug_assert!(
        room.owner_id != Uuid::nil(),
        "Room {} has nil owner_id",
        room.id
    );

    // Participants are a set
    for (i, id) in room.participants.iter().enumerate() {
        debug_assert!(
            !room.participants[..i].contains(id),
            "Room {} lists participant {} twice",
            room.id,
            id
        );
    }

    if let Some(max) = room.max_participants {
        debug_assert!(
            room.participants.len() <= max as usize,
            "Room {} has {} participants, capacity is {}",
            room.id,
            room.participants.len(),
            max
        );
    }

    for message in &room.messages {
        assert_message_invariants(message, room.id);
    }
}

/// Validate that a message belongs to its room and has content
pub fn assert_message_invariants(message: &Message, room_id: Uuid) {
    debug_assert!(
        message.room_id == room_id,
        "Message {} filed under room {} but belongs to {}",
        message.id,
        room_id,
        message.room_id
    );

    debug_assert!(
        !message.content.trim().is_empty(),
        "Message {} is blank",
        message.id
    );
}
