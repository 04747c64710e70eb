//! Demo data loaded at startup
//!
//! Three accounts and three rooms (one live, one scheduled, one closed),
//! with windows placed relative to the time of seeding.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{Message, Room, RoomStatus, RoomTag, RoomType, User};
use crate::window::TimeWindow;

/// Fixed so a persisted session still matches its seeded account next run
const DEMO_ID: Uuid = Uuid::from_u128(0x6f1d_2c34_9a0b_4e51_8c7d_0000_0000_0001);
const JANE_ID: Uuid = Uuid::from_u128(0x6f1d_2c34_9a0b_4e51_8c7d_0000_0000_0002);
const JOHN_ID: Uuid = Uuid::from_u128(0x6f1d_2c34_9a0b_4e51_8c7d_0000_0000_0003);

fn account(id: Uuid, username: &str, email: &str) -> User {
    User {
        id,
        ..User::new(username.to_string(), email.to_string())
    }
}

pub fn mock_users() -> Vec<User> {
    vec![
        account(DEMO_ID, "demo", "demo@roomloop.com"),
        account(JANE_ID, "jane", "jane@example.com"),
        account(JOHN_ID, "john", "john@example.com"),
    ]
}

fn minutes(now: DateTime<Utc>, offset: i64) -> DateTime<Utc> {
    now + Duration::minutes(offset)
}

#[allow(clippy::too_many_arguments)]
fn room(
    title: &str,
    description: &str,
    room_type: RoomType,
    (start, end): (i64, i64),
    max_participants: Option<u32>,
    tag: RoomTag,
    owner: &User,
    now: DateTime<Utc>,
) -> Room {
    let window = TimeWindow {
        start: minutes(now, start),
        end: minutes(now, end),
    };
    Room {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        room_type,
        status: RoomStatus::at(now, window.start, window.end),
        window,
        max_participants,
        tag,
        owner_id: owner.id,
        participants: vec![owner.id],
        invited: Vec::new(),
        messages: Vec::new(),
        reactions: Vec::new(),
        created_at: minutes(now, start.min(0) - 60),
    }
}

/// Demo rooms for the given users. Expects the accounts from [`mock_users`];
/// returns nothing if any of them is missing.
pub fn mock_rooms(users: &[User], now: DateTime<Utc>) -> Vec<Room> {
    let find = |name: &str| users.iter().find(|u| u.username == name);
    let (Some(demo), Some(jane), Some(john)) = (find("demo"), find("jane"), find("john")) else {
        tracing::warn!("Demo accounts missing, skipping room seed");
        return Vec::new();
    };

    let mut doodles = room(
        "Friday Night Doodles",
        "Casual drawing session. Bring your own tools!",
        RoomType::Public,
        (-30, 90),
        Some(10),
        RoomTag::Hangout,
        demo,
        now,
    );
    doodles.participants.push(jane.id);
    doodles.messages = vec![
        Message::new(
            doodles.id,
            demo,
            "Welcome to the doodle session!".to_string(),
            minutes(now, -25),
        ),
        Message::new(
            doodles.id,
            jane,
            "Excited to be here! What are we drawing today?".to_string(),
            minutes(now, -20),
        ),
    ];

    let mut bug_bash = room(
        "Bug Bash: Landing Page",
        "Help find and document bugs in the new landing page before launch.",
        RoomType::Private,
        (60, 180),
        None,
        RoomTag::Work,
        jane,
        now,
    );
    bug_bash.invited = vec![demo.id, john.id];

    let mut meditation = room(
        "Meditation Circle",
        "Guided meditation session for beginners.",
        RoomType::Public,
        (-180, -60),
        Some(20),
        RoomTag::Wellness,
        john,
        now,
    );
    meditation.participants.extend([demo.id, jane.id]);
    meditation.messages = vec![Message::new(
        meditation.id,
        john,
        "Thanks everyone for joining!".to_string(),
        minutes(now, -70),
    )];

    vec![doodles, bug_bash, meditation]
}
