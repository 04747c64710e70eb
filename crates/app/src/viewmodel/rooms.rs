//! Room list, room detail and room management view model

use chrono::{DateTime, Local, Utc};
use roomloop_core::window::{format_duration, format_time_remaining, format_time_window};
use roomloop_core::{
    AccessPolicy, Error, NewRoom, Result, Room, RoomAction, RoomFilter, RoomStatus, User,
};
use uuid::Uuid;

use super::Lines;
use crate::command::{out_of_range, CreateForm};
use crate::state::AppState;
use crate::toast::Toast;

/// Messages shown in the room detail, newest last
const CHAT_HISTORY: usize = 20;

/// First eight hex digits of a room id, enough to type back in
pub fn short_id(id: Uuid) -> String {
    let mut id = id.simple().to_string();
    id.truncate(8);
    id
}

/// Find a room by full id or unique id prefix
pub fn resolve_room<'a>(rooms: &'a [Room], reference: &str) -> Result<&'a Room> {
    let needle = reference.trim().to_ascii_lowercase().replace('-', "");
    if needle.is_empty() {
        return Err(Error::NotFound("Room"));
    }

    let mut matches = rooms
        .iter()
        .filter(|room| room.id.simple().to_string().starts_with(&needle));

    match (matches.next(), matches.next()) {
        (Some(room), None) => Ok(room),
        (None, _) => Err(Error::NotFound("Room")),
        (Some(_), Some(_)) => Err(Error::InvalidOperation(format!(
            "room id '{}' is ambiguous, type more of it",
            reference
        ))),
    }
}

pub(super) async fn lookup(state: &AppState, reference: &str) -> Result<Room> {
    let rooms = state.rooms().rooms().await;
    resolve_room(&rooms, reference).cloned()
}

/// Map usernames to account ids, failing on the first unknown name
pub(super) fn resolve_usernames(state: &AppState, usernames: &[String]) -> Result<Vec<Uuid>> {
    usernames
        .iter()
        .map(|name| {
            state
                .session()
                .find_by_username(name)
                .map(|user| user.id)
                .ok_or_else(|| Error::InvalidOperation(format!("no user named '{}'", name)))
        })
        .collect()
}

fn status_badge(room: &Room, now: DateTime<Utc>) -> String {
    match room.status {
        RoomStatus::Live => "LIVE NOW".to_string(),
        RoomStatus::Scheduled => {
            format!("Starts in {}", format_time_remaining(room.window.start, now))
        }
        RoomStatus::Closed => "Ended".to_string(),
    }
}

fn local_window(room: &Room) -> String {
    format_time_window(
        &room.window.start.with_timezone(&Local),
        &room.window.end.with_timezone(&Local),
    )
}

fn people(count: usize) -> String {
    if count == 1 {
        "1 person".to_string()
    } else {
        format!("{} people", count)
    }
}

fn card_hint(room: &Room, viewer: Option<Uuid>, now: DateTime<Utc>) -> String {
    let id = short_id(room.id);
    let Some(user_id) = viewer else {
        return format!("View Details: room {}", id);
    };

    if room.is_participant(user_id) && room.window.is_live_at(now) {
        format!("Return to Room: room {}", id)
    } else if AccessPolicy::can_join(user_id, room, now) {
        format!("Join Room: join {}", id)
    } else if room.is_owner(user_id) && room.status == RoomStatus::Scheduled {
        format!("Manage Room: room {}", id)
    } else {
        format!("View Details: room {}", id)
    }
}

/// Summary card used by every room list
pub fn render_card(room: &Room, viewer: Option<Uuid>, now: DateTime<Utc>) -> Lines {
    let mut access = room.room_type.display_name().to_string();
    if let Some(max) = room.max_participants {
        access.push_str(&format!(" • Max {} people", max));
    }

    let mut lines = vec![format!(
        "[{}] {}  ({})  #{}",
        short_id(room.id),
        room.title,
        status_badge(room, now),
        room.tag
    )];
    if !room.description.is_empty() {
        lines.push(format!("    {}", room.description));
    }
    lines.push(format!(
        "    {} • {} • {}",
        access,
        people(room.participants.len()),
        local_window(room)
    ));
    lines.push(format!("    -> {}", card_hint(room, viewer, now)));
    lines
}

fn render_list(rooms: &[Room], viewer: Option<Uuid>, now: DateTime<Utc>, empty: &str) -> Lines {
    if rooms.is_empty() {
        return vec![format!("  {}", empty)];
    }
    rooms
        .iter()
        .flat_map(|room| render_card(room, viewer, now))
        .collect()
}

fn username(users: &[User], user_id: Uuid) -> String {
    users
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.username.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

fn reaction_summary(room: &Room) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for reaction in &room.reactions {
        match counts.iter_mut().find(|(emoji, _)| *emoji == reaction.emoji) {
            Some((_, count)) => *count += 1,
            None => counts.push((&reaction.emoji, 1)),
        }
    }
    if counts.is_empty() {
        return None;
    }
    let parts: Vec<String> = counts
        .iter()
        .map(|(emoji, count)| format!("{} x{}", emoji, count))
        .collect();
    Some(parts.join("  "))
}

pub fn render_message(message: &roomloop_core::Message) -> String {
    format!(
        "  [{}] {}: {}",
        message.format_timestamp(),
        message.username,
        message.content
    )
}

fn available_actions(room: &Room, user_id: Uuid, now: DateTime<Utc>) -> Vec<String> {
    let id = short_id(room.id);
    let commands = [
        (RoomAction::Join, format!("join {}", id)),
        (RoomAction::Leave, format!("leave {}", id)),
        (RoomAction::SendMessage, format!("say {} <message>", id)),
        (RoomAction::React, format!("react {} <emoji>", id)),
        (RoomAction::Invite, format!("invite {} <username>...", id)),
        (RoomAction::UpdateStatus, format!("status {} scheduled|live|closed", id)),
    ];
    commands
        .into_iter()
        .filter(|(action, _)| AccessPolicy::can_perform(user_id, room, *action, now))
        .map(|(_, command)| command)
        .collect()
}

/// Full room page: header, people, chat and the actions open to the viewer
pub fn render_detail(room: &Room, viewer: Option<Uuid>, users: &[User], now: DateTime<Utc>) -> Lines {
    let mut lines = vec![
        format!("== {} [{}] ==", room.title, short_id(room.id)),
        format!(
            "{} • {} • {}",
            status_badge(room, now),
            room.tag.display_name(),
            room.room_type.display_name()
        ),
        format!(
            "{} ({})",
            local_window(room),
            format_duration(room.window.start, room.window.end)
        ),
    ];
    if !room.description.is_empty() {
        lines.push(room.description.clone());
    }

    let names: Vec<String> = room
        .participants
        .iter()
        .map(|&id| {
            let name = username(users, id);
            if room.is_owner(id) {
                format!("{} (host)", name)
            } else {
                name
            }
        })
        .collect();
    let capacity = room
        .max_participants
        .map(|max| format!("/{}", max))
        .unwrap_or_default();
    lines.push(format!(
        "Participants ({}{}): {}",
        room.participants.len(),
        capacity,
        names.join(", ")
    ));

    if viewer.is_some_and(|id| room.is_owner(id)) && !room.invited.is_empty() {
        let invited: Vec<String> = room.invited.iter().map(|&id| username(users, id)).collect();
        lines.push(format!("Invited: {}", invited.join(", ")));
    }

    if let Some(summary) = reaction_summary(room) {
        lines.push(format!("Reactions: {}", summary));
    }

    lines.push("-- Chat --".to_string());
    if room.messages.is_empty() {
        lines.push("  No messages yet".to_string());
    } else {
        let skip = room.messages.len().saturating_sub(CHAT_HISTORY);
        lines.extend(room.messages.iter().skip(skip).map(render_message));
    }

    match viewer {
        Some(user_id) => {
            let actions = available_actions(room, user_id, now);
            if !actions.is_empty() {
                lines.push(format!("Actions: {}", actions.join(" | ")));
            }
        }
        None => lines.push("Log in to join this room: login <email>".to_string()),
    }

    lines
}

pub(super) async fn explore(state: &AppState, filter: &RoomFilter) -> Lines {
    let viewer = state.session().current_user().map(|u| u.id);
    let rooms = state.rooms().public_rooms(filter).await;

    let mut lines = vec!["== Explore Rooms ==".to_string()];
    lines.extend(render_list(&rooms, viewer, Utc::now(), "No rooms found"));
    lines
}

fn empty_message(total: usize, status: Option<RoomStatus>, none: &str, noun: &str) -> String {
    if total == 0 {
        return none.to_string();
    }
    match status {
        Some(status) => format!("No {} {} found", status, noun),
        None => format!("No {} found", noun),
    }
}

pub(super) async fn dashboard(state: &AppState, status: Option<RoomStatus>) -> Lines {
    let user = match state.session().require_user("view your dashboard") {
        Ok(user) => user,
        Err(e) => return vec![Toast::failure("Error", &e).to_string()],
    };

    let all = RoomFilter::default();
    let filter = match status {
        Some(status) => RoomFilter::default().with_status(status),
        None => RoomFilter::default(),
    };
    let now = Utc::now();
    let rooms = state.rooms();

    let mine = rooms.user_rooms(&filter).await;
    let mine_total = rooms.user_rooms(&all).await.len();
    let invited = rooms.invited_rooms(&filter).await;
    let invited_total = rooms.invited_rooms(&all).await.len();

    let mut lines = vec![format!("== Dashboard: {} ==", user.username)];
    lines.push(format!("-- My Rooms ({}) --", mine.len()));
    lines.extend(render_list(
        &mine,
        Some(user.id),
        now,
        &empty_message(mine_total, status, "You haven't created any rooms yet", "rooms"),
    ));
    lines.push(format!("-- Invitations ({}) --", invited.len()));
    lines.extend(render_list(
        &invited,
        Some(user.id),
        now,
        &empty_message(
            invited_total,
            status,
            "You don't have any room invitations",
            "invitations",
        ),
    ));
    lines
}

pub(super) async fn detail(state: &AppState, reference: &str) -> Lines {
    let room = match lookup(state, reference).await {
        Ok(room) => room,
        Err(e) => return vec![Toast::failure("Error", &e).to_string()],
    };

    let viewer = state.session().current_user().map(|u| u.id);
    let visible = room.is_public() || viewer.is_some_and(|id| AccessPolicy::can_view(id, &room));
    if !visible {
        return vec![Toast::error("Private room", "You have not been invited to this room").to_string()];
    }

    render_detail(&room, viewer, &state.session().users(), Utc::now())
}

fn new_room(state: &AppState, form: CreateForm, now: DateTime<Utc>) -> Result<NewRoom> {
    let invited = resolve_usernames(state, &form.invite)?;
    let start = form.start.map(|at| at.resolve(now)).transpose()?;
    let end = match (form.end, form.duration) {
        (Some(end), _) => Some(end.resolve(now)?),
        (None, Some(duration)) => Some(
            start
                .unwrap_or(now)
                .checked_add_signed(duration)
                .ok_or_else(out_of_range)?,
        ),
        (None, None) => None,
    };

    Ok(NewRoom {
        title: form.title,
        description: form.description,
        room_type: form.room_type,
        start,
        end,
        max_participants: form.max_participants,
        tag: form.tag,
        invited,
    })
}

pub(super) async fn create(state: &AppState, form: CreateForm) -> Lines {
    let fields = match new_room(state, form, Utc::now()) {
        Ok(fields) => fields,
        Err(e) => return vec![Toast::failure("Error", &e).to_string()],
    };

    match state.rooms().create(fields).await {
        Ok(room) => {
            let toast = Toast::success(
                "Room created!",
                format!("Your room \"{}\" has been created.", room.title),
            );
            let viewer = Some(room.owner_id);
            let mut lines = vec![toast.to_string()];
            lines.extend(render_detail(&room, viewer, &state.session().users(), Utc::now()));
            lines
        }
        Err(e) => vec![Toast::failure("Error", &e).to_string()],
    }
}

pub(super) async fn join(state: &AppState, reference: &str) -> Lines {
    let result = match lookup(state, reference).await {
        Ok(room) => state.rooms().join(room.id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(room) => {
            let viewer = state.session().current_user().map(|u| u.id);
            let toast = Toast::success("Joined room", format!("You've joined \"{}\".", room.title));
            let mut lines = vec![toast.to_string()];
            lines.extend(render_detail(&room, viewer, &state.session().users(), Utc::now()));
            lines
        }
        Err(e) => vec![Toast::failure("Error", &e).to_string()],
    }
}

pub(super) async fn leave(state: &AppState, reference: &str) -> Lines {
    let result = match lookup(state, reference).await {
        Ok(room) => state.rooms().leave(room.id).await,
        Err(e) => Err(e),
    };

    let toast = match result {
        Ok(true) => Toast::success("Left room", "You have left the room."),
        Ok(false) => Toast::error("Error", "You are not in this room"),
        Err(e) => Toast::failure("Error", &e),
    };
    vec![toast.to_string()]
}

async fn send_invites(state: &AppState, reference: &str, usernames: &[String]) -> Result<usize> {
    let room = lookup(state, reference).await?;
    let invitees = resolve_usernames(state, usernames)?;
    state.rooms().invite(room.id, &invitees).await
}

pub(super) async fn invite(state: &AppState, reference: &str, usernames: &[String]) -> Lines {
    let toast = match send_invites(state, reference, usernames).await {
        Ok(0) => Toast::success("No new invitations", "Everyone listed already has access."),
        Ok(count) => Toast::success(
            "Invites sent!",
            format!(
                "Successfully sent {} invitation{}",
                count,
                if count > 1 { "s" } else { "" }
            ),
        ),
        Err(e) => Toast::failure("Error", &e),
    };
    vec![toast.to_string()]
}

pub(super) async fn set_status(state: &AppState, reference: &str, status: RoomStatus) -> Lines {
    let result = match lookup(state, reference).await {
        Ok(room) => state.rooms().update_status(room.id, status).await,
        Err(e) => Err(e),
    };

    let toast = match result {
        Ok(()) => Toast::success("Status updated", format!("Room status changed to {}.", status)),
        Err(e) => Toast::failure("Error", &e),
    };
    vec![toast.to_string()]
}

pub fn render_status_change(title: &str, status: RoomStatus) -> String {
    let description = match status {
        RoomStatus::Live => format!("\"{}\" is live now", title),
        RoomStatus::Closed => format!("\"{}\" has ended", title),
        RoomStatus::Scheduled => format!("\"{}\" is scheduled", title),
    };
    Toast::success("Room update", description).to_string()
}

pub(super) async fn refresh(state: &AppState) -> Lines {
    match state.rooms().refresh().await {
        Ok(changes) => {
            let summary = match changes.len() {
                0 => "All rooms are up to date.".to_string(),
                1 => "1 room changed status.".to_string(),
                n => format!("{} rooms changed status.", n),
            };
            let mut lines = vec![Toast::success("Rooms refreshed", summary).to_string()];
            lines.extend(
                changes
                    .iter()
                    .map(|change| render_status_change(&change.title, change.status)),
            );
            lines
        }
        Err(e) => vec![Toast::failure("Error", &e).to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use roomloop_core::seed::{mock_rooms, mock_users};
    use roomloop_core::RoomType;

    use crate::command::TimeSpec;
    use crate::state::tests::test_state;

    fn seeded() -> (Vec<User>, Vec<Room>, DateTime<Utc>) {
        let now = Utc::now();
        let users = mock_users();
        let rooms = mock_rooms(&users, now);
        (users, rooms, now)
    }

    fn user<'a>(users: &'a [User], name: &str) -> &'a User {
        users.iter().find(|u| u.username == name).unwrap()
    }

    #[test]
    fn test_short_id_and_resolve() {
        let (_, rooms, _) = seeded();
        let target = &rooms[1];

        let prefix = short_id(target.id);
        assert_eq!(prefix.len(), 8);
        assert_eq!(resolve_room(&rooms, &prefix).unwrap().id, target.id);
        assert_eq!(resolve_room(&rooms, &target.id.to_string()).unwrap().id, target.id);
        assert_eq!(
            resolve_room(&rooms, &prefix.to_uppercase()).unwrap().id,
            target.id
        );

        assert!(matches!(resolve_room(&rooms, "zzzz"), Err(Error::NotFound(_))));
        assert!(matches!(resolve_room(&rooms, ""), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_ambiguous_prefix() {
        let (_, mut rooms, _) = seeded();
        rooms[0].id = Uuid::parse_str("abcd0000-0000-4000-8000-000000000001").unwrap();
        rooms[1].id = Uuid::parse_str("abcd0000-0000-4000-8000-000000000002").unwrap();

        let err = resolve_room(&rooms, "abcd").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
        assert_eq!(
            resolve_room(&rooms, "abcd0000-0000-4000-8000-000000000002")
                .unwrap()
                .id,
            rooms[1].id
        );
    }

    #[test]
    fn test_card_hints() {
        let (users, rooms, now) = seeded();
        let demo = user(&users, "demo");
        let john = user(&users, "john");
        let jane = user(&users, "jane");

        let doodles = &rooms[0];
        let card = render_card(doodles, Some(demo.id), now).join("\n");
        assert!(card.contains("Friday Night Doodles"));
        assert!(card.contains("LIVE NOW"));
        assert!(card.contains("Public Room • Max 10 people • 2 people"));
        assert!(card.contains("Return to Room"));

        let card = render_card(doodles, Some(john.id), now).join("\n");
        assert!(card.contains("Join Room: join"));

        let bug_bash = &rooms[1];
        let card = render_card(bug_bash, Some(jane.id), now).join("\n");
        assert!(card.contains("Starts in"));
        assert!(card.contains("Manage Room"));

        let card = render_card(&rooms[2], None, now).join("\n");
        assert!(card.contains("Ended"));
        assert!(card.contains("View Details"));
    }

    #[test]
    fn test_detail_lists_people_chat_and_actions() {
        let (users, rooms, now) = seeded();
        let demo = user(&users, "demo");
        let john = user(&users, "john");
        let doodles = &rooms[0];

        let page = render_detail(doodles, Some(demo.id), &users, now).join("\n");
        assert!(page.contains("Participants (2/10): demo (host), jane"));
        assert!(page.contains("demo: Welcome to the doodle session!"));
        assert!(page.contains("leave "));
        assert!(page.contains("say "));
        assert!(page.contains("status "));
        assert!(!page.contains("join "));

        let page = render_detail(doodles, Some(john.id), &users, now).join("\n");
        assert!(page.contains("Actions: join "));
        assert!(!page.contains("say "));

        let page = render_detail(doodles, None, &users, now).join("\n");
        assert!(page.contains("Log in to join this room"));
    }

    #[test]
    fn test_detail_shows_invitees_to_owner_only() {
        let (users, rooms, now) = seeded();
        let jane = user(&users, "jane");
        let demo = user(&users, "demo");
        let bug_bash = &rooms[1];

        let page = render_detail(bug_bash, Some(jane.id), &users, now).join("\n");
        assert!(page.contains("Invited: demo, john"));

        let page = render_detail(bug_bash, Some(demo.id), &users, now).join("\n");
        assert!(!page.contains("Invited:"));
        assert!(page.contains("No messages yet"));
    }

    #[test]
    fn test_reaction_summary_counts() {
        let (users, mut rooms, now) = seeded();
        let room = &mut rooms[0];
        for (who, emoji) in [("demo", "🎨"), ("jane", "🎨"), ("jane", "🔥")] {
            let id = user(&users, who).id;
            room.reactions
                .push(roomloop_core::Reaction::new(room.id, id, emoji.to_string(), now));
        }
        assert_eq!(reaction_summary(room).as_deref(), Some("🎨 x2  🔥 x1"));
        assert_eq!(reaction_summary(&rooms[1]), None);
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(
            empty_message(0, None, "You haven't created any rooms yet", "rooms"),
            "You haven't created any rooms yet"
        );
        assert_eq!(
            empty_message(2, Some(RoomStatus::Live), "none", "rooms"),
            "No live rooms found"
        );
        assert_eq!(empty_message(2, None, "none", "invitations"), "No invitations found");
    }

    #[test]
    fn test_new_room_from_form() {
        let state = test_state();
        let now = Utc::now();
        let form = CreateForm {
            title: Some("Lunch".to_string()),
            room_type: Some(RoomType::Private),
            start: Some(TimeSpec::Relative(Duration::minutes(10))),
            duration: Some(Duration::minutes(45)),
            invite: vec!["jane".to_string()],
            ..CreateForm::default()
        };

        let fields = new_room(&state, form, now).unwrap();
        assert_eq!(fields.start, Some(now + Duration::minutes(10)));
        assert_eq!(fields.end, Some(now + Duration::minutes(55)));
        assert_eq!(fields.invited.len(), 1);

        let form = CreateForm {
            invite: vec!["nobody".to_string()],
            ..CreateForm::default()
        };
        let err = new_room(&state, form, now).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: no user named 'nobody'");
    }

    #[test]
    fn test_new_room_window_overflow() {
        let state = test_state();
        let form = CreateForm {
            start: Some(TimeSpec::Absolute(DateTime::<Utc>::MAX_UTC)),
            duration: Some(Duration::hours(1)),
            ..CreateForm::default()
        };
        let err = new_room(&state, form, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: time is out of range");
    }
}
