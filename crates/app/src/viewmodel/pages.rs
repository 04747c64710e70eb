//! Static pages: home, about and help

use chrono::Utc;
use roomloop_core::{RoomFilter, RoomStatus, RoomTag};

use super::rooms::render_card;
use super::Lines;
use crate::state::AppState;

/// Live rooms featured on the home page
const SHOWCASE: usize = 3;

pub(super) async fn home(state: &AppState) -> Lines {
    let user = state.session().current_user();
    let live = state
        .rooms()
        .public_rooms(&RoomFilter::default().with_status(RoomStatus::Live))
        .await;

    let mut lines = vec![
        "== RoomLoop ==".to_string(),
        "Quick rooms for spontaneous connection".to_string(),
        "Create temporary spaces for focused collaboration or casual hangouts. No calendar invites, no hidden links.".to_string(),
    ];
    match &user {
        Some(user) => lines.push(format!(
            "Signed in as {}. Try 'create title=<name>' or 'explore'.",
            user.username
        )),
        None => lines.push("Get started with 'signup <username> <email>' or 'explore'.".to_string()),
    }

    if !live.is_empty() {
        lines.push(format!("-- Live now ({}) --  see all: explore status=live", live.len()));
        let viewer = user.map(|u| u.id);
        let now = Utc::now();
        for room in live.iter().take(SHOWCASE) {
            lines.extend(render_card(room, viewer, now));
        }
    }
    lines
}

pub(super) fn about() -> Lines {
    [
        "== About RoomLoop ==",
        "RoomLoop is a casual, link-free micro-event platform designed for spontaneous connection and collaboration.",
        "Sometimes you want to throw a quick virtual event, a hangout or a focused collab session. You just want a room, a time and a vibe, and people show up.",
        "Rooms are presence-first: they open when their window starts and close when it ends.",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

pub(super) fn help() -> Lines {
    let tags: Vec<&str> = RoomTag::all().iter().map(|t| t.display_name()).collect();
    let mut lines: Lines = [
        "Pages:",
        "  /                         home",
        "  /explore [status=..] [tag=..] [q=..]",
        "                            browse public rooms",
        "  /dashboard [status=..]    your rooms and invitations",
        "  /rooms/<id> | room <id>   room details and chat",
        "  /about",
        "Account:",
        "  login <email> [password]",
        "  signup <username> <email> [password]",
        "  logout",
        "Rooms:",
        "  create title=<text> [desc=..] [type=public|private] [start=+10m|now|<rfc3339>]",
        "         [end=+1h|<rfc3339> | duration=45m] [cap=<n>] [tag=..] [invite=user,user]",
        "  join <id> | leave <id>",
        "  say <id> <message> | react <id> <emoji>",
        "  invite <id> <username>...",
        "  status <id> scheduled|live|closed",
        "  refresh",
        "  quit",
        "Room ids can be shortened to any unique prefix.",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    lines.push(format!("Tags: {}", tags.join(", ")));
    lines
}
