//! Chat view model

use super::rooms::{lookup, render_message};
use super::Lines;
use crate::state::AppState;
use crate::toast::Toast;

pub(super) async fn say(state: &AppState, reference: &str, text: &str) -> Lines {
    let result = match lookup(state, reference).await {
        Ok(room) => state.rooms().send_message(room.id, text).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(Some(message)) => vec![render_message(&message)],
        // Blank input is dropped without a round-trip
        Ok(None) => Vec::new(),
        Err(e) => vec![Toast::failure("Error", &e).to_string()],
    }
}

pub(super) async fn react(state: &AppState, reference: &str, emoji: &str) -> Lines {
    let result = match lookup(state, reference).await {
        Ok(room) => state.rooms().send_reaction(room.id, emoji).await,
        Err(e) => Err(e),
    };

    let toast = match result {
        Ok(reaction) => Toast::success(
            format!("{} Reaction sent!", reaction.emoji),
            "Your reaction has been shared with the room.",
        ),
        Err(e) => Toast::failure("Error", &e),
    };
    vec![toast.to_string()]
}
