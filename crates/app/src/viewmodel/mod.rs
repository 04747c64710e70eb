//! Console view models
//!
//! Every command becomes a list of printable lines: page content, toasts,
//! or both.

mod auth;
mod chat;
mod pages;
mod rooms;

use crate::command::{Command, Route};
use crate::state::AppState;

pub use rooms::render_status_change;

pub type Lines = Vec<String>;

pub async fn dispatch(state: &AppState, command: Command) -> Lines {
    match command {
        Command::Help => pages::help(),
        Command::Quit => Vec::new(),
        Command::Go(route) => navigate(state, route).await,
        Command::Create(form) => rooms::create(state, form).await,
        Command::Login { email, password } => auth::login(state, &email, &password).await,
        Command::Signup {
            username,
            email,
            password,
        } => auth::signup(state, &username, &email, &password).await,
        Command::Logout => auth::logout(state),
        Command::Join(room) => rooms::join(state, &room).await,
        Command::Leave(room) => rooms::leave(state, &room).await,
        Command::Say { room, text } => chat::say(state, &room, &text).await,
        Command::React { room, emoji } => chat::react(state, &room, &emoji).await,
        Command::Invite { room, usernames } => rooms::invite(state, &room, &usernames).await,
        Command::SetStatus { room, status } => rooms::set_status(state, &room, status).await,
        Command::Refresh => rooms::refresh(state).await,
    }
}

pub async fn navigate(state: &AppState, route: Route) -> Lines {
    match route {
        Route::Home => pages::home(state).await,
        Route::About => pages::about(),
        Route::Explore(filter) => rooms::explore(state, &filter).await,
        Route::Dashboard(status) => rooms::dashboard(state, status).await,
        Route::Room(reference) => rooms::detail(state, &reference).await,
    }
}
