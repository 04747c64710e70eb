//! Authentication view model

use super::Lines;
use crate::state::AppState;
use crate::toast::Toast;

pub(super) async fn login(state: &AppState, email: &str, password: &str) -> Lines {
    let toast = match state.session().login(email, password).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "User logged in");
            Toast::success("Success!", "You have successfully logged in.")
        }
        Err(e) => Toast::failure("Login failed", &e),
    };
    vec![toast.to_string()]
}

pub(super) async fn signup(state: &AppState, username: &str, email: &str, password: &str) -> Lines {
    let toast = match state.session().signup(username, email, password).await {
        Ok(_) => Toast::success("Account created!", "You have successfully signed up."),
        Err(e) => Toast::failure("Signup failed", &e),
    };
    vec![toast.to_string()]
}

pub(super) fn logout(state: &AppState) -> Lines {
    let toast = match state.session().logout() {
        Ok(()) => Toast::success("Logged out", "You have been logged out successfully."),
        Err(e) => Toast::failure("Error", &e),
    };
    vec![toast.to_string()]
}
