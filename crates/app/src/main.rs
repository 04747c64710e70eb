//! RoomLoop - time-boxed micro-event rooms
//!
//! A console front end over the room and session stores. Each input line is
//! a page route or an action; status transitions found by the background
//! refresher are announced between commands.

use std::io::Write;
use std::sync::Arc;

use roomloop_core::{spawn_status_refresher, Config, StatusChange};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod state;
mod toast;
mod viewmodel;

use command::{Command, Route};
use state::AppState;
use toast::Toast;

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting RoomLoop");

    let config = match Config::locate().and_then(|path| Config::load(&path)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let app_state = match AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(data_dir = %app_state.data_dir().display(), "Application state ready");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(app_state)) {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}

async fn run(app_state: Arc<AppState>) -> std::io::Result<()> {
    match app_state.session().restore() {
        Ok(Some(user)) => print_lines(&[format!("Welcome back, {}.", user.username)]),
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not restore session: {}", e),
    }

    if let Err(e) = app_state.rooms().fetch().await {
        print_lines(&[Toast::error("Error", format!("Failed to fetch rooms. {}", e)).to_string()]);
    }

    let (changes_tx, changes_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let refresher = spawn_status_refresher(
        app_state.rooms().clone(),
        app_state.config().refresh_interval(),
        Some(changes_tx),
        shutdown_rx,
    );

    print_lines(&viewmodel::navigate(&app_state, Route::Home).await);
    let result = console_loop(&app_state, changes_rx).await;

    let _ = shutdown_tx.send(());
    if let Err(e) = refresher.await {
        tracing::warn!("Status refresher ended abnormally: {}", e);
    }

    tracing::info!("RoomLoop stopped");
    result
}

async fn console_loop(
    state: &AppState,
    mut changes: mpsc::Receiver<StatusChange>,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        print_lines(&viewmodel::dispatch(state, command).await);
                    }
                    Err(e) => print_lines(&[Toast::error("Invalid command", e.to_string()).to_string()]),
                }
                prompt();
            }
            Some(change) = changes.recv() => {
                print_lines(&[viewmodel::render_status_change(&change.title, change.status)]);
                prompt();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    let mut out = std::io::stdout().lock();
    for line in lines {
        let _ = writeln!(out, "{}", line);
    }
}

fn prompt() {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "> ");
    let _ = out.flush();
}
