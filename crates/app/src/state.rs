//! Application state management

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use roomloop_core::seed::{mock_rooms, mock_users};
use roomloop_core::{
    Config, FileSession, Result, RoomService, RoomStore, SessionPersistence, SessionStore,
    Simulator,
};

/// Main application state
pub struct AppState {
    config: Config,
    data_dir: PathBuf,
    rooms: RoomService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = config.data_dir()?;
        std::fs::create_dir_all(&data_dir)?;

        let persistence = Arc::new(FileSession::in_dir(&data_dir));
        Ok(Self::with_persistence(config, data_dir, persistence))
    }

    pub fn with_persistence(
        config: Config,
        data_dir: PathBuf,
        persistence: Arc<dyn SessionPersistence>,
    ) -> Self {
        let simulator = Simulator::from_config(&config);

        let (users, rooms) = if config.seed_mock_data {
            let users = mock_users();
            let rooms = mock_rooms(&users, Utc::now());
            (users, rooms)
        } else {
            (Vec::new(), Vec::new())
        };
        tracing::debug!(users = users.len(), rooms = rooms.len(), "Seeded state");

        let session = SessionStore::new(users, persistence, simulator);
        let rooms = RoomService::new(RoomStore::with_rooms(rooms), session, simulator);

        Self {
            config,
            data_dir,
            rooms,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn rooms(&self) -> &RoomService {
        &self.rooms
    }

    pub fn session(&self) -> &SessionStore {
        self.rooms.session()
    }
}
