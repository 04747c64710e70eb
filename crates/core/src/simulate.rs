//! Simulated request round-trips
//!
//! There is no backend: every store call pretends to be a network request by
//! sleeping for a configured latency, and can be made to fail at random so
//! the error paths get exercised.

use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::config::{Config, LatencyConfig};
use crate::error::{Error, Result};

/// The request kinds that carry their own latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Fetch,
    Create,
    Join,
    Leave,
    UpdateStatus,
    Refresh,
    Message,
    Reaction,
    Invite,
    Auth,
}

impl Request {
    fn describe(&self) -> &'static str {
        match self {
            Request::Fetch => "fetch rooms",
            Request::Create => "create room",
            Request::Join => "join room",
            Request::Leave => "leave room",
            Request::UpdateStatus => "update room status",
            Request::Refresh => "refresh rooms",
            Request::Message => "send message",
            Request::Reaction => "send reaction",
            Request::Invite => "send invites",
            Request::Auth => "reach the account service",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    latency: LatencyConfig,
    failure_rate: f64,
}

impl Simulator {
    pub fn new(latency: LatencyConfig, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.latency, config.failure_rate)
    }

    /// Zero latency, never fails
    pub fn instant() -> Self {
        Self::new(LatencyConfig::none(), 0.0)
    }

    pub fn latency_for(&self, request: Request) -> Duration {
        let ms = match request {
            Request::Fetch => self.latency.fetch_ms,
            Request::Create => self.latency.create_ms,
            Request::Join => self.latency.join_ms,
            Request::Leave => self.latency.leave_ms,
            Request::UpdateStatus => self.latency.update_ms,
            Request::Refresh => self.latency.refresh_ms,
            Request::Message => self.latency.message_ms,
            Request::Reaction => self.latency.reaction_ms,
            Request::Invite => self.latency.invite_ms,
            Request::Auth => self.latency.auth_ms,
        };
        Duration::from_millis(ms)
    }

    /// Wait out the request latency, then roll for an injected failure
    pub async fn round_trip(&self, request: Request) -> Result<()> {
        let delay = self.latency_for(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failed = self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            warn!(?request, "Injected request failure");
            return Err(Error::Simulated(format!("Failed to {}", request.describe())));
        }

        Ok(())
    }
}
