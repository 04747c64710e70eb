//! Periodic status refresh
//!
//! The only recurring background activity: every interval the store
//! re-derives each Room's status from the clock. Transitions are forwarded
//! to an optional channel so the front end can announce them.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{RoomService, StatusChange};

/// Spawn the refresher on the current runtime. It stops when `shutdown`
/// fires or its sender is dropped.
pub fn spawn_status_refresher(
    service: RoomService,
    period: Duration,
    changes: Option<mpsc::Sender<StatusChange>>,
    shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(refresh_task(service, period, changes, shutdown))
}

async fn refresh_task(
    service: RoomService,
    period: Duration,
    changes: Option<mpsc::Sender<StatusChange>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!(period_secs = period.as_secs(), "Status refresher started");

    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                let changed = service.refresh_now().await;
                debug!(changed = changed.len(), "Status refresh tick");

                if let Some(tx) = &changes {
                    for change in changed {
                        if tx.send(change).await.is_err() {
                            debug!("Status change receiver dropped");
                            break;
                        }
                    }
                }
            }
            _ = shutdown.recv() => {
                debug!("Status refresher shutting down");
                break;
            }
        }
    }
}
