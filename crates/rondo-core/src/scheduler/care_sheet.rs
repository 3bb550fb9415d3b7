//! Fire-and-forget care-sheet generation on stop completion.
//!
//! The document generator is an external collaborator: it is invoked for
//! every `StopCompleted` event, its failures are logged and never block or
//! roll back the round transition that triggered them. Event delivery is
//! at-least-once, so generators must be idempotent.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::RoundEvent;

/// External care-sheet/document generator.
pub trait CareSheetGenerator: Send + Sync {
    /// Produces the care sheet for a completed stop.
    fn generate(&self, round_id: u64, stop_id: u64) -> Result<()>;
}

/// Spawns a worker that drives the generator from the scheduler's event
/// stream.
///
/// The worker runs until the event channel closes (the scheduler is
/// dropped). Lagged receivers skip ahead rather than stalling; missed
/// events are logged.
pub fn spawn_care_sheet_worker(
    mut events: broadcast::Receiver<RoundEvent>,
    generator: Arc<dyn CareSheetGenerator>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(RoundEvent::StopCompleted { round_id, stop_id }) => {
                    if let Err(e) = generator.generate(round_id, stop_id) {
                        warn!("Care-sheet generation for stop {stop_id} of round {round_id} failed: {e}");
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Care-sheet worker lagged, skipped {missed} events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event channel closed, care-sheet worker stopping");
                    break;
                }
            }
        }
    })
}
