//! Progress reporter background task

use std::sync::Arc;
use tracing::{debug, info};

use crate::state::{AppState, Phase};

/// Background task that logs phase changes published on the timer update channel
pub async fn progress_reporter_task(state: Arc<AppState>) {
    info!("Starting progress reporter task");

    let mut timer_rx = state.timer_update_tx.subscribe();
    let mut last_seen: Option<(Phase, u32, bool)> = None;

    while timer_rx.changed().await.is_ok() {
        let snapshot = timer_rx.borrow_and_update().clone();
        let seen = (snapshot.phase, snapshot.rounds_completed, snapshot.paused);
        if last_seen == Some(seen) {
            continue;
        }
        last_seen = Some(seen);

        if snapshot.is_active() {
            match &snapshot.round_text {
                Some(round) => info!("{} - {} ({})", snapshot.label, round, snapshot.clock),
                None => info!("{} ({})", snapshot.label, snapshot.clock),
            }
        } else if snapshot.phase == Phase::Done {
            info!("Workout finished: {}/{} rounds", snapshot.rounds_completed, snapshot.rounds_total);
        } else if snapshot.paused {
            info!("Paused in {} with {} left", snapshot.label, snapshot.clock);
        } else {
            debug!("Timer idle in {} ({})", snapshot.label, snapshot.clock);
        }
    }

    debug!("Timer update channel closed, progress reporter exiting");
}
