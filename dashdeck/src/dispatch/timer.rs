use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Queue `make()` every `period`, first one period from now, until `stop`
/// fires or the queue closes. Late ticks are skipped, not bunched.
pub(super) fn every<A, F>(
    period: Duration,
    make: F,
    queue: mpsc::UnboundedSender<A>,
    stop: CancellationToken,
) where
    A: Send + 'static,
    F: Fn() -> A + Send + 'static,
{
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticks = tokio::time::interval_at(start, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                () = stop.cancelled() => break,
                _ = ticks.tick() => {
                    if queue.send(make()).is_err() {
                        break;
                    }
                }
            }
        }
    });
}
