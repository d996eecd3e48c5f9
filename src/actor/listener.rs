//! Refresh Loop: Redraws the bars until told to stop.
//!
//! Three sources are multiplexed, in strict priority order:
//!
//! 1. **Stop**: the stop channel disconnects when the container is stopped.
//! 2. **Resize**: a pending terminal resize re-probes the width.
//! 3. **Timer**: once the refresh interval passes quietly, redraw.
//!
//! Stop and resize are polled before every wait, so a stop is never delayed
//! by a queued resize and a resize is never delayed by a redraw.

use crate::progress::Shared;
use crossbeam_channel::{never, select, Receiver, TryRecvError};
use tracing::{debug, trace};

/// Run the refresh loop on the current thread until `stop` fires.
///
/// `stop` fires either by receiving a message or by disconnecting.
pub(crate) fn run(shared: &Shared, stop: &Receiver<()>, resize: Receiver<()>) {
    let interval = shared.refresh_interval();
    let mut resize = resize;
    let mut resize_pending = false;
    let mut ticks = 0u64;

    debug!(?interval, "refresh loop started");

    loop {
        match stop.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        if !resize_pending {
            match resize.try_recv() {
                Ok(()) => resize_pending = true,
                // Subscription gone; nothing will ever arrive again.
                Err(TryRecvError::Disconnected) => resize = never(),
                Err(TryRecvError::Empty) => {}
            }
        }

        if resize_pending {
            resize_pending = false;
            shared.change_width();
            continue;
        }

        select! {
            recv(stop) -> _ => break,
            recv(resize) -> msg => match msg {
                Ok(()) => resize_pending = true,
                Err(_) => resize = never(),
            },
            default(interval) => {
                shared.render();
                ticks += 1;
                trace!(ticks, "rendered");
            },
        }
    }

    debug!(ticks, "refresh loop stopped");
}
