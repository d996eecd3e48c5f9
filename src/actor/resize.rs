//! Resize Watcher: Forwards terminal resize signals onto a channel.
//!
//! On unix a dedicated thread waits for `SIGWINCH` and posts a notification
//! into a one-slot channel, so a burst of resizes collapses into a single
//! pending notification. Elsewhere the channel never fires.

use crossbeam_channel::Receiver;
use std::io;
#[cfg(unix)]
use std::thread::{self, JoinHandle};

#[cfg(unix)]
use signal_hook::{consts::SIGWINCH, iterator::Signals};

/// Subscription to terminal resize notifications.
pub(crate) struct ResizeWatcher {
    /// Notifications, one per (coalesced) resize.
    rx: Receiver<()>,
    /// Handle used to stop the signal iterator.
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    /// Forwarding thread.
    #[cfg(unix)]
    thread: Option<JoinHandle<()>>,
}

impl ResizeWatcher {
    /// Register for resize notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handler cannot be registered or the
    /// forwarding thread cannot be spawned.
    #[cfg(unix)]
    pub(crate) fn subscribe() -> io::Result<Self> {
        let mut signals = Signals::new([SIGWINCH])?;
        let handle = signals.handle();
        let (tx, rx) = crossbeam_channel::bounded(1);

        let thread = thread::Builder::new()
            .name("liveprogress-resize".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    // A notification is already pending; that one covers this resize.
                    let _ = tx.try_send(());
                }
            });

        let thread = match thread {
            Ok(thread) => thread,
            Err(e) => {
                handle.close();
                return Err(e);
            }
        };

        Ok(Self {
            rx,
            handle,
            thread: Some(thread),
        })
    }

    /// Register for resize notifications (inert on this platform).
    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    pub(crate) fn subscribe() -> io::Result<Self> {
        Ok(Self {
            rx: crossbeam_channel::never(),
        })
    }

    /// Get a reference to the notification receiver.
    #[inline]
    pub(crate) const fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }

    /// Unregister and let the forwarding thread exit.
    #[cfg(unix)]
    pub(crate) fn close(mut self) {
        self.handle.close();
        // The thread exits as soon as the iterator observes the close.
        drop(self.thread.take());
    }

    /// Unregister (nothing to do on this platform).
    #[cfg(not(unix))]
    pub(crate) fn close(self) {}
}

#[cfg(unix)]
impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.close();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sigwinch_is_forwarded() {
        let watcher = ResizeWatcher::subscribe().unwrap();
        signal_hook::low_level::raise(SIGWINCH).unwrap();

        let got = watcher.receiver().recv_timeout(Duration::from_secs(2));
        assert!(got.is_ok());
        watcher.close();
    }

    #[test]
    fn test_close_disconnects_receiver() {
        let watcher = ResizeWatcher::subscribe().unwrap();
        let rx = watcher.receiver().clone();
        watcher.close();

        // Forwarding thread drops its sender once the iterator ends.
        let mut disconnected = false;
        for _ in 0..200 {
            match rx.recv_timeout(Duration::from_millis(10)) {
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                    disconnected = true;
                    break;
                }
                _ => continue,
            }
        }
        assert!(disconnected);
    }
}
