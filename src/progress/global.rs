//! Process-wide default container.
//!
//! The default [`Progress`] is created on first use with
//! [`Progress::new`]. The free functions here forward to it with identical
//! contracts. Code that needs isolation (tests, libraries) should build its
//! own container instead.

use super::Progress;
use crate::error::Result;
use crate::widget::Bar;
use std::sync::{Arc, LazyLock};

static DEFAULT: LazyLock<Progress> = LazyLock::new(Progress::new);

/// The shared default container.
pub fn instance() -> &'static Progress {
    &DEFAULT
}

/// Add a bar to the default container.
pub fn add_bar(total: i64) -> Arc<Bar> {
    DEFAULT.add_bar(total)
}

/// Start redrawing the default container on a background thread.
pub fn start() -> Result<()> {
    DEFAULT.start()
}

/// Stop the default container.
pub fn stop() -> Result<()> {
    DEFAULT.stop()
}

/// Redraw the default container on the calling thread until [`stop`].
pub fn listen() -> Result<()> {
    DEFAULT.listen()
}
