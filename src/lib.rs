//! # Liveprogress
//!
//! Multiple live-updating progress bars, redrawn in place in the terminal.
//!
//! ## Core Concepts
//!
//! - **Container**: a [`Progress`] owns an ordered set of [`Bar`]s
//! - **Refresh loop**: a background thread redraws every bar once per interval
//! - **In-place redraw**: the [`LiveWriter`] erases the previous block before writing
//! - **Resize tracking**: `SIGWINCH` re-probes the terminal width for every bar
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! # fn main() -> liveprogress::Result<()> {
//! // Use the process-wide default container
//! let bar = liveprogress::add_bar(100);
//! liveprogress::start()?;
//! for _ in 0..100 {
//!     bar.incr();
//!     std::thread::sleep(Duration::from_millis(10));
//! }
//! liveprogress::stop()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod actor;
pub mod error;
pub mod progress;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use error::{Error, LifecycleError, ProbeError, Result};
pub use progress::global::{add_bar, listen, start, stop};
pub use progress::{Progress, ProgressBuilder, ProgressConfig};
pub use terminal::{get_terminal_width, LiveWriter, NativeProbe, SttyProbe, WidthProbe};
pub use widget::Bar;
