//! Background actors driving the live display.
//!
//! ```text
//! ┌───────────────┐   ()    ┌───────────────┐  lines   ┌────────────┐
//! │ Resize Thread │ ──────▶ │ Refresh Loop  │ ───────▶ │ LiveWriter │
//! └───────────────┘         │               │          └────────────┘
//!                    stop   │               │
//!   Progress::stop ───────▶ │               │
//!                           └───────────────┘
//! ```

pub(crate) mod listener;
mod resize;

pub(crate) use resize::ResizeWatcher;
