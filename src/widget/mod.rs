//! Renderable progress indicators.

mod bar;

pub use bar::{Bar, EMPTY, FILL, HEAD, LEFT_END, RIGHT_END};
