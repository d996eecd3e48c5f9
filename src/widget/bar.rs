//! Bar: a single progress indicator.
//!
//! A bar is shared between the container that draws it and the application
//! code that advances it, so its mutable state is atomic and read directly at
//! render time.

use crate::terminal::width::MARGIN;
use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use unicode_width::UnicodeWidthChar;

/// Left end of the bar.
pub const LEFT_END: char = '[';
/// Right end of the bar.
pub const RIGHT_END: char = ']';
/// Filled portion.
pub const FILL: char = '=';
/// Leading edge of the filled portion while incomplete.
pub const HEAD: char = '>';
/// Remaining portion.
pub const EMPTY: char = '-';

/// Width of the trailing `" 100%"` text.
const PERCENT_WIDTH: usize = 5;

/// Widest label that still fits in the decoration margin, with its separator.
#[allow(clippy::cast_sign_loss)]
const MAX_LABEL_WIDTH: usize = MARGIN as usize - PERCENT_WIDTH - 1;

/// A progress bar with an immutable total and a shared current value.
#[derive(Debug)]
pub struct Bar {
    /// Target value.
    total: i64,
    /// Progress so far.
    current: AtomicI64,
    /// Width of the bracketed section, in columns.
    width: AtomicI32,
    /// Text drawn before the bar.
    label: Option<String>,
}

impl Bar {
    /// Create a bar with the given total and display width.
    pub const fn new(total: i64, width: i32) -> Self {
        Self {
            total,
            current: AtomicI64::new(0),
            width: AtomicI32::new(width),
            label: None,
        }
    }

    /// Attach a label drawn in front of the bar.
    ///
    /// Labels wider than the decoration margin allows are truncated.
    #[must_use]
    pub fn with_label(mut self, label: impl AsRef<str>) -> Self {
        self.label = Some(truncate_to_width(label.as_ref(), MAX_LABEL_WIDTH));
        self
    }

    /// Target value.
    pub const fn total(&self) -> i64 {
        self.total
    }

    /// Current value.
    pub fn current(&self) -> i64 {
        self.current.load(Ordering::Relaxed)
    }

    /// Set the current value.
    pub fn set(&self, n: i64) {
        self.current.store(n, Ordering::Relaxed);
    }

    /// Advance the current value by one, returning the new value.
    pub fn incr(&self) -> i64 {
        self.current.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Display width.
    pub fn width(&self) -> i32 {
        self.width.load(Ordering::Relaxed)
    }

    /// Change the display width.
    pub fn set_width(&self, width: i32) {
        self.width.store(width, Ordering::Relaxed);
    }

    /// The label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Percentage complete in `0.0..=100.0`.
    ///
    /// A non-positive total is always 0%.
    #[allow(clippy::cast_precision_loss)]
    pub fn completed_percent(&self) -> f64 {
        if self.total <= 0 {
            return 0.0;
        }
        let current = self.current().clamp(0, self.total);
        current as f64 / self.total as f64 * 100.0
    }

    /// Whether the current value has reached a positive total.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current() >= self.total
    }
}

impl fmt::Display for Bar {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label} ")?;
        }

        let pct = self.completed_percent();
        let inner = usize::try_from(self.width()).unwrap_or(0).saturating_sub(2);
        let filled = ((pct / 100.0) * inner as f64).round() as usize;

        let mut line = String::with_capacity(inner + 2);
        line.push(LEFT_END);
        for i in 0..inner {
            let c = if i + 1 < filled || (i + 1 == filled && filled == inner) {
                FILL
            } else if i + 1 == filled {
                HEAD
            } else {
                EMPTY
            };
            line.push(c);
        }
        line.push(RIGHT_END);

        write!(f, "{line} {:>3}%", pct.round() as u32)
    }
}

fn truncate_to_width(s: &str, max: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= max
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_basic() {
        let bar = Bar::new(100, 12);
        assert_eq!(bar.total(), 100);
        assert_eq!(bar.current(), 0);

        bar.set(50);
        assert_eq!(bar.current(), 50);
        assert_eq!(bar.incr(), 51);
    }

    #[test]
    fn test_render_half() {
        let bar = Bar::new(100, 12);
        bar.set(50);
        assert_eq!(bar.to_string(), "[====>-----]  50%");
    }

    #[test]
    fn test_render_empty_and_full() {
        let bar = Bar::new(10, 7);
        assert_eq!(bar.to_string(), "[-----]   0%");

        bar.set(10);
        assert_eq!(bar.to_string(), "[=====] 100%");
        assert!(bar.is_complete());
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = Bar::new(80, 30);
        let b = Bar::new(80, 30);
        a.set(33);
        b.set(33);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), a.to_string());
    }

    #[test]
    fn test_nonpositive_total() {
        let bar = Bar::new(-5, 8);
        bar.set(3);
        assert!((bar.completed_percent() - 0.0).abs() < f64::EPSILON);
        assert!(!bar.is_complete());
        assert_eq!(bar.to_string(), "[------]   0%");
    }

    #[test]
    fn test_overshoot_clamps() {
        let bar = Bar::new(4, 6);
        bar.set(9);
        assert!((bar.completed_percent() - 100.0).abs() < f64::EPSILON);
        assert_eq!(bar.to_string(), "[====] 100%");
    }

    #[test]
    fn test_zero_and_negative_width() {
        let bar = Bar::new(10, 0);
        bar.set(5);
        assert_eq!(bar.to_string(), "[]  50%");

        bar.set_width(-3);
        assert_eq!(bar.to_string(), "[]  50%");
    }

    #[test]
    fn test_label() {
        let bar = Bar::new(10, 4).with_label("copy");
        assert_eq!(bar.label(), Some("copy"));
        assert_eq!(bar.to_string(), "copy [--]   0%");
    }

    #[test]
    fn test_label_truncated_by_display_width() {
        let bar = Bar::new(1, 2).with_label("日本語のとても長いラベル");
        assert_eq!(bar.label(), Some("日本語のとても"));
    }
}
