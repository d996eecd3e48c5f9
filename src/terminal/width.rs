//! Terminal width discovery.
//!
//! The reported width is the terminal's column count minus [`MARGIN`], the
//! room a bar line needs for its label, brackets and percentage.

use crate::error::ProbeError;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Columns reserved for bar decoration.
pub const MARGIN: i32 = 20;

/// Default byte separating the fields of `stty size` output.
pub const SIZE_TOKEN: u8 = b' ';

/// Controlling terminal device queried by default.
pub const TTY_DEVICE: &str = "/dev/tty";

/// Anything that can report the usable bar width of the terminal.
pub trait WidthProbe: Send + Sync {
    /// Query the terminal and return the usable bar width.
    fn terminal_width(&self) -> Result<i32, ProbeError>;
}

/// Native window-size query (an ioctl on unix).
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProbe;

impl WidthProbe for NativeProbe {
    fn terminal_width(&self) -> Result<i32, ProbeError> {
        let (cols, _rows) = crossterm::terminal::size()?;
        Ok(apply_margin(i32::from(cols)))
    }
}

/// Width query that shells out to `stty size` on the controlling terminal.
#[derive(Debug, Clone)]
pub struct SttyProbe {
    /// Byte that precedes the column field in the command output.
    pub delimiter: u8,
    /// Terminal device handed to `stty`.
    pub device: PathBuf,
}

impl Default for SttyProbe {
    fn default() -> Self {
        Self {
            delimiter: SIZE_TOKEN,
            device: PathBuf::from(TTY_DEVICE),
        }
    }
}

impl SttyProbe {
    /// Query a different terminal device.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.device = device.into();
        self
    }

    /// The flag `stty` takes to name a device on this platform.
    pub const fn device_flag() -> &'static str {
        if cfg!(any(
            target_os = "macos",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            "-f"
        } else if cfg!(target_os = "linux") {
            "-F"
        } else {
            "-f"
        }
    }
}

impl WidthProbe for SttyProbe {
    fn terminal_width(&self) -> Result<i32, ProbeError> {
        let output = Command::new("stty")
            .arg(Self::device_flag())
            .arg(&self.device)
            .arg("size")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|_| ProbeError::ExecFail)?;

        if !output.status.success() {
            return Err(ProbeError::ExecFail);
        }

        Ok(parse_size_output(&output.stdout, self.delimiter))
    }
}

/// Query the terminal width through `stty` with the default delimiter.
pub fn get_terminal_width() -> Result<i32, ProbeError> {
    SttyProbe::default().terminal_width()
}

/// Extract the column count from `stty size` style output.
///
/// The field after the first `delimiter` is parsed (trailing whitespace
/// ignored) and reduced by [`MARGIN`]. A field that does not parse yields 0.
pub fn parse_size_output(out: &[u8], delimiter: u8) -> i32 {
    let start = out
        .iter()
        .position(|&b| b == delimiter)
        .map_or(0, |idx| idx + 1);

    std::str::from_utf8(&out[start..])
        .ok()
        .and_then(|field| field.trim_end().parse::<i32>().ok())
        .map_or(0, apply_margin)
}

fn apply_margin(cols: i32) -> i32 {
    (cols - MARGIN).max(0)
}
