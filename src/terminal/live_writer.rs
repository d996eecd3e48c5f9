//! `LiveWriter`: In-place redraw of a block of lines.
//!
//! Lines written between two flushes form one block. Each flush erases the
//! block written by the previous flush and writes the new one, so the
//! terminal always shows a single, current block.

use crossterm::{
    cursor::MoveUp,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Writer that redraws its output in place on every flush.
pub struct LiveWriter<W: Write> {
    /// Underlying stream.
    out: W,
    /// Pending block.
    buf: Vec<u8>,
    /// Assembled erase + block, written in one call.
    frame: Vec<u8>,
    /// Lines written by the last flush.
    line_count: usize,
}

impl<W: Write> LiveWriter<W> {
    /// Wrap an output stream.
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(1024),
            frame: Vec::with_capacity(1024),
            line_count: 0,
        }
    }

    /// Number of lines currently on screen from the last flush.
    #[inline]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    /// Bytes waiting for the next flush.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Get a reference to the underlying stream.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwrap the underlying stream, discarding anything not yet flushed.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Erase the previous block and write the pending one.
    ///
    /// Does nothing when no lines are pending.
    fn redraw(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }

        self.frame.clear();
        for _ in 0..self.line_count {
            queue!(self.frame, MoveUp(1), Clear(ClearType::CurrentLine))?;
        }
        self.frame.extend_from_slice(&self.buf);

        self.out.write_all(&self.frame)?;
        self.out.flush()?;

        self.line_count = bytecount_newlines(&self.buf);
        self.buf.clear();
        Ok(())
    }
}

impl<W: Write> Write for LiveWriter<W> {
    #[inline]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.redraw()
    }
}

fn bytecount_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}
