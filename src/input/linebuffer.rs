//! Accumulates bytes from the transport into `\n`-terminated lines.
//!
//! Bytes are pushed one at a time and a complete line is handed back once
//! a `\n` is seen. `\r` is swallowed rather than included in the line. A
//! line that grows past the buffer length is dropped (the accumulator is
//! reset and the caller gets nothing for it) rather than silently
//! truncated.

use heapless::Vec;

use crate::config::TRANSPORT_LINE_BUFFER_LEN;

pub type Line = heapless::String<{ crate::config::TRANSPORT_MAX_LINE_LEN }>;

pub struct LineBuffer {
    buf: Vec<u8, TRANSPORT_LINE_BUFFER_LEN>,
    overflowed: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte. Returns `Some(line)` when `\n` completes a line that
    /// fit within the buffer; overflowed lines are dropped silently at the
    /// `\n` that would have closed them.
    pub fn push_byte(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' => None,
            b'\n' => {
                let was_overflowed = self.overflowed;
                let bytes = core::mem::take(&mut self.buf);
                self.overflowed = false;
                if was_overflowed {
                    return None;
                }
                core::str::from_utf8(&bytes).ok().and_then(|s| {
                    let mut line = Line::new();
                    line.push_str(s).ok()?;
                    Some(line)
                })
            }
            b => {
                if self.buf.push(b).is_err() {
                    self.overflowed = true;
                }
                None
            }
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
