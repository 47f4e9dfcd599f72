use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::Error;

/// Remembers where the parser is and what it has seen last, so a fatal error
/// can point at the offending input.
pub(crate) struct ErrorContext {
    ring: Vec<u8>,
    written: usize,
    row: usize,
    col: usize,
}

impl ErrorContext {
    pub(crate) fn new(capacity: usize) -> Self {
        ErrorContext {
            ring: vec![0; capacity],
            written: 0,
            row: 0,
            col: 0,
        }
    }

    pub(crate) fn record(&mut self, byte: u8) {
        if !self.ring.is_empty() {
            let len = self.ring.len();
            self.ring[self.written % len] = byte;
        }
        self.written += 1;
    }

    /// Moves the position past `byte`.
    pub(crate) fn advance(&mut self, byte: u8) {
        if byte == b'\n' {
            self.row += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }

    /// The most recent input in chronological order with `\r`, `\n` and `\t`
    /// escaped.
    pub(crate) fn snippet(&self) -> String {
        let len = self.ring.len();
        let (head, tail) = if self.written < len {
            (&self.ring[..self.written], &[][..])
        } else {
            let offset = self.written % len.max(1);
            (&self.ring[offset..], &self.ring[..offset])
        };

        let mut out = Vec::with_capacity(len + 8);
        for &byte in head.iter().chain(tail) {
            match byte {
                b'\r' => out.extend_from_slice(b"\\r"),
                b'\n' => out.extend_from_slice(b"\\n"),
                b'\t' => out.extend_from_slice(b"\\t"),
                _ => out.push(byte),
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    pub(crate) fn report(&self, cause: Error) -> ParseError {
        let (row, col) = (self.row + 1, self.col + 1);
        let message = format!(
            "{cause} (occurred at row({row}), col({col}) : {})",
            self.snippet()
        );
        ParseError {
            cause,
            row,
            col,
            message,
        }
    }
}

/// A fatal error latched by the parser.
///
/// Displays as the cause followed by the 1-based position and the last few
/// bytes of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    cause: Error,
    row: usize,
    col: usize,
    message: String,
}

impl ParseError {
    pub fn cause(&self) -> &Error {
        &self.cause
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.cause)
    }
}
