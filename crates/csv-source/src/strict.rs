//! Strict quote checking for delimited input.
//!
//! The csv parser accepts stray quotes everywhere. When lazy quoting is off,
//! the raw bytes of every record are kept aside while the parser reads them
//! and are checked against the strict rules afterwards:
//!
//! - a quote may only appear in a field that starts with a quote
//! - inside a quoted field a quote is either doubled or closes the field
//! - a closing quote is followed by the separator or the end of the line
//! - a quoted field is closed before the input ends

use std::io::{self, Read};

/// A reader that keeps a copy of the bytes handed to the csv parser until
/// they are released by byte offset.
pub(crate) struct CapturingReader<R> {
    inner: R,
    enabled: bool,
    captured: Vec<u8>,
    /// Absolute offset of `captured[0]` in the input.
    base: u64,
}

impl<R> CapturingReader<R> {
    pub(crate) fn new(inner: R, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            captured: Vec::new(),
            base: 0,
        }
    }

    /// Raw bytes of `[start, end)`. Everything before `end` is dropped.
    pub(crate) fn release(&mut self, start: u64, end: u64) -> Vec<u8> {
        let to = (end.saturating_sub(self.base) as usize).min(self.captured.len());
        let from = (start.saturating_sub(self.base) as usize).min(to);
        let raw = self.captured[from..to].to_vec();
        self.captured.drain(..to);
        self.base += to as u64;
        raw
    }
}

impl<R: Read> Read for CapturingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if self.enabled {
            self.captured.extend_from_slice(&buf[..n]);
        }
        Ok(n)
    }
}

/// A strict quoting violation, `lines_in` lines after the start of the raw
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuoteViolation {
    pub lines_in: u64,
    pub message: &'static str,
}

#[derive(Clone, Copy)]
enum State {
    LineStart,
    Comment,
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Check one raw record, which may be preceded by blank and comment lines.
pub(crate) fn check_quotes(
    raw: &[u8],
    separator: u8,
    comment: Option<u8>,
) -> Result<(), QuoteViolation> {
    let mut state = State::LineStart;
    let mut lines_in = 0;

    for &b in raw {
        let violation = |message| QuoteViolation { lines_in, message };
        state = match state {
            State::LineStart if Some(b) == comment => State::Comment,
            State::LineStart | State::FieldStart => match b {
                b'"' => State::Quoted,
                b'\r' | b'\n' => State::LineStart,
                _ if b == separator => State::FieldStart,
                _ => State::Unquoted,
            },
            State::Comment => match b {
                b'\n' => State::LineStart,
                _ => State::Comment,
            },
            State::Unquoted => match b {
                b'"' => return Err(violation("bare \" in non-quoted field")),
                b'\r' | b'\n' => State::LineStart,
                _ if b == separator => State::FieldStart,
                _ => State::Unquoted,
            },
            State::Quoted => match b {
                b'"' => State::QuoteInQuoted,
                _ => State::Quoted,
            },
            State::QuoteInQuoted => match b {
                b'"' => State::Quoted,
                b'\r' | b'\n' => State::LineStart,
                _ if b == separator => State::FieldStart,
                _ => return Err(violation("extraneous \" in quoted field")),
            },
        };
        if b == b'\n' {
            lines_in += 1;
        }
    }

    match state {
        State::Quoted => Err(QuoteViolation {
            lines_in,
            message: "quoted field is not closed",
        }),
        _ => Ok(()),
    }
}
