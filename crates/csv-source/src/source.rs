//! Streaming delimited record source.

use csv::StringRecord;
use ingest_core::{ConfigError, Header, RawRecord, SourceReadError};
use crate::strict::{check_quotes, CapturingReader};
use std::io::Read;
use tracing::debug;

/// Parser settings for delimited input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedOptions {
    /// Field separator (default: ',')
    pub separator: u8,
    /// Lines starting with this byte are skipped (default: '#')
    pub comment: Option<u8>,
    /// Accept quotes that do not follow strict escaping rules (default: true).
    /// When off, a stray quote ends the stream with a read error.
    pub lazy_quotes: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            comment: Some(b'#'),
            lazy_quotes: true,
        }
    }
}

impl DelimitedOptions {
    /// Build options from command-line characters, which must be ASCII.
    pub fn from_chars(separator: char, comment: char, lazy_quotes: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            separator: ascii_byte("separator", separator)?,
            comment: Some(ascii_byte("comment", comment)?),
            lazy_quotes,
        })
    }
}

fn ascii_byte(flag: &'static str, value: char) -> Result<u8, ConfigError> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(ConfigError::NotAsciiChar { flag, value })
    }
}

/// Lazy, single-pass sequence of delimited rows.
///
/// Call [`DelimitedSource::read_header`] once before iterating; the header row
/// is consumed there and never yielded as a record. Iteration ends at
/// end-of-input or after the first read error.
///
/// Reads from the underlying reader are blocking; the binary drives the
/// pipeline on a current-thread runtime.
pub struct DelimitedSource<R: Read> {
    reader: csv::Reader<CapturingReader<R>>,
    record: StringRecord,
    strict: Option<StrictQuotes>,
    finished: bool,
}

#[derive(Debug, Clone, Copy)]
struct StrictQuotes {
    separator: u8,
    comment: Option<u8>,
}

impl<R: Read> DelimitedSource<R> {
    pub fn new(reader: R, options: &DelimitedOptions) -> Self {
        let strict = (!options.lazy_quotes).then_some(StrictQuotes {
            separator: options.separator,
            comment: options.comment,
        });

        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.separator)
            .comment(options.comment)
            .from_reader(CapturingReader::new(reader, strict.is_some()));

        Self {
            reader,
            record: StringRecord::new(),
            strict,
            finished: false,
        }
    }

    /// Consume the first row as the header.
    ///
    /// Returns `Ok(None)` for input with no rows at all.
    pub fn read_header(&mut self) -> Result<Option<Header>, SourceReadError> {
        match self.next_row() {
            Ok(true) => {
                let header: Header = self.record.iter().collect();
                debug!("Delimited header: {:?}", header.names());
                Ok(Some(header))
            }
            Ok(false) => {
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }

    fn next_row(&mut self) -> Result<bool, SourceReadError> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(read_error)?;
        if more {
            if let Some(strict) = self.strict {
                self.check_quotes(strict)?;
            }
        }
        Ok(more)
    }

    fn check_quotes(&mut self, strict: StrictQuotes) -> Result<(), SourceReadError> {
        let (start, line) = self
            .record
            .position()
            .map(|p| (p.byte(), p.line()))
            .unwrap_or((0, 1));
        let end = self.reader.position().byte();
        let raw = self.reader.get_mut().release(start, end);

        check_quotes(&raw, strict.separator, strict.comment).map_err(|v| {
            SourceReadError::Malformed {
                line: line + v.lines_in,
                message: v.message.to_string(),
            }
        })
    }
}

impl<R: Read> Iterator for DelimitedSource<R> {
    type Item = Result<RawRecord, SourceReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_row() {
            Ok(true) => Some(Ok(RawRecord::OrderedFields(
                self.record.iter().map(String::from).collect(),
            ))),
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn read_error(e: csv::Error) -> SourceReadError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    let message = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(io) => SourceReadError::Io(io),
        _ => SourceReadError::Malformed { line, message },
    }
}
