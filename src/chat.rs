//! Reading of semicolon-delimited chat exports.
//!
//! The first record is the header. Every later record carries the speaker
//! in field 0 (with a fixed-width tag appended) and the message in field 2.
//! Blank lines are rows with no fields, they are not skipped.

use csv::StringRecord;
use std::collections::VecDeque;
use std::io::{self, Read};

use crate::error::ConvertError;

/// Number of trailing characters stripped from the speaker field.
pub const NAME_SUFFIX_LEN: usize = 5;

const DELIMITER: u8 = b';';
const QUOTE: u8 = b'"';

const NAME_FIELD: usize = 0;
const MESSAGE_FIELD: usize = 2;
const MIN_FIELDS: usize = 3;

#[derive(Debug, PartialEq, Eq)]
pub struct ChatRow<'a> {
    pub name: &'a str,
    pub message: &'a str,
}

impl<'a> ChatRow<'a> {
    fn from_record(row: u64, record: &'a StringRecord) -> Result<Self, ConvertError> {
        if record.len() < MIN_FIELDS {
            return Err(ConvertError::MalformedRow {
                row,
                fields: record.len(),
            });
        }

        Ok(Self {
            name: strip_name_suffix(&record[NAME_FIELD]),
            message: &record[MESSAGE_FIELD],
        })
    }
}

/// Drops the last [`NAME_SUFFIX_LEN`] characters. Shorter values yield an
/// empty name.
pub fn strip_name_suffix(field: &str) -> &str {
    match field.char_indices().rev().nth(NAME_SUFFIX_LEN - 1) {
        Some((at, _)) => &field[..at],
        None => "",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Passes bytes through to the `csv` reader while recording the row numbers
/// of blank lines, which the reader would otherwise drop silently.
struct BlankLineScanner<R> {
    inner: R,
    state: ScanState,
    line_empty: bool,
    rows: u64,
    blank_rows: VecDeque<u64>,
}

impl<R> BlankLineScanner<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            state: ScanState::FieldStart,
            line_empty: true,
            rows: 0,
            blank_rows: VecDeque::new(),
        }
    }

    fn scan(&mut self, byte: u8) {
        match self.state {
            ScanState::Quoted => {
                if byte == QUOTE {
                    self.state = ScanState::QuoteInQuoted;
                }
                return;
            }
            ScanState::QuoteInQuoted if byte == QUOTE => {
                self.state = ScanState::Quoted;
                return;
            }
            ScanState::QuoteInQuoted => self.state = ScanState::Unquoted,
            ScanState::FieldStart | ScanState::Unquoted => {}
        }

        match byte {
            b'\n' => {
                if self.line_empty {
                    self.blank_rows.push_back(self.rows);
                }
                self.rows += 1;
                self.line_empty = true;
                self.state = ScanState::FieldStart;
            }
            b'\r' => {}
            QUOTE if self.state == ScanState::FieldStart => {
                self.state = ScanState::Quoted;
                self.line_empty = false;
            }
            DELIMITER => {
                self.state = ScanState::FieldStart;
                self.line_empty = false;
            }
            _ => {
                self.state = ScanState::Unquoted;
                self.line_empty = false;
            }
        }
    }

    /// Consumes the blank line recorded at `row`, if there is one.
    fn take_blank(&mut self, row: u64) -> bool {
        if self.blank_rows.front() == Some(&row) {
            self.blank_rows.pop_front();
            true
        } else {
            false
        }
    }
}

impl<R: Read> Read for BlankLineScanner<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        for &byte in &buf[..read] {
            self.scan(byte);
        }
        Ok(read)
    }
}

pub struct ChatExport<R> {
    reader: csv::Reader<BlankLineScanner<R>>,
    record: StringRecord,
    lookahead_record: StringRecord,
    lookahead: Option<csv::Result<bool>>,
    rows_read: u64,
}

impl<R: Read> ChatExport<R> {
    /// Starts reading `input` and returns the header row alongside the
    /// reader. The header is `None` for an empty export.
    pub fn open(input: R) -> Result<(Self, Option<Vec<String>>), ConvertError> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .quote(QUOTE)
            .has_headers(false)
            .flexible(true)
            .from_reader(BlankLineScanner::new(input));

        let mut export = Self {
            reader,
            record: StringRecord::new(),
            lookahead_record: StringRecord::new(),
            lookahead: None,
            rows_read: 0,
        };

        let header = export
            .advance()?
            .then(|| export.record.iter().map(str::to_owned).collect());

        Ok((export, header))
    }

    /// Reads the next data row along with its 0-based row number, counting
    /// the header as row 0.
    pub fn next_row(&mut self) -> Result<Option<(u64, ChatRow<'_>)>, ConvertError> {
        if !self.advance()? {
            return Ok(None);
        }

        let row = self.rows_read - 1;
        Ok(Some((row, ChatRow::from_record(row, &self.record)?)))
    }

    fn advance(&mut self) -> Result<bool, ConvertError> {
        let next = match self.lookahead.take() {
            Some(next) => next,
            None => self.reader.read_record(&mut self.lookahead_record),
        };

        // Blank lines ahead of the record just read were consumed with it.
        if self.reader.get_mut().take_blank(self.rows_read) {
            self.lookahead = Some(next);
            self.record.clear();
            self.rows_read += 1;
            return Ok(true);
        }

        let more = next.map_err(|err| ConvertError::from_csv(err, self.rows_read))?;
        if more {
            std::mem::swap(&mut self.record, &mut self.lookahead_record);
            self.rows_read += 1;
        }

        Ok(more)
    }
}
