//! Reader and field extraction for newline-delimited JSON files.
//!
//! Files are read line by line so that memory use is bounded by the longest
//! line, not the file size. Gzip-compressed files (`.gz`) are decoded on the fly.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde_json::Value;
use thiserror::Error;

use crate::core::config::strip_gzip_suffix;
use crate::core::resource::{PatientResource, ResourceHeader};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Check if the path is a gzipped file
pub fn is_gzipped(path: &Path) -> bool {
    strip_gzip_suffix(&path.to_string_lossy()).is_some()
}

/// Open a record file for sequential line reading.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened.
pub fn open_lines(path: &Path) -> io::Result<NdjsonLines<Box<dyn BufRead>>> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if is_gzipped(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(NdjsonLines::new(reader))
}

/// Iterator over the non-blank lines of an NDJSON stream.
///
/// Yields `(line_number, text)` pairs with 1-based line numbers. Invalid
/// UTF-8 is replaced rather than treated as an error, so a single bad byte
/// cannot hide the rest of a file. After the first I/O error the iterator
/// is exhausted.
pub struct NdjsonLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
    failed: bool,
}

impl<R: BufRead> NdjsonLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for NdjsonLines<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let text = String::from_utf8_lossy(&self.buf);
                    let text = text.trim_end_matches(['\n', '\r']);
                    if text.trim().is_empty() {
                        continue;
                    }
                    return Some(Ok((self.line_number, text.to_string())));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Parse the `resourceType` and `id` of a record line.
///
/// Fields of an unexpected shape are treated as absent rather than failing
/// the whole line.
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` if the line is not valid JSON, or
/// `ParseError::NotAnObject` if it is valid JSON but not an object.
pub fn parse_resource_header(line: &str) -> Result<ResourceHeader, ParseError> {
    parse_resource_value(line).map(|value| ResourceHeader::from_value(&value))
}

/// Parse a record line into a generic JSON value
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` if the line is not valid JSON, or
/// `ParseError::NotAnObject` if the top-level value is not an object.
pub fn parse_resource_value(line: &str) -> Result<Value, ParseError> {
    let value: Value = serde_json::from_str(line)?;
    match value {
        Value::Object(_) => Ok(value),
        Value::Array(_) => Err(ParseError::NotAnObject("an array")),
        Value::String(_) => Err(ParseError::NotAnObject("a string")),
        Value::Number(_) => Err(ParseError::NotAnObject("a number")),
        Value::Bool(_) => Err(ParseError::NotAnObject("a boolean")),
        Value::Null => Err(ParseError::NotAnObject("null")),
    }
}

/// Parse a line of the identity file
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` if the line is not a JSON object with
/// the expected `id`/`name` shapes.
pub fn parse_patient(line: &str) -> Result<PatientResource, ParseError> {
    Ok(serde_json::from_str(line)?)
}
