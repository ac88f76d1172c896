//! Trace document ingestion.
//!
//! Every input path (file, stdin, pasted text) ends in `parse_document`,
//! which accepts either the enveloped form `{version, timestamp, events}`
//! or a bare array of events.

use super::schema::{TraceDocument, TraceEvent};
use crate::utils::config::DOCUMENT_VERSION;
use crate::utils::error::ParseError;
use chrono::Utc;
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Something that can produce a trace document from raw input
pub trait DocumentSource {
    /// Read and parse the whole input
    fn read_document(&mut self) -> Result<TraceDocument, ParseError>;

    /// Human-readable origin, for logs and messages
    fn describe(&self) -> String;
}

/// Trace stored in a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn read_document(&mut self) -> Result<TraceDocument, ParseError> {
        debug!("Reading trace file: {}", self.path.display());
        let bytes = fs::read(&self.path)?;
        parse_document(&bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Trace read from any reader (stdin, sockets in tests, ...)
pub struct ReaderSource<R: Read> {
    reader: R,
    label: String,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R, label: impl Into<String>) -> Self {
        Self {
            reader,
            label: label.into(),
        }
    }
}

impl<R: Read> DocumentSource for ReaderSource<R> {
    fn read_document(&mut self) -> Result<TraceDocument, ParseError> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        parse_document(&bytes)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Trace already held in memory (pasted text)
#[derive(Debug, Clone)]
pub struct BytesSource {
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl DocumentSource for BytesSource {
    fn read_document(&mut self) -> Result<TraceDocument, ParseError> {
        parse_document(&self.bytes)
    }

    fn describe(&self) -> String {
        format!("<pasted text, {} bytes>", self.bytes.len())
    }
}

/// Parse raw bytes into a trace document
///
/// **Public** - main entry point for ingestion
///
/// # Errors
/// * `ParseError::JsonError` - Input is not valid JSON
/// * `ParseError::InvalidFormat` - JSON is neither an envelope nor an event array,
///   or an event does not match the event schema
pub fn parse_document(bytes: &[u8]) -> Result<TraceDocument, ParseError> {
    let raw: Value = serde_json::from_slice(bytes)?;

    let document = match raw {
        Value::Object(envelope) => parse_envelope(envelope)?,
        Value::Array(events) => {
            debug!("Trace is a bare event array, synthesizing envelope");
            TraceDocument {
                version: DOCUMENT_VERSION.to_string(),
                timestamp: Utc::now().to_rfc3339(),
                events: parse_events(events)?,
            }
        }
        _ => {
            return Err(ParseError::InvalidFormat(
                "Trace must be a JSON object or array".to_string(),
            ))
        }
    };

    info!(
        "Loaded trace document v{} with {} events",
        document.version,
        document.events.len()
    );
    Ok(document)
}

const ENVELOPE_FIELDS: [&str; 3] = ["version", "timestamp", "events"];

/// Parse the `{version, timestamp, events}` form
///
/// **Private** - internal helper for parse_document
fn parse_envelope(mut envelope: Map<String, Value>) -> Result<TraceDocument, ParseError> {
    if !ENVELOPE_FIELDS.iter().any(|f| envelope.contains_key(*f)) {
        return Err(ParseError::InvalidFormat(
            "Trace object has none of \"version\", \"timestamp\" or \"events\"".to_string(),
        ));
    }

    let version = string_field(&envelope, "version")?
        .unwrap_or_else(|| DOCUMENT_VERSION.to_string());
    let timestamp = string_field(&envelope, "timestamp")?
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let events = match envelope.remove("events") {
        None | Some(Value::Null) => {
            debug!("Trace envelope has no events");
            Vec::new()
        }
        Some(Value::Array(events)) => parse_events(events)?,
        Some(other) => {
            return Err(ParseError::InvalidFormat(format!(
                "\"events\" must be an array, found {}",
                json_type_name(&other)
            )))
        }
    };

    Ok(TraceDocument {
        version,
        timestamp,
        events,
    })
}

/// Read an optional string field from the envelope
///
/// **Private** - internal helper for parse_envelope
fn string_field(envelope: &Map<String, Value>, field: &str) -> Result<Option<String>, ParseError> {
    match envelope.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ParseError::InvalidFormat(format!(
            "\"{}\" must be a string, found {}",
            field,
            json_type_name(other)
        ))),
    }
}

/// Parse every event; one malformed event rejects the whole document
///
/// **Private** - internal helper for parse_document
fn parse_events(values: Vec<Value>) -> Result<Vec<TraceEvent>, ParseError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<TraceEvent>(value)
                .map_err(|e| ParseError::InvalidFormat(format!("event {}: {}", index, e)))
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
