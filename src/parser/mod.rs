//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Reading raw trace bytes from files, stdin or memory
//! - Validating the document / event-array shape
//! - Defining the event and value schema

pub mod document;
pub mod schema;
pub mod value;

// Re-export main types
pub use document::{parse_document, BytesSource, DocumentSource, FileSource, ReaderSource};
pub use schema::{EventKind, ParamKind, Parameter, TraceDocument, TraceEvent};
pub use value::TraceValue;
