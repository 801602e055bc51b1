//! Structured data extraction from prontuário text.
//!
//! - [`FieldParser`]: first-match labeled rules for demographics and the
//!   procedure and vaccine lists
//! - [`EntityRecognizer`]: the recognizer seam, with [`LexiconRecognizer`]
//!   and, behind the `onnx-ner` feature, `OnnxRecognizer`
//! - [`EntityFilter`]: stoplists and order-preserving de-duplication

mod error;
mod fields;
mod filter;
mod recognizer;

// === Error Types ===
pub use error::{Field, FieldError, RecognizerError};

// === Field Parsing ===
pub use fields::{FieldParser, FieldSettings, ParsedFields};

// === Entity Filtering ===
pub use filter::{EntityFilter, FilterSettings, dedupe_preserving_order};

// === Recognizers ===
#[cfg(feature = "onnx-ner")]
pub use recognizer::OnnxRecognizer;
pub use recognizer::{EntityRecognizer, LexiconRecognizer, validate_spans};
