//! Gazetteer-based recognizer.
//!
//! Terms and text are split into tokens: runs of alphanumeric characters,
//! and single punctuation characters. Whitespace only separates tokens, so a
//! term still matches when the PDF wrapped it across lines. Matching is
//! case-insensitive and longest-first, and the emitted span is the original
//! text from the first to the last matched token.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info};

use prontuario_model::{EntityCategory, RecognizedEntity};

use super::EntityRecognizer;
use crate::error::RecognizerError;

const BUILTIN_LEXICON: &str = include_str!("../../lexicon/default.csv");

#[derive(Debug, Deserialize)]
struct LexiconRow {
    term: String,
    category: String,
}

#[derive(Debug, Clone)]
pub struct LexiconRecognizer {
    source_name: String,
    terms: HashMap<Vec<String>, EntityCategory>,
    max_tokens: usize,
}

impl LexiconRecognizer {
    /// The lexicon bundled with the crate.
    pub fn builtin() -> Result<Self, RecognizerError> {
        Self::from_reader(BUILTIN_LEXICON.as_bytes(), "builtin")
    }

    /// Load a `term,category` CSV file.
    pub fn from_path(path: &Path) -> Result<Self, RecognizerError> {
        if !path.is_file() {
            return Err(RecognizerError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| RecognizerError::Lexicon {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(file, &path.display().to_string())
    }

    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, RecognizerError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in reader.deserialize::<LexiconRow>() {
            let row = record.map_err(|e| RecognizerError::Lexicon {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
            entries.push((row.term, EntityCategory::from_label(&row.category)));
        }
        Self::from_entries(source_name, entries)
    }

    /// Build from `(term, category)` pairs. The first definition of a term
    /// wins; terms are compared case-insensitively.
    pub fn from_entries<I, S>(source_name: &str, entries: I) -> Result<Self, RecognizerError>
    where
        I: IntoIterator<Item = (S, EntityCategory)>,
        S: AsRef<str>,
    {
        let mut terms = HashMap::new();
        let mut max_tokens = 0;
        for (term, category) in entries {
            let key = term_key(term.as_ref());
            if key.is_empty() {
                continue;
            }
            let len = key.len();
            match terms.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(category);
                    max_tokens = max_tokens.max(len);
                }
                Entry::Occupied(existing) => {
                    if *existing.get() != category {
                        debug!(
                            term = term.as_ref(),
                            kept = %existing.get(),
                            ignored = %category,
                            "duplicate lexicon term"
                        );
                    }
                }
            }
        }

        if terms.is_empty() {
            return Err(RecognizerError::Lexicon {
                source_name: source_name.to_string(),
                message: "lexicon has no terms".to_string(),
            });
        }

        info!(
            lexicon = source_name,
            term_count = terms.len(),
            "lexicon loaded"
        );
        Ok(Self {
            source_name: source_name.to_string(),
            terms,
            max_tokens,
        })
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

impl EntityRecognizer for LexiconRecognizer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        let tokens = tokenize(text);
        let lowered: Vec<String> = tokens
            .iter()
            .map(|&(start, end)| text[start..end].to_lowercase())
            .collect();

        let mut entities = Vec::new();
        let mut idx = 0;
        while idx < tokens.len() {
            let longest = self.max_tokens.min(tokens.len() - idx);
            let found = (1..=longest).rev().find_map(|len| {
                self.terms
                    .get(&lowered[idx..idx + len])
                    .map(|category| (len, category))
            });
            match found {
                Some((len, category)) => {
                    let start = tokens[idx].0;
                    let end = tokens[idx + len - 1].1;
                    entities.push(RecognizedEntity::new(&text[start..end], category.clone()));
                    idx += len;
                }
                None => idx += 1,
            }
        }
        Ok(entities)
    }
}

fn term_key(term: &str) -> Vec<String> {
    tokenize(term)
        .into_iter()
        .map(|(start, end)| term[start..end].to_lowercase())
        .collect()
}

/// Byte ranges of word and punctuation tokens.
fn tokenize(text: &str) -> Vec<(usize, usize)> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() {
            if word_start.is_none() {
                word_start = Some(idx);
            }
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push((start, idx));
        }
        if !ch.is_whitespace() {
            tokens.push((idx, idx + ch.len_utf8()));
        }
    }
    if let Some(start) = word_start {
        tokens.push((start, text.len()));
    }
    tokens
}
