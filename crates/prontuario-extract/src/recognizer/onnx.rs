//! Token-classification recognizer backed by ONNX Runtime.
//!
//! Expects a BIO-tagged biomedical NER model (for example a BC5CDR
//! fine-tune) exported to ONNX. The model directory must contain:
//! - `model.onnx` taking `input_ids`, `attention_mask`, `token_type_ids`
//!   and producing logits shaped `[1, seq_len, num_labels]`
//! - `tokenizer.json`: the HuggingFace tokenizer definition
//! - `config.json` with an `id2label` map

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use serde::Deserialize;
use tracing::{debug, info};

use prontuario_model::{EntityCategory, RecognizedEntity};

use super::EntityRecognizer;
use crate::error::RecognizerError;

#[derive(Debug, Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

/// Span found inside one chunk, in chunk byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TaggedSpan {
    start: usize,
    end: usize,
    label: String,
}

/// Uses a Mutex because `Session::run` requires `&mut self` while
/// [`EntityRecognizer`] exposes `&self`.
pub struct OnnxRecognizer {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    labels: Vec<String>,
    max_chunk_chars: usize,
}

impl OnnxRecognizer {
    /// Load the model once; the recognizer is then reused for every document.
    pub fn load(model_dir: &Path, max_chunk_chars: usize) -> Result<Self, RecognizerError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");

        for path in [&model_path, &tokenizer_path, &config_path] {
            if !path.exists() {
                return Err(RecognizerError::ModelNotFound { path: path.clone() });
            }
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| RecognizerError::ModelInit {
                message: e.to_string(),
            })?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| RecognizerError::ModelInit {
                message: e.to_string(),
            })?
            .commit_from_file(&model_path)
            .map_err(|e: ort::Error| RecognizerError::ModelInit {
                message: format!("ONNX load failed: {e}"),
            })?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            RecognizerError::ModelInit {
                message: format!("Tokenizer load failed: {e}"),
            }
        })?;

        let config_text =
            std::fs::read_to_string(&config_path).map_err(|e| RecognizerError::ModelInit {
                message: format!("read {}: {e}", config_path.display()),
            })?;
        let config: ModelConfig =
            serde_json::from_str(&config_text).map_err(|e| RecognizerError::ModelInit {
                message: format!("parse {}: {e}", config_path.display()),
            })?;
        let labels = labels_by_id(&config.id2label)?;

        info!(
            model_dir = %model_dir.display(),
            label_count = labels.len(),
            "ONNX recognizer loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            max_chunk_chars: max_chunk_chars.max(1),
        })
    }

    /// Tag one chunk and merge BIO tags into spans.
    fn infer(&self, chunk: &str) -> Result<Vec<TaggedSpan>, RecognizerError> {
        use ort::value::TensorRef;

        let inference = |message: String| RecognizerError::Inference { message };

        let encoding = self
            .tokenizer
            .encode(chunk, true)
            .map_err(|e| inference(format!("tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| i64::from(m))
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| i64::from(t))
            .collect();
        let seq_len = input_ids.len();
        if seq_len == 0 {
            return Ok(Vec::new());
        }

        let ids_array = ndarray::Array2::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| inference(e.to_string()))?;
        let mask_array = ndarray::Array2::from_shape_vec((1, seq_len), attention_mask)
            .map_err(|e| inference(e.to_string()))?;
        let type_array = ndarray::Array2::from_shape_vec((1, seq_len), token_type_ids)
            .map_err(|e| inference(e.to_string()))?;

        let ids_tensor =
            TensorRef::from_array_view(&ids_array).map_err(|e| inference(e.to_string()))?;
        let mask_tensor =
            TensorRef::from_array_view(&mask_array).map_err(|e| inference(e.to_string()))?;
        let type_tensor =
            TensorRef::from_array_view(&type_array).map_err(|e| inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| inference("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor, type_tensor])
            .map_err(|e| inference(format!("ONNX inference failed: {e}")))?;

        let (shape, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| inference(format!("output extraction: {e}")))?;

        let num_labels = self.labels.len();
        if shape.len() != 3 || shape[1] as usize != seq_len || shape[2] as usize != num_labels {
            return Err(inference(format!(
                "unexpected output shape {shape:?}, expected [1, {seq_len}, {num_labels}]"
            )));
        }

        let special = encoding.get_special_tokens_mask();
        let tags: Vec<Option<&str>> = (0..seq_len)
            .map(|token| {
                if special.get(token).copied().unwrap_or(0) == 1 {
                    return None;
                }
                let row = &logits[token * num_labels..(token + 1) * num_labels];
                argmax(row).map(|label| self.labels[label].as_str())
            })
            .collect();

        let (word_tags, word_offsets) =
            group_subwords(&tags, encoding.get_word_ids(), encoding.get_offsets());
        Ok(merge_bio(&word_tags, &word_offsets))
    }
}

impl EntityRecognizer for OnnxRecognizer {
    fn name(&self) -> &str {
        "onnx"
    }

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        let mut entities = Vec::new();
        for (offset, chunk) in line_chunks(text, self.max_chunk_chars) {
            if chunk.trim().is_empty() {
                continue;
            }
            let spans = self.infer(chunk)?;
            debug!(
                chunk_offset = offset,
                span_count = spans.len(),
                "chunk tagged"
            );
            for span in spans {
                let surface = text.get(offset + span.start..offset + span.end).ok_or_else(|| {
                    RecognizerError::MalformedSpan {
                        recognizer: self.name().to_string(),
                        reason: format!(
                            "offsets {}..{} are not a valid text range",
                            offset + span.start,
                            offset + span.end
                        ),
                    }
                })?;
                entities.push(RecognizedEntity::new(
                    surface,
                    EntityCategory::from_label(&span.label),
                ));
            }
        }
        Ok(entities)
    }
}

fn labels_by_id(id2label: &HashMap<String, String>) -> Result<Vec<String>, RecognizerError> {
    let mut labels = vec![String::new(); id2label.len()];
    for (id, label) in id2label {
        let idx = id
            .parse::<usize>()
            .ok()
            .filter(|idx| *idx < labels.len())
            .ok_or_else(|| RecognizerError::ModelInit {
                message: format!("invalid id2label key '{id}'"),
            })?;
        labels[idx] = label.clone();
    }
    if labels.is_empty() {
        return Err(RecognizerError::ModelInit {
            message: "config.json has an empty id2label map".to_string(),
        });
    }
    Ok(labels)
}

fn argmax(row: &[f32]) -> Option<usize> {
    row.iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
}

/// Collapse subword tokens into words.
///
/// A word takes the tag of its first subword and spans from that subword's
/// start to its last subword's end, so a `B-` predicted on a continuation
/// piece never opens a span in the middle of a word. Tokens without a word
/// id stand alone.
fn group_subwords<'a>(
    tags: &[Option<&'a str>],
    word_ids: &[Option<u32>],
    offsets: &[(usize, usize)],
) -> (Vec<Option<&'a str>>, Vec<(usize, usize)>) {
    let mut word_tags = Vec::with_capacity(tags.len());
    let mut word_offsets: Vec<(usize, usize)> = Vec::with_capacity(tags.len());
    let mut previous_word = None;

    for (idx, (&tag, &(start, end))) in tags.iter().zip(offsets).enumerate() {
        let word = word_ids.get(idx).copied().flatten();
        match word {
            Some(id) if previous_word == Some(id) => {
                if let Some(last) = word_offsets.last_mut() {
                    last.1 = end;
                }
            }
            _ => {
                word_tags.push(tag);
                word_offsets.push((start, end));
            }
        }
        previous_word = word;
    }
    (word_tags, word_offsets)
}

/// Merge per-word tags into spans.
///
/// `B-X` opens a span, `I-X` extends an open span of the same type (or opens
/// one), `O` and special tokens close it. Unprefixed labels behave like
/// `I-`.
fn merge_bio(tags: &[Option<&str>], offsets: &[(usize, usize)]) -> Vec<TaggedSpan> {
    let mut spans = Vec::new();
    let mut current: Option<TaggedSpan> = None;

    for (tag, &(start, end)) in tags.iter().zip(offsets) {
        let Some(tag) = tag.filter(|t| *t != "O") else {
            spans.extend(current.take());
            continue;
        };
        let (begins, label) = match tag.split_once('-') {
            Some(("B", label)) => (true, label),
            Some(("I", label)) => (false, label),
            _ => (false, tag),
        };
        match current.as_mut() {
            Some(open) if !begins && open.label == label => open.end = end,
            _ => {
                spans.extend(current.take());
                current = Some(TaggedSpan {
                    start,
                    end,
                    label: label.to_string(),
                });
            }
        }
    }
    spans.extend(current);
    spans
}

/// Split text into chunks of whole lines, each at most `max_chars`
/// characters unless a single line is longer. Yields `(byte offset, chunk)`.
fn line_chunks(text: &str, max_chars: usize) -> Vec<(usize, &str)> {
    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut chunk_end = 0;
    let mut chunk_chars = 0;
    for line in text.split_inclusive('\n') {
        let line_chars = line.chars().count();
        if chunk_end > chunk_start && chunk_chars + line_chars > max_chars {
            chunks.push((chunk_start, &text[chunk_start..chunk_end]));
            chunk_start = chunk_end;
            chunk_chars = 0;
        }
        chunk_end += line.len();
        chunk_chars += line_chars;
    }
    if chunk_end > chunk_start {
        chunks.push((chunk_start, &text[chunk_start..chunk_end]));
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_bio_joins_inside_tags() {
        let tags = [
            None,
            Some("B-Disease"),
            Some("I-Disease"),
            Some("O"),
            Some("B-Chemical"),
            None,
        ];
        let offsets = [(0, 0), (0, 5), (6, 13), (14, 17), (18, 25), (0, 0)];
        let spans = merge_bio(&tags, &offsets);
        assert_eq!(
            spans,
            vec![
                TaggedSpan {
                    start: 0,
                    end: 13,
                    label: "Disease".to_string()
                },
                TaggedSpan {
                    start: 18,
                    end: 25,
                    label: "Chemical".to_string()
                },
            ]
        );
    }

    #[test]
    fn merge_bio_splits_on_new_begin_and_type_change() {
        let tags = [Some("B-Disease"), Some("B-Disease"), Some("I-Chemical")];
        let offsets = [(0, 3), (4, 7), (8, 11)];
        let spans = merge_bio(&tags, &offsets);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[2].label, "Chemical");
    }

    #[test]
    fn line_chunks_cover_text_exactly() {
        let text = "linha um\nlinha dois\nlinha tres\n";
        let chunks = line_chunks(text, 12);
        let rebuilt: String = chunks.iter().map(|(_, c)| *c).collect();
        assert_eq!(rebuilt, text);
        for (offset, chunk) in &chunks {
            assert_eq!(&text[*offset..*offset + chunk.len()], *chunk);
        }
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn continuation_subword_tagged_begin_stays_in_its_word() {
        // "Hepatitis" as Hep ##at ##itis, with the model tagging ##itis B-Disease.
        let tags = [
            None,
            Some("B-Disease"),
            Some("I-Disease"),
            Some("B-Disease"),
            Some("O"),
            None,
        ];
        let word_ids = [None, Some(0), Some(0), Some(0), Some(1), None];
        let offsets = [(0, 0), (0, 3), (3, 5), (5, 9), (10, 15), (0, 0)];

        let (word_tags, word_offsets) = group_subwords(&tags, &word_ids, &offsets);
        assert_eq!(word_tags, vec![None, Some("B-Disease"), Some("O"), None]);
        assert_eq!(word_offsets, vec![(0, 0), (0, 9), (10, 15), (0, 0)]);

        let spans = merge_bio(&word_tags, &word_offsets);
        assert_eq!(
            spans,
            vec![TaggedSpan {
                start: 0,
                end: 9,
                label: "Disease".to_string()
            }]
        );
    }

    #[test]
    fn line_chunks_count_characters_not_bytes() {
        // 18 characters, 22 bytes.
        let text = "Condição\nVacinação";
        let chunks = line_chunks(text, 18);
        assert_eq!(chunks, vec![(0, text)]);

        let split = line_chunks(text, 17);
        assert_eq!(split.len(), 2);
        assert_eq!(split[1], ("Condição\n".len(), "Vacinação"));
    }

    #[test]
    fn labels_by_id_orders_labels() {
        let map: HashMap<String, String> = [("1", "B-Chemical"), ("0", "O")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(labels_by_id(&map).unwrap(), vec!["O", "B-Chemical"]);
    }

    #[test]
    fn missing_model_dir_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = OnnxRecognizer::load(dir.path(), 1000).err().unwrap();
        assert!(matches!(err, RecognizerError::ModelNotFound { .. }));
    }
}
