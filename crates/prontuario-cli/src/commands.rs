use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use prontuario_core::{Pipeline, PipelineConfig, build_recognizer};
use prontuario_extract::{EntityFilter, EntityRecognizer, validate_spans};
use prontuario_ingest::{DocumentReader, PdfReader};
use prontuario_output::{table_frames, write_csv_outputs};

use crate::cli::{ExtractArgs, RecognizeArgs, RecognizerArgs};
use crate::types::{ExtractResult, RecognizeResult, SkippedSummary, TableSummary};

/// Resolve the config file and apply recognizer flags on top of it.
pub fn load_config(config_path: Option<&Path>, overrides: &RecognizerArgs) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::resolve(config_path).context("load configuration")?;
    if let Some(kind) = overrides.kind {
        config.recognizer.kind = kind.into();
    }
    if let Some(path) = &overrides.lexicon {
        config.recognizer.lexicon = Some(path.clone());
    }
    if let Some(dir) = &overrides.model_dir {
        config.recognizer.model_dir = Some(dir.clone());
    }
    Ok(config)
}

pub fn run_extract(args: &ExtractArgs, config_path: Option<&Path>) -> Result<ExtractResult> {
    let input_dir = &args.input_dir;
    let extract_span = info_span!("extract", input = %input_dir.display());
    let _extract_guard = extract_span.enter();
    let start = Instant::now();

    let config = load_config(config_path, &args.recognizer)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| input_dir.join("output"));

    let recognizer = build_recognizer(&config.recognizer).context("initialize recognizer")?;
    let recognizer_name = recognizer.name().to_string();
    let pipeline = Pipeline::from_config(PdfReader::new(), recognizer, &config);
    let outcome = pipeline
        .run_directory(input_dir)
        .with_context(|| format!("process {}", input_dir.display()))?;

    let mut frames = table_frames(&outcome.tables)?;
    let outputs = if args.dry_run {
        info!("dry run: no files written");
        Vec::new()
    } else {
        write_csv_outputs(&output_dir, &mut frames, &config.output)?
    };

    let mut tables = Vec::with_capacity(frames.len());
    for (idx, frame) in frames.iter().enumerate() {
        tables.push(TableSummary {
            kind: frame.kind,
            file_name: config.output.file_name(frame.kind).to_string(),
            rows: frame.row_count(),
            output: outputs.get(idx).cloned(),
            columns: frame.column_names(),
            preview: frame.preview_rows(args.preview)?,
        });
    }

    let skipped = outcome
        .skipped
        .iter()
        .map(|skipped| SkippedSummary {
            file: skipped
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| skipped.path.display().to_string()),
            kind: skipped.error.kind(),
            reason: skipped.error.to_string(),
        })
        .collect();

    info!(
        documents = outcome.document_count(),
        duration_ms = start.elapsed().as_millis(),
        "extract complete"
    );

    Ok(ExtractResult {
        input_dir: input_dir.clone(),
        output_dir,
        dry_run: args.dry_run,
        recognizer: recognizer_name,
        processed: outcome.processed.len(),
        tables,
        skipped,
    })
}

pub fn run_recognize(args: &RecognizeArgs, config_path: Option<&Path>) -> Result<RecognizeResult> {
    let config = load_config(config_path, &args.recognizer)?;
    let recognizer = build_recognizer(&config.recognizer).context("initialize recognizer")?;
    let text = PdfReader::new()
        .read_text(&args.pdf)
        .with_context(|| format!("read {}", args.pdf.display()))?;
    let raw = recognizer
        .recognize(&text)
        .with_context(|| format!("recognize entities in {}", args.pdf.display()))?;
    validate_spans(recognizer.name(), &raw)?;
    let filtered = EntityFilter::new(&config.filter).apply(&raw);
    Ok(RecognizeResult {
        pdf: args.pdf.clone(),
        recognizer: recognizer.name().to_string(),
        raw,
        filtered,
    })
}

/// The effective configuration, with recognizer flags applied, as TOML.
pub fn run_config(args: &RecognizerArgs, config_path: Option<&Path>) -> Result<String> {
    let config = load_config(config_path, args)?;
    Ok(config.to_toml_string()?)
}
