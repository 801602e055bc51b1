//! CLI argument definitions for the prontuário extractor.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use prontuario_core::RecognizerKind;

#[derive(Parser)]
#[command(
    name = "prontuario",
    version,
    about = "Extract structured patient tables from prontuário PDFs",
    long_about = "Extract structured patient data from a folder of prontuário PDFs.\n\n\
                  Writes pacientes.csv, condicoes.csv, tratamentos.csv and\n\
                  procedimentos_vacinas.csv from labeled fields and recognized\n\
                  disease and medication entities."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient names and entity text in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Pipeline configuration file (default: $PRONTUARIO_CONFIG, then built-in defaults).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process every PDF in a folder and write the four patient tables.
    Extract(ExtractArgs),

    /// Run text extraction and the recognizer on one PDF and print the entities.
    Recognize(RecognizeArgs),

    /// Print the effective configuration as TOML.
    Config(RecognizerArgs),
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// Folder containing the prontuário PDFs.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for the CSV files (default: <INPUT_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Number of rows of each table to preview in the summary.
    #[arg(long = "preview", value_name = "N", default_value_t = 5)]
    pub preview: usize,

    /// Exit with an error status if any document was skipped.
    #[arg(long = "fail-on-skipped")]
    pub fail_on_skipped: bool,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,
}

#[derive(Parser)]
pub struct RecognizeArgs {
    /// The prontuário PDF to inspect.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    #[command(flatten)]
    pub recognizer: RecognizerArgs,
}

/// Recognizer overrides shared by the subcommands.
#[derive(Args, Default)]
pub struct RecognizerArgs {
    /// Recognizer backend (overrides `[recognizer] kind`).
    #[arg(long = "recognizer", value_enum)]
    pub kind: Option<RecognizerKindArg>,

    /// Lexicon CSV with `term,category` rows (overrides `[recognizer] lexicon`).
    #[arg(long = "lexicon", value_name = "CSV")]
    pub lexicon: Option<PathBuf>,

    /// ONNX model directory (overrides `[recognizer] model_dir`).
    #[arg(long = "model-dir", value_name = "DIR")]
    pub model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RecognizerKindArg {
    Lexicon,
    Onnx,
}

impl From<RecognizerKindArg> for RecognizerKind {
    fn from(value: RecognizerKindArg) -> Self {
        match value {
            RecognizerKindArg::Lexicon => RecognizerKind::Lexicon,
            RecognizerKindArg::Onnx => RecognizerKind::Onnx,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
