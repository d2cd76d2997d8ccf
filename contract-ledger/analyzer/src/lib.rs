mod analyzer;
mod analyzer_config;
mod error;
mod json_payload;
mod process;
mod process_analyzer;
mod process_text_extractor;
mod text_extractor;

pub use crate::{
    analyzer::Analyzer,
    analyzer_config::{AnalyzerConfig, InputMode, ProcessConfig},
    error::Error,
    json_payload::{extract_json_payload, normalize_report},
    process_analyzer::ProcessAnalyzer,
    process_text_extractor::ProcessTextExtractor,
    text_extractor::TextExtractor,
};
pub type Result<T> = std::result::Result<T, Error>;
