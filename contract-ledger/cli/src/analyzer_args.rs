use contract_ledger_analyzer::{
    AnalyzerConfig, InputMode, ProcessAnalyzer, ProcessConfig, ProcessTextExtractor,
};
use std::time::Duration;

#[derive(clap::Args, Debug)]
pub struct AnalyzerArgs {
    /// Specify the analyzer executable.
    #[arg(
        name = "analyzer-program",
        env = "CONTRACT_LEDGER_ANALYZER_PROGRAM",
        long,
        value_name = "PROGRAM",
        default_value = "python3"
    )]
    pub analyzer_program: String,
    /// Specify the comma-separated arguments passed to the analyzer before its input.
    #[arg(
        name = "analyzer-args",
        env = "CONTRACT_LEDGER_ANALYZER_ARGS",
        long,
        value_name = "ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "ml_engine/analyzer.py"
    )]
    pub analyzer_args: Vec<String>,
    /// Specify how the analyzer receives the document text.
    #[arg(
        name = "analyzer-input-mode",
        env = "CONTRACT_LEDGER_ANALYZER_INPUT_MODE",
        long,
        value_name = "MODE",
        default_value = "argument",
        value_enum
    )]
    pub analyzer_input_mode: InputMode,
    /// Specify how many seconds the analyzer and the text extractor may each run.
    #[arg(
        name = "analyzer-timeout-seconds",
        env = "CONTRACT_LEDGER_ANALYZER_TIMEOUT_SECONDS",
        long,
        value_name = "SECONDS",
        default_value = "30"
    )]
    pub analyzer_timeout_seconds: u64,
    /// Specify the executable that converts a PDF on stdin to text on stdout.
    #[arg(
        name = "text-extractor-program",
        env = "CONTRACT_LEDGER_TEXT_EXTRACTOR_PROGRAM",
        long,
        value_name = "PROGRAM",
        default_value = "pdftotext"
    )]
    pub text_extractor_program: String,
    /// Specify the comma-separated arguments passed to the text extractor.
    #[arg(
        name = "text-extractor-args",
        env = "CONTRACT_LEDGER_TEXT_EXTRACTOR_ARGS",
        long,
        value_name = "ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "-q,-,-"
    )]
    pub text_extractor_args: Vec<String>,
}

impl AnalyzerArgs {
    pub fn get_analyzer(&self) -> ProcessAnalyzer {
        let mut process_config =
            ProcessConfig::new(self.analyzer_program.clone(), self.analyzer_args.clone());
        process_config.timeout = Duration::from_secs(self.analyzer_timeout_seconds);
        ProcessAnalyzer::new(AnalyzerConfig::new(
            process_config,
            self.analyzer_input_mode,
        ))
    }
    pub fn get_text_extractor(&self) -> ProcessTextExtractor {
        let mut process_config = ProcessConfig::new(
            self.text_extractor_program.clone(),
            self.text_extractor_args.clone(),
        );
        process_config.timeout = Duration::from_secs(self.analyzer_timeout_seconds);
        ProcessTextExtractor::new(process_config)
    }
}
