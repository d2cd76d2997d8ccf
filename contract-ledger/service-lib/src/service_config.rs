use contract_ledger_analyzer::{AnalyzerConfig, InputMode, ProcessConfig};
use contract_ledger_core::MissingIdentityPolicy;
use std::time::Duration;

#[derive(clap::Args, Clone, Debug)]
pub struct ServiceConfig {
    /// Specify the port on which the service will listen for HTTP requests.
    #[arg(env = "CONTRACT_LEDGER_LISTEN_PORT", long, default_value = "80")]
    pub listen_port: u16,
    /// Specify the URL of the ledger database, e.g. "sqlite://ledger.db?mode=rwc" (read+write,
    /// create if it doesn't yet exist), "sqlite::memory:", or "mock://" for a non-persistent
    /// in-process ledger.  See https://docs.rs/sqlx/latest/sqlx/sqlite/struct.SqliteConnectOptions.html
    #[arg(
        name = "database-url",
        env = "CONTRACT_LEDGER_DATABASE_URL",
        long,
        value_name = "URL",
        default_value = "sqlite://contract-ledger.db?mode=rwc"
    )]
    pub database_url: String,
    /// Specify the maximum number of connections to the database.  An in-memory SQLite database
    /// always uses a single connection.
    #[arg(
        name = "database-max-connections",
        env = "CONTRACT_LEDGER_DATABASE_MAX_CONNECTIONS",
        long,
        default_value = "10"
    )]
    pub database_max_connections: u32,
    /// Specify what a head query reports for a document that was never created.
    #[arg(
        name = "missing-identity-policy",
        env = "CONTRACT_LEDGER_MISSING_IDENTITY_POLICY",
        long,
        value_name = "POLICY",
        default_value = "fail",
        value_enum
    )]
    pub missing_identity_policy: MissingIdentityPolicy,
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
    /// Specify how many seconds the analyzer may run before it is killed.
    #[arg(
        name = "analyzer-timeout-seconds",
        env = "CONTRACT_LEDGER_ANALYZER_TIMEOUT_SECONDS",
        long,
        value_name = "SECONDS",
        default_value = "30"
    )]
    pub analyzer_timeout_seconds: u64,
    /// Specify how many bytes of analyzer output are kept.
    #[arg(
        name = "analyzer-max-output-bytes",
        env = "CONTRACT_LEDGER_ANALYZER_MAX_OUTPUT_BYTES",
        long,
        value_name = "BYTES",
        default_value = "4194304"
    )]
    pub analyzer_max_output_bytes: usize,
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
    /// Specify the largest PDF upload accepted, in bytes.
    #[arg(
        name = "max-upload-bytes",
        env = "CONTRACT_LEDGER_MAX_UPLOAD_BYTES",
        long,
        value_name = "BYTES",
        default_value = "20971520"
    )]
    pub max_upload_bytes: usize,
}

impl ServiceConfig {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let mut process_config =
            ProcessConfig::new(self.analyzer_program.clone(), self.analyzer_args.clone());
        process_config.timeout = Duration::from_secs(self.analyzer_timeout_seconds);
        process_config.max_output_bytes = self.analyzer_max_output_bytes;
        AnalyzerConfig::new(process_config, self.analyzer_input_mode)
    }
    pub fn text_extractor_process_config(&self) -> ProcessConfig {
        let mut process_config = ProcessConfig::new(
            self.text_extractor_program.clone(),
            self.text_extractor_args.clone(),
        );
        process_config.timeout = Duration::from_secs(self.analyzer_timeout_seconds);
        process_config
    }
}
