use std::time::Duration;

/// How the analyzer receives the document text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    /// Appended as the final command-line argument.
    #[default]
    Argument,
    /// Written to the process's stdin, which is then closed.
    Stdin,
}

/// An external command and the limits it runs under.
#[derive(Clone, Debug)]
pub struct ProcessConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Captured stdout beyond this many bytes is discarded.
    pub max_output_bytes: usize,
}

impl ProcessConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 4 * 1024 * 1024;

    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Self::DEFAULT_TIMEOUT,
            max_output_bytes: Self::DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    pub process_config: ProcessConfig,
    pub input_mode: InputMode,
    /// Largest text accepted in InputMode::Argument.  Operating systems cap the size of a single
    /// argument, so larger documents must use InputMode::Stdin.
    pub max_argument_bytes: usize,
}

impl AnalyzerConfig {
    pub const DEFAULT_MAX_ARGUMENT_BYTES: usize = 128 * 1024;

    pub fn new(process_config: ProcessConfig, input_mode: InputMode) -> Self {
        Self {
            process_config,
            input_mode,
            max_argument_bytes: Self::DEFAULT_MAX_ARGUMENT_BYTES,
        }
    }
}
