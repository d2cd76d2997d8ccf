use crate::{process::run_process, Error, ProcessConfig, Result, TextExtractor};

/// TextExtractor backed by an external program that reads a PDF on stdin and writes its text
/// to stdout, e.g. `pdftotext -q - -`.
#[derive(Clone, Debug)]
pub struct ProcessTextExtractor {
    process_config: ProcessConfig,
}

impl ProcessTextExtractor {
    pub const DEFAULT_PROGRAM: &'static str = "pdftotext";
    pub const DEFAULT_ARGS: &'static [&'static str] = &["-q", "-", "-"];

    pub fn new(process_config: ProcessConfig) -> Self {
        Self { process_config }
    }
    pub fn process_config(&self) -> &ProcessConfig {
        &self.process_config
    }
}

impl Default for ProcessTextExtractor {
    fn default() -> Self {
        Self::new(ProcessConfig::new(
            Self::DEFAULT_PROGRAM,
            Self::DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect(),
        ))
    }
}

#[async_trait::async_trait]
impl TextExtractor for ProcessTextExtractor {
    #[tracing::instrument(level = tracing::Level::DEBUG, err(Debug), skip_all, fields(pdf_len = pdf_bytes.len()))]
    async fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String> {
        let process_output = run_process(&self.process_config, None, Some(pdf_bytes)).await?;
        if !process_output.exit_status.success() {
            return Err(Error::Unavailable {
                message: format!(
                    "text extractor {:?} exited with status {}",
                    self.process_config.program, process_output.exit_status
                )
                .into(),
                exit_code_o: process_output.exit_code_o(),
            });
        }
        Ok(String::from_utf8_lossy(&process_output.stdout).into_owned())
    }
}
