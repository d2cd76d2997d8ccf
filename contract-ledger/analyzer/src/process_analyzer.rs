use crate::{
    json_payload::error_payload_message, process::run_process, Analyzer, AnalyzerConfig, Error,
    InputMode, Result,
};
use contract_ledger_core::AnalysisReport;

/// Analyzer backed by an external program that prints one JSON report object on stdout.
#[derive(Clone, Debug)]
pub struct ProcessAnalyzer {
    analyzer_config: AnalyzerConfig,
}

impl ProcessAnalyzer {
    pub fn new(analyzer_config: AnalyzerConfig) -> Self {
        Self { analyzer_config }
    }
    pub fn analyzer_config(&self) -> &AnalyzerConfig {
        &self.analyzer_config
    }
}

#[async_trait::async_trait]
impl Analyzer for ProcessAnalyzer {
    #[tracing::instrument(level = tracing::Level::DEBUG, err(Debug), skip_all, fields(text_len = text.len()))]
    async fn analyze(&self, text: &str) -> Result<AnalysisReport> {
        let process_config = &self.analyzer_config.process_config;
        let process_output = match self.analyzer_config.input_mode {
            InputMode::Argument => {
                if text.len() > self.analyzer_config.max_argument_bytes {
                    return Err(Error::InputTooLarge {
                        len: text.len(),
                        limit: self.analyzer_config.max_argument_bytes,
                    });
                }
                run_process(process_config, Some(text), None).await?
            }
            InputMode::Stdin => run_process(process_config, None, Some(text.as_bytes())).await?,
        };
        let exit_code_o = process_output.exit_code_o();
        let succeeded = process_output.exit_status.success();

        let stdout = String::from_utf8_lossy(&process_output.stdout);
        let object_o = crate::extract_json_payload(&stdout)
            .and_then(|payload| serde_json::from_str::<serde_json::Value>(payload).ok())
            .and_then(|value| match value {
                serde_json::Value::Object(object) => Some(object),
                _ => None,
            });
        let object = match object_o {
            Some(object) => object,
            None => {
                let truncation_note = if process_output.stdout_truncated {
                    " (its output was truncated)"
                } else {
                    ""
                };
                let message = if succeeded {
                    format!(
                        "analyzer produced no usable JSON payload{}",
                        truncation_note
                    )
                } else {
                    format!(
                        "analyzer exited with status {} and produced no usable JSON payload{}",
                        process_output.exit_status, truncation_note
                    )
                };
                return Err(Error::Unavailable {
                    message: message.into(),
                    exit_code_o,
                });
            }
        };
        if let Some(error_message) = error_payload_message(&object) {
            return Err(Error::Unavailable {
                message: format!("analyzer reported an error: {}", error_message).into(),
                exit_code_o,
            });
        }

        let mut analysis_report = crate::normalize_report(&object);
        if !succeeded {
            tracing::warn!(
                "analyzer exited with status {} but produced a usable report; keeping it",
                process_output.exit_status
            );
            analysis_report.analyzer_exit_code_o = exit_code_o;
        }
        Ok(analysis_report)
    }
}
