use contract_ledger_analyzer::{
    extract_json_payload, normalize_report, Analyzer, AnalyzerConfig, Error, InputMode,
    ProcessAnalyzer, ProcessConfig, ProcessTextExtractor, TextExtractor,
};
use contract_ledger_core::{AnalysisReport, Severity};
use std::time::Duration;

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    test_util::ctor_overall_init();
}

/// An analyzer that runs the given shell script.  In argument mode the text arrives as `$1`.
fn sh_analyzer(script: &str, input_mode: InputMode) -> ProcessAnalyzer {
    ProcessAnalyzer::new(AnalyzerConfig::new(
        sh_process_config(script),
        input_mode,
    ))
}

fn sh_process_config(script: &str) -> ProcessConfig {
    ProcessConfig::new(
        "/bin/sh",
        vec!["-c".to_string(), script.to_string(), "analyzer".to_string()],
    )
}

#[test]
fn test_extract_json_payload() {
    assert_eq!(
        extract_json_payload("loading model...\n{\"score\": 1}\ndone\n"),
        Some("{\"score\": 1}")
    );
    assert_eq!(
        extract_json_payload("{\"a\": {\"b\": 2}} trailing } noise"),
        Some("{\"a\": {\"b\": 2}} trailing }")
    );
    assert_eq!(extract_json_payload("no payload here"), None);
    assert_eq!(extract_json_payload("} backwards {"), None);
}

#[test]
fn test_normalize_report_defaults_wrongly_typed_fields() {
    let value = serde_json::json!({
        "documentType": 5,
        "safetyScore": "high",
        "risks": "none",
        "extractedEntities": [1, "Acme Corp", null],
        "summary": ["not", "a", "string"],
    });
    let analysis_report = normalize_report(value.as_object().expect("pass"));
    assert_eq!(
        analysis_report.document_type,
        AnalysisReport::UNKNOWN_DOCUMENT_TYPE
    );
    assert_eq!(analysis_report.safety_score, 0);
    assert!(analysis_report.risks.is_empty());
    assert_eq!(
        analysis_report
            .extracted_entities
            .iter()
            .cloned()
            .collect::<Vec<_>>(),
        vec!["Acme Corp".to_string()]
    );
    assert_eq!(analysis_report.summary, "");
    assert!(analysis_report.missing_clauses.is_empty());
    assert_eq!(analysis_report.analyzer_exit_code_o, None);
}

#[test]
fn test_normalize_report_clamps_and_prefers_canonical_names() {
    let value = serde_json::json!({
        "documentType": "Non-Disclosure Agreement",
        "type": "Board Resolution",
        "score": -20,
        "risks": [
            {"name": "Perpetual term", "severity": "CRITICAL", "status": "info", "explanation": "nda lasts forever"},
            "Unlimited penalties",
            42
        ],
        "missingClauses": ["Governing law", "  "]
    });
    let analysis_report = normalize_report(value.as_object().expect("pass"));
    assert_eq!(analysis_report.document_type, "Non-Disclosure Agreement");
    assert_eq!(analysis_report.safety_score, 0);
    assert_eq!(analysis_report.risks.len(), 2);
    assert_eq!(analysis_report.risks[0].severity, Severity::Critical);
    assert_eq!(analysis_report.risks[1].name, "Unlimited penalties");
    assert_eq!(analysis_report.risks[1].severity, Severity::Warning);
    assert_eq!(
        analysis_report.missing_clauses,
        vec!["Governing law".to_string()]
    );

    let value = serde_json::json!({"safetyScore": 55.6});
    assert_eq!(
        normalize_report(value.as_object().expect("pass")).safety_score,
        56
    );
    let value = serde_json::json!({"safetyScore": 1000});
    assert_eq!(
        normalize_report(value.as_object().expect("pass")).safety_score,
        100
    );
}

#[tokio::test]
async fn test_noisy_output_with_aliases() {
    let analyzer = sh_analyzer(
        r#"
            echo "loading en_core_web_sm..."
            echo '{"type": "Employment Contract", "score": 140, "risks": [{"name": "Universal High Risk", "status": "critical", "explanation": "irrevocable"}, {"name": "Odd", "status": "bogus", "explanation": ""}], "entities": ["Acme", "Acme", " Beta "]}'
            echo "done"
        "#,
        InputMode::Argument,
    );
    let analysis_report = analyzer.analyze("some contract text").await.expect("pass");
    assert_eq!(analysis_report.document_type, "Employment Contract");
    assert_eq!(analysis_report.safety_score, 100);
    assert_eq!(analysis_report.risks.len(), 2);
    assert_eq!(analysis_report.risks[0].severity, Severity::Critical);
    assert_eq!(analysis_report.risks[1].severity, Severity::Warning);
    assert_eq!(
        analysis_report
            .extracted_entities
            .iter()
            .cloned()
            .collect::<Vec<_>>(),
        vec!["Acme".to_string(), "Beta".to_string()]
    );
    assert_eq!(analysis_report.highest_severity(), Some(Severity::Critical));
    assert_eq!(analysis_report.analyzer_exit_code_o, None);
}

#[tokio::test]
async fn test_nonzero_exit_with_payload_is_kept() {
    let analyzer = sh_analyzer(
        r#"echo '{"score": 55}'; exit 3"#,
        InputMode::Argument,
    );
    let analysis_report = analyzer.analyze("text").await.expect("pass");
    assert_eq!(analysis_report.safety_score, 55);
    assert_eq!(
        analysis_report.document_type,
        AnalysisReport::UNKNOWN_DOCUMENT_TYPE
    );
    assert_eq!(analysis_report.analyzer_exit_code_o, Some(3));

    let json = serde_json::to_value(&analysis_report).expect("pass");
    assert_eq!(json["analyzerExitCode"], serde_json::json!(3));
}

#[tokio::test]
async fn test_nonzero_exit_without_payload_is_unavailable() {
    let analyzer = sh_analyzer("echo oops >&2; exit 2", InputMode::Argument);
    match analyzer.analyze("text").await {
        Err(err @ Error::Unavailable { .. }) => assert_eq!(err.exit_code_o(), Some(2)),
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_payload_is_unavailable() {
    let analyzer = sh_analyzer(
        r#"echo '{"error": "Model not found. Run: python -m spacy download en_core_web_sm"}'; exit 1"#,
        InputMode::Argument,
    );
    match analyzer.analyze("text").await {
        Err(Error::Unavailable {
            message,
            exit_code_o,
        }) => {
            assert!(message.contains("Model not found"));
            assert_eq!(exit_code_o, Some(1));
        }
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_kills_the_analyzer() {
    let mut process_config = sh_process_config("sleep 10");
    process_config.timeout = Duration::from_millis(200);
    let analyzer = ProcessAnalyzer::new(AnalyzerConfig::new(process_config, InputMode::Stdin));

    let start = std::time::Instant::now();
    match analyzer.analyze("text").await {
        Err(err @ Error::TimedOut { .. }) => assert_eq!(err.exit_code_o(), None),
        other => panic!("expected TimedOut, got {:?}", other),
    }
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_argument_input_mode() {
    let analyzer = sh_analyzer(
        r#"printf '{"summary": "%s"}' "$1""#,
        InputMode::Argument,
    );
    let analysis_report = analyzer.analyze("received as argument").await.expect("pass");
    assert_eq!(analysis_report.summary, "received as argument");
}

#[tokio::test]
async fn test_stdin_input_mode() {
    let analyzer = sh_analyzer(
        r#"text=$(cat); printf '{"summary": "%s"}' "$text""#,
        InputMode::Stdin,
    );
    let analysis_report = analyzer.analyze("received on stdin").await.expect("pass");
    assert_eq!(analysis_report.summary, "received on stdin");
}

#[tokio::test]
async fn test_oversized_argument_is_rejected() {
    let analyzer = sh_analyzer("echo '{}'", InputMode::Argument);
    let text = "x".repeat(AnalyzerConfig::DEFAULT_MAX_ARGUMENT_BYTES + 1);
    match analyzer.analyze(&text).await {
        Err(Error::InputTooLarge { len, limit }) => {
            assert_eq!(len, AnalyzerConfig::DEFAULT_MAX_ARGUMENT_BYTES + 1);
            assert_eq!(limit, AnalyzerConfig::DEFAULT_MAX_ARGUMENT_BYTES);
        }
        other => panic!("expected InputTooLarge, got {:?}", other),
    }
}

#[tokio::test]
async fn test_truncated_output_is_unavailable() {
    let mut process_config =
        sh_process_config(r#"echo '{"summary": "this is longer than sixteen bytes"}'"#);
    process_config.max_output_bytes = 16;
    let analyzer = ProcessAnalyzer::new(AnalyzerConfig::new(process_config, InputMode::Argument));
    assert!(matches!(
        analyzer.analyze("text").await,
        Err(Error::Unavailable { .. })
    ));
}

#[tokio::test]
async fn test_missing_program_is_unavailable() {
    let analyzer = ProcessAnalyzer::new(AnalyzerConfig::new(
        ProcessConfig::new("/nonexistent/contract-analyzer", Vec::new()),
        InputMode::Argument,
    ));
    match analyzer.analyze("text").await {
        Err(err @ Error::Unavailable { .. }) => assert_eq!(err.exit_code_o(), None),
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_process_text_extractor() {
    let text_extractor = ProcessTextExtractor::new(sh_process_config("cat"));
    let text = text_extractor
        .extract_text(b"%PDF-1.4 pretend this is text")
        .await
        .expect("pass");
    assert_eq!(text, "%PDF-1.4 pretend this is text");

    let failing_text_extractor = ProcessTextExtractor::new(sh_process_config("cat >/dev/null; exit 1"));
    match failing_text_extractor.extract_text(b"%PDF-1.4").await {
        Err(err @ Error::Unavailable { .. }) => assert_eq!(err.exit_code_o(), Some(1)),
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

#[test]
fn test_default_text_extractor_uses_pdftotext() {
    let text_extractor = ProcessTextExtractor::default();
    assert_eq!(text_extractor.process_config().program, "pdftotext");
    assert_eq!(
        text_extractor.process_config().args,
        vec!["-q".to_string(), "-".to_string(), "-".to_string()]
    );
}

/// True once the process is gone or is a zombie waiting to be reaped.
#[cfg(target_os = "linux")]
fn process_is_dead(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        // The state field follows the parenthesized command name.
        Ok(stat) => stat
            .rsplit_once(") ")
            .map(|(_, rest)| rest.starts_with('Z') || rest.starts_with('X'))
            .unwrap_or(false),
        Err(_) => true,
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_timeout_kills_forked_grandchildren() {
    let pid_file_path = std::env::temp_dir().join(format!(
        "contract-ledger-analyzer-grandchild-{}.pid",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&pid_file_path);
    // The text argument is the pid file path; the shell forks a long sleep and waits on it.
    let mut process_config = sh_process_config(r#"sleep 30 & echo $! > "$1"; wait"#);
    process_config.timeout = Duration::from_millis(500);
    let analyzer = ProcessAnalyzer::new(AnalyzerConfig::new(process_config, InputMode::Argument));

    let pid_file_path_str = pid_file_path.to_str().expect("pass");
    match analyzer.analyze(pid_file_path_str).await {
        Err(Error::TimedOut { .. }) => {}
        other => panic!("expected TimedOut, got {:?}", other),
    }
    let grandchild_pid = std::fs::read_to_string(&pid_file_path)
        .expect("pass")
        .trim()
        .parse::<u32>()
        .expect("pass");
    let _ = std::fs::remove_file(&pid_file_path);

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !process_is_dead(grandchild_pid) {
        assert!(
            std::time::Instant::now() < deadline,
            "forked process {} outlived the timed-out analyzer",
            grandchild_pid
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
