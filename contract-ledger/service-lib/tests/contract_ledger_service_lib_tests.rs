use contract_ledger_analyzer::InputMode;
use contract_ledger_core::{fingerprint_bytes, Fingerprint, MissingIdentityPolicy};
use contract_ledger_service_lib::{ErrorBody, ServiceConfig, PRINCIPAL_HEADER};
use reqwest::StatusCode;

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    test_util::ctor_overall_init();
}

const NDA_ANALYZER_SCRIPT: &str = r#"
    echo "loading model..."
    printf '{"type": "Non-Disclosure Agreement", "score": 72, "risks": [{"name": "Non-Disclosure Agreement Risk", "status": "warning", "explanation": "Flagged potentially dangerous clause"}], "entities": ["Acme Corp"]}\n'
"#;

const CONTRACT_V1: &[u8] = b"%PDF-1.7 mutual non-disclosure agreement between Acme Corp and Beta LLC";
const CONTRACT_V2: &[u8] =
    b"%PDF-1.7 mutual non-disclosure agreement between Acme Corp and Beta LLC, amended";

fn service_config(listen_port: u16, analyzer_script: &str) -> ServiceConfig {
    ServiceConfig {
        listen_port,
        database_url: "mock://".to_string(),
        database_max_connections: 1,
        missing_identity_policy: MissingIdentityPolicy::Fail,
        analyzer_program: "/bin/sh".to_string(),
        analyzer_args: vec![
            "-c".to_string(),
            analyzer_script.to_string(),
            "analyzer".to_string(),
        ],
        analyzer_input_mode: InputMode::Argument,
        analyzer_timeout_seconds: 30,
        analyzer_max_output_bytes: 4 * 1024 * 1024,
        text_extractor_program: "/bin/sh".to_string(),
        text_extractor_args: vec!["-c".to_string(), "cat".to_string()],
        max_upload_bytes: 1024,
    }
}

async fn spawn_and_wait(service_config: ServiceConfig) -> (tokio::task::JoinHandle<()>, String) {
    let base_url = format!("http://localhost:{}", service_config.listen_port);
    let service_handle = contract_ledger_service_lib::spawn_service(service_config)
        .await
        .expect("pass");
    test_util::wait_until_service_is_up("contract-ledger", &format!("{}/health", base_url)).await;
    (service_handle, base_url)
}

fn pdf_form(pdf_bytes: &[u8], mime: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new().part(
        "pdf",
        reqwest::multipart::Part::bytes(pdf_bytes.to_vec())
            .file_name("contract.pdf")
            .mime_str(mime)
            .expect("pass"),
    )
}

async fn error_body(response: reqwest::Response) -> ErrorBody {
    response.json::<ErrorBody>().await.expect("pass")
}

#[tokio::test]
async fn test_service_analyze_then_commit_flow() {
    let (service_handle, base_url) =
        spawn_and_wait(service_config(18401, NDA_ANALYZER_SCRIPT)).await;
    let client = test_util::REQWEST_CLIENT.clone();

    // Analysis reports the fingerprint but does not commit anything.
    let response = client
        .post(format!("{}/analyze", base_url))
        .multipart(pdf_form(CONTRACT_V1, "application/pdf"))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::OK);
    let upload_analysis = response
        .json::<serde_json::Value>()
        .await
        .expect("pass");
    let fingerprint_v1 = fingerprint_bytes(CONTRACT_V1).to_string();
    assert_eq!(upload_analysis["fingerprint"], serde_json::json!(fingerprint_v1));
    assert_eq!(
        upload_analysis["documentType"],
        serde_json::json!("Non-Disclosure Agreement")
    );
    assert_eq!(upload_analysis["safetyScore"], serde_json::json!(72));
    assert_eq!(upload_analysis["risks"][0]["severity"], serde_json::json!("warning"));
    assert_eq!(
        upload_analysis["extractedEntities"],
        serde_json::json!(["Acme Corp"])
    );
    let response = client
        .get(format!("{}/fingerprints/{}/records", base_url, fingerprint_v1))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass"),
        serde_json::json!([])
    );

    // Mutations require a principal.
    let response = client
        .post(format!("{}/documents", base_url))
        .json(&serde_json::json!({ "fingerprint": fingerprint_v1 }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(response).await;
    assert_eq!(body.error, "InputError");
    assert!(body.message.contains(PRINCIPAL_HEADER));

    let response = client
        .post(format!("{}/documents", base_url))
        .header(PRINCIPAL_HEADER, "0xA11CE")
        .json(&serde_json::json!({ "fingerprint": fingerprint_v1 }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::CREATED);
    let ledger_event = response.json::<serde_json::Value>().await.expect("pass");
    assert_eq!(ledger_event["event"], serde_json::json!("DocumentCreated"));
    assert_eq!(ledger_event["documentId"], serde_json::json!(fingerprint_v1));
    assert_eq!(ledger_event["creator"], serde_json::json!("0xA11CE"));
    let document_id = fingerprint_v1.clone();

    // Creating the same document again is a conflict that names the fix.
    let response = client
        .post(format!("{}/documents", base_url))
        .header(PRINCIPAL_HEADER, "0xA11CE")
        .json(&serde_json::json!({ "fingerprint": fingerprint_v1 }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = error_body(response).await;
    assert_eq!(body.error, "LedgerConflict");
    assert!(body.message.contains("use update instead of create"));

    let fingerprint_v2 = fingerprint_bytes(CONTRACT_V2).to_string();
    let response = client
        .put(format!("{}/documents/{}", base_url, document_id))
        .header(PRINCIPAL_HEADER, "0xB0B")
        .json(&serde_json::json!({ "fingerprint": fingerprint_v2, "expectedHead": fingerprint_v1 }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::OK);
    let ledger_event = response.json::<serde_json::Value>().await.expect("pass");
    assert_eq!(ledger_event["event"], serde_json::json!("DocumentUpdated"));
    assert_eq!(ledger_event["newFingerprint"], serde_json::json!(fingerprint_v2));
    assert_eq!(
        ledger_event["previousFingerprint"],
        serde_json::json!(fingerprint_v1)
    );

    // An update based on a stale head is refused.
    let fingerprint_v3 = fingerprint_bytes(b"%PDF-1.7 v3").to_string();
    let response = client
        .put(format!("{}/documents/{}", base_url, document_id))
        .header(PRINCIPAL_HEADER, "0xB0B")
        .json(&serde_json::json!({ "fingerprint": fingerprint_v3, "expectedHead": fingerprint_v1 }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .get(format!("{}/documents/{}/latest", base_url, document_id))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass"),
        serde_json::json!({ "documentId": document_id, "latestFingerprint": fingerprint_v2 })
    );

    let response = client
        .get(format!(
            "{}/documents/{}/verify/{}",
            base_url, document_id, fingerprint_v1
        ))
        .send()
        .await
        .expect("pass");
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass"),
        serde_json::json!({ "isLatest": false, "latestFingerprint": fingerprint_v2 })
    );
    let response = client
        .get(format!(
            "{}/documents/{}/verify/{}",
            base_url, document_id, fingerprint_v2
        ))
        .send()
        .await
        .expect("pass");
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass")["isLatest"],
        serde_json::json!(true)
    );

    let response = client
        .get(format!("{}/documents/{}/history", base_url, document_id))
        .send()
        .await
        .expect("pass");
    let history = response.json::<serde_json::Value>().await.expect("pass");
    let history = history.as_array().expect("pass");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["versionIndex"], serde_json::json!(0));
    assert_eq!(history[1]["versionIndex"], serde_json::json!(1));
    assert_eq!(history[1]["fingerprint"], serde_json::json!(fingerprint_v2));
    assert_eq!(
        history[1]["previousFingerprint"],
        serde_json::json!(fingerprint_v1)
    );

    let response = client
        .get(format!("{}/documents/{}/history/0", base_url, document_id))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass")["fingerprint"],
        serde_json::json!(fingerprint_v1)
    );
    let response = client
        .get(format!("{}/documents/{}/history/7", base_url, document_id))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = client
        .get(format!("{}/documents/{}/history/-1", base_url, document_id))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/fingerprints/{}/records", base_url, fingerprint_v2))
        .send()
        .await
        .expect("pass");
    let records = response.json::<serde_json::Value>().await.expect("pass");
    assert_eq!(records.as_array().expect("pass").len(), 1);
    assert_eq!(records[0]["documentId"], serde_json::json!(document_id));

    service_handle.abort();
}

#[tokio::test]
async fn test_service_rejects_bad_input() {
    let (service_handle, base_url) =
        spawn_and_wait(service_config(18402, NDA_ANALYZER_SCRIPT)).await;
    let client = test_util::REQWEST_CLIENT.clone();

    let response = client
        .post(format!("{}/analyze", base_url))
        .multipart(pdf_form(b"just some text", "application/pdf"))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(error_body(response).await.error, "InputError");

    let response = client
        .post(format!("{}/analyze", base_url))
        .multipart(pdf_form(CONTRACT_V1, "text/plain"))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let oversized = [b"%PDF-".as_slice(), [b'x'; 2048].as_slice()].concat();
    let response = client
        .post(format!("{}/analyze", base_url))
        .multipart(pdf_form(&oversized, "application/pdf"))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = client
        .post(format!("{}/analyze", base_url))
        .multipart(reqwest::multipart::Form::new().text("note", "no file here"))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_body(response).await.message.contains("pdf"));

    let response = client
        .post(format!("{}/documents", base_url))
        .header(PRINCIPAL_HEADER, "0xA11CE")
        .json(&serde_json::json!({ "fingerprint": "0x1234" }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.error, "InputError");

    let response = client
        .post(format!("{}/documents", base_url))
        .header(PRINCIPAL_HEADER, "0xA11CE")
        .json(&serde_json::json!({ "fingerprint": Fingerprint::ZERO.to_string() }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/documents", base_url))
        .header(PRINCIPAL_HEADER, "0xA11CE")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.error, "InputError");

    let unknown_document_id = fingerprint_bytes(CONTRACT_V1).to_string();
    let response = client
        .get(format!("{}/documents/{}/latest", base_url, unknown_document_id))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_body(response).await.error, "LedgerConflict");
    let response = client
        .put(format!("{}/documents/{}", base_url, unknown_document_id))
        .header(PRINCIPAL_HEADER, "0xA11CE")
        .json(&serde_json::json!({ "fingerprint": fingerprint_bytes(CONTRACT_V2).to_string() }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    service_handle.abort();
}

#[tokio::test]
async fn test_service_analyzer_failures_are_gateway_errors() {
    let (crashing_handle, crashing_url) =
        spawn_and_wait(service_config(18403, "echo 'model missing' >&2; exit 4")).await;
    let mut slow_service_config = service_config(18404, "sleep 10");
    slow_service_config.analyzer_timeout_seconds = 1;
    let (slow_handle, slow_url) = spawn_and_wait(slow_service_config).await;
    let client = test_util::REQWEST_CLIENT.clone();

    let response = client
        .post(format!("{}/analyze", crashing_url))
        .multipart(pdf_form(CONTRACT_V1, "application/pdf"))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = error_body(response).await;
    assert_eq!(body.error, "AnalyzerUnavailable");
    assert_eq!(body.analyzer_exit_code_o, Some(4));

    let response = client
        .post(format!("{}/analyze", slow_url))
        .multipart(pdf_form(CONTRACT_V1, "application/pdf"))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = error_body(response).await;
    assert_eq!(body.error, "AnalyzerUnavailable");
    assert_eq!(body.analyzer_exit_code_o, None);

    crashing_handle.abort();
    slow_handle.abort();
}

#[tokio::test]
async fn test_service_zero_sentinel_policy_on_sqlite() {
    let mut service_config = service_config(18405, NDA_ANALYZER_SCRIPT);
    service_config.database_url = "sqlite::memory:".to_string();
    service_config.missing_identity_policy = MissingIdentityPolicy::ZeroSentinel;
    let (service_handle, base_url) = spawn_and_wait(service_config).await;
    let client = test_util::REQWEST_CLIENT.clone();

    let fingerprint_v1 = fingerprint_bytes(CONTRACT_V1).to_string();
    let response = client
        .get(format!("{}/documents/{}/latest", base_url, fingerprint_v1))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass")["latestFingerprint"],
        serde_json::json!(Fingerprint::ZERO.to_string())
    );
    let response = client
        .get(format!(
            "{}/documents/{}/verify/{}",
            base_url, fingerprint_v1, fingerprint_v1
        ))
        .send()
        .await
        .expect("pass");
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass")["isLatest"],
        serde_json::json!(false)
    );

    let response = client
        .post(format!("{}/documents", base_url))
        .header(PRINCIPAL_HEADER, "0xA11CE")
        .json(&serde_json::json!({ "fingerprint": fingerprint_v1 }))
        .send()
        .await
        .expect("pass");
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = client
        .get(format!("{}/documents/{}/latest", base_url, fingerprint_v1))
        .send()
        .await
        .expect("pass");
    assert_eq!(
        response.json::<serde_json::Value>().await.expect("pass")["latestFingerprint"],
        serde_json::json!(fingerprint_v1)
    );

    service_handle.abort();
}

#[tokio::test]
async fn test_unsupported_database_scheme_is_an_error() {
    let mut service_config = service_config(18406, NDA_ANALYZER_SCRIPT);
    service_config.database_url = "postgres:///contract_ledger".to_string();
    assert!(contract_ledger_service_lib::spawn_service(service_config)
        .await
        .is_err());
}
