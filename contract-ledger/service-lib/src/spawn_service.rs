use crate::{services, ServiceAppState, ServiceConfig};
use anyhow::Context;
use contract_ledger_analyzer::{ProcessAnalyzer, ProcessTextExtractor};
use contract_ledger_orchestrator::Orchestrator;
use contract_ledger_store::{LedgerStorage, LedgerStore};
use std::sync::Arc;

/// Open the ledger backend named by the database URL: "mock://" for the in-process mock, and
/// anything starting with "sqlite:" for SQLite.
pub async fn create_ledger_store(service_config: &ServiceConfig) -> anyhow::Result<LedgerStore> {
    let database_url = service_config.database_url.as_str();
    let ledger_storage_a: Arc<dyn LedgerStorage> = if database_url.starts_with("mock://") {
        tracing::warn!("using the in-process mock ledger; nothing will be persisted");
        Arc::new(contract_ledger_storage_mock::LedgerStorageMock::new())
    } else if database_url.starts_with("sqlite:") {
        // Each connection to an in-memory database would see its own empty database.
        let is_in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let mut sqlite_pool_options = sqlx::sqlite::SqlitePoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(3));
        if is_in_memory {
            sqlite_pool_options = sqlite_pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            sqlite_pool_options =
                sqlite_pool_options.max_connections(service_config.database_max_connections);
        }
        let sqlite_pool = sqlite_pool_options
            .connect(database_url)
            .await
            .context("can't connect to database")?;
        Arc::new(
            contract_ledger_storage_sqlite::LedgerStorageSQLite::open_and_run_migrations(
                sqlite_pool,
            )
            .await?,
        )
    } else {
        anyhow::bail!(
            "unsupported database scheme; expected \"sqlite:\" or \"mock://\", database URL was: {:?}",
            database_url
        );
    };
    Ok(LedgerStore::new(ledger_storage_a)
        .with_missing_identity_policy(service_config.missing_identity_policy))
}

/// Build the ledger and analyzer gateway from config, then serve them.
pub async fn spawn_service(
    service_config: ServiceConfig,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    tracing::info!("{:?}", service_config);

    let ledger_store = create_ledger_store(&service_config).await?;
    let orchestrator = Orchestrator::new(
        Arc::new(ProcessAnalyzer::new(service_config.analyzer_config())),
        Arc::new(ProcessTextExtractor::new(
            service_config.text_extractor_process_config(),
        )),
        ledger_store,
    )
    .with_max_upload_bytes(service_config.max_upload_bytes);

    spawn_service_with_orchestrator(orchestrator, service_config.listen_port).await
}

pub async fn spawn_service_with_orchestrator(
    orchestrator: Orchestrator,
    listen_port: u16,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let service_app_state = ServiceAppState { orchestrator };

    let middleware_stack = tower::ServiceBuilder::new()
        .layer(tower_http::compression::CompressionLayer::new())
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .layer(tower_http::cors::CorsLayer::permissive())
        .into_inner();

    let app = axum::Router::new()
        .merge(services::analyze::get_routes(service_app_state.clone()))
        .merge(services::documents::get_routes(service_app_state.clone()))
        .merge(services::fingerprints::get_routes(service_app_state))
        .layer(middleware_stack)
        .route("/health", axum::routing::get(|| async { "OK" }));

    // This has to be 0.0.0.0 otherwise it won't work in a docker container.
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", listen_port))
        .await
        .with_context(|| format!("can't listen on port {}", listen_port))?;
    tracing::info!("contract-ledger service listening on port {}", listen_port);

    Ok(tokio::task::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("contract-ledger service stopped: {}", err);
        }
    }))
}
