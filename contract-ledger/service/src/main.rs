use contract_ledger_service_lib::{LogFormat, ServiceConfig};

/// Contract ledger HTTP service: analyzes uploaded PDF contracts and records their version
/// chains.
#[derive(clap::Parser)]
pub struct Root {
    #[command(flatten)]
    pub service_config: ServiceConfig,
    /// Specify the format of the logs.
    #[arg(
        name = "log-format",
        env = "CONTRACT_LEDGER_LOG_FORMAT",
        long,
        value_name = "FORMAT",
        default_value = "compact",
        value_enum
    )]
    pub log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Ignore errors, since there may not be a .env file (e.g. in docker image)
    let _ = dotenvy::dotenv();

    use clap::Parser;
    let root = Root::parse();

    contract_ledger_service_lib::init_logging(root.log_format)?;

    tracing::info!(
        listen_port = root.service_config.listen_port,
        database_url = %root.service_config.database_url,
        analyzer_program = %root.service_config.analyzer_program,
        missing_identity_policy = ?root.service_config.missing_identity_policy,
        "starting contract-ledger service"
    );
    let service_join_handle = contract_ledger_service_lib::spawn_service(root.service_config).await?;

    let result = service_join_handle.await;
    match &result {
        Ok(()) => tracing::info!("contract-ledger service shut down"),
        Err(err) => tracing::error!("contract-ledger service terminated with error: {}", err),
    }
    result?;
    Ok(())
}
