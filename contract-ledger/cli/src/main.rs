mod analyze_file;
mod analyzer_args;
mod document;
mod document_create;
mod document_history;
mod document_latest;
mod document_update;
mod document_verify;
mod fingerprint_file;
mod fingerprint_source_args;
mod ledger_db_args;
mod newline_args;
mod principal_args;
mod root;

pub use crate::{
    analyze_file::AnalyzeFile,
    analyzer_args::AnalyzerArgs,
    document::Document,
    document_create::DocumentCreate,
    document_history::DocumentHistory,
    document_latest::DocumentLatest,
    document_update::DocumentUpdate,
    document_verify::DocumentVerify,
    fingerprint_file::FingerprintFile,
    fingerprint_source_args::FingerprintSourceArgs,
    ledger_db_args::LedgerDBArgs,
    newline_args::NewlineArgs,
    principal_args::PrincipalArgs,
    root::Root,
};
pub use anyhow::{Error, Result};

/// Write the value as JSON to stdout, followed by a newline unless suppressed.
pub(crate) fn print_json<T: serde::Serialize>(value: &T, newline_args: &NewlineArgs) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    newline_args.print_newline_if_necessary(&mut stdout)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // It's necessary to specify EnvFilter::from_default_env in order to use RUST_LOG env var.
    // Logs go to stderr so that stdout carries only the JSON output.
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    use clap::Parser;
    // Note that if the env var RUST_BACKTRACE is set to 1 (or "full"), then the backtrace will be printed
    // to stderr if this returns error.
    Root::parse().handle().await
}
