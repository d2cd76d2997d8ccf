/// Output format of the log lines written to stderr.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    JSON,
    Pretty,
}

/// Install the global tracing subscriber.  Logs go to stderr so that stdout stays free for
/// command output.  The level filter comes from the RUST_LOG env var.
pub fn init_logging(log_format: LogFormat) -> anyhow::Result<()> {
    let tracing_subscriber_fmt = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_span_events(
            tracing_subscriber::fmt::format::FmtSpan::NEW
                | tracing_subscriber::fmt::format::FmtSpan::CLOSE,
        )
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());

    let result = match log_format {
        LogFormat::Compact => tracing_subscriber_fmt.compact().try_init(),
        LogFormat::JSON => tracing_subscriber_fmt.json().try_init(),
        LogFormat::Pretty => tracing_subscriber_fmt.pretty().try_init(),
    };
    result.map_err(|err| anyhow::anyhow!("can't initialize logging: {}", err))
}
