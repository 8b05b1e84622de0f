use tracing_subscriber::EnvFilter;

/// Install the JSON-lines subscriber on stderr.
///
/// Each line carries `timestamp`, `level`, `target`, `message` and the event
/// fields (`correlation_id` on per-request events). `RUST_LOG` overrides the
/// default `info` filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
