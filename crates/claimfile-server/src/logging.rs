use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str =
    "claimfile_server=info,claimfile_enrich=info,claimfile_core=info,tower_http=info";

/// Installs the global subscriber. `format` is `LOG_FORMAT`: "json" emits one
/// JSON object per line, anything else the human-readable text format.
pub fn init(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if format.eq_ignore_ascii_case("json") {
        builder.json().with_current_span(true).init();
    } else {
        builder.init();
    }
}
