//! Log output for the binaries.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "animal_shelter=info,api_server=info,preflight=info,tower_http=info";

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`]. Calling it twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
