pub mod asset;
pub mod generate;
pub mod media;
pub mod output;
pub mod plan;
pub mod prefs;

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use learngen::{ApiClient, Endpoint, EndpointSources, PrefStore};

use crate::GlobalArgs;

/// Resolve the orchestrator endpoint from flags, env, and saved preferences.
pub fn resolve_endpoint(global: &GlobalArgs) -> Result<Endpoint> {
    let prefs = PrefStore::open_default().context("failed to load saved preferences")?;
    let sources = EndpointSources::gather(global.host.as_deref(), global.port.as_deref(), &prefs);
    let endpoint = Endpoint::resolve(&sources)?;
    debug!(
        host = %endpoint.host,
        host_origin = %endpoint.host_origin,
        port = endpoint.port,
        port_origin = %endpoint.port_origin,
        "Resolved orchestrator endpoint"
    );
    Ok(endpoint)
}

/// Create an API client for the resolved endpoint.
pub fn build_client(global: &GlobalArgs, endpoint: &Endpoint) -> Result<ApiClient> {
    let base = endpoint.base_url()?;
    let client = ApiClient::new(&base, Duration::from_secs(global.timeout))
        .context("failed to create HTTP client")?;
    Ok(client)
}
