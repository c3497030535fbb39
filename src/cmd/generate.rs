use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use learngen::config::parse_port;
use learngen::{PrefKey, PrefStore, Submitter};

use super::output::{output_request, output_result};
use super::{build_client, resolve_endpoint};
use crate::{FormArgs, GlobalArgs};

pub async fn cmd_generate(
    global: &GlobalArgs,
    form: FormArgs,
    dry_run: bool,
    save_endpoint: bool,
) -> Result<()> {
    let request = form.into_form()?.into_request()?;

    if save_endpoint {
        save_endpoint_prefs(global)?;
    }

    if dry_run {
        return output_request(&request, global.format);
    }

    let endpoint = resolve_endpoint(global)?;
    let client = build_client(global, &endpoint)?;
    let submitter = Submitter::new(client);

    if global.format == crate::OutputFormat::Text {
        let (width, height) = request.visuals.dimensions();
        println!(
            "🚀 Submitting \"{}\" to {}:{} ({width}x{height}, {} min)",
            request.topic, endpoint.host, endpoint.port, request.length.value
        );
        println!("   This runs the full render pipeline and can take several minutes...");
    }

    let start = Instant::now();
    let outcome = submitter
        .submit(&request)
        .await
        .context("generation request failed")?;
    info!(elapsed_ms = start.elapsed().as_millis(), "Submission complete");

    let title = format!(
        "Generation complete in {:.1}s",
        start.elapsed().as_secs_f64()
    );
    output_result(
        &title,
        &outcome.response,
        &outcome.media,
        &endpoint,
        global.format,
    )
}

fn save_endpoint_prefs(global: &GlobalArgs) -> Result<()> {
    if global.host.is_none() && global.port.is_none() {
        anyhow::bail!("--save-endpoint needs --host and/or --port");
    }

    let port = global.port.as_deref().map(str::trim);
    if let Some(port) = port {
        if parse_port(port).is_none() {
            anyhow::bail!("invalid port '{port}'");
        }
    }

    let mut prefs = PrefStore::open_default().context("failed to load saved preferences")?;
    if let Some(host) = &global.host {
        prefs.set(PrefKey::Host, host.trim())?;
    }
    if let Some(port) = port {
        prefs.set(PrefKey::Port, port)?;
    }
    info!(path = %prefs.path().display(), "Saved orchestrator endpoint");
    Ok(())
}
