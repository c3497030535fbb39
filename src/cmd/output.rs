use anyhow::Result;
use serde_json::{json, Value};

use learngen::{first_local, first_remote, Endpoint, GenerateRequest, MediaEntry};

use crate::OutputFormat;

/// Print the media table, or a note when there is none.
pub fn print_media_entries(entries: &[MediaEntry]) {
    if entries.is_empty() {
        println!("No media references found");
        return;
    }

    let width = entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
    for entry in entries {
        let kind = if entry.is_remote { "remote" } else { "local" };
        println!("  {:<width$}  {kind:<6}  {}", entry.label, entry.value);
    }
    println!("\n({} media references)", entries.len());
}

/// Print the outcome of a request that returned a JSON payload.
pub fn output_result(
    title: &str,
    response: &Value,
    media: &[MediaEntry],
    endpoint: &Endpoint,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        let body = json!({
            "ok": true,
            "response": response,
            "media": media,
            "preview": first_remote(media).map(|e| &e.value),
            "local": first_local(media).map(|e| &e.value),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("✅ {title}");
    if let Some(status) = response.get("status").and_then(Value::as_str) {
        println!("   Status: {status}");
    }

    if let Some(preview) = first_remote(media) {
        println!("🎬 Preview: {}", preview.value);
    }
    if let Some(local) = first_local(media) {
        println!("📁 Local file: {}", local.value);
        println!("   Copy with: scp {}:{} .", endpoint.host, local.value);
    }

    println!("\n📼 Media:");
    print_media_entries(media);
    Ok(())
}

/// Summarise a request before it is sent.
pub fn output_request(request: &GenerateRequest, format: OutputFormat) -> Result<()> {
    let payload = serde_json::to_string_pretty(request)?;
    if format == OutputFormat::Json {
        println!("{payload}");
        return Ok(());
    }

    let (width, height) = request.visuals.dimensions();
    println!("📝 Topic: {}", truncate_text(&request.topic, 60));
    println!(
        "   Length: {} min | Frame: {width}x{height} @ {} fps",
        request.length.value, request.visuals.fps
    );
    println!(
        "   Narration: ~{} words | Beats: {}",
        request.narration_budget(),
        request.beat_budget()
    );
    if request.research.web_search {
        println!(
            "   Research: web search, {} source(s)",
            request.research.sources.len()
        );
    }
    println!("\nPayload:\n{payload}");
    Ok(())
}

pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
