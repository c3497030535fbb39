use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use learngen::extract_media_with_prefix;

use super::output::print_media_entries;
use crate::OutputFormat;

pub fn cmd_media(input: &Path, prefix: &str, format: OutputFormat) -> Result<()> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };

    let payload: Value = serde_json::from_str(&raw).context("input is not valid JSON")?;
    let entries = extract_media_with_prefix(&payload, prefix);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => print_media_entries(&entries),
    }
    Ok(())
}
