use anyhow::{Context, Result};
use serde_json::Value;

use super::{build_client, resolve_endpoint};
use crate::{FormArgs, GlobalArgs, OutputFormat};

pub async fn cmd_plan(global: &GlobalArgs, form: FormArgs) -> Result<()> {
    let request = form.into_form()?.into_request()?;
    let endpoint = resolve_endpoint(global)?;
    let client = build_client(global, &endpoint)?;

    let plan = client
        .plan(&request)
        .await
        .context("plan request failed")?;

    if global.format == OutputFormat::Text {
        let sections = plan
            .get("sections")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);
        let beats: usize = sections
            .iter()
            .filter_map(|s| s.get("beats").and_then(Value::as_array))
            .map(Vec::len)
            .sum();
        println!(
            "📋 Plan for \"{}\": {} sections, {beats} beats",
            request.topic,
            sections.len()
        );
        for section in sections {
            let id = section.get("id").and_then(Value::as_str).unwrap_or("?");
            let goal = section.get("goal").and_then(Value::as_str).unwrap_or("");
            println!("   • {id}: {goal}");
        }
        println!();
    }

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
