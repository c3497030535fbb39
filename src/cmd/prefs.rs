use anyhow::Result;
use clap::Subcommand;
use serde_json::{Map, Value};

use learngen::config::parse_port;
use learngen::{PrefKey, PrefStore};

use crate::OutputFormat;

#[derive(Subcommand, Debug, Clone)]
pub enum PrefsAction {
    /// Show all saved values
    Show,
    /// Print one saved value (host or port)
    Get { key: String },
    /// Save a value (host or port)
    Set { key: String, value: String },
    /// Forget a value (host or port)
    Clear { key: String },
}

pub fn cmd_prefs(action: PrefsAction, format: OutputFormat) -> Result<()> {
    let mut store = PrefStore::open_default()?;

    match action {
        PrefsAction::Show => {
            if format == OutputFormat::Json {
                let map: Map<String, Value> = PrefKey::ALL
                    .iter()
                    .map(|k| {
                        let value = store.get(*k).map_or(Value::Null, Value::from);
                        (k.to_string(), value)
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                println!("📂 {}", store.path().display());
                for key in PrefKey::ALL {
                    println!("   {key}: {}", store.get(key).unwrap_or("(unset)"));
                }
            }
        }
        PrefsAction::Get { key } => {
            let key: PrefKey = key.parse()?;
            match store.get(key) {
                Some(value) => println!("{value}"),
                None => anyhow::bail!("{key} is not set"),
            }
        }
        PrefsAction::Set { key, value } => {
            let key: PrefKey = key.parse()?;
            let value = value.trim();
            if key == PrefKey::Port && parse_port(value).is_none() {
                anyhow::bail!("invalid port '{value}'");
            }
            store.set(key, value)?;
            println!("Saved {key} = {value}");
        }
        PrefsAction::Clear { key } => {
            let key: PrefKey = key.parse()?;
            store.clear(key)?;
            println!("Cleared {key}");
        }
    }

    Ok(())
}
