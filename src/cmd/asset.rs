use anyhow::{Context, Result};
use clap::Subcommand;

use learngen::request::DEFAULT_SPEAKER;
use learngen::{extract_media, AnimTask, ImageTask, TtsTask};

use super::output::output_result;
use super::{build_client, resolve_endpoint};
use crate::GlobalArgs;

#[derive(Subcommand, Debug, Clone)]
pub enum AssetCommand {
    /// Render one procedural animation clip
    Anim {
        /// Clip description as JSON, e.g. '{"kind":"timeline","items":["A","B"]}'
        #[arg(long, default_value = r#"{"kind":"diagram"}"#)]
        spec: String,
        /// Clip duration in seconds
        #[arg(long, default_value = "6.0")]
        duration: f64,
        /// On-screen title
        #[arg(long, default_value = "")]
        title: String,
        /// On-screen bullet (repeatable)
        #[arg(long = "bullet")]
        bullets: Vec<String>,
    },
    /// Synthesize narration audio
    Voice {
        /// Text to speak
        #[arg(long)]
        text: String,
        /// Voice model path on the orchestrator host
        #[arg(long, default_value = DEFAULT_SPEAKER)]
        model_path: String,
    },
    /// Transcribe a WAV file on the orchestrator host into subtitles
    Captions {
        /// WAV path on the orchestrator host
        #[arg(long)]
        wav: String,
    },
    /// Generate still images
    Images {
        /// Image prompt (repeatable)
        #[arg(long = "prompt", required = true)]
        prompts: Vec<String>,
        /// Square edge in pixels
        #[arg(long, default_value = "768")]
        size: u32,
        /// Base seed; each prompt gets seed + index
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

pub async fn cmd_asset(global: &GlobalArgs, kind: AssetCommand) -> Result<()> {
    let endpoint = resolve_endpoint(global)?;
    let client = build_client(global, &endpoint)?;

    let (title, response) = match kind {
        AssetCommand::Anim {
            spec,
            duration,
            title,
            bullets,
        } => {
            if !(duration.is_finite() && duration > 0.0) {
                anyhow::bail!("--duration must be a positive number of seconds");
            }
            let spec = serde_json::from_str(&spec).context("--spec is not valid JSON")?;
            let task = AnimTask {
                spec,
                duration_s: duration,
                title,
                bullets,
            };
            ("Animation rendered", client.anim(&task).await?)
        }
        AssetCommand::Voice { text, model_path } => {
            let task = TtsTask { text, model_path };
            ("Narration synthesized", client.voice(&task).await?)
        }
        AssetCommand::Captions { wav } => ("Captions created", client.captions(&wav).await?),
        AssetCommand::Images {
            prompts,
            size,
            seed,
        } => {
            let tasks: Vec<ImageTask> = prompts
                .into_iter()
                .zip(0u64..)
                .map(|(prompt, i)| ImageTask {
                    prompt,
                    size,
                    seed: seed.wrapping_add(i),
                })
                .collect();
            ("Images generated", client.images(&tasks).await?)
        }
    };

    let media = extract_media(&response);
    output_result(title, &response, &media, &endpoint, global.format)
}
