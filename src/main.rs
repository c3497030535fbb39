//! `learngen` CLI - submit video generation jobs and inspect their results

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use learngen::{parse_field_args, FormError, GenerateForm};

#[derive(Parser)]
#[command(name = "learngen")]
#[command(about = "Submit video generation jobs to a Learn-Gen orchestrator")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Orchestrator host (overrides LEARNGEN_HOST and saved preference)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Orchestrator port (overrides LEARNGEN_PORT and saved preference)
    #[arg(long, global = true)]
    pub port: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "1800")]
    pub timeout: u64,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Generation parameters, mapped onto the request form.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Video topic
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Target length in minutes
    #[arg(short, long)]
    pub minutes: Option<String>,

    /// Frame aspect (landscape, portrait, square)
    #[arg(short, long)]
    pub aspect: Option<String>,

    /// Frame height in pixels; width follows from the aspect
    #[arg(long)]
    pub height: Option<String>,

    /// Frames per second
    #[arg(long)]
    pub fps: Option<String>,

    /// Generated background images (auto, none, force)
    #[arg(long)]
    pub images: Option<String>,

    /// Animation mode (cinematic, infographic)
    #[arg(long)]
    pub animation_mode: Option<String>,

    /// Illustration style
    #[arg(long)]
    pub style: Option<String>,

    /// Path to the voice model on the orchestrator host
    #[arg(long)]
    pub speaker: Option<String>,

    /// Narration pace in words per minute
    #[arg(long)]
    pub pace: Option<String>,

    /// Narration tone
    #[arg(long)]
    pub tone: Option<String>,

    /// Research source URL (repeatable); enables web search unless --web-search=false
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Enable or disable web research explicitly
    #[arg(long)]
    pub web_search: Option<String>,

    /// Animated beats per minute
    #[arg(long)]
    pub beats_per_min: Option<String>,

    /// End with a call to action
    #[arg(long)]
    pub cta: bool,

    /// Number of quiz beats
    #[arg(long)]
    pub quizlets: Option<String>,

    /// Raw form field override (e.g., -f visuals.fps=24); applied last
    #[arg(short = 'f', long = "field")]
    pub fields: Vec<String>,
}

impl FormArgs {
    /// Build form state: flags first, then `--field` overrides.
    pub fn into_form(self) -> Result<GenerateForm, FormError> {
        let mut form = GenerateForm::default();

        let flags = [
            ("topic", self.topic),
            ("length.value", self.minutes),
            ("visuals.aspect", self.aspect),
            ("visuals.target_height", self.height),
            ("visuals.fps", self.fps),
            ("visuals.use_generated_images", self.images),
            ("visuals.animation_mode", self.animation_mode),
            ("visuals.style", self.style),
            ("voice.speaker", self.speaker),
            ("voice.pace_wpm", self.pace),
            ("voice.tone", self.tone),
            ("research.web_search", self.web_search),
            ("structure.beats_per_min", self.beats_per_min),
            ("structure.quizlets", self.quizlets),
        ];
        for (name, value) in flags {
            if let Some(value) = value {
                form.set_field(name, &value)?;
            }
        }

        form.sources = self.sources;
        if self.cta {
            form.cta = Some(true);
        }

        let overrides = parse_field_args(&self.fields)?;
        form.merge_fields(&overrides)?;
        Ok(form)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a generation job and show the rendered media
    Generate {
        #[command(flatten)]
        form: FormArgs,

        /// Print the request payload without submitting
        #[arg(long)]
        dry_run: bool,

        /// Remember --host/--port for future runs
        #[arg(long)]
        save_endpoint: bool,
    },

    /// Draft a lesson plan without rendering
    Plan {
        #[command(flatten)]
        form: FormArgs,
    },

    /// List media references found in a JSON response
    Media {
        /// JSON file to scan ("-" for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Root label for entry paths
        #[arg(long, default_value = learngen::media::DEFAULT_PREFIX)]
        prefix: String,
    },

    /// Show or change the saved orchestrator host/port
    Prefs {
        #[command(subcommand)]
        action: cmd::prefs::PrefsAction,
    },

    /// Call a single asset endpoint
    Asset {
        #[command(subcommand)]
        kind: cmd::asset::AssetCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose);

    match cli.command {
        Commands::Generate {
            form,
            dry_run,
            save_endpoint,
        } => {
            cmd::generate::cmd_generate(&cli.global, form, dry_run, save_endpoint).await?;
        }
        Commands::Plan { form } => {
            cmd::plan::cmd_plan(&cli.global, form).await?;
        }
        Commands::Media { input, prefix } => {
            cmd::media::cmd_media(&input, &prefix, cli.global.format)?;
        }
        Commands::Prefs { action } => {
            cmd::prefs::cmd_prefs(action, cli.global.format)?;
        }
        Commands::Asset { kind } => {
            cmd::asset::cmd_asset(&cli.global, kind).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
