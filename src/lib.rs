//! `learngen` - client for the Learn-Gen video orchestration API
//!
//! # Features
//!
//! - **Request form**: typed generation parameters with orchestrator defaults
//! - **Submission**: one in-flight `/v1/generate` call at a time
//! - **Media extraction**: finds rendered videos anywhere in a response payload
//! - **Preferences**: remembers the orchestrator host and port
//!
//! # Example
//!
//! ```rust,no_run
//! use learngen::{ApiClient, GenerateForm, Submitter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut form = GenerateForm::default();
//!     form.set_field("topic", "How tides work")?;
//!     form.set_field("visuals.aspect", "portrait")?;
//!
//!     let base = url::Url::parse("http://127.0.0.1:8000/")?;
//!     let client = ApiClient::new(&base, learngen::client::DEFAULT_TIMEOUT)?;
//!     let outcome = Submitter::new(client).submit(&form.into_request()?).await?;
//!
//!     if let Some(video) = outcome.preview() {
//!         println!("Preview: {}", video.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod form;
pub mod media;
pub mod prefs;
pub mod request;
pub mod submission;

pub use client::{ApiClient, ApiError};
pub use config::{Endpoint, EndpointError, EndpointSources, Origin};
pub use form::{parse_field_args, FormError, GenerateForm};
pub use media::{extract_media, extract_media_with_prefix, first_local, first_remote, MediaEntry};
pub use prefs::{PrefKey, PrefStore, PrefsError};
pub use request::{
    AnimTask, AnimationMode, Aspect, GenerateRequest, ImageMode, ImageTask, TtsTask,
};
pub use submission::{GenerationOutcome, SubmissionStatus, Submitter};

/// Version of learngen
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
