//! Single in-flight generation submission
//!
//! A [`Submitter`] owns the idle/submitting/failed status for one client.
//! A second `submit` while the first is outstanding is rejected with
//! [`ApiError::Busy`] without touching the network. A submission whose
//! future is dropped before it completes leaves the status `Failed`, so the
//! next `submit` goes through.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{info, warn};

use crate::client::{ApiClient, ApiError};
use crate::media::{extract_media, first_local, first_remote, MediaEntry};
use crate::request::GenerateRequest;

/// Where the submission lifecycle currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Failed(String),
}

/// Parsed result of a successful generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub response: Value,
    pub media: Vec<MediaEntry>,
}

impl GenerationOutcome {
    pub fn from_response(response: Value) -> Self {
        let media = extract_media(&response);
        Self { response, media }
    }

    /// First remote video, previewable inline.
    pub fn preview(&self) -> Option<&MediaEntry> {
        first_remote(&self.media)
    }

    /// First local video path, to be copied off the orchestrator host.
    pub fn local_copy(&self) -> Option<&MediaEntry> {
        first_local(&self.media)
    }

    /// The `final_mp4` field the orchestrator reports, if it is a string.
    pub fn final_video(&self) -> Option<&str> {
        self.response.get("final_mp4").and_then(Value::as_str)
    }
}

/// Guards a client so only one generation runs at a time.
#[derive(Debug, Clone)]
pub struct Submitter {
    client: ApiClient,
    status: Arc<Mutex<SubmissionStatus>>,
}

/// Status message left behind when a submission is dropped mid-flight.
pub const CANCELLED: &str = "submission cancelled";

fn lock(status: &Mutex<SubmissionStatus>) -> MutexGuard<'_, SubmissionStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the `Submitting` state for one request; resets it when dropped.
struct InFlight {
    status: Arc<Mutex<SubmissionStatus>>,
    done: bool,
}

impl InFlight {
    fn finish(mut self, next: SubmissionStatus) {
        *lock(&self.status) = next;
        self.done = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.done {
            warn!("Submission dropped before completion");
            *lock(&self.status) = SubmissionStatus::Failed(CANCELLED.to_string());
        }
    }
}

impl Submitter {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: Arc::new(Mutex::new(SubmissionStatus::Idle)),
        }
    }

    /// Current status snapshot.
    pub fn status(&self) -> SubmissionStatus {
        lock(&self.status).clone()
    }

    /// Submit `request` unless another submission is outstanding.
    pub async fn submit(&self, request: &GenerateRequest) -> Result<GenerationOutcome, ApiError> {
        let in_flight = {
            let mut status = lock(&self.status);
            if *status == SubmissionStatus::Submitting {
                warn!("Rejecting submission while another is in flight");
                return Err(ApiError::Busy);
            }
            *status = SubmissionStatus::Submitting;
            InFlight {
                status: Arc::clone(&self.status),
                done: false,
            }
        };

        match self.client.generate(request).await {
            Ok(response) => {
                in_flight.finish(SubmissionStatus::Idle);
                let outcome = GenerationOutcome::from_response(response);
                info!(media = outcome.media.len(), "Generation finished");
                Ok(outcome)
            }
            Err(e) => {
                in_flight.finish(SubmissionStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}
