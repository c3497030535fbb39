//! Request payloads accepted by the orchestration API.
//!
//! The shape is fixed by the backend; field names and defaults match its
//! `/v1/generate` and `/v1/plan` schema.

use serde::{Deserialize, Serialize};

/// Default voice model shipped with the orchestrator image.
pub const DEFAULT_SPEAKER: &str = "/workspace/learn-gen/voices/piper/en_US-norman-medium.onnx";
/// Default illustration style.
pub const DEFAULT_STYLE: &str = "kurzgesagt-flat-vector";

/// Full generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    pub length: Length,
    pub research: Research,
    pub visuals: Visuals,
    pub voice: Voice,
    pub structure: Structure,
}

impl GenerateRequest {
    /// Request for `topic` with every other field at its default.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            length: Length::default(),
            research: Research::default(),
            visuals: Visuals::default(),
            voice: Voice::default(),
            structure: Structure::default(),
        }
    }

    /// Narration word target (`minutes * pace_wpm`).
    pub fn narration_budget(&self) -> u32 {
        self.length.value.saturating_mul(self.voice.pace_wpm)
    }

    /// Animated beat target (`minutes * beats_per_min`).
    pub fn beat_budget(&self) -> u32 {
        self.length.value.saturating_mul(self.structure.beats_per_min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Min,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Length {
    pub unit: LengthUnit,
    pub value: u32,
}

impl Default for Length {
    fn default() -> Self {
        Self {
            unit: LengthUnit::Min,
            value: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Research {
    pub web_search: bool,
    pub sources: Vec<String>,
}

/// When the orchestrator should render generated background images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    #[default]
    Auto,
    None,
    Force,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    #[default]
    Cinematic,
    Infographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    #[default]
    Landscape,
    Portrait,
    Square,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visuals {
    pub use_generated_images: ImageMode,
    pub style: String,
    pub fps: u32,
    pub animation_mode: AnimationMode,
    pub aspect: Aspect,
    /// Pixel height of the frame; width follows from `aspect`
    pub target_height: u32,
}

impl Default for Visuals {
    fn default() -> Self {
        Self {
            use_generated_images: ImageMode::Auto,
            style: DEFAULT_STYLE.to_string(),
            fps: 30,
            animation_mode: AnimationMode::Cinematic,
            aspect: Aspect::Landscape,
            target_height: 1080,
        }
    }
}

impl Visuals {
    /// Output frame size `(width, height)` the orchestrator will render.
    pub fn dimensions(&self) -> (u32, u32) {
        let h = self.target_height;
        match self.aspect {
            Aspect::Portrait => (scale(h, 9, 16), h),
            Aspect::Square => (h, h),
            Aspect::Landscape => (scale(h, 16, 9), h),
        }
    }
}

/// `value * num / den` rounded half to even, the way the orchestrator sizes frames.
fn scale(value: u32, num: u32, den: u32) -> u32 {
    let (scaled, den) = (u64::from(value) * u64::from(num), u64::from(den));
    let (quotient, remainder) = (scaled / den, scaled % den);
    let rounded = match (remainder * 2).cmp(&den) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
        std::cmp::Ordering::Less => quotient,
    };
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Absolute path to the TTS voice model on the orchestrator host
    pub speaker: String,
    pub pace_wpm: u32,
    pub tone: String,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            speaker: DEFAULT_SPEAKER.to_string(),
            pace_wpm: 145,
            tone: "energetic".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub beats_per_min: u32,
    pub cta: bool,
    pub quizlets: u32,
}

impl Default for Structure {
    fn default() -> Self {
        Self {
            beats_per_min: 9,
            cta: false,
            quizlets: 0,
        }
    }
}

/// Single procedural animation clip (`/v1/anim`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimTask {
    /// Free-form clip description, e.g. `{"kind": "timeline", "items": [...]}`
    pub spec: serde_json::Value,
    #[serde(default = "default_anim_duration")]
    pub duration_s: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// Clip length the backend assumes when none is given.
pub const DEFAULT_ANIM_DURATION: f64 = 6.0;

fn default_anim_duration() -> f64 {
    DEFAULT_ANIM_DURATION
}

/// Narration synthesis (`/v1/voice`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsTask {
    pub text: String,
    pub model_path: String,
}

/// Still image generation (`/v1/images`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTask {
    pub prompt: String,
    pub size: u32,
    pub seed: u64,
}

impl ImageTask {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: 768,
            seed: 42,
        }
    }
}
