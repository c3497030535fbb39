//! Generation form state and payload mapping
//!
//! Collects user-supplied parameters before submission:
//! - Every field starts unset and falls back to the orchestrator default
//! - Fields can be set by dotted name (`visuals.aspect=portrait`)
//! - `research.web_search` defaults from whether any sources were given
//! - Validation happens once, when the form is turned into a request

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

use crate::request::{
    AnimationMode, Aspect, GenerateRequest, ImageMode, Length, LengthUnit, Research, Structure,
    Visuals, Voice,
};

/// Field names accepted by [`GenerateForm::set_field`].
pub const FIELD_NAMES: &[&str] = &[
    "topic",
    "length.value",
    "research.web_search",
    "research.sources",
    "visuals.use_generated_images",
    "visuals.style",
    "visuals.fps",
    "visuals.animation_mode",
    "visuals.aspect",
    "visuals.target_height",
    "voice.speaker",
    "voice.pace_wpm",
    "voice.tone",
    "structure.beats_per_min",
    "structure.cta",
    "structure.quizlets",
];

/// Form validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("topic is required")]
    MissingTopic,

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("invalid value for {field}: '{value}' ({expected})")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("invalid field format: '{0}'. Expected 'name=value'")]
    MalformedArg(String),
}

/// Unvalidated form state. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateForm {
    pub topic: Option<String>,
    pub minutes: Option<u32>,
    pub web_search: Option<bool>,
    pub sources: Vec<String>,
    pub images: Option<ImageMode>,
    pub style: Option<String>,
    pub fps: Option<u32>,
    pub animation_mode: Option<AnimationMode>,
    pub aspect: Option<Aspect>,
    pub target_height: Option<u32>,
    pub speaker: Option<String>,
    pub pace_wpm: Option<u32>,
    pub tone: Option<String>,
    pub beats_per_min: Option<u32>,
    pub cta: Option<bool>,
    pub quizlets: Option<u32>,
}

impl GenerateForm {
    /// Set a single field by its dotted name.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let name = name.trim();
        match name {
            "topic" => self.topic = Some(value.to_string()),
            "length" | "length.value" => self.minutes = Some(parse(name, value, "integer")?),
            "research.web_search" | "web_search" => {
                self.web_search = Some(parse_bool(name, value)?);
            }
            "research.sources" | "sources" => self.sources = split_list(value),
            "visuals.use_generated_images" | "images" => {
                self.images = Some(parse_image_mode(name, value)?);
            }
            "visuals.style" | "style" => self.style = Some(value.to_string()),
            "visuals.fps" | "fps" => self.fps = Some(parse(name, value, "integer")?),
            "visuals.animation_mode" | "animation_mode" => {
                self.animation_mode = Some(parse_animation_mode(name, value)?);
            }
            "visuals.aspect" | "aspect" => self.aspect = Some(parse_aspect(name, value)?),
            "visuals.target_height" | "target_height" => {
                self.target_height = Some(parse(name, value, "integer")?);
            }
            "voice.speaker" | "speaker" => self.speaker = Some(value.to_string()),
            "voice.pace_wpm" | "pace_wpm" => self.pace_wpm = Some(parse(name, value, "integer")?),
            "voice.tone" | "tone" => self.tone = Some(value.to_string()),
            "structure.beats_per_min" | "beats_per_min" => {
                self.beats_per_min = Some(parse(name, value, "integer")?);
            }
            "structure.cta" | "cta" => self.cta = Some(parse_bool(name, value)?),
            "structure.quizlets" | "quizlets" => {
                self.quizlets = Some(parse(name, value, "integer")?);
            }
            _ => return Err(FormError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    /// Merge user-provided fields into the form, in key order.
    pub fn merge_fields(&mut self, user_fields: &BTreeMap<String, String>) -> Result<(), FormError> {
        for (key, value) in user_fields {
            self.set_field(key, value)?;
        }
        Ok(())
    }

    /// Effective `web_search` flag: explicit value, else on when sources exist.
    pub fn effective_web_search(&self) -> bool {
        self.web_search.unwrap_or(!self.sources.is_empty())
    }

    /// Validate and map the form into the fixed request payload.
    pub fn into_request(self) -> Result<GenerateRequest, FormError> {
        let web_search = self.effective_web_search();

        let topic = self
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(FormError::MissingTopic)?
            .to_string();

        let defaults_visuals = Visuals::default();
        let defaults_voice = Voice::default();
        let defaults_structure = Structure::default();

        Ok(GenerateRequest {
            topic,
            length: Length {
                unit: LengthUnit::Min,
                value: in_range("length.value", self.minutes, Length::default().value, 1, 60)?,
            },
            research: Research {
                web_search,
                sources: self.sources,
            },
            visuals: Visuals {
                use_generated_images: self.images.unwrap_or_default(),
                style: non_blank(self.style).unwrap_or(defaults_visuals.style),
                fps: in_range("visuals.fps", self.fps, defaults_visuals.fps, 1, 120)?,
                animation_mode: self.animation_mode.unwrap_or_default(),
                aspect: self.aspect.unwrap_or_default(),
                target_height: in_range(
                    "visuals.target_height",
                    self.target_height,
                    defaults_visuals.target_height,
                    144,
                    4320,
                )?,
            },
            voice: Voice {
                speaker: non_blank(self.speaker).unwrap_or(defaults_voice.speaker),
                pace_wpm: in_range(
                    "voice.pace_wpm",
                    self.pace_wpm,
                    defaults_voice.pace_wpm,
                    60,
                    300,
                )?,
                tone: non_blank(self.tone).unwrap_or(defaults_voice.tone),
            },
            structure: Structure {
                beats_per_min: in_range(
                    "structure.beats_per_min",
                    self.beats_per_min,
                    defaults_structure.beats_per_min,
                    1,
                    30,
                )?,
                cta: self.cta.unwrap_or(defaults_structure.cta),
                quizlets: in_range(
                    "structure.quizlets",
                    self.quizlets,
                    defaults_structure.quizlets,
                    0,
                    10,
                )?,
            },
        })
    }
}

/// Parse field arguments from CLI (e.g., "visuals.fps=24")
pub fn parse_field_args(field_args: &[String]) -> Result<BTreeMap<String, String>, FormError> {
    let mut fields = BTreeMap::new();

    for arg in field_args {
        let Some((name, value)) = arg.split_once('=') else {
            return Err(FormError::MalformedArg(arg.clone()));
        };
        if name.trim().is_empty() {
            return Err(FormError::MalformedArg(arg.clone()));
        }
        fields.insert(name.trim().to_string(), value.to_string());
    }

    Ok(fields)
}

fn in_range(
    field: &'static str,
    value: Option<u32>,
    default: u32,
    min: u32,
    max: u32,
) -> Result<u32, FormError> {
    let value = value.unwrap_or(default);
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FormError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn invalid(field: &str, value: &str, expected: &'static str) -> FormError {
    FormError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

fn parse<T: FromStr>(field: &str, value: &str, expected: &'static str) -> Result<T, FormError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(field, value, expected))
}

fn parse_bool(field: &str, value: &str) -> Result<bool, FormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(field, value, "true|false")),
    }
}

fn parse_image_mode(field: &str, value: &str) -> Result<ImageMode, FormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(ImageMode::Auto),
        "none" => Ok(ImageMode::None),
        "force" => Ok(ImageMode::Force),
        _ => Err(invalid(field, value, "auto|none|force")),
    }
}

fn parse_animation_mode(field: &str, value: &str) -> Result<AnimationMode, FormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "cinematic" => Ok(AnimationMode::Cinematic),
        "infographic" => Ok(AnimationMode::Infographic),
        _ => Err(invalid(field, value, "cinematic|infographic")),
    }
}

fn parse_aspect(field: &str, value: &str) -> Result<Aspect, FormError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "landscape" | "16:9" => Ok(Aspect::Landscape),
        "portrait" | "9:16" => Ok(Aspect::Portrait),
        "square" | "1:1" => Ok(Aspect::Square),
        _ => Err(invalid(field, value, "landscape|portrait|square")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_topic(topic: &str) -> GenerateForm {
        GenerateForm {
            topic: Some(topic.to_string()),
            ..GenerateForm::default()
        }
    }

    #[test]
    fn test_defaults_match_request_defaults() {
        let request = form_with_topic("Volcanoes").into_request().unwrap();
        assert_eq!(request, GenerateRequest::new("Volcanoes"));
    }

    #[test]
    fn test_topic_is_trimmed_and_required() {
        assert_eq!(
            GenerateForm::default().into_request(),
            Err(FormError::MissingTopic)
        );
        assert_eq!(
            form_with_topic("   ").into_request(),
            Err(FormError::MissingTopic)
        );
        let request = form_with_topic("  Tides \n").into_request().unwrap();
        assert_eq!(request.topic, "Tides");
    }

    #[test]
    fn test_web_search_derived_from_sources() {
        let mut form = form_with_topic("Coral reefs");
        assert!(!form.effective_web_search());

        form.set_field("research.sources", "https://a.org, https://b.org,,")
            .unwrap();
        assert_eq!(form.sources, vec!["https://a.org", "https://b.org"]);
        assert!(form.effective_web_search());

        let request = form.clone().into_request().unwrap();
        assert!(request.research.web_search);

        form.set_field("research.web_search", "false").unwrap();
        assert!(!form.into_request().unwrap().research.web_search);
    }

    #[test]
    fn test_set_field_by_dotted_and_short_name() {
        let mut form = form_with_topic("Rust");
        form.set_field("visuals.aspect", "portrait").unwrap();
        form.set_field("fps", "24").unwrap();
        form.set_field("images", "NONE").unwrap();
        form.set_field("length", "5").unwrap();
        form.set_field("structure.cta", "yes").unwrap();

        let request = form.into_request().unwrap();
        assert_eq!(request.visuals.aspect, Aspect::Portrait);
        assert_eq!(request.visuals.fps, 24);
        assert_eq!(request.visuals.use_generated_images, ImageMode::None);
        assert_eq!(request.length.value, 5);
        assert!(request.structure.cta);
    }

    #[test]
    fn test_unknown_field() {
        let mut form = GenerateForm::default();
        assert_eq!(
            form.set_field("visuals.colour", "red"),
            Err(FormError::UnknownField("visuals.colour".to_string()))
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut form = GenerateForm::default();
        assert!(matches!(
            form.set_field("visuals.fps", "fast"),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.set_field("visuals.aspect", "wide"),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.set_field("structure.cta", "maybe"),
            Err(FormError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_out_of_range() {
        let mut form = form_with_topic("Stars");
        form.set_field("length.value", "0").unwrap();
        assert_eq!(
            form.into_request(),
            Err(FormError::OutOfRange {
                field: "length.value",
                min: 1,
                max: 60,
                value: 0
            })
        );

        let mut form = form_with_topic("Stars");
        form.set_field("voice.pace_wpm", "500").unwrap();
        assert!(matches!(
            form.into_request(),
            Err(FormError::OutOfRange {
                field: "voice.pace_wpm",
                ..
            })
        ));
    }

    #[test]
    fn test_blank_strings_fall_back_to_defaults() {
        let mut form = form_with_topic("Moss");
        form.set_field("voice.speaker", "  ").unwrap();
        form.set_field("visuals.style", "").unwrap();
        let request = form.into_request().unwrap();
        assert_eq!(request.voice.speaker, Voice::default().speaker);
        assert_eq!(request.visuals.style, Visuals::default().style);
    }

    #[test]
    fn test_parse_field_args() {
        let args = vec![
            "topic=Deep sea".to_string(),
            "visuals.style=paper=cut".to_string(),
        ];

        let fields = parse_field_args(&args).unwrap();
        assert_eq!(fields.get("topic"), Some(&"Deep sea".to_string()));
        assert_eq!(fields.get("visuals.style"), Some(&"paper=cut".to_string()));

        assert_eq!(
            parse_field_args(&["novalue".to_string()]),
            Err(FormError::MalformedArg("novalue".to_string()))
        );
        assert!(parse_field_args(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_merge_fields() {
        let mut form = GenerateForm::default();
        let fields = BTreeMap::from([
            ("topic".to_string(), "Glaciers".to_string()),
            ("visuals.target_height".to_string(), "720".to_string()),
        ]);

        form.merge_fields(&fields).unwrap();

        let request = form.into_request().unwrap();
        assert_eq!(request.topic, "Glaciers");
        assert_eq!(request.visuals.dimensions(), (1280, 720));
    }

    #[test]
    fn test_field_names_are_all_settable() {
        for name in FIELD_NAMES {
            let mut form = GenerateForm::default();
            let value = match *name {
                "research.web_search" | "structure.cta" => "true",
                "visuals.use_generated_images" => "auto",
                "visuals.animation_mode" => "cinematic",
                "visuals.aspect" => "square",
                "topic" | "research.sources" | "visuals.style" | "voice.speaker"
                | "voice.tone" => "x",
                _ => "3",
            };
            assert!(form.set_field(name, value).is_ok(), "{name}");
        }
    }
}
