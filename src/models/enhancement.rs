use garde::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

use crate::models::image::{validate_image_ref, ImageRef};

/// Overall strength of the enhancement.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnhancementLevel {
    #[default]
    Professional,
    Subtle,
    Dramatic,
}

/// Color grade applied by the final stage.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColorStyle {
    #[default]
    Natural,
    Warm,
    Cool,
    Vibrant,
    Corporate,
}

impl ColorStyle {
    /// Prompt fragment describing the grade. `Natural` means no grading.
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            Self::Natural => None,
            Self::Warm => Some("warm golden hour tones, welcoming atmosphere, soft warm lighting"),
            Self::Cool => Some("cool professional tones, modern corporate feel, crisp lighting"),
            Self::Vibrant => Some("vibrant saturated colors, dynamic energy, bright lighting"),
            Self::Corporate => {
                Some("neutral corporate tones, formal business atmosphere, balanced lighting")
            }
        }
    }
}

/// Background treatment. Unrecognised names are kept verbatim and are
/// rendered with the blur template; a blank name means `Original`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, EnumString, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BackgroundOption {
    #[default]
    Original,
    Blur,
    Office,
    StudioGray,
    StudioWhite,
    Bookshelf,
    Outdoor,
    Corporate,
    #[strum(disabled)]
    Custom(String),
}

impl BackgroundOption {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Original => "original",
            Self::Blur => "blur",
            Self::Office => "office",
            Self::StudioGray => "studio_gray",
            Self::StudioWhite => "studio_white",
            Self::Bookshelf => "bookshelf",
            Self::Outdoor => "outdoor",
            Self::Corporate => "corporate",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for BackgroundOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for BackgroundOption {
    fn from(value: String) -> Self {
        let name = value.trim();
        if name.is_empty() {
            return Self::Original;
        }
        name.parse().unwrap_or_else(|_| Self::Custom(name.to_string()))
    }
}

impl From<BackgroundOption> for String {
    fn from(value: BackgroundOption) -> Self {
        value.as_str().to_string()
    }
}

/// Body of `POST /api/enhance`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementRequest {
    /// Only the first image is enhanced.
    #[garde(length(min = 1), inner(custom(validate_image_ref)))]
    #[serde(default)]
    pub input_images: Vec<ImageRef>,

    #[garde(skip)]
    #[serde(default)]
    pub enhancement_level: EnhancementLevel,

    #[garde(skip)]
    #[serde(default)]
    pub color_style: ColorStyle,

    #[garde(skip)]
    #[serde(default)]
    pub background_option: Option<BackgroundOption>,

    /// Older clients send a plain blur toggle instead of `backgroundOption`.
    #[garde(skip)]
    #[serde(default)]
    pub background_blur: bool,

    #[garde(skip)]
    #[serde(default = "default_true")]
    pub skin_smoothing: bool,

    /// Opt-in: omitting it keeps the face stage off when smoothing is off.
    #[garde(skip)]
    #[serde(default)]
    pub lighting_correction: bool,

    #[garde(skip)]
    #[serde(default = "default_true")]
    pub sharpening: bool,
}

fn default_true() -> bool {
    true
}

impl EnhancementRequest {
    /// A request carrying the service defaults.
    pub fn new(input_images: Vec<ImageRef>) -> Self {
        Self {
            input_images,
            enhancement_level: EnhancementLevel::default(),
            color_style: ColorStyle::default(),
            background_option: None,
            background_blur: false,
            skin_smoothing: true,
            lighting_correction: false,
            sharpening: true,
        }
    }

    /// Resolve the configuration the stages run against.
    pub fn settings(&self) -> EnhancementSettings {
        let background_option = match (&self.background_option, self.background_blur) {
            (Some(option), _) => option.clone(),
            (None, true) => BackgroundOption::Blur,
            (None, false) => BackgroundOption::Original,
        };

        EnhancementSettings {
            enhancement_level: self.enhancement_level,
            color_style: self.color_style,
            background_option,
            skin_smoothing: self.skin_smoothing,
            lighting_correction: self.lighting_correction,
            sharpening: self.sharpening,
        }
    }
}

/// Resolved configuration, echoed back in the response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnhancementSettings {
    pub enhancement_level: EnhancementLevel,
    pub color_style: ColorStyle,
    pub background_option: BackgroundOption,
    pub skin_smoothing: bool,
    pub lighting_correction: bool,
    pub sharpening: bool,
}

/// Final image plus the labels of the stages that changed it, in order.
#[derive(Debug, Clone)]
pub struct EnhancementResult {
    pub image: ImageRef,
    pub enhancements_applied: Vec<String>,
    pub settings: EnhancementSettings,
}

/// Success body of `POST /api/enhance`.
#[derive(Debug, Serialize)]
pub struct EnhancementResponse {
    pub image: ImageRef,
    pub success: bool,
    pub enhancements_applied: Vec<String>,
    pub settings: EnhancementSettings,
    pub linkedin_ready: bool,
    pub message: String,
}

impl From<EnhancementResult> for EnhancementResponse {
    fn from(result: EnhancementResult) -> Self {
        let message = match result.enhancements_applied.len() {
            0 => "Image processed successfully".to_string(),
            n => format!("Successfully applied {} enhancements", n),
        };

        Self {
            image: result.image,
            success: true,
            enhancements_applied: result.enhancements_applied,
            settings: result.settings,
            linkedin_ready: true,
            message,
        }
    }
}

/// Upper-case the first character; underscores become spaces.
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
