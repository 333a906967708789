//! The four enhancement stages.
//!
//! A stage is a description: whether it runs for a given configuration,
//! which remote job it submits and how it labels its result. Executing it
//! is uniform and lives in [`execute`].

use serde_json::json;
use tracing::{info, warn};

use crate::models::enhancement::{
    humanize, BackgroundOption, EnhancementLevel, EnhancementSettings,
};
use crate::models::image::ImageRef;
use crate::models::job::JobSpec;
use crate::services::runner::{JobRunner, RunError};

/// GFPGAN face restoration.
pub const GFPGAN_VERSION: &str = "9283608cc6b7be6b65a8e44983db012355fde4132009bf99d976b2f0896856a3";

/// Real-ESRGAN super-resolution.
pub const REAL_ESRGAN_VERSION: &str =
    "f121d640bd286e1fdc67f9799164c1d5be36ff74576ee11c803ae5b665dd46aa";

/// SDXL image-to-image, shared by background and color stages.
pub const SDXL_VERSION: &str = "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";

pub trait PipelineStage: Send + Sync {
    /// Stable identifier used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Gate. A disabled stage submits nothing and adds no label.
    fn is_enabled(&self, settings: &EnhancementSettings) -> bool;

    fn build_job(&self, image: &ImageRef, settings: &EnhancementSettings) -> JobSpec;

    fn label(&self, settings: &EnhancementSettings) -> String;
}

/// Result of running one stage. Only `Applied` changes the working image.
#[derive(Debug)]
pub enum StageOutcome {
    Applied { image: ImageRef, label: String },
    Skipped,
    Failed(RunError),
}

/// Run a stage against the current image. Never fails the caller.
pub async fn execute(
    stage: &dyn PipelineStage,
    runner: &JobRunner,
    image: &ImageRef,
    settings: &EnhancementSettings,
) -> StageOutcome {
    if !stage.is_enabled(settings) {
        info!(stage = stage.name(), "Stage skipped");
        return StageOutcome::Skipped;
    }

    info!(stage = stage.name(), "Applying stage");
    let spec = stage.build_job(image, settings);

    match runner.run(&spec).await {
        Ok(output) => StageOutcome::Applied {
            image: output,
            label: stage.label(settings),
        },
        Err(e) => {
            warn!(stage = stage.name(), error = %e, "Stage failed, keeping current image");
            StageOutcome::Failed(e)
        }
    }
}

/// Stages in execution order. Each consumes the previous one's output.
pub fn default_stages() -> Vec<Box<dyn PipelineStage>> {
    vec![
        Box::new(FaceRestoration),
        Box::new(QualityUpscale),
        Box::new(BackgroundTransform),
        Box::new(ColorGrade),
    ]
}

pub struct FaceRestoration;

impl PipelineStage for FaceRestoration {
    fn name(&self) -> &'static str {
        "face_restoration"
    }

    fn is_enabled(&self, settings: &EnhancementSettings) -> bool {
        settings.skin_smoothing || settings.lighting_correction
    }

    fn build_job(&self, image: &ImageRef, _settings: &EnhancementSettings) -> JobSpec {
        JobSpec::new(
            GFPGAN_VERSION,
            json!({
                "img": image,
                "version": "1.4",
                "scale": 2
            }),
        )
    }

    fn label(&self, _settings: &EnhancementSettings) -> String {
        "Face enhancement & skin smoothing".to_string()
    }
}

pub struct QualityUpscale;

impl QualityUpscale {
    pub fn scale(level: EnhancementLevel) -> u8 {
        match level {
            EnhancementLevel::Dramatic => 4,
            _ => 2,
        }
    }
}

impl PipelineStage for QualityUpscale {
    fn name(&self) -> &'static str {
        "quality_upscale"
    }

    fn is_enabled(&self, settings: &EnhancementSettings) -> bool {
        settings.sharpening || settings.enhancement_level != EnhancementLevel::Subtle
    }

    fn build_job(&self, image: &ImageRef, settings: &EnhancementSettings) -> JobSpec {
        JobSpec::new(
            REAL_ESRGAN_VERSION,
            json!({
                "image": image,
                "scale": Self::scale(settings.enhancement_level),
                "face_enhance": true
            }),
        )
    }

    fn label(&self, _settings: &EnhancementSettings) -> String {
        "Quality enhancement & sharpening".to_string()
    }
}

/// Prompt and strength used to repaint the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundTemplate {
    pub prompt: &'static str,
    pub negative_prompt: &'static str,
    pub prompt_strength: f64,
    pub guidance_scale: f64,
}

const BLUR_TEMPLATE: BackgroundTemplate = BackgroundTemplate {
    prompt: "professional blurred office background, bokeh effect, soft focus background, professional headshot setting",
    negative_prompt: "sharp background, focused background, clear background",
    prompt_strength: 0.45,
    guidance_scale: 3.0,
};

const SCENE_NEGATIVE_PROMPT: &str =
    "distorted face, altered facial features, extra people, cluttered background, low quality";

const fn scene(prompt: &'static str) -> BackgroundTemplate {
    BackgroundTemplate {
        prompt,
        negative_prompt: SCENE_NEGATIVE_PROMPT,
        prompt_strength: 0.60,
        guidance_scale: 5.0,
    }
}

impl BackgroundTemplate {
    /// Unrecognised options fall back to the blur template.
    pub fn for_option(option: &BackgroundOption) -> Self {
        match option {
            BackgroundOption::Office => scene(
                "professional headshot in a modern office, softly lit workspace behind the subject, shallow depth of field",
            ),
            BackgroundOption::StudioGray => scene(
                "professional studio headshot, seamless neutral gray backdrop, even studio lighting",
            ),
            BackgroundOption::StudioWhite => scene(
                "professional studio headshot, clean seamless white backdrop, bright even studio lighting",
            ),
            BackgroundOption::Bookshelf => scene(
                "professional headshot in front of a tidy wooden bookshelf, warm library setting, shallow depth of field",
            ),
            BackgroundOption::Outdoor => scene(
                "professional outdoor headshot, soft natural daylight, blurred green park background",
            ),
            BackgroundOption::Corporate => scene(
                "professional corporate headshot, modern glass building lobby background, executive setting",
            ),
            BackgroundOption::Original | BackgroundOption::Blur | BackgroundOption::Custom(_) => {
                BLUR_TEMPLATE
            }
        }
    }
}

/// Single image-to-image call that repaints the background.
pub struct BackgroundTransform;

impl PipelineStage for BackgroundTransform {
    fn name(&self) -> &'static str {
        "background_transform"
    }

    fn is_enabled(&self, settings: &EnhancementSettings) -> bool {
        settings.background_option != BackgroundOption::Original
    }

    fn build_job(&self, image: &ImageRef, settings: &EnhancementSettings) -> JobSpec {
        let template = BackgroundTemplate::for_option(&settings.background_option);

        JobSpec::new(
            SDXL_VERSION,
            json!({
                "prompt": template.prompt,
                "image": image,
                "prompt_strength": template.prompt_strength,
                "num_inference_steps": 20,
                "guidance_scale": template.guidance_scale,
                "negative_prompt": template.negative_prompt
            }),
        )
    }

    fn label(&self, settings: &EnhancementSettings) -> String {
        format!("Background: {}", humanize(settings.background_option.as_str()))
    }
}

pub struct ColorGrade;

impl PipelineStage for ColorGrade {
    fn name(&self) -> &'static str {
        "color_grade"
    }

    fn is_enabled(&self, settings: &EnhancementSettings) -> bool {
        settings.color_style.prompt().is_some()
    }

    fn build_job(&self, image: &ImageRef, settings: &EnhancementSettings) -> JobSpec {
        let style = settings.color_style.prompt().unwrap_or_default();

        JobSpec::new(
            SDXL_VERSION,
            json!({
                "prompt": format!(
                    "professional LinkedIn headshot portrait, {}, high quality photography",
                    style
                ),
                "image": image,
                "prompt_strength": 0.15,
                "num_inference_steps": 20,
                "guidance_scale": 5,
                "scheduler": "K_EULER",
                "negative_prompt": "ugly, distorted, overprocessed, fake, amateur"
            }),
        )
    }

    fn label(&self, settings: &EnhancementSettings) -> String {
        format!("{} color grading", humanize(&settings.color_style.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enhancement::{ColorStyle, EnhancementRequest};

    fn settings() -> EnhancementSettings {
        EnhancementRequest::new(vec![ImageRef::new("img1")]).settings()
    }

    #[test]
    fn stage_order_is_fixed() {
        let names: Vec<_> = default_stages().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "face_restoration",
                "quality_upscale",
                "background_transform",
                "color_grade"
            ]
        );
    }

    #[test]
    fn face_gate_needs_smoothing_or_lighting() {
        let mut s = settings();
        s.skin_smoothing = false;
        s.lighting_correction = false;
        assert!(!FaceRestoration.is_enabled(&s));

        s.lighting_correction = true;
        assert!(FaceRestoration.is_enabled(&s));
    }

    #[test]
    fn quality_gate_and_scale() {
        let mut s = settings();
        s.sharpening = false;
        s.enhancement_level = EnhancementLevel::Subtle;
        assert!(!QualityUpscale.is_enabled(&s));

        s.enhancement_level = EnhancementLevel::Dramatic;
        assert!(QualityUpscale.is_enabled(&s));
        let job = QualityUpscale.build_job(&ImageRef::new("img1"), &s);
        assert_eq!(job.version, REAL_ESRGAN_VERSION);
        assert_eq!(job.input["scale"], 4);
        assert_eq!(job.input["image"], "img1");

        s.enhancement_level = EnhancementLevel::Professional;
        let job = QualityUpscale.build_job(&ImageRef::new("img1"), &s);
        assert_eq!(job.input["scale"], 2);
    }

    #[test]
    fn background_strength_depends_on_option() {
        let mut s = settings();
        assert!(!BackgroundTransform.is_enabled(&s));

        s.background_option = BackgroundOption::Blur;
        let blur = BackgroundTransform.build_job(&ImageRef::new("img1"), &s);
        assert_eq!(blur.input["prompt_strength"], 0.45);

        s.background_option = BackgroundOption::Office;
        let office = BackgroundTransform.build_job(&ImageRef::new("img1"), &s);
        assert_eq!(office.input["prompt_strength"], 0.60);
        assert_eq!(BackgroundTransform.label(&s), "Background: Office");
    }

    #[test]
    fn unrecognised_background_uses_blur_template() {
        let option = BackgroundOption::Custom("beach".to_string());
        assert_eq!(BackgroundTemplate::for_option(&option), BLUR_TEMPLATE);

        let mut s = settings();
        s.background_option = option;
        assert!(BackgroundTransform.is_enabled(&s));
        assert_eq!(BackgroundTransform.label(&s), "Background: Beach");
    }

    #[test]
    fn studio_white_label() {
        let mut s = settings();
        s.background_option = BackgroundOption::StudioWhite;
        assert_eq!(BackgroundTransform.label(&s), "Background: Studio white");
    }

    #[test]
    fn color_grade_gate_and_prompt() {
        let mut s = settings();
        assert!(!ColorGrade.is_enabled(&s));

        s.color_style = ColorStyle::Warm;
        assert!(ColorGrade.is_enabled(&s));
        assert_eq!(ColorGrade.label(&s), "Warm color grading");

        let job = ColorGrade.build_job(&ImageRef::new("img1"), &s);
        let prompt = job.input["prompt"].as_str().unwrap();
        assert!(prompt.contains("warm golden hour tones"));
        assert_eq!(job.input["scheduler"], "K_EULER");
    }
}
