//! Client for the primary image inference backend: generation, upscaling,
//! controlnet remixing, and captioning.

use super::options::{self, ControlMode, Model, Ratio, Style};
use crate::error::ImageError;

use reqwest::multipart::{Form, Part};

const API_BASE: &str = "https://inferenceengine.vyro.ai";

/// Negative prompt applied when the caller provides none.
pub const BASE_NEGATIVE_PROMPT: &str = "verybadimagenegative_v1.3, ng_deepnegative_v1_75t, \
    (ugly face:0.8), cross-eyed, sketches, (worst quality:2), (low quality:2), \
    (normal quality:2), lowres, ((monochrome)), ((grayscale)), skin spots, acnes, \
    skin blemishes, bad anatomy, DeepNegative, facing away, tilted head, multiple people, \
    bad hands, text, error, missing fingers, extra digit, fewer digits, cropped, \
    jpeg artifacts, signature, watermark, username, blurry, bad feet, poorly drawn hands, \
    poorly drawn face, mutation, deformed, extra fingers, extra limbs, extra arms, \
    extra legs, malformed limbs, fused fingers, too many fingers, long neck, mutated hands, \
    polar lowres, bad body, bad proportions, gross proportions, missing arms, missing legs, \
    extra foot, repeating hair";

/// Parameters for one generation request.
#[derive(Debug, Clone)]
pub struct ImagineRequest<'a> {
    pub prompt: &'a str,
    pub model: Model,
    pub style: Style,
    pub ratio: Ratio,
    pub negative: Option<&'a str>,
    pub upscale: bool,
    pub seed: u32,
    pub cfg: f32,
}

/// Client for the inference backend. All endpoints accept multipart forms and
/// answer with raw image bytes (the interrogator answers with caption text).
#[derive(Debug, Clone)]
pub struct ImagineClient {
    http: reqwest::Client,
}

impl ImagineClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Generate an image, optionally running the upscale pass on the result.
    pub async fn generate(&self, request: &ImagineRequest<'_>) -> Result<Vec<u8>, ImageError> {
        let cfg = options::validate_cfg(request.cfg)?;
        let negative = match request.negative {
            Some(negative) => negative.to_string(),
            None => format!("(nsfw:1.5),{BASE_NEGATIVE_PROMPT}"),
        };

        let form = Form::new()
            .text("prompt", request.prompt.to_string())
            .text("model_version", request.model.api_value())
            .text("style_id", request.style.api_value())
            .text("aspect_ratio", request.ratio.api_value())
            .text("negative_prompt", negative)
            .text("seed", request.seed.to_string())
            .text("cfg", cfg.to_string());

        let image = self.post_image("/sdprem", form).await?;

        if request.upscale {
            self.upscale(image).await
        } else {
            Ok(image)
        }
    }

    /// Upscale an existing image.
    pub async fn upscale(&self, image: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        let form = Form::new().part("image", image_part(image));
        self.post_image("/upscale", form).await
    }

    /// Regenerate an image guided by a control mode and a new prompt.
    pub async fn remix(
        &self,
        image: Vec<u8>,
        prompt: &str,
        mode: ControlMode,
        upscale: bool,
    ) -> Result<Vec<u8>, ImageError> {
        let form = Form::new()
            .part("image", image_part(image))
            .text("prompt", prompt.to_string())
            .text("control_mode", mode.api_value());

        let remixed = self.post_image("/controlnet", form).await?;

        if upscale {
            self.upscale(remixed).await
        } else {
            Ok(remixed)
        }
    }

    /// Produce a text caption for an image.
    pub async fn interrogate(&self, image: Vec<u8>) -> Result<String, ImageError> {
        let form = Form::new().part("image", image_part(image));

        let response = self
            .http
            .post(format!("{API_BASE}/interrogator"))
            .multipart(form)
            .send()
            .await
            .map_err(|error| ImageError::Request(error.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageError::Request(format!(
                "interrogator answered {}",
                response.status()
            )));
        }

        let caption = response
            .text()
            .await
            .map_err(|error| ImageError::Decode(error.to_string()))?;

        if caption.is_empty() {
            return Err(ImageError::Decode("empty caption response".into()));
        }

        Ok(caption)
    }

    async fn post_image(&self, endpoint: &str, form: Form) -> Result<Vec<u8>, ImageError> {
        let response = self
            .http
            .post(format!("{API_BASE}{endpoint}"))
            .multipart(form)
            .send()
            .await
            .map_err(|error| ImageError::Request(error.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageError::Request(format!(
                "{endpoint} answered {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| ImageError::Decode(error.to_string()))?;

        if bytes.is_empty() {
            return Err(ImageError::Decode(format!("{endpoint} returned no image")));
        }

        Ok(bytes.to_vec())
    }
}

fn image_part(image: Vec<u8>) -> Part {
    Part::bytes(image).file_name("image.png")
}
