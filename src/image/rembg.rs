//! Background removal via the rembg API.

use crate::error::ImageError;

use serde::Serialize;

const REMBG_API_URL: &str = "https://www.rembg.pics/api/generate";

#[derive(Serialize)]
struct RembgRequest<'a> {
    #[serde(rename = "imageUrl")]
    image_url: &'a str,
}

#[derive(Debug, Clone)]
pub struct RembgClient {
    http: reqwest::Client,
}

impl RembgClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Remove the background of the image at `image_url`.
    ///
    /// The API answers with the URL of the processed image, which is then
    /// fetched and returned as bytes.
    pub async fn remove_background(&self, image_url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .http
            .post(REMBG_API_URL)
            .json(&RembgRequest { image_url })
            .send()
            .await
            .map_err(|error| ImageError::Request(error.to_string()))?;

        let result_url: String = response
            .json()
            .await
            .map_err(|error| ImageError::Decode(error.to_string()))?;

        let image = self
            .http
            .get(&result_url)
            .send()
            .await
            .map_err(|error| ImageError::Request(error.to_string()))?
            .bytes()
            .await
            .map_err(|error| ImageError::Decode(error.to_string()))?;

        if image.is_empty() {
            return Err(ImageError::Decode("processed image was empty".into()));
        }

        Ok(image.to_vec())
    }
}
