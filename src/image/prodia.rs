//! Client for the Prodia generation API: create a job, poll it, download the
//! result.

use super::imagine::BASE_NEGATIVE_PROMPT;
use super::options::{ProdiaModel, Sampler};
use crate::error::ImageError;

use serde::Deserialize;
use std::time::Duration;

const GENERATE_URL: &str = "https://api.prodia.com/generate";
const JOB_URL_BASE: &str = "https://api.prodia.com/job";
const IMAGE_URL_BASE: &str = "https://images.prodia.xyz";

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const MAX_POLLS: usize = 240;

#[derive(Debug, Deserialize)]
struct JobCreated {
    job: String,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Clone)]
pub struct ProdiaClient {
    http: reqwest::Client,
}

impl ProdiaClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        model: ProdiaModel,
        sampler: Sampler,
        seed: u32,
        negative: Option<&str>,
    ) -> Result<Vec<u8>, ImageError> {
        let job = self.create_job(prompt, model, sampler, seed, negative).await?;
        self.await_job(&job).await?;
        self.download(&job).await
    }

    async fn create_job(
        &self,
        prompt: &str,
        model: ProdiaModel,
        sampler: Sampler,
        seed: u32,
        negative: Option<&str>,
    ) -> Result<String, ImageError> {
        let negative = negative.unwrap_or(BASE_NEGATIVE_PROMPT);

        // The prompt goes into the query string pre-encoded; everything else
        // is plain ASCII.
        let url = format!(
            "{GENERATE_URL}?new=true&prompt={}&model={}&negative_prompt={}&steps=30&cfg=9.5\
             &seed={seed}&sampler={}&upscale=True&aspect_ratio=square",
            urlencoding::encode(prompt),
            urlencoding::encode(model.uid()),
            urlencoding::encode(negative),
            urlencoding::encode(sampler.api_value()),
        );

        let response = self
            .http
            .get(&url)
            .header("accept", "*/*")
            .header("origin", "https://app.prodia.com")
            .header("referer", "https://app.prodia.com/")
            .send()
            .await
            .map_err(|error| ImageError::Request(error.to_string()))?;

        let created: JobCreated = response
            .json()
            .await
            .map_err(|error| ImageError::Decode(error.to_string()))?;

        Ok(created.job)
    }

    async fn await_job(&self, job: &str) -> Result<(), ImageError> {
        for _ in 0..MAX_POLLS {
            let response = self
                .http
                .get(format!("{JOB_URL_BASE}/{job}"))
                .header("accept", "*/*")
                .send()
                .await
                .map_err(|error| ImageError::Request(error.to_string()))?;

            let status: JobStatus = response
                .json()
                .await
                .map_err(|error| ImageError::Decode(error.to_string()))?;

            match status.status.as_str() {
                "succeeded" => return Ok(()),
                "failed" => {
                    return Err(ImageError::JobFailed(format!("job {job} failed")));
                }
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }

        Err(ImageError::JobFailed(format!(
            "job {job} did not finish within the polling budget"
        )))
    }

    async fn download(&self, job: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .http
            .get(format!("{IMAGE_URL_BASE}/{job}.png?download=1"))
            .send()
            .await
            .map_err(|error| ImageError::Request(error.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|error| ImageError::Decode(error.to_string()))?;

        if bytes.is_empty() {
            return Err(ImageError::Decode("job result was empty".into()));
        }

        Ok(bytes.to_vec())
    }
}
