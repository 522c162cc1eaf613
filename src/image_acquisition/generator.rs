//! Client for the text-to-image generation service.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use serde::{Deserialize, Serialize};

use super::error::ImageError;
use crate::settings::ImageServiceConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

/// Turns a prompt into a list of hosted images. An empty list is a valid
/// answer.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedImage>, ImageError>;
}

/// fal.ai synchronous run endpoint: `POST {endpoint}/{model}` with a
/// `Key` authorization header, answered once generation has finished.
pub struct FalGenerator {
    http: Client,
    url: String,
    api_key: String,
}

impl FalGenerator {
    pub fn new(http: Client, config: &ImageServiceConfig, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: config.generation_url(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ImageGenerator for FalGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedImage>, ImageError> {
        let response = self
            .http
            .post(&self.url)
            .header(AUTHORIZATION, format!("Key {}", self.api_key))
            .json(&GenerationRequest { prompt })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Service {
                url: self.url.clone(),
                status,
            });
        }

        let body: GenerationResponse = response.json().await?;
        tracing::debug!(count = body.images.len(), "image service answered");
        Ok(body.images)
    }
}
