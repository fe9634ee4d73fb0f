//! Gemini API Provider
//!
//! Generative provider backed by the Generative Language API
//! (`models/{model}:generateContent`). The API key travels as a query
//! parameter per call and is never logged.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{GenerationRequest, GenerativeProvider, ProviderConfig};
use crate::types::{CondoError, Result};

/// Gemini HTTP provider.
pub struct GeminiProvider {
    api_base: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CondoError::provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts = vec![Part {
            text: Some(request.prompt.clone()),
            inline_data: None,
        }];

        if let Some(image) = &request.image {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                }),
            });
        }

        let generation_config =
            if request.temperature.is_some() || request.top_p.is_some() || request.top_k.is_some() {
                Some(GenerationConfig {
                    temperature: request.temperature,
                    top_p: request.top_p,
                    top_k: request.top_k,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config,
        }
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &SecretString,
        model: &str,
    ) -> Result<String> {
        info!(model, multimodal = request.image.is_some(), "Generating with Gemini");

        let body = self.build_request(request);
        let url = format!("{}/models/{}:generateContent", self.api_base, model);

        debug!("Sending request to Gemini API");

        // The key travels as a header, never in the URL: reqwest error text
        // includes the full request URL, which would leak a query-string key
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CondoError::provider(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CondoError::provider(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let response_body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CondoError::provider(format!("Failed to parse Gemini response: {}", e)))?;

        // A response with no candidates or empty parts is a valid empty result
        let text = response_body
            .candidates
            .unwrap_or_default()
            .into_iter()
            .flat_map(|c| c.content.map(|content| content.parts).unwrap_or_default())
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        debug!(chars = text.len(), "Received response from Gemini");
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        rename = "inlineData",
        skip_serializing_if = "Option::is_none",
        default
    )]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(rename = "topK", skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
