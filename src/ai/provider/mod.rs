//! Generative Provider Abstraction
//!
//! Defines the [`GenerativeProvider`] trait the failover executor drives.
//! Unlike a fixed-key client, the API key is passed per call: the executor
//! rotates credentials between attempts, so a provider instance must not pin
//! one.

mod gemini;

pub use gemini::GeminiProvider;

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Shared provider handle for async contexts.
pub type SharedProvider = Arc<dyn GenerativeProvider>;

// =============================================================================
// Generation Request
// =============================================================================

/// Inline image payload for multimodal calls (the OCR path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineImage {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

/// One generation call: a prompt plus optional overrides.
///
/// `model` takes precedence over the tier-based default when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Input text
    pub prompt: String,
    /// Explicit model override; wins over the credential tier default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Optional inline image for multimodal prompts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_image(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.image = Some(InlineImage {
            mime_type: mime_type.into(),
            data: data.into(),
        });
        self
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for the HTTP provider client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: crate::constants::network::DEFAULT_API_BASE.to_string(),
            timeout_secs: crate::constants::network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Generative Provider Trait
// =============================================================================

/// A text/image generation backend.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Run one generation call with the given credential secret and model.
    ///
    /// Returns the textual result; an empty string when the provider returns
    /// no content. Failures surface the raw upstream message so the caller
    /// can classify them.
    async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &SecretString,
        model: &str,
    ) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
