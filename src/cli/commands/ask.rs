//! Ask Command
//!
//! Runs one prompt through the failover executor against the configured
//! credential pool and prints the result.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;

use crate::ai::{FailoverExecutor, GeminiProvider, GenerationRequest};
use crate::config::ConfigLoader;
use crate::storage::Database;
use crate::types::{CondoError, Result};

pub async fn run(prompt: &str, model: Option<String>, image: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load()?;

    let mut request = GenerationRequest::new(prompt);
    request.model = model;
    request.temperature = config.generation.temperature;
    request.top_p = config.generation.top_p;
    request.top_k = config.generation.top_k;

    if let Some(path) = image {
        let bytes = std::fs::read(path)?;
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        request = request.with_image(mime_for(path)?, data);
    }

    let db = Arc::new(Database::open(&config.storage.db_path)?);
    let provider = Arc::new(GeminiProvider::new(&config.provider_config())?);
    let executor = FailoverExecutor::new(db, provider)
        .with_fallback_key(config.fallback_key())
        .with_config(config.failover_config());

    let text = executor.execute(&request).await?;
    println!("{}", text);
    Ok(())
}

/// MIME type from file extension; only the image formats the API accepts.
fn mime_for(path: &Path) -> Result<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Ok("image/png"),
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("webp") => Ok("image/webp"),
        Some("gif") => Ok("image/gif"),
        other => Err(CondoError::Config(format!(
            "unsupported image extension: {:?} (expected png, jpg, webp, or gif)",
            other
        ))),
    }
}
