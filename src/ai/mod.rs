//! AI Layer
//!
//! - [`provider`]: the generative backend abstraction and the Gemini client
//! - [`failover`]: the credential-rotation executor that drives calls

pub mod failover;
pub mod provider;

pub use failover::{FailoverConfig, FailoverExecutor};
pub use provider::{
    GeminiProvider, GenerationRequest, GenerativeProvider, InlineImage, ProviderConfig,
    SharedProvider,
};
