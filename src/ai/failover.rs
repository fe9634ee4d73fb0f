//! Credential Failover Executor
//!
//! Drives one generation call through the credential pool:
//!
//! 1. Select the ACTIVE credential with the lowest priority value
//! 2. Fall back to the environment-provided key when the pool is empty
//! 3. Invoke the provider with the tier-resolved (or overridden) model
//! 4. On success, reset the credential's error count and return the text
//! 5. On failure, classify the error, demote the credential, and try the
//!    next candidate
//!
//! Attempts are capped by an explicit bound rather than recursion, so a pool
//! where every key fails in sequence cannot run away. A demoted credential is
//! no longer ACTIVE and cannot be re-selected within the same call.

use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use crate::constants::failover as failover_constants;
use crate::storage::{CredentialOutcome, CredentialRepository};
use crate::types::{AiCredential, CondoError, CredentialTier, Result};

use super::provider::{GenerationRequest, GenerativeProvider};

/// Configuration for the failover executor.
#[derive(Debug, Clone)]
pub struct FailoverConfig {
    /// Maximum live attempts per logical call (distinct candidates tried)
    pub max_attempts: usize,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            max_attempts: failover_constants::MAX_ATTEMPTS,
        }
    }
}

/// The credential selected for one attempt.
enum Candidate {
    /// A row from the pool; outcomes are persisted against it
    Stored(Box<AiCredential>),
    /// The environment fallback key; nothing to demote on failure
    Fallback(SecretString),
}

impl Candidate {
    fn id(&self) -> &str {
        match self {
            Self::Stored(c) => &c.id,
            Self::Fallback(_) => failover_constants::FALLBACK_CREDENTIAL_ID,
        }
    }

    fn secret(&self) -> &SecretString {
        match self {
            Self::Stored(c) => &c.secret,
            Self::Fallback(key) => key,
        }
    }

    fn tier(&self) -> CredentialTier {
        match self {
            Self::Stored(c) => c.tier,
            // The fallback key carries no stored tier; treat it as free
            Self::Fallback(_) => CredentialTier::Free,
        }
    }
}

/// Executes generation calls with credential rotation.
pub struct FailoverExecutor {
    store: Arc<dyn CredentialRepository>,
    provider: Arc<dyn GenerativeProvider>,
    fallback_key: Option<SecretString>,
    config: FailoverConfig,
}

impl FailoverExecutor {
    pub fn new(
        store: Arc<dyn CredentialRepository>,
        provider: Arc<dyn GenerativeProvider>,
    ) -> Self {
        Self {
            store,
            provider,
            fallback_key: None,
            config: FailoverConfig::default(),
        }
    }

    /// Set the environment fallback key, used only when the pool yields no
    /// ACTIVE credential.
    pub fn with_fallback_key(mut self, key: Option<SecretString>) -> Self {
        self.fallback_key = key;
        self
    }

    pub fn with_config(mut self, config: FailoverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve the model for this attempt: an explicit request override wins,
    /// otherwise the credential tier picks the default.
    fn resolve_model(request: &GenerationRequest, tier: CredentialTier) -> String {
        if let Some(model) = &request.model {
            return model.clone();
        }
        match tier {
            CredentialTier::Paid => failover_constants::PAID_TIER_MODEL.to_string(),
            CredentialTier::Free => failover_constants::FREE_TIER_MODEL.to_string(),
        }
    }

    /// Select the next candidate: best active from the pool, else the
    /// fallback key.
    async fn select_candidate(&self) -> Result<Option<Candidate>> {
        if let Some(credential) = self.store.find_best_active().await? {
            return Ok(Some(Candidate::Stored(Box::new(credential))));
        }
        Ok(self.fallback_key.clone().map(Candidate::Fallback))
    }

    /// Run one generation call through the pool.
    ///
    /// Fails with [`CondoError::NoCredential`] before any provider call when
    /// neither an ACTIVE credential nor a fallback key exists. Otherwise
    /// returns the first successful text result, or the last provider error
    /// once candidates are exhausted.
    #[instrument(skip(self, request), fields(provider = self.provider.name()))]
    pub async fn execute(&self, request: &GenerationRequest) -> Result<String> {
        let mut last_error: Option<CondoError> = None;

        for attempt in 1..=self.config.max_attempts {
            let Some(candidate) = self.select_candidate().await? else {
                // Empty pool on the first attempt means nothing is
                // operational; later it means every candidate was demoted
                return match last_error {
                    Some(err) => Err(err),
                    None => Err(CondoError::NoCredential),
                };
            };

            let model = Self::resolve_model(request, candidate.tier());

            debug!(
                attempt,
                max_attempts = self.config.max_attempts,
                credential = candidate.id(),
                model = %model,
                "Failover attempt"
            );

            match self
                .provider
                .generate(request, candidate.secret(), &model)
                .await
            {
                Ok(text) => {
                    if let Candidate::Stored(credential) = &candidate {
                        self.store
                            .record_outcome(&credential.id, &CredentialOutcome::success(Utc::now()))
                            .await?;
                    }
                    info!(
                        attempt,
                        credential = candidate.id(),
                        model = %model,
                        "Generation succeeded"
                    );
                    return Ok(text);
                }
                Err(err) => {
                    let kind = err.failure_kind();

                    warn!(
                        attempt,
                        credential = candidate.id(),
                        kind = %kind,
                        error = %err,
                        "Generation failed"
                    );

                    match candidate {
                        Candidate::Stored(credential) => {
                            let outcome = CredentialOutcome::failure(
                                kind.demoted_status(),
                                credential.error_count.saturating_add(1),
                                Utc::now(),
                            );
                            self.store.record_outcome(&credential.id, &outcome).await?;
                            last_error = Some(err);
                        }
                        // No stored credential was in use, so there is
                        // nothing to demote and nothing left to rotate to
                        Candidate::Fallback(_) => return Err(err),
                    }
                }
            }
        }

        Err(last_error.unwrap_or(CondoError::NoCredential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCredentialStore;
    use crate::types::CredentialStatus;
    use async_trait::async_trait;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted provider: responses keyed by the API key used.
    struct MockProvider {
        script: HashMap<String, std::result::Result<String, String>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                script: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn on_key(mut self, key: &str, result: std::result::Result<&str, &str>) -> Self {
            self.script.insert(
                key.to_string(),
                result.map(String::from).map_err(String::from),
            );
            self
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerativeProvider for MockProvider {
        async fn generate(
            &self,
            _request: &GenerationRequest,
            api_key: &SecretString,
            model: &str,
        ) -> Result<String> {
            let key = api_key.expose_secret().to_string();
            self.calls.lock().unwrap().push((key.clone(), model.to_string()));

            match self.script.get(&key) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(CondoError::provider(message.clone())),
                None => Err(CondoError::provider("unscripted key")),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn executor_with(
        store: Arc<MemoryCredentialStore>,
        provider: MockProvider,
    ) -> (FailoverExecutor, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        let executor = FailoverExecutor::new(store, provider.clone());
        (executor, provider)
    }

    #[tokio::test]
    async fn test_success_on_first_credential() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
        ]));
        let (executor, provider) =
            executor_with(store.clone(), MockProvider::new().on_key("key-1", Ok("hello")));

        let text = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(text, "hello");
        assert_eq!(provider.calls().len(), 1);

        let state = store.snapshot();
        assert_eq!(state[0].status, CredentialStatus::Active);
        assert_eq!(state[0].error_count, 0);
        assert!(state[0].last_checked.is_some());
    }

    #[tokio::test]
    async fn test_quota_failure_rotates_to_next_credential() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
            AiCredential::new("k2", "key-2", 2),
        ]));
        let (executor, provider) = executor_with(
            store.clone(),
            MockProvider::new()
                .on_key("key-1", Err("Gemini API error (429 Too Many Requests): quota"))
                .on_key("key-2", Ok("from second key")),
        );

        let text = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(text, "from second key");

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "key-1");
        assert_eq!(calls[1].0, "key-2");

        let state = store.snapshot();
        assert_eq!(state[0].status, CredentialStatus::QuotaExceeded);
        assert_eq!(state[0].error_count, 1);
        assert_eq!(state[1].status, CredentialStatus::Active);
    }

    #[tokio::test]
    async fn test_invalid_key_demotion() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
        ]));
        let (executor, _provider) = executor_with(
            store.clone(),
            MockProvider::new().on_key("key-1", Err("API key not valid")),
        );

        let err = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CondoError::Provider { .. }));
        assert_eq!(store.snapshot()[0].status, CredentialStatus::Invalid);
    }

    #[tokio::test]
    async fn test_empty_pool_without_fallback_fails_without_calls() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (executor, provider) = executor_with(store, MockProvider::new());

        let err = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CondoError::NoCredential));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_key_used_when_pool_empty() {
        let store = Arc::new(MemoryCredentialStore::new());
        let provider = Arc::new(MockProvider::new().on_key("env-key", Ok("fallback result")));
        let executor = FailoverExecutor::new(store, provider.clone())
            .with_fallback_key(Some(SecretString::from("env-key")));

        let text = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(text, "fallback result");
        // Fallback runs with the free-tier default model
        assert_eq!(provider.calls()[0].1, failover_constants::FREE_TIER_MODEL);
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates_without_retry() {
        let store = Arc::new(MemoryCredentialStore::new());
        let provider = Arc::new(MockProvider::new().on_key("env-key", Err("boom")));
        let executor = FailoverExecutor::new(store, provider.clone())
            .with_fallback_key(Some(SecretString::from("env-key")));

        let err = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CondoError::Provider { .. }));
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rotates_to_fallback_after_pool_credential_fails() {
        // Attempt 1 demotes the only pool row; attempt 2 finds the pool
        // empty and selects the fallback key
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
        ]));
        let provider = Arc::new(
            MockProvider::new()
                .on_key("key-1", Err("HTTP 429: quota exhausted"))
                .on_key("env-key", Ok("fallback result")),
        );
        let executor = FailoverExecutor::new(store.clone(), provider.clone())
            .with_fallback_key(Some(SecretString::from("env-key")));

        let text = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(text, "fallback result");

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "env-key");

        let state = store.snapshot();
        assert_eq!(state[0].status, CredentialStatus::QuotaExceeded);
        assert_eq!(state[0].error_count, 1);
    }

    #[tokio::test]
    async fn test_attempts_are_bounded() {
        // Three failing credentials but only two attempts allowed
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
            AiCredential::new("k2", "key-2", 2),
            AiCredential::new("k3", "key-3", 3),
        ]));
        let provider = Arc::new(
            MockProvider::new()
                .on_key("key-1", Err("500 internal"))
                .on_key("key-2", Err("500 internal"))
                .on_key("key-3", Err("500 internal")),
        );
        let executor = FailoverExecutor::new(store.clone(), provider.clone());

        let err = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CondoError::Provider { .. }));
        assert_eq!(provider.calls().len(), failover_constants::MAX_ATTEMPTS);

        // Third credential was never touched
        let state = store.snapshot();
        assert_eq!(state[2].status, CredentialStatus::Active);
        assert_eq!(state[2].error_count, 0);
    }

    #[tokio::test]
    async fn test_model_override_beats_tier_default() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1).with_tier(CredentialTier::Paid),
        ]));
        let (executor, provider) =
            executor_with(store, MockProvider::new().on_key("key-1", Ok("ok")));

        executor
            .execute(&GenerationRequest::new("hi").with_model("gemini-exp"))
            .await
            .unwrap();

        assert_eq!(provider.calls()[0].1, "gemini-exp");
    }

    #[tokio::test]
    async fn test_paid_tier_selects_pro_model() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1).with_tier(CredentialTier::Paid),
        ]));
        let (executor, provider) =
            executor_with(store, MockProvider::new().on_key("key-1", Ok("ok")));

        executor.execute(&GenerationRequest::new("hi")).await.unwrap();
        assert_eq!(provider.calls()[0].1, failover_constants::PAID_TIER_MODEL);
    }

    #[tokio::test]
    async fn test_free_tier_selects_flash_model() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
        ]));
        let (executor, provider) =
            executor_with(store, MockProvider::new().on_key("key-1", Ok("ok")));

        executor.execute(&GenerationRequest::new("hi")).await.unwrap();
        assert_eq!(provider.calls()[0].1, failover_constants::FREE_TIER_MODEL);
    }

    #[tokio::test]
    async fn test_error_count_accumulates_across_calls() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
        ]));
        let (executor, _provider) = executor_with(
            store.clone(),
            MockProvider::new().on_key("key-1", Err("connection reset")),
        );

        let _ = executor.execute(&GenerationRequest::new("hi")).await;
        assert_eq!(store.snapshot()[0].error_count, 1);
        assert_eq!(store.snapshot()[0].status, CredentialStatus::Error);
    }

    #[tokio::test]
    async fn test_empty_provider_text_is_success() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(vec![
            AiCredential::new("k1", "key-1", 1),
        ]));
        let (executor, _provider) =
            executor_with(store.clone(), MockProvider::new().on_key("key-1", Ok("")));

        let text = executor
            .execute(&GenerationRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(text, "");
        assert_eq!(store.snapshot()[0].status, CredentialStatus::Active);
    }
}
