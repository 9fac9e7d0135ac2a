//! Generation client: one outbound call per attempt, bounded retries with
//! exponential backoff, strict payload extraction.
//!
//! Transport failures and empty replies are retried. A reply that arrives
//! but does not decode is returned immediately, since the request is
//! deterministic and an identical retry would produce the same reply.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::GeminiConfig;
use crate::error::{ConfigError, GenerationError, TransportError};
use crate::extract::extract;
use crate::report::MedicalReport;
use crate::request::GenerationRequest;
use crate::retry::RetryPolicy;
use crate::transport::{GeminiTransport, GenerationTransport};

/// Outcome of a single attempt inside the retry loop.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(String),
    TransportFailure(TransportError),
    EmptyResponse,
}

#[derive(Debug)]
pub struct GenerationAttempt {
    pub index: u32,
    pub started_at: DateTime<Utc>,
    pub outcome: AttemptOutcome,
}

#[derive(Clone)]
pub struct GenerationClient {
    transport: Arc<dyn GenerationTransport>,
    system_instruction: Arc<str>,
    retry: RetryPolicy,
    search_grounding: bool,
    in_flight: Arc<AtomicUsize>,
}

impl GenerationClient {
    pub fn new(transport: Arc<dyn GenerationTransport>, system_instruction: impl Into<Arc<str>>) -> Self {
        Self {
            transport,
            system_instruction: system_instruction.into(),
            retry: RetryPolicy::default(),
            search_grounding: false,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Client backed by the Gemini REST transport.
    pub fn gemini(config: GeminiConfig, system_instruction: impl Into<Arc<str>>) -> Result<Self, ConfigError> {
        let search_grounding = config.search_grounding;
        let transport = GeminiTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), system_instruction).with_search_grounding(search_grounding))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// True while any `generate` call on this client (or its clones),
    /// including pending backoff waits, is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn generate(&self, prompt: &str) -> Result<MedicalReport, GenerationError> {
        self.generate_as(prompt).await
    }

    pub async fn generate_as<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, GenerationError> {
        let _busy = BusyGuard::enter(&self.in_flight);
        let max_attempts = self.retry.max_attempts();
        let mut index = 0;

        loop {
            let attempt = self.attempt(index, prompt).await;

            let failure = match attempt.outcome {
                AttemptOutcome::Success(text) => match extract(&text) {
                    Ok(record) => return Ok(record),
                    Err(e) => GenerationError::from(e),
                },
                AttemptOutcome::TransportFailure(source) => GenerationError::Transport {
                    attempts: index + 1,
                    source,
                },
                AttemptOutcome::EmptyResponse => GenerationError::EmptyResponse { attempts: index + 1 },
            };

            if !failure.is_retryable() {
                warn!(
                    attempt = index + 1,
                    max_attempts,
                    error = %failure,
                    "Generation reply could not be decoded, not retrying"
                );
                return Err(failure);
            }

            warn!(
                attempt = index + 1,
                max_attempts,
                started_at = %attempt.started_at,
                error = %failure,
                "Generation attempt failed"
            );

            if !self.retry.has_attempt_after(index) {
                return Err(failure);
            }

            let delay = self.retry.delay_for_attempt(index);
            info!(delay_ms = delay.as_millis() as u64, "Retrying generation after backoff");
            tokio::time::sleep(delay).await;
            index += 1;
        }
    }

    async fn attempt(&self, index: u32, prompt: &str) -> GenerationAttempt {
        let request = GenerationRequest::new(&*self.system_instruction, prompt, self.search_grounding);
        let started_at = Utc::now();

        let outcome = match self.transport.send(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => AttemptOutcome::Success(text),
            Ok(_) => AttemptOutcome::EmptyResponse,
            Err(e) => AttemptOutcome::TransportFailure(e),
        };

        GenerationAttempt {
            index,
            started_at,
            outcome,
        }
    }
}

/// Keeps the in-flight counter raised for as long as it lives.
struct BusyGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> BusyGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
