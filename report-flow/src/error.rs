use thiserror::Error;

use crate::extract::PayloadForm;

/// Failure of a single remote call, before any reply text was inspected.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to generation service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read generation service response: {0}")]
    Envelope(String),

    #[error("{0}")]
    Other(String),
}

/// Failure to turn reply text into a typed record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("reply contained no payload")]
    EmptyPayload,

    #[error("{form} payload is not a valid report: {source}")]
    Decode {
        form: PayloadForm,
        #[source]
        source: serde_json::Error,
    },
}

/// Terminal outcome of `GenerationClient::generate`.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{source}")]
    Transport {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("API returned an empty or invalid response (after {attempts} attempts)")]
    EmptyResponse { attempts: u32 },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl GenerationError {
    /// Whether the failure class is worth another identical request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::EmptyResponse { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("event {event} is not accepted while {phase}")]
    InvalidTransition {
        phase: &'static str,
        event: &'static str,
    },

    #[error("session not found: {0}")]
    SessionNotFound(String),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
