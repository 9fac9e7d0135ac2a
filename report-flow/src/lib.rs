pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod lifecycle;
pub mod prompt;
pub mod report;
pub mod request;
pub mod retry;
pub mod runner;
pub mod storage;
pub mod transport;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use client::{AttemptOutcome, GenerationAttempt, GenerationClient};
pub use config::GeminiConfig;
pub use error::{
    ConfigError, ExtractError, GenerationError, LifecycleError, Result, TransportError,
};
pub use extract::{Payload, PayloadForm, extract, extract_report};
pub use lifecycle::{Effect, Event, LifecycleState, Phase, Step};
pub use prompt::compose_prompt;
pub use report::MedicalReport;
pub use request::GenerationRequest;
pub use retry::RetryPolicy;
pub use runner::LifecycleRunner;
pub use storage::{InMemoryLifecycleStorage, LifecycleStorage, Session};
pub use transport::{GeminiTransport, GenerationTransport};
