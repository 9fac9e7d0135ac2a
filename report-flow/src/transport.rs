use async_trait::async_trait;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::{ConfigError, TransportError};
use crate::request::{GeminiResponse, GenerationRequest};

/// Issues a single remote generation call.
///
/// `Ok(None)` means the call went through but the service produced no text.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn send(&self, request: &GenerationRequest) -> Result<Option<String>, TransportError>;
}

/// Transport speaking the Gemini `generateContent` REST contract.
pub struct GeminiTransport {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiTransport {
    pub fn new(config: GeminiConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl GenerationTransport for GeminiTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<Option<String>, TransportError> {
        let response = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request.to_gemini())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GeminiResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Envelope(e.to_string()))?;

        debug!(
            model = %self.config.model,
            finish_reason = envelope.finish_reason().unwrap_or("unknown"),
            "Received generation response"
        );

        Ok(envelope.text())
    }
}
