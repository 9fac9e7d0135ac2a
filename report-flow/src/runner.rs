//! LifecycleRunner: loads a session, applies one lifecycle event, persists the result and
//! carries out the effects the transition asked for.
//!
//! ## Two ways to drive a submission
//! * **Inline** (`submit`): apply `Submit`, run the generation call (including its retries and
//!   backoff waits) and apply the outcome, all before returning. Used by the CLI and tests.
//! * **Split** (`begin` + `complete`): apply `Submit` and hand back the effects right away so a
//!   web handler can answer with the `Loading` state, then run `complete` on a spawned task.
//!
//! Either way the only path to `GenerationClient::generate` is an accepted `Submit`, and a
//! session in `Loading` rejects further submissions, so one session never has two calls in
//! flight.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    client::GenerationClient,
    error::{LifecycleError, Result},
    lifecycle::{Effect, Event, LifecycleState, Step},
    prompt::compose_prompt,
    storage::LifecycleStorage,
};

#[derive(Clone)]
pub struct LifecycleRunner {
    client: GenerationClient,
    storage: Arc<dyn LifecycleStorage>,
    document_text: Arc<str>,
}

impl LifecycleRunner {
    /// `document_text` is the recognised text of the attached document. Only
    /// the document's name is captured from the operator.
    pub fn new(
        client: GenerationClient,
        storage: Arc<dyn LifecycleStorage>,
        document_text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            client,
            storage,
            document_text: document_text.into(),
        }
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    pub fn storage(&self) -> &Arc<dyn LifecycleStorage> {
        &self.storage
    }

    /// Applies `event` to the stored session and persists the new state.
    pub async fn begin(&self, session_id: &str, event: Event) -> Result<Step> {
        let event_name = event.name();
        let step = self.storage.apply(session_id, event).await?;
        info!(
            session_id = %session_id,
            event = event_name,
            phase = step.state.phase.name(),
            effects = step.effects.len(),
            "Lifecycle transition applied"
        );
        Ok(step)
    }

    /// Executes `effects` and feeds each outcome back into the session.
    pub async fn complete(&self, session_id: &str, effects: Vec<Effect>) -> Result<LifecycleState> {
        let mut latest = None;

        for effect in effects {
            let event = match effect {
                Effect::Generate {
                    document_name,
                    notes,
                } => {
                    info!(session_id = %session_id, document = %document_name, "Generating report");
                    let prompt = compose_prompt(&self.document_text, &notes);
                    match self.client.generate(&prompt).await {
                        Ok(report) => Event::GenerationSucceeded(Box::new(report)),
                        Err(e) => {
                            error!(session_id = %session_id, error = %e, "Report generation failed");
                            Event::GenerationFailed(e.to_string())
                        }
                    }
                }
            };
            latest = Some(self.begin(session_id, event).await?.state);
        }

        match latest {
            Some(state) => Ok(state),
            None => self
                .storage
                .get(session_id)
                .await?
                .map(|session| session.state)
                .ok_or_else(|| LifecycleError::SessionNotFound(session_id.to_string())),
        }
    }

    /// Submits the session and waits for the generation outcome.
    pub async fn submit(&self, session_id: &str) -> Result<LifecycleState> {
        let step = self.begin(session_id, Event::Submit).await?;
        if step.effects.is_empty() {
            return Ok(step.state);
        }
        self.complete(session_id, step.effects).await
    }
}
