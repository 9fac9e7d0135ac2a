use report_flow::{LifecycleState, Phase};
use serde::{Deserialize, Serialize};

use crate::render::RenderedSection;

#[derive(Debug, Serialize, Deserialize)]
pub struct AttachDocumentRequest {
    pub file_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub state: LifecycleState,
    /// Submission is only offered from the input phase.
    pub can_submit: bool,
    /// This session's own generation is in flight.
    pub generating: bool,
}

impl SessionResponse {
    pub fn new(session_id: impl Into<String>, state: LifecycleState) -> Self {
        Self {
            session_id: session_id.into(),
            can_submit: matches!(state.phase, Phase::Input),
            generating: state.is_loading(),
            state,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub session_id: String,
    pub sections: Vec<RenderedSection>,
}
