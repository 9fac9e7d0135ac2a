//! Request lifecycle state machine.
//!
//! The lifecycle is a plain value. [`LifecycleState::apply`] is a pure
//! function from `(state, event)` to the next state plus the effects the
//! caller must perform; it never performs I/O itself. The only effect is
//! [`Effect::Generate`], emitted when a submission is accepted.

use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;
use crate::report::MedicalReport;

pub const MISSING_DOCUMENT_MESSAGE: &str = "Please attach a medical document first.";
pub const FAILURE_PREFIX: &str = "Failed to generate report.";

/// UI-visible phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "report", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Input,
    Loading,
    Report(Box<MedicalReport>),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Input => "input",
            Phase::Loading => "loading",
            Phase::Report(_) => "report",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    #[serde(flatten)]
    pub phase: Phase,
    pub document_name: Option<String>,
    pub notes: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Records the name of the selected document. Only metadata is kept.
    AttachDocument(String),
    EditNotes(String),
    Submit,
    GenerationSucceeded(Box<MedicalReport>),
    GenerationFailed(String),
    Reset,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::AttachDocument(_) => "attach_document",
            Event::EditNotes(_) => "edit_notes",
            Event::Submit => "submit",
            Event::GenerationSucceeded(_) => "generation_succeeded",
            Event::GenerationFailed(_) => "generation_failed",
            Event::Reset => "reset",
        }
    }
}

/// Work the caller must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Generate { document_name: String, notes: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: LifecycleState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn settled(state: LifecycleState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

impl LifecycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> Option<&MedicalReport> {
        match &self.phase {
            Phase::Report(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Computes the transition for `event`. Rejected events leave `self`
    /// as the current state.
    pub fn apply(&self, event: Event) -> Result<Step, LifecycleError> {
        let mut next = self.clone();

        match (&self.phase, event) {
            (Phase::Input, Event::AttachDocument(name)) => {
                let name = name.trim();
                next.document_name = (!name.is_empty()).then(|| name.to_string());
                Ok(Step::settled(next))
            }
            (Phase::Input, Event::EditNotes(notes)) => {
                next.notes = notes;
                Ok(Step::settled(next))
            }
            (Phase::Input, Event::Submit) => match self.document_name.clone() {
                Some(document_name) => {
                    next.phase = Phase::Loading;
                    next.error = None;
                    Ok(Step {
                        effects: vec![Effect::Generate {
                            document_name,
                            notes: next.notes.clone(),
                        }],
                        state: next,
                    })
                }
                None => {
                    next.error = Some(MISSING_DOCUMENT_MESSAGE.to_string());
                    Ok(Step::settled(next))
                }
            },
            (Phase::Loading, Event::GenerationSucceeded(report)) => {
                next.phase = Phase::Report(report);
                next.error = None;
                Ok(Step::settled(next))
            }
            (Phase::Loading, Event::GenerationFailed(cause)) => {
                next.phase = Phase::Input;
                next.error = Some(format!("{FAILURE_PREFIX} {cause}"));
                Ok(Step::settled(next))
            }
            (Phase::Input | Phase::Report(_), Event::Reset) => Ok(Step::settled(Self::default())),
            (phase, event) => Err(LifecycleError::InvalidTransition {
                phase: phase.name(),
                event: event.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SAMPLE_REPORT_JSON;

    fn sample_report() -> Box<MedicalReport> {
        Box::new(serde_json::from_str(SAMPLE_REPORT_JSON).unwrap())
    }

    fn attached() -> LifecycleState {
        LifecycleState::new()
            .apply(Event::AttachDocument("discharge_summary.pdf".to_string()))
            .unwrap()
            .state
    }

    fn loading() -> LifecycleState {
        attached().apply(Event::Submit).unwrap().state
    }

    #[test]
    fn initial_state_is_empty_input() {
        let state = LifecycleState::new();
        assert_eq!(state.phase, Phase::Input);
        assert_eq!(state.document_name, None);
        assert!(state.notes.is_empty());
        assert_eq!(state.error, None);
    }

    #[test]
    fn submit_without_document_sets_error_and_issues_nothing() {
        let step = LifecycleState::new().apply(Event::Submit).unwrap();

        assert_eq!(step.state.phase, Phase::Input);
        assert_eq!(step.state.error.as_deref(), Some(MISSING_DOCUMENT_MESSAGE));
        assert!(step.effects.is_empty());
    }

    #[test]
    fn blank_document_name_does_not_satisfy_precondition() {
        let state = LifecycleState::new()
            .apply(Event::AttachDocument("   ".to_string()))
            .unwrap()
            .state;
        assert_eq!(state.document_name, None);

        let step = state.apply(Event::Submit).unwrap();
        assert!(step.effects.is_empty());
        assert!(step.state.error.is_some());
    }

    #[test]
    fn submit_with_document_enters_loading_and_requests_generation() {
        let mut state = attached()
            .apply(Event::EditNotes("Patient reports headaches.".to_string()))
            .unwrap()
            .state;
        state.error = Some("stale".to_string());

        let step = state.apply(Event::Submit).unwrap();

        assert_eq!(step.state.phase, Phase::Loading);
        assert_eq!(step.state.error, None);
        assert_eq!(
            step.effects,
            vec![Effect::Generate {
                document_name: "discharge_summary.pdf".to_string(),
                notes: "Patient reports headaches.".to_string(),
            }]
        );
    }

    #[test]
    fn success_stores_exact_report_and_clears_error() {
        let report = sample_report();
        let step = loading()
            .apply(Event::GenerationSucceeded(report.clone()))
            .unwrap();

        assert_eq!(step.state.report(), Some(report.as_ref()));
        assert_eq!(step.state.error, None);
        assert!(step.effects.is_empty());
    }

    #[test]
    fn failure_returns_to_input_with_prefixed_error() {
        let step = loading()
            .apply(Event::GenerationFailed("connection refused".to_string()))
            .unwrap();

        assert_eq!(step.state.phase, Phase::Input);
        assert_eq!(step.state.report(), None);
        assert_eq!(
            step.state.error.as_deref(),
            Some("Failed to generate report. connection refused")
        );
        assert_eq!(
            step.state.document_name.as_deref(),
            Some("discharge_summary.pdf")
        );
    }

    #[test]
    fn resubmission_while_loading_is_rejected() {
        let state = loading();
        let err = state.apply(Event::Submit).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::InvalidTransition {
                phase: "loading",
                event: "submit"
            }
        ));
    }

    #[test]
    fn edits_are_rejected_outside_input() {
        assert!(loading().apply(Event::EditNotes("x".to_string())).is_err());
        assert!(
            loading()
                .apply(Event::AttachDocument("other.pdf".to_string()))
                .is_err()
        );
    }

    #[test]
    fn reset_is_rejected_while_loading() {
        assert!(loading().apply(Event::Reset).is_err());
    }

    #[test]
    fn outcomes_are_rejected_outside_loading() {
        assert!(
            LifecycleState::new()
                .apply(Event::GenerationSucceeded(sample_report()))
                .is_err()
        );
        assert!(
            attached()
                .apply(Event::GenerationFailed("late".to_string()))
                .is_err()
        );
    }

    #[test]
    fn reset_from_report_wipes_everything() {
        let state = loading()
            .apply(Event::GenerationSucceeded(sample_report()))
            .unwrap()
            .state;

        let step = state.apply(Event::Reset).unwrap();

        assert_eq!(step.state, LifecycleState::default());
        assert!(step.effects.is_empty());
    }

    #[test]
    fn phase_serializes_with_tag() {
        let json = serde_json::to_value(LifecycleState::new()).unwrap();
        assert_eq!(json["phase"], "input");
        assert!(json.get("report").is_none());

        let state = loading()
            .apply(Event::GenerationSucceeded(sample_report()))
            .unwrap()
            .state;
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["phase"], "report");
        assert_eq!(json["report"]["follow_up_plan"]["timing"], "In 3 months");

        let back: LifecycleState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
