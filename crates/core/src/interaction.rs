use crate::generation::{FailureReason, GenerationOutcome, GenerationRequest, GenerationResult};
use crate::selection::Selection;

/// Everything the interface may show at a given instant.
///
/// A result and a failure can never coexist, and neither can exist while a
/// request is outstanding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(GenerationResult),
    Failed(FailureReason),
}

impl InteractionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, InteractionState::InFlight)
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            InteractionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            InteractionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct InteractionMachine {
    state: InteractionState,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Starts a new attempt and returns the request to send, or `None` while
    /// another request is still outstanding. Any previous result or error is
    /// gone as soon as this returns.
    pub fn submit(&mut self, selection: &Selection) -> Option<GenerationRequest> {
        if self.state.is_in_flight() {
            tracing::warn!("Submit ignored: a request is already in flight");
            return None;
        }

        self.state = InteractionState::InFlight;
        Some(GenerationRequest::from(selection))
    }

    /// Applies the settlement of the outstanding request. Returns `false`
    /// (and leaves the state alone) if nothing was in flight.
    pub fn settle(&mut self, outcome: GenerationOutcome) -> bool {
        if !self.state.is_in_flight() {
            tracing::warn!("Settlement ignored outside of InFlight: {:?}", outcome);
            return false;
        }

        self.state = match outcome {
            GenerationOutcome::Success(result) => InteractionState::Succeeded(result),
            GenerationOutcome::ApplicationError(message) => {
                InteractionState::Failed(FailureReason::ApplicationError(message))
            }
            GenerationOutcome::TransportError(message) => {
                InteractionState::Failed(FailureReason::TransportError(message))
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Emotion, Style};

    fn result(title: &str, content: &str) -> GenerationResult {
        GenerationResult {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_submit_from_idle_emits_one_request() {
        let mut machine = InteractionMachine::new();
        assert_eq!(machine.state(), &InteractionState::Idle);

        let selection = Selection {
            emotion: Emotion::Calm,
            note: "beach".to_string(),
            style: Style::Story,
        };
        let request = machine.submit(&selection).expect("request emitted");
        assert_eq!(request.emotion, "Calm");
        assert_eq!(request.desc, "beach");
        assert_eq!(request.style, "Story");
        assert!(machine.state().is_in_flight());

        assert!(machine.submit(&selection).is_none());
        assert!(machine.state().is_in_flight());
    }

    #[test]
    fn test_settlements_map_to_terminal_states() {
        let mut machine = InteractionMachine::new();
        machine.submit(&Selection::default());
        assert!(machine.settle(GenerationOutcome::Success(result("T", "C"))));
        assert_eq!(
            machine.state(),
            &InteractionState::Succeeded(result("T", "C"))
        );

        machine.submit(&Selection::default());
        assert!(machine.settle(GenerationOutcome::ApplicationError(
            "quota exceeded".to_string()
        )));
        assert_eq!(
            machine.state().failure(),
            Some(&FailureReason::ApplicationError("quota exceeded".to_string()))
        );

        machine.submit(&Selection::default());
        assert!(machine.settle(GenerationOutcome::TransportError("down".to_string())));
        assert_eq!(
            machine.state(),
            &InteractionState::Failed(FailureReason::TransportError("down".to_string()))
        );
    }

    #[test]
    fn test_resubmit_clears_previous_outcome() {
        let mut machine = InteractionMachine::new();
        machine.submit(&Selection::default());
        machine.settle(GenerationOutcome::Success(result("T", "C")));

        assert!(machine.submit(&Selection::default()).is_some());
        assert_eq!(machine.state(), &InteractionState::InFlight);
        assert!(machine.state().result().is_none());
        assert!(machine.state().failure().is_none());

        machine.settle(GenerationOutcome::TransportError("down".to_string()));
        assert!(machine.submit(&Selection::default()).is_some());
        assert!(machine.state().failure().is_none());
    }

    #[test]
    fn test_settle_without_request_is_ignored() {
        let mut machine = InteractionMachine::new();
        assert!(!machine.settle(GenerationOutcome::Success(result("T", "C"))));
        assert_eq!(machine.state(), &InteractionState::Idle);
    }
}
