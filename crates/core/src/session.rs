use crate::catalog::{Emotion, Style};
use crate::generation::GenerationOutcome;
use crate::interaction::{InteractionMachine, InteractionState};
use crate::orchestrator::RequestOrchestrator;
use crate::selection::{Selection, SelectionModel};
use crate::speech::{SpeechError, SpeechPlayback};
use tokio::sync::mpsc;

/// Drives one user session: owns the selection, the interaction machine and
/// the speech adapter, and runs outbound calls in the background.
///
/// Calls run as spawned tasks and report back over a channel. Nothing is
/// applied until `next_settlement` is awaited, so all state changes happen on
/// the caller's task.
pub struct StorySession {
    selection: SelectionModel,
    machine: InteractionMachine,
    orchestrator: RequestOrchestrator,
    speech: SpeechPlayback,
    settle_tx: mpsc::Sender<GenerationOutcome>,
    settle_rx: mpsc::Receiver<GenerationOutcome>,
}

/// What a renderer needs to draw the interface.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub selection: &'a Selection,
    pub state: &'a InteractionState,
    /// True only once a result exists and speech can actually be played.
    pub can_listen: bool,
}

/// Handle for reading the current result aloud. Only obtainable while the
/// session holds a result.
pub struct ListenAction<'a> {
    speech: &'a SpeechPlayback,
    content: &'a str,
}

impl ListenAction<'_> {
    pub fn play(self) -> Result<(), SpeechError> {
        self.speech.speak(self.content)
    }
}

impl StorySession {
    pub fn new(orchestrator: RequestOrchestrator, speech: SpeechPlayback) -> Self {
        // One slot is enough: at most one call is ever outstanding.
        let (settle_tx, settle_rx) = mpsc::channel(1);
        Self {
            selection: SelectionModel::new(),
            machine: InteractionMachine::new(),
            orchestrator,
            speech,
            settle_tx,
            settle_rx,
        }
    }

    pub fn selection(&self) -> &Selection {
        self.selection.current()
    }

    pub fn state(&self) -> &InteractionState {
        self.machine.state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.machine.state().is_in_flight()
    }

    pub fn select_emotion(&mut self, emotion: Emotion) {
        self.selection.set_emotion(emotion);
    }

    pub fn edit_note(&mut self, note: impl Into<String>) {
        self.selection.set_note(note);
    }

    pub fn select_style(&mut self, style: Style) {
        self.selection.set_style(style);
    }

    /// Starts a request from the current selection. Returns `false` when a
    /// request is already outstanding, in which case nothing is sent.
    pub fn submit(&mut self) -> bool {
        let Some(request) = self.machine.submit(self.selection.current()) else {
            return false;
        };

        let orchestrator = self.orchestrator.clone();
        let settle_tx = self.settle_tx.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.dispatch(&request).await;
            if settle_tx.send(outcome).await.is_err() {
                tracing::debug!("Session dropped before the request settled");
            }
        });
        true
    }

    /// Waits for the outstanding request to settle and applies the outcome.
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` next to input
    /// handling. Only await it while `is_in_flight()` is true; otherwise it
    /// never completes.
    pub async fn next_settlement(&mut self) {
        if let Some(outcome) = self.settle_rx.recv().await {
            self.machine.settle(outcome);
        }
    }

    pub fn listen_action(&self) -> Option<ListenAction<'_>> {
        self.machine.state().result().map(|result| ListenAction {
            speech: &self.speech,
            content: &result.content,
        })
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            selection: self.selection.current(),
            state: self.machine.state(),
            can_listen: self.machine.state().result().is_some() && self.speech.is_available(),
        }
    }
}
