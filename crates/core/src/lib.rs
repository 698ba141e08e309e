//! Core of the storyteller client: what the user picked, the request built
//! from it, how the answer is classified and what the interface may show.

pub mod catalog;
pub mod generation;
pub mod interaction;
pub mod orchestrator;
pub mod selection;
pub mod session;
pub mod speech;

pub use catalog::{CatalogError, Emotion, Style};
pub use generation::{
    FailureReason, GenerationOutcome, GenerationRequest, GenerationResult, GenerationService,
    HttpGenerationService,
};
pub use interaction::{InteractionMachine, InteractionState};
pub use orchestrator::{RequestOrchestrator, TRANSPORT_ERROR_MESSAGE};
pub use selection::{Selection, SelectionModel};
pub use session::{ListenAction, SessionView, StorySession};
pub use speech::{NoSpeech, SpeechCapability, SpeechError, SpeechPlayback};
