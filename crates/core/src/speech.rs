use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("Sorry, text-to-speech is not available on this system.")]
    CapabilityUnavailable,
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// The platform's speech synthesis facility. `speak` starts an utterance and
/// returns without waiting for it to finish.
#[cfg_attr(test, automock)]
pub trait SpeechCapability: Send + Sync {
    fn is_available(&self) -> bool;
    fn cancel_all(&self);
    fn speak(&self, text: &str) -> Result<()>;
}

/// Used when no platform capability could be found.
#[derive(Debug, Default)]
pub struct NoSpeech;

impl SpeechCapability for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn cancel_all(&self) {}

    fn speak(&self, _text: &str) -> Result<()> {
        Err(anyhow::anyhow!("no speech capability"))
    }
}

/// Reads text aloud, one utterance at a time.
pub struct SpeechPlayback {
    capability: Arc<dyn SpeechCapability>,
    // Serializes cancel-then-speak so two callers can't both end up playing.
    active: Mutex<()>,
}

impl SpeechPlayback {
    pub fn new(capability: Arc<dyn SpeechCapability>) -> Self {
        Self {
            capability,
            active: Mutex::new(()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    pub fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if !self.capability.is_available() {
            tracing::warn!("Speech requested but no capability is available");
            return Err(SpeechError::CapabilityUnavailable);
        }

        let _guard = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        self.capability.cancel_all();
        self.capability.speak(text).map_err(|e| {
            tracing::error!("Speech playback failed: {:?}", e);
            SpeechError::PlaybackFailed(e.to_string())
        })?;
        tracing::debug!("Started utterance ({} chars)", text.len());
        Ok(())
    }
}
