//! Text-to-speech through an external program such as `espeak` or `say`.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use storyteller_core::SpeechCapability;
use tokio::process::{Child, Command};

/// Speaks by spawning `<program> <text>`. The running child is kept so a new
/// utterance (or `cancel_all`) can stop it, and it is killed when the
/// capability is dropped.
pub struct CommandSpeech {
    program: Option<PathBuf>,
    current: Mutex<Option<Child>>,
}

impl CommandSpeech {
    /// Looks the program up on `PATH`, or uses it directly if it is a path.
    pub fn detect(command: &str) -> Self {
        let program = find_program(command);
        match &program {
            Some(path) => tracing::info!("Using speech program {}", path.display()),
            None => tracing::warn!("Speech program '{}' not found; listen is disabled", command),
        }
        Self {
            program,
            current: Mutex::new(None),
        }
    }

    /// Waits for the current utterance, if any, to finish on its own.
    pub async fn finish(&self) -> Result<()> {
        let child = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(mut child) = child {
            child.wait().await.context("Failed to wait for the speech program")?;
        }
        Ok(())
    }
}

impl SpeechCapability for CommandSpeech {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn cancel_all(&self) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(mut child) = current.take() {
            if let Err(e) = child.start_kill() {
                // Usually means the utterance already finished.
                tracing::debug!("Could not stop previous utterance: {}", e);
            }
        }
    }

    fn speak(&self, text: &str) -> Result<()> {
        let program = self
            .program
            .as_ref()
            .context("No speech program available")?;

        let child = Command::new(program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {}", program.display()))?;

        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(child);
        Ok(())
    }
}

/// Resolves a program name the way a shell would.
pub fn find_program(command: &str) -> Option<PathBuf> {
    let command = command.trim();
    if command.is_empty() {
        return None;
    }

    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(command))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
