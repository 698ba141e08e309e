//! Plain-text rendering of the session view. Pure: same view, same output.

use std::fmt;
use storyteller_core::{Emotion, FailureReason, InteractionState, SessionView, Style};

pub fn render(view: &SessionView<'_>) -> String {
    Screen(view).to_string()
}

/// The whole screen for one view.
struct Screen<'a, 'b>(&'a SessionView<'b>);

impl fmt::Display for Screen<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let selection = view.selection;

        writeln!(f, "1. How are you feeling today?")?;
        let picker: Vec<String> = Emotion::ALL
            .iter()
            .map(|emotion| {
                if *emotion == selection.emotion {
                    format!("[{} {}]", emotion.emoji(), emotion.name())
                } else {
                    format!(" {} {} ", emotion.emoji(), emotion.name())
                }
            })
            .collect();
        writeln!(f, "   {}", picker.join(" "))?;

        writeln!(f, "2. What's on your mind? (optional)")?;
        if selection.note.is_empty() {
            writeln!(f, "   (nothing yet)")?;
        } else {
            writeln!(f, "   {}", selection.note)?;
        }

        writeln!(f, "3. Creative style")?;
        let styles: Vec<String> = Style::ALL
            .iter()
            .map(|style| {
                if *style == selection.style {
                    format!("[{}]", style.label())
                } else {
                    format!(" {} ", style.label())
                }
            })
            .collect();
        writeln!(f, "   {}", styles.join(" "))?;
        writeln!(f)?;

        match view.state {
            InteractionState::Idle => writeln!(f, "Type 'submit' to generate your story."),
            InteractionState::InFlight => {
                writeln!(f, "Creating...")?;
                writeln!(f, "Your AI is thinking...")
            }
            InteractionState::Succeeded(result) => {
                writeln!(f, "== {} ==", result.title)?;
                writeln!(f)?;
                writeln!(f, "{}", result.content)?;
                if view.can_listen {
                    writeln!(f)?;
                    writeln!(f, "Type 'listen' to hear it.")?;
                }
                Ok(())
            }
            InteractionState::Failed(reason) => {
                writeln!(f, "An error occurred: {}", reason.message())?;
                if matches!(reason, FailureReason::TransportError(_)) {
                    writeln!(f, "Type 'submit' to try again.")?;
                }
                Ok(())
            }
        }
    }
}

pub fn render_help() -> String {
    [
        "Commands:",
        "  emotions            list the available emotions",
        "  emotion <name>      pick an emotion (name or emoji)",
        "  note <text>         say what's on your mind (empty clears it)",
        "  style <name>        story, poem or motivational quote",
        "  submit              generate",
        "  listen              read the result aloud",
        "  show                redraw the screen",
        "  help                this text",
        "  quit                leave",
    ]
    .join("\n")
}

pub fn render_emotions() -> String {
    Emotion::ALL
        .iter()
        .map(|e| format!("{} {}", e.emoji(), e.name()))
        .collect::<Vec<_>>()
        .join("\n")
}
