//! The two ways of running a session: once from the command line, or as an
//! interactive prompt.

use anyhow::{Context, Result};
use std::io::Write;
use std::process::ExitCode;
use storyteller_core::{InteractionState, StorySession};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::render::{render, render_emotions, render_help};
use crate::shell::ShellCommand;

/// Printed when a submit is refused because a request is still outstanding.
pub const STILL_CREATING: &str = "Still creating the last one, hang on...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Submits the current selection, waits for it to settle and prints the
/// result. Fails the process when the attempt does not succeed.
pub async fn run_once<W: Write>(
    session: &mut StorySession,
    speak: bool,
    out: &mut W,
) -> Result<ExitCode> {
    session.submit();
    session.next_settlement().await;
    write!(out, "{}", render(&session.view()))?;

    match session.state() {
        InteractionState::Succeeded(_) => {
            if speak {
                if let Some(action) = session.listen_action() {
                    if let Err(e) = action.play() {
                        writeln!(out, "{}", e)?;
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        InteractionState::Failed(reason) => {
            tracing::info!("Generation failed: {}", reason.message());
            Ok(ExitCode::FAILURE)
        }
        InteractionState::Idle | InteractionState::InFlight => Ok(ExitCode::FAILURE),
    }
}

/// Reads commands line by line until `quit`, end of input or Ctrl-C.
/// Settlements are drawn as they arrive, between commands.
pub async fn run_shell<R, W>(session: &mut StorySession, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    writeln!(out, "{}", render(&session.view()))?;
    writeln!(out, "{}", render_help())?;
    prompt(out)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match line.parse::<ShellCommand>() {
                    Ok(command) => {
                        if handle_command(session, command, out)? == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => writeln!(out, "{}", e)?,
                }
                prompt(out)?;
            }
            _ = session.next_settlement(), if session.is_in_flight() => {
                writeln!(out)?;
                writeln!(out, "{}", render(&session.view()))?;
                prompt(out)?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C");
                break;
            }
        }
    }
    Ok(())
}

pub fn handle_command<W: Write>(
    session: &mut StorySession,
    command: ShellCommand,
    out: &mut W,
) -> Result<Flow> {
    match command {
        ShellCommand::Emotions => writeln!(out, "{}", render_emotions())?,
        ShellCommand::Emotion(emotion) => {
            session.select_emotion(emotion);
            writeln!(out, "Feeling {} {}", emotion.emoji(), emotion.name())?;
        }
        ShellCommand::Note(note) => session.edit_note(note),
        ShellCommand::Style(style) => {
            session.select_style(style);
            writeln!(out, "Style: {}", style.label())?;
        }
        ShellCommand::Submit => {
            if !session.submit() {
                writeln!(out, "{}", STILL_CREATING)?;
            }
            writeln!(out, "{}", render(&session.view()))?;
        }
        ShellCommand::Listen => match session.listen_action() {
            Some(action) => {
                if let Err(e) = action.play() {
                    writeln!(out, "{}", e)?;
                }
            }
            None => writeln!(out, "Nothing to listen to yet.")?,
        },
        ShellCommand::Show => writeln!(out, "{}", render(&session.view()))?,
        ShellCommand::Help => writeln!(out, "{}", render_help())?,
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn prompt<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
