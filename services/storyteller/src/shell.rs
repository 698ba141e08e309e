use std::str::FromStr;
use storyteller_core::{CatalogError, Emotion, Style};

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Emotions,
    Emotion(Emotion),
    Note(String),
    Style(Style),
    Submit,
    Listen,
    Show,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("Unknown command '{0}'. Type 'help' for the list.")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl FromStr for ShellCommand {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "emotions" => ShellCommand::Emotions,
            "emotion" | "feel" => {
                if rest.is_empty() {
                    return Err(ShellError::MissingArgument("emotion"));
                }
                ShellCommand::Emotion(rest.parse()?)
            }
            // An empty note is allowed and clears it.
            "note" => ShellCommand::Note(rest.to_string()),
            "style" => {
                if rest.is_empty() {
                    return Err(ShellError::MissingArgument("style"));
                }
                ShellCommand::Style(rest.parse()?)
            }
            "submit" | "generate" => ShellCommand::Submit,
            "listen" => ShellCommand::Listen,
            "show" | "" => ShellCommand::Show,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => return Err(ShellError::Unknown(word.to_string())),
        };
        Ok(command)
    }
}
