//! The fixed choices a user can pick from: six emotions and three styles.

use std::fmt;
use std::str::FromStr;

/// Returned when user input does not name a catalog member.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown emotion: '{0}'")]
    UnknownEmotion(String),
    #[error("Unknown style: '{0}'")]
    UnknownStyle(String),
}

/// One of the six moods offered by the picker.
///
/// The `name` is the identifier sent to the generation service and the only
/// thing used for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emotion {
    #[default]
    Happy,
    Sad,
    Angry,
    Calm,
    Lonely,
    Stressed,
}

impl Emotion {
    /// The catalog in display order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Calm,
        Emotion::Lonely,
        Emotion::Stressed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Calm => "Calm",
            Emotion::Lonely => "Lonely",
            Emotion::Stressed => "Stressed",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😡",
            Emotion::Calm => "😌",
            Emotion::Lonely => "😔",
            Emotion::Stressed => "😰",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Emotion {
    type Err = CatalogError;

    /// Accepts the name in any case, or the emoji itself.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(wanted) || e.emoji() == wanted)
            .ok_or_else(|| CatalogError::UnknownEmotion(wanted.to_string()))
    }
}

/// The creative form requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    Story,
    Poem,
    MotivationalQuote,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Story, Style::Poem, Style::MotivationalQuote];

    /// Label used on the wire and in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Style::Story => "Story",
            Style::Poem => "Poem",
            Style::MotivationalQuote => "Motivational Quote",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Style {
    type Err = CatalogError;

    /// Case-insensitive; spaces, dashes and underscores are ignored so that
    /// "motivational-quote" and "MotivationalQuote" both resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |v: &str| {
            v.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .collect::<String>()
                .to_lowercase()
        };
        let wanted = normalize(s);
        Style::ALL
            .into_iter()
            .find(|style| normalize(style.label()) == wanted)
            .ok_or_else(|| CatalogError::UnknownStyle(s.trim().to_string()))
    }
}
