use crate::catalog::{Emotion, Style};

/// The user's current choices before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub emotion: Emotion,
    pub note: String,
    pub style: Style,
}

/// Owns the session's `Selection`. Each mutator replaces exactly one field.
///
/// Emotion and style are closed enums, so there is nothing to validate here;
/// turning typed input into catalog members happens where the input is read.
#[derive(Debug, Default)]
pub struct SelectionModel {
    selection: Selection,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Selection {
        &self.selection
    }

    pub fn set_emotion(&mut self, emotion: Emotion) {
        tracing::debug!("Emotion set to {}", emotion);
        self.selection.emotion = emotion;
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.selection.note = note.into();
    }

    pub fn set_style(&mut self, style: Style) {
        tracing::debug!("Style set to {}", style);
        self.selection.style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = SelectionModel::new();
        let current = model.current();
        assert_eq!(current.emotion, Emotion::Happy);
        assert!(current.note.is_empty());
        assert_eq!(current.style, Style::Story);
    }

    #[test]
    fn test_mutators_touch_one_field_each() {
        let mut model = SelectionModel::new();

        model.set_emotion(Emotion::Lonely);
        assert_eq!(
            model.current(),
            &Selection {
                emotion: Emotion::Lonely,
                note: String::new(),
                style: Style::Story,
            }
        );

        model.set_note("rainy sunday");
        assert_eq!(model.current().emotion, Emotion::Lonely);
        assert_eq!(model.current().note, "rainy sunday");
        assert_eq!(model.current().style, Style::Story);

        model.set_style(Style::Poem);
        assert_eq!(model.current().emotion, Emotion::Lonely);
        assert_eq!(model.current().note, "rainy sunday");
        assert_eq!(model.current().style, Style::Poem);

        model.set_note("");
        assert!(model.current().note.is_empty());
        assert_eq!(model.current().style, Style::Poem);
    }
}
