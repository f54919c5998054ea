//! Outbound replies: message text plus an optional button layout.

use crate::action::ButtonAction;
use serde::{Deserialize, Serialize};

/// An inline button: visible label and the action it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn new(label: impl Into<String>, action: ButtonAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum Keyboard {
    /// Buttons attached to the message.
    Inline(Vec<Vec<Button>>),
    /// Suggested texts shown in place of the user's keyboard.
    Suggestions(Vec<Vec<String>>),
    /// Hide any suggestion keyboard.
    Remove,
}

impl Keyboard {
    pub fn inline_buttons(&self) -> impl Iterator<Item = &Button> {
        let rows: &[Vec<Button>] = match self {
            Self::Inline(rows) => rows,
            _ => &[],
        };
        rows.iter().flatten()
    }
}

/// One message to deliver. Text is HTML-formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_buttons_flattens_rows() {
        let keyboard = Keyboard::Inline(vec![
            vec![Button::new("1", ButtonAction::SelectExercise(0))],
            vec![
                Button::new("Timer", ButtonAction::Timer),
                Button::new("Back", ButtonAction::Back),
            ],
        ]);
        assert_eq!(keyboard.inline_buttons().count(), 3);
        assert_eq!(Keyboard::Remove.inline_buttons().count(), 0);
    }
}
