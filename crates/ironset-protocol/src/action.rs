//! Inbound events delivered by the chat transport.

use crate::ids::{ChatId, UserId};
use serde::{Deserialize, Serialize};

/// Who sent an event and where replies go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub display_name: String,
}

/// Slash commands understood in any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Start,
    Train,
    History,
    Stats,
    Weight,
    Help,
    Cancel,
    Skip,
}

impl Command {
    /// Parses `/name` or `/name@botname`; trailing arguments are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let head = text.trim().split_whitespace().next()?;
        let name = head.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "train" => Some(Self::Train),
            "progress" | "history" => Some(Self::History),
            "stats" => Some(Self::Stats),
            "weight" => Some(Self::Weight),
            "help" => Some(Self::Help),
            "cancel" => Some(Self::Cancel),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }

    pub fn as_slash(&self) -> &'static str {
        match self {
            Self::Start => "/start",
            Self::Train => "/train",
            Self::History => "/progress",
            Self::Stats => "/stats",
            Self::Weight => "/weight",
            Self::Help => "/help",
            Self::Cancel => "/cancel",
            Self::Skip => "/skip",
        }
    }
}

/// Inline button actions. The callback data strings are opaque to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    SelectExercise(usize),
    Progress,
    Recommend,
    Finish,
    Timer,
    Back,
}

impl ButtonAction {
    pub fn callback_data(&self) -> String {
        match self {
            Self::SelectExercise(index) => format!("ex_{index}"),
            Self::Progress => "progress".to_owned(),
            Self::Recommend => "recommend".to_owned(),
            Self::Finish => "finish".to_owned(),
            Self::Timer => "timer".to_owned(),
            Self::Back => "back".to_owned(),
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        if let Some(index) = data.strip_prefix("ex_") {
            return index.parse().ok().map(Self::SelectExercise);
        }
        match data {
            "progress" => Some(Self::Progress),
            "recommend" => Some(Self::Recommend),
            "finish" => Some(Self::Finish),
            "timer" => Some(Self::Timer),
            "back" => Some(Self::Back),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Command { command: Command },
    Text { text: String },
    Button { action: ButtonAction },
}

impl InboundEvent {
    /// Classifies a plain message: slash commands become `Command`, the rest
    /// stays free text.
    pub fn from_message(text: &str) -> Self {
        match Command::parse(text) {
            Some(command) => Self::Command { command },
            None => Self::Text {
                text: text.trim().to_owned(),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::Text { .. } => "text",
            Self::Button { .. } => "button",
        }
    }
}

/// One update handed to the conversation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    pub sender: Sender,
    pub event: InboundEvent,
}
