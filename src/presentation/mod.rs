//! Rendering of command results into chat replies
//!
//! A [`Reply`] is what the chat gateway sends back to the user: Markdown
//! text plus an inline keyboard whose button actions use the bot's callback
//! vocabulary (`movie_{id}`, `fav_{id}`, `main_menu`, ...).
use serde::Serialize;

use crate::error::AppError;

pub mod formatters;
pub mod keyboards;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

pub type Keyboard = Vec<Vec<Button>>;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// Plain message with a single "Main Menu" button
    pub fn with_menu(text: impl Into<String>) -> Self {
        Self::new(text, keyboards::main_menu())
    }

    pub fn from_error(error: &AppError) -> Self {
        Self::with_menu(formatters::error_message(error))
    }
}

/// Body of every command response: the raw data and its rendering
#[derive(Debug, Serialize)]
pub struct CommandResponse<T: Serialize> {
    pub data: T,
    pub reply: Reply,
}

impl<T: Serialize> CommandResponse<T> {
    pub fn new(data: T, reply: Reply) -> Self {
        Self { data, reply }
    }
}

/// Cuts `text` to at most `max` characters, ending in "..." when shortened
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
