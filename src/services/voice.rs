//! Voice commands.
//!
//! Speech recognition belongs to the host platform and is reached through
//! [`VoiceInput`]. Transcripts are mapped to store [`Action`]s by keyword
//! matching; there is no grammar.

use serde::Serialize;

use crate::{
    models::TypeFilter,
    store::{Action, View},
};

/// Words dropped from a spoken search before the rest becomes the query
const SEARCH_FILLER: &[&str] = &["search", "find", "internship", "internships", "for"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Speech recognition error: {0}")]
    Engine(String),
}

/// Host speech-recognition capability
#[cfg_attr(test, mockall::automock)]
pub trait VoiceInput: Send {
    /// Whether the platform can recognize speech at all
    fn is_supported(&self) -> bool;

    /// Listens for a single utterance and returns its transcript
    fn capture(&mut self) -> Result<String, VoiceError>;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoiceAvailability {
    Available,
    /// Shown as a disabled control; never reported as an error at use time
    Unsupported,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum VoiceOutcome {
    Unsupported,
    Recognized {
        transcript: String,
        actions: Vec<Action>,
    },
    Failed {
        notice: String,
    },
}

/// Wraps a [`VoiceInput`], deciding support once at construction
pub struct VoiceAssistant<V> {
    input: V,
    availability: VoiceAvailability,
    last_transcript: Option<String>,
}

impl<V: VoiceInput> VoiceAssistant<V> {
    pub fn new(input: V) -> Self {
        let availability = if input.is_supported() {
            VoiceAvailability::Available
        } else {
            tracing::info!("Speech recognition unavailable, voice commands disabled");
            VoiceAvailability::Unsupported
        };

        Self {
            input,
            availability,
            last_transcript: None,
        }
    }

    pub fn availability(&self) -> VoiceAvailability {
        self.availability
    }

    pub fn last_transcript(&self) -> Option<&str> {
        self.last_transcript.as_deref()
    }

    /// Captures one utterance and interprets it
    pub fn listen(&mut self) -> VoiceOutcome {
        if self.availability == VoiceAvailability::Unsupported {
            return VoiceOutcome::Unsupported;
        }

        match self.input.capture() {
            Ok(transcript) => {
                let actions = interpret(&transcript);
                tracing::info!(transcript = %transcript, actions = actions.len(), "Voice command received");
                self.last_transcript = Some(transcript.clone());
                VoiceOutcome::Recognized {
                    transcript,
                    actions,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Voice capture failed");
                VoiceOutcome::Failed {
                    notice: "Could not understand the command. Please try again.".to_string(),
                }
            }
        }
    }
}

/// Maps a transcript to store actions; unknown commands map to nothing
pub fn interpret(transcript: &str) -> Vec<Action> {
    let command = transcript.trim().to_lowercase();

    if command.contains("saved internships") {
        return vec![Action::Navigate(View::Saved)];
    }
    if command.contains("profile") {
        return vec![Action::Navigate(View::Profile)];
    }
    if command.contains("dashboard") {
        return vec![Action::Navigate(View::Dashboard)];
    }
    if command.contains("search") || command.contains("find") {
        let mut actions = vec![Action::Navigate(View::Search)];
        let terms = search_terms(&command);
        if !terms.is_empty() {
            actions.push(Action::SetQuery(terms));
        }
        return actions;
    }
    if command.contains("unpaid") {
        return vec![Action::SetType(TypeFilter::Unpaid)];
    }
    if command.contains("paid") {
        return vec![Action::SetType(TypeFilter::Paid)];
    }
    if command.contains("remote") {
        return vec![Action::SetQuery("remote".to_string())];
    }

    Vec::new()
}

fn search_terms(command: &str) -> String {
    command
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty() && !SEARCH_FILLER.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
