//! Error handling for Waveplay
//!
//! Errors are local to a single widget instance. Transport failures are
//! reported through the controller status, never returned from pointer or
//! event handlers.

use thiserror::Error;

/// Result type alias for Waveplay operations
pub type Result<T> = std::result::Result<T, WaveplayError>;

/// Main error type for Waveplay operations
#[derive(Error, Debug)]
pub enum WaveplayError {
    // Configuration Errors
    #[error("Missing required attribute: audio-url")]
    MissingAudioUrl,

    // Transport Errors
    #[error("Transport error: {detail}")]
    Transport { detail: String },

    // Host Errors
    #[error("Element <{tag}> is not a waveform player")]
    UnsupportedElement { tag: String },

    #[error("Unknown widget: {id}")]
    UnknownWidget { id: String },

    // Scenario Errors
    #[error("Invalid scenario: {reason}")]
    InvalidScenario { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WaveplayError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WaveplayError::MissingAudioUrl => "MISSING_AUDIO_URL",
            WaveplayError::Transport { .. } => "TRANSPORT_ERROR",
            WaveplayError::UnsupportedElement { .. } => "UNSUPPORTED_ELEMENT",
            WaveplayError::UnknownWidget { .. } => "UNKNOWN_WIDGET",
            WaveplayError::InvalidScenario { .. } => "INVALID_SCENARIO",
            WaveplayError::Io(_) => "IO_ERROR",
            WaveplayError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Configuration errors are fixed by editing the element; transport
    /// errors leave the instance inert and are never retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WaveplayError::MissingAudioUrl
                | WaveplayError::UnsupportedElement { .. }
                | WaveplayError::InvalidScenario { .. }
        )
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            WaveplayError::MissingAudioUrl => {
                "This player has no audio to play. Add an audio-url attribute to the element."
                    .to_string()
            }
            WaveplayError::Transport { detail } => {
                format!("The audio could not be loaded: {}", detail)
            }
            WaveplayError::UnsupportedElement { tag } => {
                format!("<{}> elements are not turned into waveform players.", tag)
            }
            _ => self.to_string(),
        }
    }
}
