//! Per-instance playback state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Mode;

/// Lifecycle phase of one widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the transport's ready event (default state)
    #[default]
    Loading,
    Ready,
    Playing,
    Paused,
    /// Playback reached the end of the track
    Finished,
    /// Load failed; terminal
    Errored,
}

impl Phase {
    /// Whether pointer input may produce transport commands
    pub fn accepts_input(&self) -> bool {
        !matches!(self, Phase::Loading | Phase::Errored)
    }

    pub fn is_terminal(&self) -> bool {
        *self == Phase::Errored
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Loading => write!(f, "Loading"),
            Phase::Ready => write!(f, "Ready"),
            Phase::Playing => write!(f, "Playing"),
            Phase::Paused => write!(f, "Paused"),
            Phase::Finished => write!(f, "Finished"),
            Phase::Errored => write!(f, "Errored"),
        }
    }
}

/// Mutable state owned by a [`PlaybackController`](super::PlaybackController)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub(crate) phase: Phase,
    /// Set at construction when configured, otherwise at the first ready
    pub(crate) resolved_mode: Option<Mode>,
    /// Seconds; known only after ready
    pub(crate) duration: Option<f64>,
}

impl PlaybackState {
    pub fn new(configured_mode: Option<Mode>) -> Self {
        Self {
            phase: Phase::Loading,
            resolved_mode: configured_mode,
            duration: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn resolved_mode(&self) -> Option<Mode> {
        self.resolved_mode
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Fix the mode if still unset; later calls never change it
    pub(crate) fn resolve_mode_once(&mut self, infer: impl FnOnce() -> Mode) -> Mode {
        *self.resolved_mode.get_or_insert_with(infer)
    }
}
