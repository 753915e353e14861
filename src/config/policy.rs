//! Interaction modes and policy knobs
//!
//! Mode inference, restart-mode seeking, double-click handling and the
//! input capture target are parameters of one state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tracks shorter than this are inferred to be Restart-mode clips.
pub const DEFAULT_INFERENCE_THRESHOLD_SECS: f64 = 10.0;

/// How a pointer activation on the waveform is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Toggle play/pause, seeking to the clicked position when starting
    Default,
    /// Always replay from the start
    Restart,
}

impl Mode {
    /// Parse a `play-mode` attribute value
    ///
    /// Returns `None` for anything that is not an explicit mode, which
    /// leaves the mode unset and lets inference decide at ready time.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Mode::Default),
            "restart" => Some(Mode::Restart),
            _ => None,
        }
    }

    /// Infer the mode from the track duration
    ///
    /// The threshold is exclusive on the Restart side. Unknown or
    /// non-finite durations infer Default.
    ///
    /// # Example
    /// ```
    /// use waveplay::config::Mode;
    /// assert_eq!(Mode::infer(9.9, 10.0), Mode::Restart);
    /// assert_eq!(Mode::infer(10.0, 10.0), Mode::Default);
    /// ```
    pub fn infer(duration_secs: f64, threshold_secs: f64) -> Self {
        if duration_secs.is_finite() && duration_secs < threshold_secs {
            Mode::Restart
        } else {
            Mode::Default
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Default => write!(f, "default"),
            Mode::Restart => write!(f, "restart"),
        }
    }
}

/// Which element receives pointer input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// A transparent overlay above the waveform is the only input channel
    #[default]
    Overlay,
    /// The waveform surface itself receives clicks
    Direct,
}

impl CaptureMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overlay" => Some(CaptureMode::Overlay),
            "direct" | "surface" => Some(CaptureMode::Direct),
            _ => None,
        }
    }
}

/// Where Restart mode begins playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartSeek {
    /// Always from position 0
    #[default]
    FromStart,
    /// From the clicked position
    Pointer,
}

impl RestartSeek {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" | "from-start" | "from_start" => Some(RestartSeek::FromStart),
            "pointer" | "click" => Some(RestartSeek::Pointer),
            _ => None,
        }
    }
}

/// Policy parameters of the interaction state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionPolicy {
    /// Input capture target
    pub capture: CaptureMode,
    /// Restart-mode seek target
    pub restart_seek: RestartSeek,
    /// Whether an unset mode is inferred from duration; Default otherwise
    pub infer_mode: bool,
    /// Duration below which inference picks Restart
    pub inference_threshold_secs: f64,
    /// A second activation within this window restarts playback
    pub double_activation_window_ms: Option<u64>,
}

impl Default for InteractionPolicy {
    fn default() -> Self {
        Self {
            capture: CaptureMode::Overlay,
            restart_seek: RestartSeek::FromStart,
            infer_mode: true,
            inference_threshold_secs: DEFAULT_INFERENCE_THRESHOLD_SECS,
            double_activation_window_ms: None,
        }
    }
}

impl InteractionPolicy {
    /// Resolve the mode for an unset config once the duration is known
    pub fn resolve_unset(&self, duration_secs: f64) -> Mode {
        if self.infer_mode {
            Mode::infer(duration_secs, self.inference_threshold_secs)
        } else {
            Mode::Default
        }
    }
}
