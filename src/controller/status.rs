//! Status projection
//!
//! What the presentation layer shows under the waveform. The text from
//! `Display` is one possible rendering; hosts may localize from the enum.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{InteractionPolicy, Mode};

/// How the ready player responds to clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeDescription {
    TogglePlayback,
    ToggleWithDoubleRestart,
    RestartOnClick,
}

impl ModeDescription {
    pub fn describe(mode: Mode, policy: &InteractionPolicy) -> Self {
        match mode {
            Mode::Restart => ModeDescription::RestartOnClick,
            Mode::Default if policy.double_activation_window_ms.is_some() => {
                ModeDescription::ToggleWithDoubleRestart
            }
            Mode::Default => ModeDescription::TogglePlayback,
        }
    }
}

impl fmt::Display for ModeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeDescription::TogglePlayback => write!(f, "click to play/pause"),
            ModeDescription::ToggleWithDoubleRestart => {
                write!(f, "click to play/pause, double-click to play from the start")
            }
            ModeDescription::RestartOnClick => write!(f, "click to play from the start"),
        }
    }
}

/// Widget status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Status {
    /// Load progress in percent
    Loading(u8),
    Ready(ModeDescription),
    Error(String),
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Loading(percent) => write!(f, "Loading: {}%", percent),
            Status::Ready(description) => write!(f, "Audio loaded, {}", description),
            Status::Error(detail) => write!(f, "Error loading audio: {}", detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let policy = InteractionPolicy::default();
        assert_eq!(
            ModeDescription::describe(Mode::Default, &policy),
            ModeDescription::TogglePlayback
        );
        assert_eq!(
            ModeDescription::describe(Mode::Restart, &policy),
            ModeDescription::RestartOnClick
        );

        let policy = InteractionPolicy {
            double_activation_window_ms: Some(300),
            ..InteractionPolicy::default()
        };
        assert_eq!(
            ModeDescription::describe(Mode::Default, &policy),
            ModeDescription::ToggleWithDoubleRestart
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", Status::Loading(30)), "Loading: 30%");
        assert_eq!(
            format!("{}", Status::Ready(ModeDescription::TogglePlayback)),
            "Audio loaded, click to play/pause"
        );
        assert_eq!(
            format!("{}", Status::Error("404".to_string())),
            "Error loading audio: 404"
        );
    }

    #[test]
    fn test_status_json_shape() {
        let json = serde_json::to_value(Status::Loading(5)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "loading", "detail": 5}));
        assert!(Status::Error("x".to_string()).is_error());
    }
}
