//! Pointer input and its outcomes

use serde::{Deserialize, Serialize};

use crate::config::CaptureMode;

/// Element a pointer event was dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The transparent capture layer above the waveform
    #[default]
    Overlay,
    /// The transport's own rendering surface
    Surface,
}

impl PointerTarget {
    /// Whether this target is the input channel for `capture`
    pub fn is_capture_target(&self, capture: CaptureMode) -> bool {
        matches!(
            (capture, self),
            (CaptureMode::Overlay, PointerTarget::Overlay)
                | (CaptureMode::Direct, PointerTarget::Surface)
        )
    }
}

/// One click or tap on the waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Horizontal offset within the surface, in pixels
    pub offset_x: f64,
    /// Width of the interactive surface, in pixels
    pub surface_width: f64,
    /// Event time in milliseconds, any monotonic origin
    ///
    /// Untimed events never count toward a double activation.
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
    pub target: PointerTarget,
}

impl PointerEvent {
    /// An overlay click at `offset_x` on a surface `surface_width` wide
    pub fn new(offset_x: f64, surface_width: f64) -> Self {
        Self {
            offset_x,
            surface_width,
            timestamp_ms: None,
            target: PointerTarget::Overlay,
        }
    }

    /// An overlay click at `fraction` of a unit-width surface
    pub fn at_fraction(fraction: f64) -> Self {
        Self::new(fraction, 1.0)
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn on(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }

    /// Horizontal position as a fraction of the surface, clamped to [0, 1]
    ///
    /// Degenerate widths and non-finite offsets map to 0.
    pub fn fraction(&self) -> f64 {
        if !(self.surface_width.is_finite() && self.surface_width > 0.0) {
            return 0.0;
        }
        let fraction = self.offset_x / self.surface_width;
        if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Why a pointer event produced no command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Audio not ready yet
    NotReady,
    /// Load failed earlier
    Inert,
    /// Event arrived on an element that is not the capture point
    NotCaptureTarget,
}

/// What a pointer activation did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Ignored(IgnoreReason),
    /// Default mode: playback paused at this position
    Paused { position_secs: f64 },
    /// Default mode: seeked to the clicked fraction and started
    Played { fraction: f64 },
    /// Default mode: was at end of track, started again from 0
    Replayed,
    /// Restart mode: stopped and started from `fraction`
    Restarted { fraction: f64 },
    /// Second activation inside the double-activation window
    DoubleRestarted,
}

impl Activation {
    /// Whether the activation issued transport commands
    pub fn issued_commands(&self) -> bool {
        !matches!(self, Activation::Ignored(_))
    }
}

/// What the host should do with the native event after handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventDisposition {
    pub stop_propagation: bool,
    pub prevent_default: bool,
}

impl EventDisposition {
    /// Let the event continue untouched
    pub const PASS: EventDisposition = EventDisposition {
        stop_propagation: false,
        prevent_default: false,
    };

    /// Keep the event away from everything below the overlay
    pub const CONSUME: EventDisposition = EventDisposition {
        stop_propagation: true,
        prevent_default: true,
    };

    /// Suppress the surface's default action only
    pub const PREVENT_DEFAULT: EventDisposition = EventDisposition {
        stop_propagation: false,
        prevent_default: true,
    };
}

/// Result of handling one pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerOutcome {
    pub activation: Activation,
    pub disposition: EventDisposition,
}
