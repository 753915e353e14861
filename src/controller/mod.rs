//! Playback Controller Module
//!
//! The interaction state machine:
//! - Per-instance phase, resolved mode and duration
//! - Pointer events, activations and event dispositions
//! - Status projection for the presentation layer

pub mod playback;
pub mod pointer;
pub mod state;
pub mod status;

pub use playback::{PlaybackController, END_OF_TRACK_TOLERANCE_SECS};
pub use pointer::{
    Activation, EventDisposition, IgnoreReason, PointerEvent, PointerOutcome, PointerTarget,
};
pub use state::{Phase, PlaybackState};
pub use status::{ModeDescription, Status};
