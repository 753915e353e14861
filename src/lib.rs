//! Waveplay - Attribute-Driven Waveform Player Control
//!
//! Binds a waveform surface to play/pause/seek/restart behavior for one
//! audio track per widget.
//!
//! # Architecture
//!
//! - `config`: resolves raw element attributes into an immutable config
//! - `controller`: per-widget interaction state machine and mode inference
//! - `engine`: the transport trait the controller drives, plus a simulator
//! - `host`: explicit widget registration and teardown
//! - `cli`: attribute resolution and scenario replay from the command line

pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod host;

pub use config::{resolve, Attributes, InstanceConfig, Mode};
pub use controller::{PlaybackController, Phase, PointerEvent, Status};
pub use engine::{SimulatedTransport, Transport, TransportEvent};
pub use error::{Result, WaveplayError};
pub use host::{ElementDescriptor, WidgetHost, WidgetId};
