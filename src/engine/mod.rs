//! Audio Engine Module
//!
//! The playback engine seen from the controller:
//! - Transport trait, events and command records
//! - Simulated transport for tests and scripted runs

pub mod simulated;
pub mod transport;

pub use simulated::{SimulatedTransport, TransportState, DEFAULT_SAMPLE_RATE};
pub use transport::{Transport, TransportCommand, TransportEvent};
