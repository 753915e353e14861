//! In-memory transport
//!
//! A deterministic stand-in for a waveform rendering/playback engine. It
//! keeps a playhead clock, records every command it receives and queues
//! the lifecycle events a real engine would emit. Tests and the CLI drive
//! loading and the audio clock explicitly.

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use crate::engine::transport::{Transport, TransportCommand, TransportEvent};

/// Default clock rate for sample-based playhead advancement
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Playback state of the simulated engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Transport is paused (default state)
    #[default]
    Paused,
    /// Audio is actively playing
    Playing,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Paused => write!(f, "Paused"),
            TransportState::Playing => write!(f, "Playing"),
        }
    }
}

/// Simulated playback engine
///
/// # Example
/// ```
/// use waveplay::engine::{SimulatedTransport, Transport, TransportEvent};
///
/// let mut transport = SimulatedTransport::new();
/// transport.load("a.mp3");
/// transport.complete_load(8.0);
/// assert_eq!(transport.take_events(), vec![TransportEvent::Ready]);
///
/// transport.seek_to(0.5);
/// transport.play();
/// assert!(transport.is_playing());
/// assert_eq!(transport.current_time(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    /// Current playback state
    state: TransportState,

    /// Current playhead position in seconds
    playhead_position: f64,

    /// Known once loading completed
    duration: Option<f64>,

    /// Sample rate for sample-based advancement
    sample_rate: u32,

    /// Whether the surface handles clicks on its own
    native_interaction: bool,

    /// URL of the last load request
    url: Option<String>,

    /// Events not yet drained by the subscriber
    pending_events: VecDeque<TransportEvent>,

    /// Every command received, in order
    commands: Vec<TransportCommand>,

    /// Set once destroyed; no further events are delivered
    destroyed: bool,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTransport {
    /// Create an unloaded transport with native interaction enabled
    pub fn new() -> Self {
        Self::with_sample_rate(DEFAULT_SAMPLE_RATE)
    }

    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            state: TransportState::Paused,
            playhead_position: 0.0,
            duration: None,
            sample_rate,
            native_interaction: true,
            url: None,
            pending_events: VecDeque::new(),
            commands: Vec::new(),
            destroyed: false,
        }
    }

    // ========================================================================
    // Loading Simulation
    // ========================================================================

    /// Emit a load progress event
    pub fn report_progress(&mut self, percent: u8) {
        self.emit(TransportEvent::Loading(percent.min(100)));
    }

    /// Finish loading with the given duration and emit `Ready`
    pub fn complete_load(&mut self, duration_secs: f64) {
        let duration = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };
        self.duration = Some(duration);
        self.playhead_position = 0.0;
        self.state = TransportState::Paused;
        debug!("[SIM] Loaded {:?} ({:.3}s)", self.url, duration);
        self.emit(TransportEvent::Ready);
    }

    /// Fail loading and emit `Error`
    pub fn fail_load(&mut self, detail: impl Into<String>) {
        self.duration = None;
        self.state = TransportState::Paused;
        self.emit(TransportEvent::Error(detail.into()));
    }

    fn emit(&mut self, event: TransportEvent) {
        if self.destroyed {
            debug!("[SIM] Dropping {} after destroy", event);
            return;
        }
        self.pending_events.push_back(event);
    }

    // ========================================================================
    // Audio Clock
    // ========================================================================

    /// Advance the playhead by `samples_elapsed` at the configured rate
    pub fn advance_playhead(&mut self, samples_elapsed: u64) {
        let secs = samples_elapsed as f64 / self.sample_rate as f64;
        self.advance_secs(secs);
    }

    /// Advance the playhead by wall-clock seconds while playing
    ///
    /// Reaching the end of the track pauses playback, leaves the playhead
    /// at the duration and emits `Finish`.
    pub fn advance_secs(&mut self, secs: f64) {
        if self.state != TransportState::Playing || !secs.is_finite() || secs <= 0.0 {
            return;
        }
        self.playhead_position += secs;

        if let Some(duration) = self.duration {
            if self.playhead_position >= duration {
                self.playhead_position = duration;
                self.state = TransportState::Paused;
                debug!("[SIM] Finished at {:.3}s", duration);
                self.emit(TransportEvent::Finish);
            }
        }
    }

    /// Simulate a click reaching the surface's own handler
    ///
    /// With native interaction enabled the engine seeks to the clicked
    /// position and toggles playback, as stock waveform widgets do. Returns
    /// whether the click was handled.
    pub fn native_click(&mut self, fraction: f64) -> bool {
        if !self.native_interaction || self.destroyed || self.duration.is_none() {
            return false;
        }
        self.seek_to(fraction);
        self.play_pause();
        true
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Commands received so far
    pub fn commands(&self) -> &[TransportCommand] {
        &self.commands
    }

    /// Forget recorded commands
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn native_interaction_enabled(&self) -> bool {
        self.native_interaction
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_loaded(&self) -> bool {
        self.duration.is_some()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn record(&mut self, command: TransportCommand) {
        debug!("[SIM] {}", command);
        self.commands.push(command);
    }
}

impl Transport for SimulatedTransport {
    fn load(&mut self, url: &str) {
        self.record(TransportCommand::Load(url.to_string()));
        self.url = Some(url.to_string());
        self.duration = None;
        self.playhead_position = 0.0;
        self.state = TransportState::Paused;
    }

    fn play(&mut self) {
        self.record(TransportCommand::Play);
        if self.duration.is_some() && !self.destroyed {
            self.state = TransportState::Playing;
        }
    }

    fn pause(&mut self) {
        self.record(TransportCommand::Pause);
        self.state = TransportState::Paused;
    }

    fn stop(&mut self) {
        self.record(TransportCommand::Stop);
        self.state = TransportState::Paused;
        self.playhead_position = 0.0;
    }

    fn play_pause(&mut self) {
        self.record(TransportCommand::PlayPause);
        match self.state {
            TransportState::Playing => self.state = TransportState::Paused,
            TransportState::Paused => {
                if self.duration.is_some() && !self.destroyed {
                    self.state = TransportState::Playing;
                }
            }
        }
    }

    fn seek_to(&mut self, fraction: f64) {
        self.record(TransportCommand::SeekTo(fraction));
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if let Some(duration) = self.duration {
            self.playhead_position = fraction * duration;
        }
    }

    fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    fn current_time(&self) -> f64 {
        self.playhead_position
    }

    fn duration(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    fn set_native_interaction(&mut self, enabled: bool) {
        self.record(TransportCommand::SetNativeInteraction(enabled));
        self.native_interaction = enabled;
    }

    fn take_events(&mut self) -> Vec<TransportEvent> {
        self.pending_events.drain(..).collect()
    }

    fn destroy(&mut self) {
        self.record(TransportCommand::Destroy);
        self.destroyed = true;
        self.state = TransportState::Paused;
        self.pending_events.clear();
    }
}
