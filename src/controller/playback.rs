//! Playback Controller
//!
//! The interaction state machine of one widget instance. It owns the
//! transport, turns transport events into phase changes and pointer events
//! into transport commands.
//!
//! Phases: `Loading -> Ready -> {Playing, Paused} <-> Finished`, with
//! `Errored` reachable from any non-terminal phase.
//!
//! The controller is the only source of transport commands. Construction
//! switches off the transport's native click handling, and pointer events
//! are only honored on the configured capture target, so one gesture maps
//! to exactly one command sequence.

use log::{debug, error, info};

use crate::config::{CaptureMode, InstanceConfig, Mode, RestartSeek};
use crate::controller::pointer::{
    Activation, EventDisposition, IgnoreReason, PointerEvent, PointerOutcome,
};
use crate::controller::state::{Phase, PlaybackState};
use crate::controller::status::{ModeDescription, Status};
use crate::engine::{Transport, TransportEvent};
use crate::error::WaveplayError;

/// Positions this close to the duration count as end of track
pub const END_OF_TRACK_TOLERANCE_SECS: f64 = 1e-3;

/// Interaction state machine for a single widget
///
/// # Example
/// ```
/// use waveplay::config::InstanceConfig;
/// use waveplay::controller::{Phase, PlaybackController, PointerEvent};
/// use waveplay::config::Mode;
/// use waveplay::engine::{SimulatedTransport, Transport};
///
/// let mut controller =
///     PlaybackController::new(InstanceConfig::new("a.mp3"), SimulatedTransport::new());
/// controller.transport_mut().complete_load(5.0);
/// controller.pump();
/// assert_eq!(controller.resolved_mode(), Some(Mode::Restart));
///
/// controller.handle_pointer(&PointerEvent::at_fraction(0.7));
/// assert_eq!(controller.phase(), Phase::Playing);
/// assert_eq!(controller.transport().current_time(), 0.0);
/// ```
#[derive(Debug)]
pub struct PlaybackController<T: Transport> {
    config: InstanceConfig,
    transport: T,
    state: PlaybackState,
    status: Status,
    /// Timestamp of the last handled activation, for double activation
    last_activation_ms: Option<u64>,
}

impl<T: Transport> PlaybackController<T> {
    /// Bind a controller to a fresh transport and start loading
    pub fn new(config: InstanceConfig, mut transport: T) -> Self {
        transport.set_native_interaction(false);
        transport.load(&config.audio_url);
        debug!("[CONTROLLER] Loading {}", config.audio_url);

        Self {
            state: PlaybackState::new(config.interaction_mode),
            config,
            transport,
            status: Status::Loading(0),
            last_activation_ms: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn resolved_mode(&self) -> Option<Mode> {
        self.state.resolved_mode
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The transport failure that made this instance inert, if any
    pub fn error(&self) -> Option<WaveplayError> {
        match &self.status {
            Status::Error(detail) => Some(WaveplayError::Transport {
                detail: detail.clone(),
            }),
            _ => None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access for hosts that drive the engine directly
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // ========================================================================
    // Transport Events
    // ========================================================================

    /// Drain the transport's pending events and handle them in order
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let events = self.transport.take_events();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// Apply one transport event
    pub fn handle_event(&mut self, event: TransportEvent) {
        if self.state.phase.is_terminal() {
            debug!("[CONTROLLER] Ignoring {} after error", event);
            return;
        }

        match event {
            TransportEvent::Loading(percent) => {
                if self.state.phase == Phase::Loading {
                    self.status = Status::Loading(percent.min(100));
                }
            }
            TransportEvent::Ready => self.on_ready(),
            TransportEvent::Error(detail) => {
                error!("[CONTROLLER] {} failed: {}", self.config.audio_url, detail);
                self.state.phase = Phase::Errored;
                self.status = Status::Error(detail);
            }
            TransportEvent::Finish => self.on_finish(),
        }
    }

    fn on_ready(&mut self) {
        let duration = self.transport.duration();
        self.state.duration = (duration.is_finite() && duration >= 0.0).then_some(duration);

        let policy = &self.config.policy;
        let mode = self.state.resolve_mode_once(|| {
            let inferred = policy.resolve_unset(duration);
            info!(
                "[CONTROLLER] Inferred {} mode from {:.3}s duration",
                inferred, duration
            );
            inferred
        });

        self.state.phase = Phase::Ready;
        self.status = Status::Ready(ModeDescription::describe(mode, &self.config.policy));
        debug!("[CONTROLLER] Ready in {} mode", mode);
    }

    fn on_finish(&mut self) {
        match self.state.phase {
            Phase::Playing | Phase::Paused => {
                self.state.phase = Phase::Finished;
                if self.state.resolved_mode == Some(Mode::Restart) {
                    self.transport.seek_to(0.0);
                    debug!("[CONTROLLER] Finished, rewound to start");
                } else {
                    debug!("[CONTROLLER] Finished, holding at end");
                }
            }
            phase => debug!("[CONTROLLER] Ignoring finish while {}", phase),
        }
    }

    // ========================================================================
    // Pointer Input
    // ========================================================================

    /// Handle one click or tap
    ///
    /// Never fails: input that cannot act is reported as
    /// [`Activation::Ignored`]. The returned disposition tells the host
    /// whether to stop propagation and prevent the default action.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerOutcome {
        let capture = self.config.policy.capture;
        if !event.target.is_capture_target(capture) {
            debug!(
                "[CONTROLLER] Ignoring {:?} event under {:?} capture",
                event.target, capture
            );
            return PointerOutcome {
                activation: Activation::Ignored(IgnoreReason::NotCaptureTarget),
                disposition: EventDisposition::PASS,
            };
        }

        let disposition = match capture {
            CaptureMode::Overlay => EventDisposition::CONSUME,
            CaptureMode::Direct => EventDisposition::PREVENT_DEFAULT,
        };

        PointerOutcome {
            activation: self.activate(event),
            disposition,
        }
    }

    fn activate(&mut self, event: &PointerEvent) -> Activation {
        if !self.state.phase.accepts_input() {
            let reason = if self.state.phase.is_terminal() {
                IgnoreReason::Inert
            } else {
                IgnoreReason::NotReady
            };
            return Activation::Ignored(reason);
        }
        let mode = match self.state.resolved_mode {
            Some(mode) => mode,
            None => return Activation::Ignored(IgnoreReason::NotReady),
        };

        let double = self.is_double_activation(event.timestamp_ms);
        self.last_activation_ms = event.timestamp_ms;
        if double {
            self.restart_from(None);
            debug!("[CONTROLLER] Double activation, restarted");
            return Activation::DoubleRestarted;
        }

        let fraction = event.fraction();
        match mode {
            Mode::Default => self.toggle(fraction),
            Mode::Restart => {
                let seek = match self.config.policy.restart_seek {
                    RestartSeek::FromStart => None,
                    RestartSeek::Pointer => Some(fraction),
                };
                self.restart_from(seek);
                Activation::Restarted {
                    fraction: seek.unwrap_or(0.0),
                }
            }
        }
    }

    fn is_double_activation(&self, timestamp_ms: Option<u64>) -> bool {
        match (
            self.config.policy.double_activation_window_ms,
            self.last_activation_ms,
            timestamp_ms,
        ) {
            (Some(window), Some(last), Some(now)) => now >= last && now - last < window,
            _ => false,
        }
    }

    /// Default mode: pause if playing, otherwise seek and play
    fn toggle(&mut self, fraction: f64) -> Activation {
        if self.state.phase == Phase::Playing {
            self.transport.pause();
            self.state.phase = Phase::Paused;
            let position_secs = self.transport.current_time();
            debug!("[CONTROLLER] Paused at {:.3}s", position_secs);
            return Activation::Paused { position_secs };
        }

        if self.at_end_of_track() {
            self.transport.seek_to(0.0);
            self.transport.play();
            self.state.phase = Phase::Playing;
            debug!("[CONTROLLER] Replaying from start");
            return Activation::Replayed;
        }

        self.transport.seek_to(fraction);
        self.transport.play();
        self.state.phase = Phase::Playing;
        debug!("[CONTROLLER] Playing from {:.3}", fraction);
        Activation::Played { fraction }
    }

    /// Stop, optionally seek, and play
    fn restart_from(&mut self, seek: Option<f64>) {
        self.transport.stop();
        if let Some(fraction) = seek {
            self.transport.seek_to(fraction);
        }
        self.transport.play();
        self.state.phase = Phase::Playing;
    }

    fn at_end_of_track(&self) -> bool {
        if self.state.phase == Phase::Finished {
            return true;
        }
        match self.state.duration {
            Some(duration) => {
                self.transport.current_time() >= duration - END_OF_TRACK_TOLERANCE_SECS
            }
            None => false,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load the audio again
    ///
    /// Returns to `Loading`; the resolved mode is kept. Does nothing once
    /// errored. Returns whether a load was issued.
    pub fn reload(&mut self) -> bool {
        if self.state.phase.is_terminal() {
            debug!("[CONTROLLER] Reload ignored after error");
            return false;
        }
        self.state.phase = Phase::Loading;
        self.state.duration = None;
        self.status = Status::Loading(0);
        self.last_activation_ms = None;
        self.transport.load(&self.config.audio_url);
        debug!("[CONTROLLER] Reloading {}", self.config.audio_url);
        true
    }

    /// Tear down: destroy the transport and hand it back
    pub fn release(mut self) -> T {
        self.transport.destroy();
        debug!("[CONTROLLER] Released {}", self.config.audio_url);
        self.transport
    }
}
