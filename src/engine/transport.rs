//! Transport interface
//!
//! The waveform rendering/playback engine the controller drives. Commands
//! are fire-and-forget: their effects are observed through later queries
//! and through the events drained with [`Transport::take_events`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle events emitted by a transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportEvent {
    /// Load progress in percent
    Loading(u8),
    /// Audio decoded; duration and queries are now valid
    Ready,
    /// Load or decode failure
    Error(String),
    /// Playback reached the end of the track
    Finish,
}

impl fmt::Display for TransportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportEvent::Loading(percent) => write!(f, "loading({}%)", percent),
            TransportEvent::Ready => write!(f, "ready"),
            TransportEvent::Error(detail) => write!(f, "error({})", detail),
            TransportEvent::Finish => write!(f, "finish"),
        }
    }
}

/// A command issued to a transport, as recorded by command logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportCommand {
    Load(String),
    Play,
    Pause,
    Stop,
    PlayPause,
    SeekTo(f64),
    SetNativeInteraction(bool),
    Destroy,
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCommand::Load(url) => write!(f, "load({})", url),
            TransportCommand::Play => write!(f, "play()"),
            TransportCommand::Pause => write!(f, "pause()"),
            TransportCommand::Stop => write!(f, "stop()"),
            TransportCommand::PlayPause => write!(f, "playPause()"),
            TransportCommand::SeekTo(fraction) => write!(f, "seekTo({:.3})", fraction),
            TransportCommand::SetNativeInteraction(enabled) => {
                write!(f, "setNativeInteraction({})", enabled)
            }
            TransportCommand::Destroy => write!(f, "destroy()"),
        }
    }
}

/// The playback engine consumed by the controller
///
/// Implementations render the waveform and play the audio. Queries are
/// only meaningful after a [`TransportEvent::Ready`] has been emitted.
pub trait Transport {
    /// Begin loading audio
    ///
    /// Emits zero or more `Loading` events, then exactly one of `Ready` or
    /// `Error`.
    fn load(&mut self, url: &str);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Stop playback and reset the position to the start
    fn stop(&mut self);

    /// Toggle between playing and paused
    fn play_pause(&mut self);

    /// Move the playhead to `fraction` of the duration, in [0, 1]
    fn seek_to(&mut self, fraction: f64);

    fn is_playing(&self) -> bool;

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Track duration in seconds
    fn duration(&self) -> f64;

    /// Enable or disable the surface's own click handling
    fn set_native_interaction(&mut self, enabled: bool);

    /// Drain pending events in emission order
    fn take_events(&mut self) -> Vec<TransportEvent>;

    /// Release resources and detach every event subscription
    fn destroy(&mut self);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn load(&mut self, url: &str) {
        (**self).load(url)
    }

    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn play_pause(&mut self) {
        (**self).play_pause()
    }

    fn seek_to(&mut self, fraction: f64) {
        (**self).seek_to(fraction)
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn set_native_interaction(&mut self, enabled: bool) {
        (**self).set_native_interaction(enabled)
    }

    fn take_events(&mut self) -> Vec<TransportEvent> {
        (**self).take_events()
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", TransportEvent::Loading(42)), "loading(42%)");
        assert_eq!(format!("{}", TransportEvent::Ready), "ready");
        assert_eq!(format!("{}", TransportEvent::Finish), "finish");
    }

    #[test]
    fn test_command_display() {
        assert_eq!(format!("{}", TransportCommand::SeekTo(0.5)), "seekTo(0.500)");
        assert_eq!(format!("{}", TransportCommand::PlayPause), "playPause()");
        assert_eq!(
            format!("{}", TransportCommand::Load("a.mp3".to_string())),
            "load(a.mp3)"
        );
    }
}
