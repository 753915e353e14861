//! Integration Tests
//!
//! End-to-end tests for attribute resolution, the interaction state machine
//! and the simulated transport working together.

use approx::assert_abs_diff_eq;

use waveplay::config::{resolve, Attributes, CaptureMode, InteractionPolicy, Mode};
use waveplay::controller::{
    Activation, IgnoreReason, Phase, PlaybackController, PointerEvent, PointerTarget, Status,
};
use waveplay::engine::{SimulatedTransport, Transport, TransportCommand};

/// Seek tolerance for position checks
const SEEK_TOLERANCE: f64 = 1e-6;

/// Helper to build a controller from attribute pairs
fn controller(pairs: &[(&str, &str)]) -> PlaybackController<SimulatedTransport> {
    let attrs: Attributes = pairs.iter().copied().collect();
    let config = resolve(&attrs).expect("valid attributes");
    PlaybackController::new(config, SimulatedTransport::new())
}

/// Helper to finish loading and forget setup commands
fn make_ready(controller: &mut PlaybackController<SimulatedTransport>, duration: f64) {
    controller.transport_mut().complete_load(duration);
    controller.pump();
    controller.transport_mut().clear_commands();
}

fn take_commands(controller: &mut PlaybackController<SimulatedTransport>) -> Vec<TransportCommand> {
    let commands = controller.transport().commands().to_vec();
    controller.transport_mut().clear_commands();
    commands
}

// === End-to-End Scenarios ===

#[test]
fn test_unset_mode_short_clip_restart_cycle() {
    let mut player = controller(&[("audio-url", "a.mp3")]);
    make_ready(&mut player, 5.0);
    assert_eq!(player.resolved_mode(), Some(Mode::Restart));

    // First click: reset and play
    player.handle_pointer(&PointerEvent::new(640.0, 800.0));
    assert_eq!(
        take_commands(&mut player),
        vec![TransportCommand::Stop, TransportCommand::Play]
    );
    assert!(player.transport().is_playing());
    assert_eq!(player.transport().current_time(), 0.0);

    // Track ends: position rewinds, playback stops
    player.transport_mut().advance_secs(5.0);
    player.pump();
    assert_eq!(player.phase(), Phase::Finished);
    assert_eq!(player.transport().current_time(), 0.0);
    assert!(!player.transport().is_playing());
    take_commands(&mut player);

    // Second click: plays again from 0
    player.handle_pointer(&PointerEvent::new(100.0, 800.0));
    assert!(player.transport().is_playing());
    assert_eq!(player.transport().current_time(), 0.0);
    assert_eq!(player.phase(), Phase::Playing);
}

#[test]
fn test_default_mode_seek_then_pause() {
    let mut player = controller(&[("audio-url", "a.mp3"), ("play-mode", "default")]);
    make_ready(&mut player, 8.0);

    player.handle_pointer(&PointerEvent::new(400.0, 800.0));
    assert_eq!(
        take_commands(&mut player),
        vec![TransportCommand::SeekTo(0.5), TransportCommand::Play]
    );
    assert!(player.transport().is_playing());
    assert_abs_diff_eq!(player.transport().current_time(), 4.0, epsilon = SEEK_TOLERANCE);

    player.handle_pointer(&PointerEvent::new(10.0, 800.0));
    assert_eq!(take_commands(&mut player), vec![TransportCommand::Pause]);
    assert!(!player.transport().is_playing());
    assert_abs_diff_eq!(player.transport().current_time(), 4.0, epsilon = SEEK_TOLERANCE);
}

// === Testable Properties ===

#[test]
fn test_restart_mode_always_ends_playing_at_zero() {
    for &(offset, advance) in &[(0.0, 0.0), (250.0, 3.0), (800.0, 7.5), (1200.0, 0.2)] {
        let mut player = controller(&[("audio-url", "a.mp3"), ("play-mode", "restart")]);
        make_ready(&mut player, 60.0);

        player.handle_pointer(&PointerEvent::new(offset, 800.0));
        player.transport_mut().advance_secs(advance);
        player.handle_pointer(&PointerEvent::new(offset, 800.0));

        assert!(player.transport().is_playing());
        assert_eq!(player.transport().current_time(), 0.0);
    }
}

#[test]
fn test_default_mode_resume_at_clicked_fraction() {
    for &fraction in &[0.0, 0.1, 0.33, 0.9] {
        let mut player = controller(&[("audio-url", "a.mp3"), ("play-mode", "default")]);
        make_ready(&mut player, 120.0);

        player.handle_pointer(&PointerEvent::at_fraction(fraction));
        assert!(player.transport().is_playing());
        assert_abs_diff_eq!(
            player.transport().current_time(),
            fraction * 120.0,
            epsilon = SEEK_TOLERANCE
        );
    }
}

#[test]
fn test_default_mode_at_end_resets_before_play() {
    let mut player = controller(&[("audio-url", "a.mp3"), ("play-mode", "default")]);
    make_ready(&mut player, 3.0);
    player.handle_pointer(&PointerEvent::at_fraction(0.0));
    player.transport_mut().advance_secs(10.0);
    player.pump();
    take_commands(&mut player);

    let outcome = player.handle_pointer(&PointerEvent::at_fraction(0.6));
    assert_eq!(outcome.activation, Activation::Replayed);
    assert_eq!(
        take_commands(&mut player),
        vec![TransportCommand::SeekTo(0.0), TransportCommand::Play]
    );
    assert!(player.transport().is_playing());
    assert_eq!(player.transport().current_time(), 0.0);
}

#[test]
fn test_inference_fixed_across_reload() {
    let mut player = controller(&[("audio-url", "a.mp3")]);
    make_ready(&mut player, 9.9);
    assert_eq!(player.resolved_mode(), Some(Mode::Restart));

    player.reload();
    assert_eq!(player.phase(), Phase::Loading);
    make_ready(&mut player, 300.0);
    assert_eq!(player.resolved_mode(), Some(Mode::Restart));

    // A repeated ready without reload changes nothing either
    player.transport_mut().complete_load(1.0);
    player.pump();
    assert_eq!(player.resolved_mode(), Some(Mode::Restart));
}

#[test]
fn test_inference_boundary_ten_seconds() {
    let mut player = controller(&[("audio-url", "a.mp3")]);
    make_ready(&mut player, 10.0);
    assert_eq!(player.resolved_mode(), Some(Mode::Default));
}

#[test]
fn test_inference_can_be_disabled() {
    let mut player = controller(&[("audio-url", "a.mp3"), ("infer-mode", "off")]);
    make_ready(&mut player, 2.0);
    assert_eq!(player.resolved_mode(), Some(Mode::Default));
}

#[test]
fn test_one_gesture_one_command_sequence() {
    let mut player = controller(&[("audio-url", "a.mp3"), ("play-mode", "default")]);
    make_ready(&mut player, 30.0);

    // The host delivers the gesture to the overlay; the surface only sees it
    // if the disposition lets it through.
    let event = PointerEvent::at_fraction(0.5);
    let outcome = player.handle_pointer(&event);
    if !outcome.disposition.stop_propagation {
        player.transport_mut().native_click(event.fraction());
    }

    assert!(outcome.disposition.stop_propagation);
    assert!(outcome.disposition.prevent_default);
    let commands = take_commands(&mut player);
    assert_eq!(
        commands,
        vec![TransportCommand::SeekTo(0.5), TransportCommand::Play]
    );
    assert!(!commands.contains(&TransportCommand::PlayPause));
    assert!(player.transport().is_playing());
}

#[test]
fn test_native_surface_click_cannot_compete() {
    let mut player = controller(&[
        ("audio-url", "a.mp3"),
        ("play-mode", "default"),
        ("capture", "direct"),
    ]);
    make_ready(&mut player, 30.0);
    assert_eq!(player.config().policy.capture, CaptureMode::Direct);

    let event = PointerEvent::at_fraction(0.25).on(PointerTarget::Surface);
    let outcome = player.handle_pointer(&event);
    // Even if the host ignored prevent_default, native handling is off
    assert!(!player.transport_mut().native_click(event.fraction()));

    assert!(outcome.disposition.prevent_default);
    assert_eq!(
        take_commands(&mut player),
        vec![TransportCommand::SeekTo(0.25), TransportCommand::Play]
    );
}

#[test]
fn test_pointer_before_ready_is_silent() {
    let mut player = controller(&[("audio-url", "a.mp3")]);
    player.transport_mut().report_progress(60);
    player.pump();
    take_commands(&mut player);

    for fraction in [0.0, 0.5, 1.0] {
        let outcome = player.handle_pointer(&PointerEvent::at_fraction(fraction));
        assert_eq!(
            outcome.activation,
            Activation::Ignored(IgnoreReason::NotReady)
        );
    }
    assert!(take_commands(&mut player).is_empty());
    assert_eq!(player.status(), &Status::Loading(60));

    // Nothing was queued: becoming ready does not replay the clicks
    make_ready(&mut player, 4.0);
    assert!(!player.transport().is_playing());
    assert_eq!(player.phase(), Phase::Ready);
}

#[test]
fn test_no_commands_after_transport_error() {
    let mut player = controller(&[("audio-url", "missing.mp3"), ("play-mode", "restart")]);
    player.transport_mut().report_progress(10);
    player.transport_mut().fail_load("HTTP 404");
    player.pump();
    take_commands(&mut player);

    assert_eq!(player.phase(), Phase::Errored);
    assert_eq!(player.status(), &Status::Error("HTTP 404".to_string()));

    for _ in 0..3 {
        player.handle_pointer(&PointerEvent::at_fraction(0.5));
    }
    player.reload();
    assert!(take_commands(&mut player).is_empty());
}

#[test]
fn test_double_activation_policy_from_attributes() {
    let mut player = controller(&[
        ("audio-url", "a.mp3"),
        ("play-mode", "default"),
        ("double-activation-ms", "on"),
    ]);
    make_ready(&mut player, 60.0);
    assert_eq!(
        player.config().policy,
        InteractionPolicy {
            double_activation_window_ms: Some(300),
            ..InteractionPolicy::default()
        }
    );

    player.handle_pointer(&PointerEvent::at_fraction(0.5).at(10_000));
    take_commands(&mut player);
    let outcome = player.handle_pointer(&PointerEvent::at_fraction(0.5).at(10_150));

    assert_eq!(outcome.activation, Activation::DoubleRestarted);
    assert_eq!(
        take_commands(&mut player),
        vec![TransportCommand::Stop, TransportCommand::Play]
    );
    assert_eq!(player.transport().current_time(), 0.0);
}
