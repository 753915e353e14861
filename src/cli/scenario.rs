//! Scripted interaction scenarios
//!
//! A scenario is an attribute set plus a list of steps (load progress,
//! ready, failure, clicks, clock advances, reloads) replayed against a
//! [`SimulatedTransport`]. Each step is reported with the resulting phase,
//! status and the transport commands it caused.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{resolve, Attributes, InstanceConfig, Mode};
use crate::controller::{
    Activation, Phase, PlaybackController, PointerEvent, PointerTarget, Status,
};
use crate::engine::{SimulatedTransport, Transport, TransportCommand};
use crate::error::{Result, WaveplayError};

/// Surface width used when a scenario does not set one
pub const DEFAULT_SURFACE_WIDTH: f64 = 1000.0;

fn default_surface_width() -> f64 {
    DEFAULT_SURFACE_WIDTH
}

/// One scripted input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Transport reports load progress
    Progress { percent: u8 },
    /// Transport finishes loading
    Ready { duration: f64 },
    /// Transport fails to load
    Fail { detail: String },
    /// User clicks at `fraction` of the surface width
    Click {
        fraction: f64,
        /// Untimed clicks never count as a double activation
        #[serde(default)]
        at_ms: Option<u64>,
        #[serde(default)]
        target: PointerTarget,
    },
    /// Audio clock advances
    Advance { seconds: f64 },
    /// Host reloads the audio
    Reload,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Progress { percent } => write!(f, "progress({}%)", percent),
            Step::Ready { duration } => write!(f, "ready({:.3}s)", duration),
            Step::Fail { detail } => write!(f, "fail({})", detail),
            Step::Click {
                fraction, target, ..
            } => match target {
                PointerTarget::Overlay => write!(f, "click({:.3})", fraction),
                PointerTarget::Surface => write!(f, "click({:.3}, surface)", fraction),
            },
            Step::Advance { seconds } => write!(f, "advance({:.3}s)", seconds),
            Step::Reload => write!(f, "reload"),
        }
    }
}

/// A complete scenario file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub attributes: Attributes,
    #[serde(default = "default_surface_width")]
    pub surface_width: f64,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject values the simulation cannot represent
    pub fn validate(&self) -> Result<()> {
        if !(self.surface_width.is_finite() && self.surface_width > 0.0) {
            return Err(WaveplayError::InvalidScenario {
                reason: format!("surface_width must be positive, got {}", self.surface_width),
            });
        }

        for (index, step) in self.steps.iter().enumerate() {
            let invalid = match step {
                Step::Ready { duration } => !(duration.is_finite() && *duration >= 0.0),
                Step::Advance { seconds } => !(seconds.is_finite() && *seconds >= 0.0),
                Step::Click { fraction, .. } => !fraction.is_finite(),
                _ => false,
            };
            if invalid {
                return Err(WaveplayError::InvalidScenario {
                    reason: format!("step {} ({}) has an out-of-range value", index, step),
                });
            }
        }
        Ok(())
    }
}

/// Observed state after one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub phase: Phase,
    pub mode: Option<Mode>,
    pub status: Status,
    pub activation: Option<Activation>,
    /// Commands the step caused, in order
    pub commands: Vec<TransportCommand>,
    pub playing: bool,
    pub position_secs: f64,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = self
            .mode
            .map(|mode| mode.to_string())
            .unwrap_or_else(|| "unset".to_string());
        let commands = if self.commands.is_empty() {
            "-".to_string()
        } else {
            self.commands
                .iter()
                .map(|command| command.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "[{:02}] {:<22} phase={:<8} mode={:<7} pos={:>7.3}s  commands: {}  status: {}",
            self.index,
            self.step.to_string(),
            self.phase.to_string(),
            mode,
            self.position_secs,
            commands,
            self.status
        )
    }
}

/// Full result of a scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: InstanceConfig,
    /// Commands issued while constructing the controller
    pub setup_commands: Vec<TransportCommand>,
    pub steps: Vec<StepReport>,
}

/// Replay a scenario against a fresh simulated transport
pub fn run_scenario(scenario: &Scenario) -> Result<SimulationReport> {
    scenario.validate()?;
    let config = resolve(&scenario.attributes)?;
    let mut controller = PlaybackController::new(config.clone(), SimulatedTransport::new());
    let setup_commands = drain_commands(&mut controller);

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let activation = apply_step(&mut controller, step, scenario.surface_width);
        controller.pump();

        steps.push(StepReport {
            index,
            step: step.clone(),
            phase: controller.phase(),
            mode: controller.resolved_mode(),
            status: controller.status().clone(),
            activation,
            commands: drain_commands(&mut controller),
            playing: controller.transport().is_playing(),
            position_secs: controller.transport().current_time(),
        });
    }

    Ok(SimulationReport {
        config,
        setup_commands,
        steps,
    })
}

fn apply_step(
    controller: &mut PlaybackController<SimulatedTransport>,
    step: &Step,
    surface_width: f64,
) -> Option<Activation> {
    match step {
        Step::Progress { percent } => {
            controller.transport_mut().report_progress(*percent);
            None
        }
        Step::Ready { duration } => {
            controller.transport_mut().complete_load(*duration);
            None
        }
        Step::Fail { detail } => {
            controller.transport_mut().fail_load(detail.clone());
            None
        }
        Step::Click {
            fraction,
            at_ms,
            target,
        } => {
            let mut event = PointerEvent::new(fraction * surface_width, surface_width).on(*target);
            event.timestamp_ms = *at_ms;
            let outcome = controller.handle_pointer(&event);
            // Whatever the controller lets through reaches the surface's own handler
            if !outcome.disposition.stop_propagation && !outcome.disposition.prevent_default {
                controller.transport_mut().native_click(event.fraction());
            }
            Some(outcome.activation)
        }
        Step::Advance { seconds } => {
            controller.transport_mut().advance_secs(*seconds);
            None
        }
        Step::Reload => {
            controller.reload();
            None
        }
    }
}

fn drain_commands(
    controller: &mut PlaybackController<SimulatedTransport>,
) -> Vec<TransportCommand> {
    let commands = controller.transport().commands().to_vec();
    controller.transport_mut().clear_commands();
    commands
}
