//! Configuration Module
//!
//! Per-instance configuration:
//! - Attribute normalization and resolution into `InstanceConfig`
//! - Interaction modes and policy parameters

pub mod attributes;
pub mod policy;

pub use attributes::{
    resolve, Attributes, Color, Dimension, InstanceConfig, WaveformStyle,
    DEFAULT_DOUBLE_ACTIVATION_MS, DEFAULT_HEIGHT_PX, DEFAULT_PROGRESS_COLOR, DEFAULT_WAVE_COLOR,
};
pub use policy::{
    CaptureMode, InteractionPolicy, Mode, RestartSeek, DEFAULT_INFERENCE_THRESHOLD_SECS,
};
