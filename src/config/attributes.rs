//! Config Resolver
//!
//! Turns the raw attribute map of one widget element into an immutable
//! [`InstanceConfig`]. Only a missing audio URL is an error; every other
//! field falls back to a default when absent or malformed.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::policy::{CaptureMode, InteractionPolicy, Mode, RestartSeek};
use crate::error::{Result, WaveplayError};

/// Default waveform color
pub const DEFAULT_WAVE_COLOR: &str = "#4CAF50";

/// Default color of the played portion
pub const DEFAULT_PROGRESS_COLOR: &str = "#45a049";

/// Default cursor color
pub const DEFAULT_CURSOR_COLOR: &str = "#333";

/// Default surface height in pixels
pub const DEFAULT_HEIGHT_PX: u32 = 128;

/// Window used when double activation is switched on without a value
pub const DEFAULT_DOUBLE_ACTIVATION_MS: u64 = 300;

/// Legacy name of the audio URL attribute
const LEGACY_URL_ATTRIBUTE: &str = "mp3-url";

// ============================================================================
// Attributes
// ============================================================================

/// Attribute map of a single element
///
/// Keys are normalized on insert: trimmed, lowercased and stripped of a
/// leading `data-`, so `data-Audio-URL` and `audio-url` are the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Attributes {
    values: BTreeMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize an attribute name
    pub fn normalize_key(name: &str) -> String {
        let lowered = name.trim().to_ascii_lowercase();
        match lowered.strip_prefix("data-") {
            Some(rest) => rest.to_string(),
            None => lowered,
        }
    }

    /// Insert an attribute, replacing any earlier value for the same key
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(Self::normalize_key(name), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an attribute by (unnormalized) name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&Self::normalize_key(name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Attributes {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Attributes> for BTreeMap<String, String> {
    fn from(attrs: Attributes) -> Self {
        attrs.values
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k.as_ref(), v);
        }
        attrs
    }
}

// ============================================================================
// Value Types
// ============================================================================

/// A validated CSS color string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Parse a color, returning `None` for anything unrecognized
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, the `rgb()`/`rgba()`/`hsl()`/
    /// `hsla()` functional forms and alphabetic color names.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            let valid = matches!(hex.len(), 3 | 4 | 6 | 8)
                && hex.chars().all(|c| c.is_ascii_hexdigit());
            return valid.then(|| Color(value.to_string()));
        }

        let lowered = value.to_ascii_lowercase();
        let functional = ["rgb(", "rgba(", "hsl(", "hsla("]
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
            && lowered.ends_with(')');
        if functional {
            return Some(Color(value.to_string()));
        }

        if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Some(Color(lowered));
        }

        None
    }

    fn or_default(value: Option<&str>, default: &str, attribute: &str) -> Self {
        match value {
            None => Color(default.to_string()),
            Some(raw) => Color::parse(raw).unwrap_or_else(|| {
                warn!(
                    "[CONFIG] Invalid {} '{}', using {}",
                    attribute, raw, default
                );
                Color(default.to_string())
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A surface dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Absolute size in pixels
    Pixels(u32),
    /// Share of the available space, in (0, 100]
    Percent(f64),
}

impl Dimension {
    /// Fill all available space
    pub const FILL: Dimension = Dimension::Percent(100.0);

    /// Parse `N`, `Npx` or `N%`
    ///
    /// Zero, negative, non-finite and unparsable values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if let Some(percent) = value.strip_suffix('%') {
            let percent: f64 = percent.trim().parse().ok()?;
            return (percent.is_finite() && percent > 0.0 && percent <= 100.0)
                .then_some(Dimension::Percent(percent));
        }

        let pixels = value.strip_suffix("px").unwrap_or(value.as_str()).trim();
        match pixels.parse::<u32>() {
            Ok(px) if px > 0 => Some(Dimension::Pixels(px)),
            _ => {
                // Accept integral float notation such as "128.0"
                let px: f64 = pixels.parse().ok()?;
                (px.is_finite() && px >= 1.0 && px <= u32::MAX as f64)
                    .then(|| Dimension::Pixels(px.round() as u32))
            }
        }
    }

    fn or_default(value: Option<&str>, default: Dimension, attribute: &str) -> Self {
        match value {
            None => default,
            Some(raw) => Dimension::parse(raw).unwrap_or_else(|| {
                warn!("[CONFIG] Invalid {} '{}', using {}", attribute, raw, default);
                default
            }),
        }
    }

    /// Resolve to pixels given the available space
    pub fn to_pixels(&self, available_px: f64) -> f64 {
        match self {
            Dimension::Pixels(px) => *px as f64,
            Dimension::Percent(percent) => available_px.max(0.0) * percent / 100.0,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{}px", px),
            Dimension::Percent(percent) => write!(f, "{}%", percent),
        }
    }
}

/// Bar and cursor drawing options handed to the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformStyle {
    pub cursor_color: Color,
    pub cursor_width: u32,
    pub bar_width: u32,
    pub bar_gap: u32,
    pub bar_radius: u32,
}

impl Default for WaveformStyle {
    fn default() -> Self {
        Self {
            cursor_color: Color(DEFAULT_CURSOR_COLOR.to_string()),
            cursor_width: 1,
            bar_width: 2,
            bar_gap: 2,
            bar_radius: 3,
        }
    }
}

// ============================================================================
// Instance Config
// ============================================================================

/// Immutable configuration of one widget instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub audio_url: String,
    /// `None` means unset: the controller infers the mode at ready time
    pub interaction_mode: Option<Mode>,
    pub wave_color: Color,
    pub progress_color: Color,
    pub width: Dimension,
    pub height: Dimension,
    pub style: WaveformStyle,
    pub policy: InteractionPolicy,
}

impl InstanceConfig {
    /// Config with every field defaulted except the URL
    pub fn new(audio_url: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            interaction_mode: None,
            wave_color: Color(DEFAULT_WAVE_COLOR.to_string()),
            progress_color: Color(DEFAULT_PROGRESS_COLOR.to_string()),
            width: Dimension::FILL,
            height: Dimension::Pixels(DEFAULT_HEIGHT_PX),
            style: WaveformStyle::default(),
            policy: InteractionPolicy::default(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.interaction_mode = Some(mode);
        self
    }

    pub fn with_policy(mut self, policy: InteractionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Resolve the attributes of one element into an [`InstanceConfig`]
///
/// # Example
/// ```
/// use waveplay::config::{resolve, Attributes, Dimension, Mode};
///
/// let attrs = Attributes::new()
///     .with("data-audio-url", "a.mp3")
///     .with("play-mode", "restart")
///     .with("height", "not-a-number");
/// let config = resolve(&attrs).unwrap();
/// assert_eq!(config.audio_url, "a.mp3");
/// assert_eq!(config.interaction_mode, Some(Mode::Restart));
/// assert_eq!(config.height, Dimension::Pixels(128));
/// ```
pub fn resolve(attrs: &Attributes) -> Result<InstanceConfig> {
    let audio_url = [attrs.get("audio-url"), attrs.get(LEGACY_URL_ATTRIBUTE)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .ok_or(WaveplayError::MissingAudioUrl)?
        .to_string();

    let interaction_mode = attrs.get("play-mode").and_then(|raw| {
        let mode = Mode::parse(raw);
        let trimmed = raw.trim();
        if mode.is_none() && !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("unset") {
            warn!("[CONFIG] Unknown play-mode '{}', leaving mode unset", raw);
        }
        mode
    });

    let defaults = WaveformStyle::default();
    let style = WaveformStyle {
        cursor_color: Color::or_default(
            attrs.get("cursor-color"),
            DEFAULT_CURSOR_COLOR,
            "cursor-color",
        ),
        cursor_width: parse_count(attrs.get("cursor-width"), defaults.cursor_width, "cursor-width"),
        bar_width: parse_count(attrs.get("bar-width"), defaults.bar_width, "bar-width"),
        bar_gap: parse_count(attrs.get("bar-gap"), defaults.bar_gap, "bar-gap"),
        bar_radius: parse_count(attrs.get("bar-radius"), defaults.bar_radius, "bar-radius"),
    };

    Ok(InstanceConfig {
        audio_url,
        interaction_mode,
        wave_color: Color::or_default(attrs.get("wave-color"), DEFAULT_WAVE_COLOR, "wave-color"),
        progress_color: Color::or_default(
            attrs.get("progress-color"),
            DEFAULT_PROGRESS_COLOR,
            "progress-color",
        ),
        width: Dimension::or_default(attrs.get("width"), Dimension::FILL, "width"),
        height: Dimension::or_default(
            attrs.get("height"),
            Dimension::Pixels(DEFAULT_HEIGHT_PX),
            "height",
        ),
        style,
        policy: resolve_policy(attrs),
    })
}

fn resolve_policy(attrs: &Attributes) -> InteractionPolicy {
    let defaults = InteractionPolicy::default();

    let capture = attrs
        .get("capture")
        .map(|raw| {
            CaptureMode::parse(raw).unwrap_or_else(|| {
                warn!("[CONFIG] Unknown capture '{}', using overlay", raw);
                defaults.capture
            })
        })
        .unwrap_or(defaults.capture);

    let restart_seek = attrs
        .get("restart-seek")
        .map(|raw| {
            RestartSeek::parse(raw).unwrap_or_else(|| {
                warn!("[CONFIG] Unknown restart-seek '{}', using start", raw);
                defaults.restart_seek
            })
        })
        .unwrap_or(defaults.restart_seek);

    let infer_mode = attrs
        .get("infer-mode")
        .map(|raw| parse_flag(raw).unwrap_or(defaults.infer_mode))
        .unwrap_or(defaults.infer_mode);

    let double_activation_window_ms = attrs
        .get("double-activation-ms")
        .and_then(parse_double_activation);

    InteractionPolicy {
        capture,
        restart_seek,
        infer_mode,
        double_activation_window_ms,
        ..defaults
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_double_activation(raw: &str) -> Option<u64> {
    if let Some(enabled) = parse_flag(raw) {
        return enabled.then_some(DEFAULT_DOUBLE_ACTIVATION_MS);
    }
    match raw.trim().trim_end_matches("ms").trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(ms),
        _ => {
            warn!("[CONFIG] Invalid double-activation-ms '{}', disabled", raw);
            None
        }
    }
}

fn parse_count(value: Option<&str>, default: u32, attribute: &str) -> u32 {
    match value {
        None => default,
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed
                .strip_suffix("px")
                .unwrap_or(trimmed)
                .trim()
                .parse::<u32>()
                .unwrap_or_else(|_| {
                    warn!("[CONFIG] Invalid {} '{}', using {}", attribute, raw, default);
                    default
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_missing_url_is_error() {
        let err = resolve(&attrs(&[("play-mode", "restart")])).unwrap_err();
        assert!(matches!(err, WaveplayError::MissingAudioUrl));
    }

    #[test]
    fn test_blank_url_is_error() {
        let err = resolve(&attrs(&[("audio-url", "   ")])).unwrap_err();
        assert!(matches!(err, WaveplayError::MissingAudioUrl));
    }

    #[test]
    fn test_defaults() {
        let config = resolve(&attrs(&[("audio-url", "a.mp3")])).unwrap();
        assert_eq!(config.audio_url, "a.mp3");
        assert_eq!(config.interaction_mode, None);
        assert_eq!(config.wave_color.as_str(), DEFAULT_WAVE_COLOR);
        assert_eq!(config.progress_color.as_str(), DEFAULT_PROGRESS_COLOR);
        assert_eq!(config.width, Dimension::FILL);
        assert_eq!(config.height, Dimension::Pixels(128));
        assert_eq!(config.style, WaveformStyle::default());
        assert_eq!(config.policy, InteractionPolicy::default());
    }

    #[test]
    fn test_data_prefix_and_legacy_alias() {
        let config = resolve(&attrs(&[("data-mp3-url", "old.mp3")])).unwrap();
        assert_eq!(config.audio_url, "old.mp3");

        let config = resolve(&attrs(&[
            ("data-mp3-url", "old.mp3"),
            ("DATA-AUDIO-URL", "new.mp3"),
        ]))
        .unwrap();
        assert_eq!(config.audio_url, "new.mp3");
    }

    #[test]
    fn test_blank_url_falls_back_to_legacy_alias() {
        let config = resolve(&attrs(&[("audio-url", ""), ("mp3-url", "b.mp3")])).unwrap();
        assert_eq!(config.audio_url, "b.mp3");

        let config = resolve(&attrs(&[("audio-url", "  "), ("data-mp3-url", " c.mp3 ")])).unwrap();
        assert_eq!(config.audio_url, "c.mp3");

        let err = resolve(&attrs(&[("audio-url", ""), ("mp3-url", " ")])).unwrap_err();
        assert!(matches!(err, WaveplayError::MissingAudioUrl));
    }

    #[test]
    fn test_play_mode_values() {
        let mode = |value: &str| {
            resolve(&attrs(&[("audio-url", "a.mp3"), ("play-mode", value)]))
                .unwrap()
                .interaction_mode
        };
        assert_eq!(mode("default"), Some(Mode::Default));
        assert_eq!(mode("restart"), Some(Mode::Restart));
        assert_eq!(mode(""), None);
        assert_eq!(mode("shuffle"), None);
    }

    #[test]
    fn test_malformed_height_falls_back() {
        for bad in ["abc", "NaN", "-5", "0", "inf", ""] {
            let config = resolve(&attrs(&[("audio-url", "a.mp3"), ("height", bad)])).unwrap();
            assert_eq!(config.height, Dimension::Pixels(128), "height {:?}", bad);
        }
    }

    #[test]
    fn test_dimension_forms() {
        assert_eq!(Dimension::parse("200"), Some(Dimension::Pixels(200)));
        assert_eq!(Dimension::parse("200px"), Some(Dimension::Pixels(200)));
        assert_eq!(Dimension::parse(" 64 PX "), Some(Dimension::Pixels(64)));
        assert_eq!(Dimension::parse("50%"), Some(Dimension::Percent(50.0)));
        assert_eq!(Dimension::parse("150%"), None);
        assert_eq!(Dimension::parse("0%"), None);
        assert_eq!(Dimension::parse("96.0"), Some(Dimension::Pixels(96)));
    }

    #[test]
    fn test_dimension_to_pixels() {
        assert_eq!(Dimension::Pixels(300).to_pixels(800.0), 300.0);
        assert_eq!(Dimension::Percent(50.0).to_pixels(800.0), 400.0);
        assert_eq!(Dimension::FILL.to_pixels(-10.0), 0.0);
    }

    #[test]
    fn test_colors() {
        assert!(Color::parse("#fff").is_some());
        assert!(Color::parse("#A1B2C3").is_some());
        assert!(Color::parse("#a1b2c3d4").is_some());
        assert!(Color::parse("rgba(0, 0, 0, 0.5)").is_some());
        assert_eq!(Color::parse("Tomato").unwrap().as_str(), "tomato");
        assert!(Color::parse("#12").is_none());
        assert!(Color::parse("#gggggg").is_none());
        assert!(Color::parse("url(evil)").is_none());

        let config = resolve(&attrs(&[("audio-url", "a.mp3"), ("wave-color", "#zz")])).unwrap();
        assert_eq!(config.wave_color.as_str(), DEFAULT_WAVE_COLOR);
    }

    #[test]
    fn test_style_overrides() {
        let config = resolve(&attrs(&[
            ("audio-url", "a.mp3"),
            ("bar-width", "4"),
            ("bar-gap", "0"),
            ("bar-radius", "x"),
            ("cursor-color", "#000"),
        ]))
        .unwrap();
        assert_eq!(config.style.bar_width, 4);
        assert_eq!(config.style.bar_gap, 0);
        assert_eq!(config.style.bar_radius, 3);
        assert_eq!(config.style.cursor_color.as_str(), "#000");
    }

    #[test]
    fn test_policy_attributes() {
        let config = resolve(&attrs(&[
            ("audio-url", "a.mp3"),
            ("capture", "direct"),
            ("restart-seek", "pointer"),
            ("infer-mode", "off"),
            ("double-activation-ms", "250"),
        ]))
        .unwrap();
        assert_eq!(config.policy.capture, CaptureMode::Direct);
        assert_eq!(config.policy.restart_seek, RestartSeek::Pointer);
        assert!(!config.policy.infer_mode);
        assert_eq!(config.policy.double_activation_window_ms, Some(250));
    }

    #[test]
    fn test_double_activation_flag_forms() {
        assert_eq!(parse_double_activation("on"), Some(DEFAULT_DOUBLE_ACTIVATION_MS));
        assert_eq!(parse_double_activation("off"), None);
        assert_eq!(parse_double_activation("0"), None);
        assert_eq!(parse_double_activation("400ms"), Some(400));
        assert_eq!(parse_double_activation("soon"), None);
    }

    #[test]
    fn test_attributes_json_roundtrip_normalizes_keys() {
        let attrs: Attributes =
            serde_json::from_str(r#"{"data-audio-url": "a.mp3", "Play-Mode": "default"}"#).unwrap();
        assert_eq!(attrs.get("audio-url"), Some("a.mp3"));
        assert_eq!(attrs.get("play-mode"), Some("default"));
    }
}
