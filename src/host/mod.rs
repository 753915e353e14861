//! Widget Host
//!
//! Explicit lifecycle registration for waveform widgets. The hosting
//! application owns a [`WidgetHost`] and hands it element descriptors at
//! startup and whenever it inserts new elements; nothing is discovered
//! behind its back. Every widget gets its own config, controller and
//! transport.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{resolve, Attributes, InstanceConfig};
use crate::controller::{PlaybackController, PointerEvent, PointerOutcome};
use crate::engine::Transport;
use crate::error::{Result, WaveplayError};

/// Element tags turned into widgets unless configured otherwise
pub const DEFAULT_TAGS: [&str; 3] = ["mp3wave", "mp3-waveform", "wave-player"];

/// Identifier of a registered widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(Uuid);

impl WidgetId {
    fn new() -> Self {
        WidgetId(Uuid::new_v4())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A markup element as seen by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ElementDescriptor {
    pub fn new(tag: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            tag: tag.into(),
            attributes,
        }
    }
}

/// Host-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Qualifying tags, compared case-insensitively
    pub tags: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

impl HostConfig {
    pub fn qualifies(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Registry of live widgets, owned by the hosting application
///
/// `F` builds a fresh transport for each resolved config.
///
/// # Example
/// ```
/// use waveplay::config::{Attributes, InstanceConfig};
/// use waveplay::engine::SimulatedTransport;
/// use waveplay::host::{ElementDescriptor, WidgetHost};
///
/// let mut host = WidgetHost::new(|_config: &InstanceConfig| SimulatedTransport::new());
/// let element = ElementDescriptor::new("mp3wave", Attributes::new().with("audio-url", "a.mp3"));
/// let id = host.register(&element).unwrap();
/// assert_eq!(host.len(), 1);
/// host.unregister(id).unwrap();
/// assert!(host.is_empty());
/// ```
pub struct WidgetHost<T, F>
where
    T: Transport,
    F: FnMut(&InstanceConfig) -> T,
{
    config: HostConfig,
    factory: F,
    widgets: HashMap<WidgetId, PlaybackController<T>>,
}

impl<T, F> WidgetHost<T, F>
where
    T: Transport,
    F: FnMut(&InstanceConfig) -> T,
{
    pub fn new(factory: F) -> Self {
        Self::with_config(HostConfig::default(), factory)
    }

    pub fn with_config(config: HostConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            widgets: HashMap::new(),
        }
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Turn one element into a widget
    ///
    /// Fails for non-qualifying tags and for elements without an audio URL;
    /// other widgets are unaffected.
    pub fn register(&mut self, element: &ElementDescriptor) -> Result<WidgetId> {
        if !self.config.qualifies(&element.tag) {
            return Err(WaveplayError::UnsupportedElement {
                tag: element.tag.clone(),
            });
        }

        let config = resolve(&element.attributes)?;
        let transport = (self.factory)(&config);
        let controller = PlaybackController::new(config, transport);

        let id = WidgetId::new();
        debug!("[HOST] Registered <{}> as {}", element.tag, id);
        self.widgets.insert(id, controller);
        Ok(id)
    }

    /// Register every qualifying element of a container
    ///
    /// Non-qualifying elements are skipped. One result per qualifying
    /// element, in input order.
    pub fn register_container<'a, I>(&mut self, elements: I) -> Vec<Result<WidgetId>>
    where
        I: IntoIterator<Item = &'a ElementDescriptor>,
    {
        let mut results = Vec::new();
        for element in elements {
            if !self.config.qualifies(&element.tag) {
                continue;
            }
            let result = self.register(element);
            if let Err(e) = &result {
                warn!("[HOST] Skipping <{}>: {}", element.tag, e);
            }
            results.push(result);
        }
        results
    }

    /// Release a widget and destroy its transport
    ///
    /// Safe before the widget became ready: the transport's pending events
    /// are dropped with it.
    pub fn unregister(&mut self, id: WidgetId) -> Result<T> {
        let controller = self.widgets.remove(&id).ok_or_else(|| WaveplayError::UnknownWidget {
            id: id.to_string(),
        })?;
        debug!("[HOST] Unregistered {}", id);
        Ok(controller.release())
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Deliver pending transport events of one widget
    pub fn pump(&mut self, id: WidgetId) -> Result<usize> {
        Ok(self.get_mut(id)?.pump())
    }

    /// Deliver pending transport events of every widget
    pub fn pump_all(&mut self) -> usize {
        self.widgets.values_mut().map(|widget| widget.pump()).sum()
    }

    /// Route a pointer event to one widget
    pub fn pointer(&mut self, id: WidgetId, event: &PointerEvent) -> Result<PointerOutcome> {
        Ok(self.get_mut(id)?.handle_pointer(event))
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn get(&self, id: WidgetId) -> Result<&PlaybackController<T>> {
        self.widgets.get(&id).ok_or_else(|| WaveplayError::UnknownWidget {
            id: id.to_string(),
        })
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Result<&mut PlaybackController<T>> {
        self.widgets
            .get_mut(&id)
            .ok_or_else(|| WaveplayError::UnknownWidget { id: id.to_string() })
    }

    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.widgets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
