//! The two observation channels.
//!
//! Each channel is one multiplexing service for every managed host: the
//! platform feeds it raw notifications keyed by node, and the channel maps
//! them back to the owning instance.

use crate::config::CONFIG_ATTRIBUTES;
use crate::error::{GutterError, Result};
use crate::registry::{InstanceId, NodeKey};
use std::collections::HashMap;

/// Inline `style` attribute name.
pub const STYLE_ATTRIBUTE: &str = "style";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    ShutDown,
}

/// What an attribute mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// The inline `style` attribute. Needs a computed-style diff.
    Style,
    /// One of the configuration attributes. Needs an attribute diff.
    Config,
}

impl MutationKind {
    pub fn classify(attribute: &str) -> Option<Self> {
        if attribute == STYLE_ATTRIBUTE {
            Some(MutationKind::Style)
        } else if CONFIG_ATTRIBUTES.contains(&attribute) {
            Some(MutationKind::Config)
        } else {
            None
        }
    }
}

#[derive(Debug)]
struct Channel {
    state: Lifecycle,
    observed: HashMap<NodeKey, InstanceId>,
}

impl Channel {
    fn new() -> Self {
        Self {
            state: Lifecycle::Idle,
            observed: HashMap::new(),
        }
    }

    fn init(&mut self) {
        if self.state == Lifecycle::Idle {
            self.state = Lifecycle::Running;
        }
    }

    fn observe(&mut self, instance: InstanceId, node: NodeKey) -> Result<()> {
        match self.state {
            Lifecycle::Running => {
                self.observed.insert(node, instance);
                Ok(())
            }
            Lifecycle::Idle | Lifecycle::ShutDown => Err(GutterError::ShutDown),
        }
    }

    fn unobserve(&mut self, node: NodeKey) -> Option<InstanceId> {
        self.observed.remove(&node)
    }

    fn dispatch(&self, node: NodeKey) -> Option<InstanceId> {
        if self.state != Lifecycle::Running {
            return None;
        }
        self.observed.get(&node).copied()
    }

    fn shutdown(&mut self) {
        self.observed.clear();
        self.state = Lifecycle::ShutDown;
    }
}

/// Watches the `style` attribute and the configuration attributes.
#[derive(Debug)]
pub struct AttributeWatcher {
    channel: Channel,
}

impl AttributeWatcher {
    pub fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Attribute names the platform observer should be filtered to.
    pub fn attribute_filter() -> [&'static str; 5] {
        let [a, b, c, d] = CONFIG_ATTRIBUTES;
        [STYLE_ATTRIBUTE, a, b, c, d]
    }

    pub fn init(&mut self) {
        self.channel.init();
    }

    pub fn observe(&mut self, instance: InstanceId, node: NodeKey) -> Result<()> {
        self.channel.observe(instance, node)
    }

    pub fn unobserve(&mut self, node: NodeKey) -> Option<InstanceId> {
        self.channel.unobserve(node)
    }

    /// Route a mutation of `attribute` on `node`. `None` if the node is not
    /// observed or the attribute is not one we track.
    pub fn dispatch(&self, node: NodeKey, attribute: &str) -> Option<(InstanceId, MutationKind)> {
        let kind = MutationKind::classify(attribute)?;
        let instance = self.channel.dispatch(node)?;
        Some((instance, kind))
    }

    pub fn shutdown(&mut self) {
        self.channel.shutdown();
    }

    pub fn state(&self) -> Lifecycle {
        self.channel.state
    }
}

impl Default for AttributeWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Watches content-box size. Every notification for an observed node counts.
#[derive(Debug)]
pub struct ResizeWatcher {
    channel: Channel,
}

impl ResizeWatcher {
    pub fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    pub fn init(&mut self) {
        self.channel.init();
    }

    pub fn observe(&mut self, instance: InstanceId, node: NodeKey) -> Result<()> {
        self.channel.observe(instance, node)
    }

    pub fn unobserve(&mut self, node: NodeKey) -> Option<InstanceId> {
        self.channel.unobserve(node)
    }

    pub fn dispatch(&self, node: NodeKey) -> Option<InstanceId> {
        self.channel.dispatch(node)
    }

    pub fn shutdown(&mut self) {
        self.channel.shutdown();
    }

    pub fn state(&self) -> Lifecycle {
        self.channel.state
    }
}

impl Default for ResizeWatcher {
    fn default() -> Self {
        Self::new()
    }
}
