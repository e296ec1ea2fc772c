use crate::config::ConfigOverride;
use crate::error::{GutterError, Result};
use crate::host::Host;
use crate::raster::Raster;
use crate::registry::{Instance, InstanceId, NodeKey, Registry};
use crate::render::{RenderEngine, RenderOutcome};
use crate::scheduler::{DEFAULT_QUIET_MS, ManualTimers, TimerHandle, TimerHost};
use crate::watcher::{AttributeWatcher, MutationKind, ResizeWatcher};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Quiet period after the last render request before rendering.
    pub quiet_interval: Duration,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            quiet_interval: Duration::from_millis(DEFAULT_QUIET_MS),
        }
    }
}

/// Owns every managed instance, both watcher channels and the timer host.
///
/// Platform bindings forward raw events here: `input` events to
/// [`on_input`](Self::on_input), attribute mutations to
/// [`on_attribute_mutation`](Self::on_attribute_mutation), size changes to
/// [`on_resize`](Self::on_resize) and elapsed timers to
/// [`fire`](Self::fire).
pub struct Coordinator<H: Host, R: Raster, T: TimerHost> {
    registry: Registry<H, R>,
    attributes: AttributeWatcher,
    resize: ResizeWatcher,
    timers: T,
    options: CoordinatorOptions,
    shut_down: bool,
}

impl<H: Host, R: Raster, T: TimerHost> Coordinator<H, R, T> {
    pub fn new(timers: T) -> Self {
        Self::with_options(timers, CoordinatorOptions::default())
    }

    pub fn with_options(timers: T, options: CoordinatorOptions) -> Self {
        let mut attributes = AttributeWatcher::new();
        let mut resize = ResizeWatcher::new();
        attributes.init();
        resize.init();

        Self {
            registry: Registry::new(),
            attributes,
            resize,
            timers,
            options,
            shut_down: false,
        }
    }

    /// Start managing `host`. An initial render is scheduled right away.
    pub fn attach(&mut self, node: NodeKey, host: H, raster: R, overrides: ConfigOverride) -> Result<InstanceId> {
        if self.shut_down {
            return Err(GutterError::ShutDown);
        }

        let id = self.registry.insert(node, RenderEngine::new(host, raster, overrides))?;
        self.attributes.observe(id, node)?;
        self.resize.observe(id, node)?;
        debug!(?node, ?id, "attached");

        self.request_render(id)?;
        Ok(id)
    }

    /// Stop managing `node` and release its instance.
    pub fn detach(&mut self, node: NodeKey) -> Result<Instance<H, R>> {
        let mut instance = self.registry.remove(node).ok_or(GutterError::NotAttached(node))?;
        instance.render.cancel(&mut self.timers);
        self.attributes.unobserve(node);
        self.resize.unobserve(node);
        debug!(?node, "detached");
        Ok(instance)
    }

    /// Tear everything down. Later attaches fail with [`GutterError::ShutDown`].
    pub fn shutdown(&mut self) {
        let nodes: Vec<NodeKey> = self.registry.nodes().collect();
        for node in nodes {
            if let Some(mut instance) = self.registry.remove(node) {
                instance.render.cancel(&mut self.timers);
            }
        }
        self.attributes.shutdown();
        self.resize.shutdown();
        self.shut_down = true;
        debug!("coordinator shut down");
    }

    /// Arm (or re-arm) the debounce timer for `id`.
    pub fn request_render(&mut self, id: InstanceId) -> Result<TimerHandle> {
        let quiet = self.options.quiet_interval;
        let instance = self
            .registry
            .get_mut(id)
            .ok_or(GutterError::UnknownInstance(id))?;
        Ok(instance.render.submit(&mut self.timers, id, quiet))
    }

    /// The host received an `input` event. Returns whether a render was
    /// requested.
    pub fn on_input(&mut self, node: NodeKey) -> Result<bool> {
        match self.registry.lookup(node) {
            Some(id) => self.request_render(id).map(|_| true),
            None => Ok(false),
        }
    }

    /// `attribute` changed on `node`. Style mutations are diffed against
    /// computed style, configuration attributes against their last values.
    pub fn on_attribute_mutation(&mut self, node: NodeKey, attribute: &str) -> Result<bool> {
        let Some((id, kind)) = self.attributes.dispatch(node, attribute) else {
            return Ok(false);
        };
        let instance = self
            .registry
            .get_mut(id)
            .ok_or(GutterError::UnknownInstance(id))?;

        let changed = match kind {
            MutationKind::Style => instance.engine.style_changed()?,
            MutationKind::Config => instance.engine.attributes_changed(),
        };
        debug!(?node, attribute, changed, "attribute mutation");

        if changed {
            self.request_render(id)?;
        }
        Ok(changed)
    }

    /// The content box of `node` changed size. Always requests a render.
    pub fn on_resize(&mut self, node: NodeKey) -> Result<bool> {
        match self.resize.dispatch(node) {
            Some(id) => self.request_render(id).map(|_| true),
            None => Ok(false),
        }
    }

    /// A timer elapsed. Renders if `handle` is still the pending one for
    /// `id`; superseded or orphaned timers are ignored.
    pub fn fire(&mut self, id: InstanceId, handle: TimerHandle) -> Result<Option<RenderOutcome>> {
        let Some(instance) = self.registry.get_mut(id) else {
            return Ok(None);
        };
        if !instance.render.take_fired(handle) {
            return Ok(None);
        }
        render(id, instance).map(Some)
    }

    /// Render `id` now if a render is pending, skipping the rest of the
    /// quiet interval.
    pub fn fire_now(&mut self, id: InstanceId) -> Result<Option<RenderOutcome>> {
        let instance = self
            .registry
            .get_mut(id)
            .ok_or(GutterError::UnknownInstance(id))?;
        if !instance.render.fire_now(&mut self.timers) {
            return Ok(None);
        }
        render(id, instance).map(Some)
    }

    pub fn instance(&self, id: InstanceId) -> Option<&Instance<H, R>> {
        self.registry.get(id)
    }

    pub fn instance_for(&self, node: NodeKey) -> Option<InstanceId> {
        self.registry.lookup(node)
    }

    pub fn is_pending(&self, id: InstanceId) -> bool {
        self.registry.get(id).is_some_and(|instance| instance.render.is_pending())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }
}

impl<H: Host, R: Raster> Coordinator<H, R, ManualTimers> {
    /// Move the virtual clock and fire every timer that came due.
    pub fn advance(&mut self, by: Duration) -> Vec<(InstanceId, Result<RenderOutcome>)> {
        let due = self.timers.advance(by);
        due.into_iter()
            .filter_map(|(id, handle)| match self.fire(id, handle) {
                Ok(Some(outcome)) => Some((id, Ok(outcome))),
                Ok(None) => None,
                Err(err) => Some((id, Err(err))),
            })
            .collect()
    }
}

fn render<H: Host, R: Raster>(id: InstanceId, instance: &mut Instance<H, R>) -> Result<RenderOutcome> {
    instance.engine.handle_render().inspect_err(|err| {
        warn!(?id, node = ?instance.node, %err, "render failed, keeping previous gutter");
    })
}
