use crate::canvas::CanvasRaster;
use crate::dom::DomHost;
use crate::error::js_error;
use crate::observers::Observers;
use crate::timers::WindowTimers;
use js_sys::Map;
use linegutter_core::{ConfigOverride, Coordinator, GutterError, InstanceId, NodeKey, Result, TimerHandle};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, Window};

type WebCoordinator = Coordinator<DomHost, CanvasRaster, WindowTimers>;

struct InputListener {
    element: HtmlElement,
    callback: Closure<dyn FnMut(Event)>,
}

/// Process-wide state behind the exported functions.
pub struct Runtime {
    window: Window,
    document: Document,
    coordinator: WebCoordinator,
    observers: Observers,
    /// Element -> node key, by JS identity.
    nodes: Map,
    next_key: u32,
    listeners: HashMap<NodeKey, InputListener>,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

impl Runtime {
    fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| GutterError::Platform("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GutterError::Platform("no document".into()))?;

        Ok(Self {
            coordinator: Coordinator::new(WindowTimers::new(window.clone())),
            observers: Observers::new()?,
            window,
            document,
            nodes: Map::new(),
            next_key: 0,
            listeners: HashMap::new(),
        })
    }

    fn key_of(&self, node: &JsValue) -> Option<NodeKey> {
        self.nodes.get(node).as_f64().map(|key| NodeKey(key as u32))
    }

    pub fn is_attached(&self, element: &HtmlElement) -> bool {
        self.nodes.has(element.as_ref())
    }

    pub fn attach(&mut self, element: HtmlElement, overrides: ConfigOverride) -> Result<InstanceId> {
        if let Some(key) = self.key_of(element.as_ref()) {
            return Err(GutterError::AlreadyAttached(key));
        }

        let key = NodeKey(self.next_key);
        let host = DomHost::new(element.clone(), self.window.clone(), self.document.clone());
        let raster = CanvasRaster::new(&self.document)?;
        let id = self.coordinator.attach(key, host, raster, overrides)?;
        self.next_key += 1;

        if let Err(err) = self.bind(key, &element) {
            self.observers.unobserve(&element);
            if let Err(undo) = self.coordinator.detach(key) {
                warn!(%undo, ?key, "rolling back attach failed");
            }
            return Err(err);
        }
        self.nodes.set(element.as_ref(), &JsValue::from(key.0));

        Ok(id)
    }

    /// Hook `element` up to the shared observers and its `input` event.
    fn bind(&mut self, key: NodeKey, element: &HtmlElement) -> Result<()> {
        self.observers.observe(element)?;

        let callback = Closure::wrap(Box::new(move |_event: Event| {
            report(with_runtime(|runtime| runtime.coordinator.on_input(key)));
        }) as Box<dyn FnMut(Event)>);
        element
            .add_event_listener_with_callback("input", callback.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.listeners.insert(
            key,
            InputListener {
                element: element.clone(),
                callback,
            },
        );
        Ok(())
    }

    pub fn detach(&mut self, element: &HtmlElement) -> Result<()> {
        let key = self
            .key_of(element.as_ref())
            .ok_or(GutterError::UnknownElement)?;
        self.coordinator.detach(key)?;
        self.release(key);
        self.nodes.delete(element.as_ref());
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.coordinator.shutdown();
        self.observers.disconnect();
        let keys: Vec<NodeKey> = self.listeners.keys().copied().collect();
        for key in keys {
            self.release(key);
        }
        self.nodes.clear();
    }

    /// Attach every matching element that is not attached yet.
    pub fn attach_all(&mut self, selector: &str) -> Result<u32> {
        let matches = self.document.query_selector_all(selector).map_err(js_error)?;
        let mut attached = 0;
        for index in 0..matches.length() {
            let Some(element) = matches.item(index).and_then(|node| node.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            if self.is_attached(&element) {
                continue;
            }
            self.attach(element, ConfigOverride::default())?;
            attached += 1;
        }
        Ok(attached)
    }

    /// Completed renders for `element`, if it is attached.
    pub fn render_count(&self, element: &HtmlElement) -> Option<u64> {
        let key = self.key_of(element.as_ref())?;
        let id = self.coordinator.instance_for(key)?;
        self.coordinator
            .instance(id)
            .map(|instance| instance.engine.render_count())
    }

    fn release(&mut self, key: NodeKey) {
        if let Some(listener) = self.listeners.remove(&key) {
            self.observers.unobserve(&listener.element);
            if let Err(err) = listener
                .element
                .remove_event_listener_with_callback("input", listener.callback.as_ref().unchecked_ref())
            {
                warn!(?err, ?key, "removing input listener failed");
            }
        }
    }
}

/// Run `f` against the runtime, creating it on first use.
pub fn with_runtime<T>(f: impl FnOnce(&mut Runtime) -> Result<T>) -> Result<T> {
    RUNTIME.with(|cell| {
        let mut slot = cell
            .try_borrow_mut()
            .map_err(|_| GutterError::Platform("runtime is busy".into()))?;
        if slot.is_none() {
            *slot = Some(Runtime::new()?);
        }
        match slot.as_mut() {
            Some(runtime) => f(runtime),
            None => Err(GutterError::ShutDown),
        }
    })
}

fn report<T>(result: Result<T>) {
    if let Err(err) = result {
        warn!(%err, "gutter update failed");
    }
}

pub(crate) fn fire(instance: InstanceId, handle: TimerHandle) {
    report(with_runtime(|runtime| {
        runtime.coordinator.timers_mut().retire(handle);
        runtime.coordinator.fire(instance, handle)
    }));
}

pub(crate) fn on_mutation(target: &JsValue, attribute: &str) {
    report(with_runtime(|runtime| match runtime.key_of(target) {
        Some(key) => runtime.coordinator.on_attribute_mutation(key, attribute),
        None => Ok(false),
    }));
}

pub(crate) fn on_resize(target: &JsValue) {
    report(with_runtime(|runtime| match runtime.key_of(target) {
        Some(key) => runtime.coordinator.on_resize(key),
        None => Ok(false),
    }));
}
