use crate::error::js_error;
use js_sys::Array;
use linegutter_core::watcher::AttributeWatcher;
use linegutter_core::Result;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, MutationObserver, MutationObserverInit, MutationRecord, ResizeObserver,
    ResizeObserverBoxOptions, ResizeObserverEntry, ResizeObserverOptions,
};

/// One `MutationObserver` and one `ResizeObserver` shared by every host.
pub struct Observers {
    mutations: MutationObserver,
    resizes: ResizeObserver,
    _on_mutations: Closure<dyn FnMut(Array, MutationObserver)>,
    _on_resizes: Closure<dyn FnMut(Array, ResizeObserver)>,
}

impl Observers {
    pub fn new() -> Result<Self> {
        let on_mutations = Closure::wrap(Box::new(|records: Array, _observer: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                if let (Some(target), Some(attribute)) = (record.target(), record.attribute_name()) {
                    crate::runtime::on_mutation(target.as_ref(), &attribute);
                }
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);

        let on_resizes = Closure::wrap(Box::new(|entries: Array, _observer: ResizeObserver| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<ResizeObserverEntry>() {
                    crate::runtime::on_resize(entry.target().as_ref());
                }
            }
        }) as Box<dyn FnMut(Array, ResizeObserver)>);

        let mutations = MutationObserver::new(on_mutations.as_ref().unchecked_ref()).map_err(js_error)?;
        let resizes = ResizeObserver::new(on_resizes.as_ref().unchecked_ref()).map_err(js_error)?;

        Ok(Self {
            mutations,
            resizes,
            _on_mutations: on_mutations,
            _on_resizes: on_resizes,
        })
    }

    pub fn observe(&self, element: &Element) -> Result<()> {
        let filter: Array = AttributeWatcher::attribute_filter()
            .iter()
            .map(|name| JsValue::from_str(name))
            .collect();
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&filter);
        self.mutations
            .observe_with_options(element, &init)
            .map_err(js_error)?;

        let options = ResizeObserverOptions::new();
        options.set_box(ResizeObserverBoxOptions::ContentBox);
        self.resizes.observe_with_options(element, &options);
        Ok(())
    }

    /// Stop size notifications for `element`. `MutationObserver` has no
    /// per-target unobserve; the core watcher drops its records instead.
    pub fn unobserve(&self, element: &Element) {
        self.resizes.unobserve(element);
    }

    pub fn disconnect(&self) {
        self.mutations.disconnect();
        self.resizes.disconnect();
    }
}
