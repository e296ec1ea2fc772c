use linegutter_core::{InstanceId, TimerHandle, TimerHost};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct ArmedTimer {
    browser_id: i32,
    callback: Closure<dyn FnMut()>,
}

/// `setTimeout`-backed timers. Each callback reports back through
/// [`runtime::fire`](crate::runtime::fire).
pub struct WindowTimers {
    window: Window,
    next_handle: u64,
    armed: HashMap<TimerHandle, ArmedTimer>,
    /// Callbacks that already ran. Dropped on the next schedule, never from
    /// inside their own invocation.
    spent: Vec<Closure<dyn FnMut()>>,
}

impl WindowTimers {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_handle: 0,
            armed: HashMap::new(),
            spent: Vec::new(),
        }
    }

    /// Called when a timer's callback is running.
    pub fn retire(&mut self, handle: TimerHandle) {
        if let Some(timer) = self.armed.remove(&handle) {
            self.spent.push(timer.callback);
        }
    }
}

impl TimerHost for WindowTimers {
    fn schedule(&mut self, instance: InstanceId, delay: Duration) -> TimerHandle {
        self.spent.clear();

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        let callback = Closure::wrap(Box::new(move || {
            crate::runtime::fire(instance, handle);
        }) as Box<dyn FnMut()>);

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), millis)
        {
            Ok(browser_id) => {
                self.armed.insert(
                    handle,
                    ArmedTimer {
                        browser_id,
                        callback,
                    },
                );
            }
            Err(err) => warn!(?err, ?instance, "setTimeout failed"),
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(timer) = self.armed.remove(&handle) {
            self.window.clear_timeout_with_handle(timer.browser_id);
        }
    }
}
