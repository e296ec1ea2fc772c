mod timer;

use crate::registry::InstanceId;
use std::time::Duration;
use tracing::trace;

pub use timer::{ManualTimers, Timer};

/// Quiet interval after the last render request, in milliseconds.
pub const DEFAULT_QUIET_MS: u64 = 20;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// One-shot timers supplied by the platform.
///
/// When a timer elapses the platform calls
/// [`Coordinator::fire`](crate::Coordinator::fire) with the instance and
/// handle it was scheduled for.
pub trait TimerHost {
    fn schedule(&mut self, instance: InstanceId, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Single-slot deferred render for one instance.
///
/// Submitting cancels whatever is pending and arms a fresh timer, so a burst
/// of requests collapses into one render that runs a quiet interval after
/// the last request.
#[derive(Debug, Default)]
pub struct DeferredRender {
    pending: Option<TimerHandle>,
}

impl DeferredRender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, timers: &mut impl TimerHost, instance: InstanceId, quiet: Duration) -> TimerHandle {
        if let Some(previous) = self.pending.take() {
            timers.cancel(previous);
        }
        let handle = timers.schedule(instance, quiet);
        trace!(?instance, ?handle, "render scheduled");
        self.pending = Some(handle);
        handle
    }

    /// Claim the slot for a timer that just elapsed. Stale handles are
    /// rejected.
    pub fn take_fired(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Drop the pending timer and report whether there was one; the caller
    /// renders immediately. Used in tests in place of real delays.
    pub fn fire_now(&mut self, timers: &mut impl TimerHost) -> bool {
        match self.pending.take() {
            Some(handle) => {
                timers.cancel(handle);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, timers: &mut impl TimerHost) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
