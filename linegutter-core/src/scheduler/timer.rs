use super::{TimerHandle, TimerHost};
use crate::registry::InstanceId;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Timer entry with wake time (virtual milliseconds) and owner
#[derive(Debug, Clone)]
pub struct Timer {
    pub wake_at: u64,
    pub handle: TimerHandle,
    pub instance: InstanceId,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.wake_at == other.wake_at && self.handle == other.handle
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (earlier times have higher priority),
        // ties broken by scheduling order
        other
            .wake_at
            .cmp(&self.wake_at)
            .then_with(|| other.handle.cmp(&self.handle))
    }
}

/// Timer host driven by an explicit virtual clock.
///
/// Nothing fires on its own; [`advance`](Self::advance) moves the clock and
/// hands back every timer that came due, in order.
#[derive(Debug, Default)]
pub struct ManualTimers {
    heap: BinaryHeap<Timer>,
    cancelled: HashSet<TimerHandle>,
    now: u64,
    next_handle: u64,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward and pop all timers that are ready
    pub fn advance(&mut self, by: Duration) -> Vec<(InstanceId, TimerHandle)> {
        self.now += by.as_millis() as u64;
        let mut ready = Vec::new();

        while let Some(timer) = self.heap.peek() {
            if timer.wake_at > self.now {
                break;
            }
            if let Some(timer) = self.heap.pop() {
                if !self.cancelled.remove(&timer.handle) {
                    ready.push((timer.instance, timer.handle));
                }
            }
        }

        ready
    }

    /// Get the next live wake time without removing the timer
    pub fn peek_wake_time(&self) -> Option<u64> {
        self.heap
            .iter()
            .filter(|timer| !self.cancelled.contains(&timer.handle))
            .map(|timer| timer.wake_at)
            .min()
    }

    /// Number of timers that are scheduled and not cancelled
    pub fn len(&self) -> usize {
        self.heap
            .iter()
            .filter(|timer| !self.cancelled.contains(&timer.handle))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TimerHost for ManualTimers {
    fn schedule(&mut self, instance: InstanceId, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.heap.push(Timer {
            wake_at: self.now + delay.as_millis() as u64,
            handle,
            instance,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.heap.iter().any(|timer| timer.handle == handle) {
            self.cancelled.insert(handle);
        }
    }
}
