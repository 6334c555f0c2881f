//! Delayed callbacks for the parkour controller.
//!
//! Tasks are plain values; the owner drains due tasks after advancing time
//! and dispatches them itself. Handles stay valid until cancelled or, for
//! one-shot timers, until their task has been popped.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

/// Shortest interval a timer can be armed with.
const MIN_INTERVAL: Duration = Duration::from_micros(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    handle: TimerHandle,
    task: T,
    timer: Timer,
    /// Fires accumulated by `advance` and not yet popped
    pending: u32,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn schedule(&mut self, task: T, interval: Duration, repeating: bool) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let mode = if repeating {
            TimerMode::Repeating
        } else {
            TimerMode::Once
        };
        self.entries.push(Entry {
            handle,
            task,
            timer: Timer::new(interval.max(MIN_INTERVAL), mode),
            pending: 0,
        });
        handle
    }

    /// Drops the timer and any fires it still had pending. Returns whether
    /// the handle was active.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    pub fn advance(&mut self, delta: Duration) {
        for entry in &mut self.entries {
            entry.timer.tick(delta);
            entry.pending += entry.timer.times_finished_this_tick();
        }
    }

    /// Takes the next due fire, oldest timer first.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, T)> {
        let index = self.entries.iter().position(|entry| entry.pending > 0)?;
        let entry = &mut self.entries[index];
        entry.pending -= 1;
        let fired = (entry.handle, entry.task);

        if entry.timer.mode() == TimerMode::Once {
            self.entries.remove(index);
        }
        Some(fired)
    }
}
