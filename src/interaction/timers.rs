use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Point;

/// Handle of an armed timer; stale handles are ignored by `cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// Callback a timer stands for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Full repaint once panning settles.
    AutoRedraw,
    /// Tooltip lookup at a surface position.
    Tooltip { position: Point },
    /// Periodic lasso commit and re-query.
    LassoTick,
    /// Closes a wheel zoom gesture.
    WheelIdle,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    handle: TimerHandle,
    kind: TimerKind,
    due_ms: f64,
    interval_ms: Option<f64>,
}

/// Virtual clock plus the set of pending timers, advanced by the host.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now_ms: f64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn arm(&mut self, kind: TimerKind, delay_ms: f64) -> TimerHandle {
        self.push(kind, delay_ms, None)
    }

    /// Arms a timer that fires every `interval_ms` until cancelled.
    pub fn arm_repeating(&mut self, kind: TimerKind, interval_ms: f64) -> TimerHandle {
        debug_assert!(interval_ms > 0.0, "repeating timers need a positive interval");
        let interval_ms = interval_ms.max(1.0);
        self.push(kind, interval_ms, Some(interval_ms))
    }

    fn push(&mut self, kind: TimerKind, delay_ms: f64, interval_ms: Option<f64>) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let delay_ms = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.timers.push(Timer {
            handle,
            kind,
            due_ms: self.now_ms + delay_ms,
            interval_ms,
        });
        trace!(?kind, delay_ms, "arm timer");
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.handle != handle);
        before != self.timers.len()
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|timer| timer.handle == handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Removes and returns the earliest timer due at or before `deadline_ms`,
    /// moving the clock to its due time. Repeating timers are re-armed.
    ///
    /// Ties fire in arming order.
    pub fn pop_due(&mut self, deadline_ms: f64) -> Option<(TimerHandle, TimerKind)> {
        let position = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= deadline_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a.handle.cmp(&b.handle))
            })
            .map(|(position, _)| position)?;

        let timer = self.timers[position];
        self.now_ms = self.now_ms.max(timer.due_ms);
        match timer.interval_ms {
            Some(interval) => self.timers[position].due_ms = timer.due_ms + interval,
            None => {
                self.timers.remove(position);
            }
        }
        trace!(kind = ?timer.kind, now_ms = self.now_ms, "fire timer");
        Some((timer.handle, timer.kind))
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_clock_to(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }
}
