use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::Value;

/// Shortest interval period, in virtual milliseconds
const MIN_PERIOD_MS: f64 = 1.0;

/// Virtual clock plus the timer and frame queues fed by `interval` and `nextFrame`
///
/// Clones share the same queues. Once stopped, nothing new is accepted and
/// nothing queued is handed out again.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    state: Rc<RefCell<SchedulerState>>,
}

#[derive(Debug, Default)]
struct SchedulerState {
    now_ms: f64,
    intervals: Vec<Interval>,
    frames: Vec<Value>,
    stopped: bool,
}

#[derive(Debug)]
struct Interval {
    callback: Value,
    period_ms: f64,
    next_due_ms: f64,
}

impl Scheduler {
    /// Creates an idle scheduler at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> f64 {
        self.state.borrow().now_ms
    }

    /// Registers `callback` to fire every `period_ms`
    pub fn schedule_interval(&self, callback: Value, period_ms: f64) {
        let mut state = self.state.borrow_mut();
        if state.stopped {
            return;
        }

        let period_ms = if period_ms.is_finite() {
            period_ms.max(MIN_PERIOD_MS)
        } else {
            MIN_PERIOD_MS
        };
        let next_due_ms = state.now_ms + period_ms;
        state.intervals.push(Interval {
            callback,
            period_ms,
            next_due_ms,
        });
    }

    /// Queues `callback` for the next frame
    pub fn request_frame(&self, callback: Value) {
        let mut state = self.state.borrow_mut();
        if !state.stopped {
            state.frames.push(callback);
        }
    }

    /// Moves the clock forward and returns every callback now due
    ///
    /// Frame callbacks come first, in request order, then interval firings in
    /// due-time order.
    pub fn advance_clock(&self, elapsed_ms: f64) -> Vec<Value> {
        let mut state = self.state.borrow_mut();
        if state.stopped {
            return Vec::new();
        }

        state.now_ms += elapsed_ms;
        let now = state.now_ms;

        let mut due: Vec<Value> = std::mem::take(&mut state.frames);

        let mut firings: Vec<(f64, usize, Value)> = Vec::new();
        for (i, interval) in state.intervals.iter_mut().enumerate() {
            while interval.next_due_ms <= now {
                firings.push((interval.next_due_ms, i, interval.callback.clone()));
                interval.next_due_ms += interval.period_ms;
            }
        }
        firings.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.extend(firings.into_iter().map(|(_, _, callback)| callback));

        due
    }

    /// Number of queued frame callbacks plus live intervals
    pub fn pending(&self) -> usize {
        let state = self.state.borrow();
        state.frames.len() + state.intervals.len()
    }

    /// Drops every queued callback and refuses new ones
    pub fn stop(&self) {
        let mut state = self.state.borrow_mut();
        state.stopped = true;
        state.intervals.clear();
        state.frames.clear();
    }

    /// True after [`Scheduler::stop`]
    pub fn is_stopped(&self) -> bool {
        self.state.borrow().stopped
    }
}
