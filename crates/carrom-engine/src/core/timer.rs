// core/timer.rs
//
// One-shot delay timers for presentation pacing. They run on frame time,
// disjoint from the physics tick, and can all be dropped at once when the
// match they belong to is reset.
//
// Usage:
//   let mut timers = Timers::new();
//   timers.schedule(Action::Think, 1.0);
//   for action in timers.advance(dt) { ... }

/// A pending action that fires once `elapsed` reaches `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayTimer<A> {
    pub action: A,
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time.
    pub elapsed: f32,
}

impl<A> DelayTimer<A> {
    pub fn new(action: A, duration: f32) -> Self {
        Self {
            action,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Pending timers, fired in scheduling order.
#[derive(Debug, Clone)]
pub struct Timers<A> {
    pending: Vec<DelayTimer<A>>,
}

impl<A> Timers<A> {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(4),
        }
    }

    pub fn schedule(&mut self, action: A, delay: f32) {
        self.pending.push(DelayTimer::new(action, delay));
    }

    /// Advance every timer by `dt` seconds and return the actions that fired.
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            self.pending[i].elapsed += dt;
            if self.pending[i].is_done() {
                fired.push(self.pending.remove(i).action);
            } else {
                i += 1;
            }
        }
        fired
    }

    /// Drop every pending timer without firing it.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self::new()
    }
}
