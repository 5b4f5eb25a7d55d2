/// Input events a match understands.
/// Positions are in board units (the host converts from screen space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at board coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at board coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to board coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A command from the UI layer (buttons, menus).
    /// `kind` is one of the [`custom`] codes; `a`, `b`, `c` carry its payload.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Custom event kinds from the UI.
pub mod custom {
    /// Restart the match. `a` >= 0 selects a mode (0 = vs-AI, 1 = two-player);
    /// negative keeps the current one.
    pub const RESET: u32 = 1;
    /// Switch mode and restart. `a` is the mode code.
    pub const SET_MODE: u32 = 2;
}

/// A queue of input events.
/// The host pushes events as they arrive; the runner drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_keeps_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::PointerMove { x: 12.0, y: 40.0 });
        q.push(InputEvent::PointerUp { x: 12.0, y: 45.0 });
        assert_eq!(q.len(), 3);
        let events = q.drain();
        assert_eq!(events[0], InputEvent::PointerDown { x: 10.0, y: 20.0 });
        assert_eq!(events[2], InputEvent::PointerUp { x: 12.0, y: 45.0 });
        assert!(q.is_empty());
    }

    #[test]
    fn custom_event_payload() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: custom::SET_MODE, a: 1.0, b: 0.0, c: 0.0 });
        match q.drain()[0] {
            InputEvent::Custom { kind, a, .. } => {
                assert_eq!(kind, custom::SET_MODE);
                assert_eq!(a, 1.0);
            }
            other => panic!("Expected Custom event, got {:?}", other),
        }
    }
}
