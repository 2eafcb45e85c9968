//! Touch event model.

use glam::Vec2;

/// A single active contact point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Position in viewport pixels.
    pub position: Vec2,
}

impl TouchPoint {
    /// Creates a contact point at the given screen position.
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    /// A contact point went down.
    Start,
    /// One or more contact points moved.
    Move,
    /// A contact point lifted.
    End,
}

/// A raw touch event, carrying the full list of active contact points in
/// platform delivery order.
///
/// `End` events carry the contacts that *remain* after the lift; an empty
/// list means the gesture has fully released.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    /// Event phase.
    pub phase: TouchPhase,
    /// Active contact points after this event.
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Creates a touch-start event.
    pub fn start(touches: Vec<TouchPoint>) -> Self {
        Self {
            phase: TouchPhase::Start,
            touches,
        }
    }

    /// Creates a touch-move event.
    pub fn moved(touches: Vec<TouchPoint>) -> Self {
        Self {
            phase: TouchPhase::Move,
            touches,
        }
    }

    /// Creates a touch-end event with the remaining contacts.
    pub fn end(touches: Vec<TouchPoint>) -> Self {
        Self {
            phase: TouchPhase::End,
            touches,
        }
    }
}
