//! Global constants for mv-core

/// Real-world overall length of the assembled model along Z, in world units
pub const REAL_WORLD_LENGTH: f32 = 0.35;

/// Default sensitivity for the screen-delta drag policy, world units per pixel
pub const DRAG_SENSITIVITY: f32 = 0.002;

/// Height of the horizontal drag plane, in world units
pub const DRAG_PLANE_HEIGHT: f32 = 0.0;
