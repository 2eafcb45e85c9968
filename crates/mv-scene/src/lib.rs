//! Scene graph, camera and touch interaction for MandoView
//!
//! The crate is organized around the touch-to-3D pipeline:
//! - [`node`]: hierarchical scene graph with interactable capability tags
//! - [`camera`]: orbit camera with screen-to-ray projection
//! - [`picking`]: resolving a screen point to the part beneath it
//! - [`gesture`]: the state machine that turns raw touch events into part
//!   translation and rotation
//! - [`orbit`]: the enable/disable gate in front of camera manipulation

pub mod bounds;
pub mod camera;
pub mod gesture;
pub mod node;
pub mod orbit;
pub mod picking;
pub mod ray;
pub mod touch;

pub use bounds::BoundingBox;
pub use camera::Camera;
pub use gesture::{DragPolicy, GestureMachine, GestureMode};
pub use node::{SceneNode, sync_parts};
pub use orbit::OrbitController;
pub use picking::{pick, pick_with_ray};
pub use ray::{DragPlane, Ray};
pub use touch::{TouchEvent, TouchPhase, TouchPoint};
