//! MandoView Core Data Structures
//!
//! This crate contains the core data structures for the part viewer:
//! - PartName: the four manipulable parts of the product model
//! - PartTransform: position + yaw of a part
//! - PartRegistry: current and original (reset) transforms keyed by part

pub mod constants;
pub mod part;
pub mod registry;

pub use constants::*;
pub use part::*;
pub use registry::*;
