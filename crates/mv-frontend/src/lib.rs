//! MandoView Frontend
//!
//! egui-based touch viewer for the four-part product model.

pub mod app;
pub mod model;
pub mod state;
pub mod viewport;

// Re-exports for convenience
pub use app::MandoViewApp;
pub use state::{AppState, SharedAppState, create_shared_state};
