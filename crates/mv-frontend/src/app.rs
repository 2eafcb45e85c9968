//! Main application module

use crate::state::{SharedAppState, create_shared_state};
use crate::viewport::ViewportPanel;

/// Main application
pub struct MandoViewApp {
    app_state: SharedAppState,
    viewport: ViewportPanel,
}

impl MandoViewApp {
    /// Create a new app
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            app_state: create_shared_state(),
            viewport: ViewportPanel::new(),
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("MandoView");
                ui.separator();

                if ui.button("Reset").clicked() {
                    self.app_state.lock().reset_parts();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let state = self.app_state.lock();
                    let status = match state.gestures.selected() {
                        Some(part) => format!("{:?} {part}", state.gestures.mode()),
                        None => "drag a part to move it, two fingers to rotate".to_string(),
                    };
                    ui.label(egui::RichText::new(status).color(egui::Color32::GRAY));
                });
            });
        });
    }
}

impl eframe::App for MandoViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.top_bar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let mut state = self.app_state.lock();
                self.viewport.ui(ui, &mut state);
            });

        // Gestures and orbit animate continuously while touched
        ctx.request_repaint();
    }
}
