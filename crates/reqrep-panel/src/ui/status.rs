//! Status bar at the bottom of the window.
//!
//! ```text
//! client: connected | server: bound | reply: waiting
//! ```

use crate::app::PanelApp;
use eframe::egui;

/// Renders the status bar.
pub fn render(ctx: &egui::Context, app: &PanelApp) {
    let session = &app.session;

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            flag(ui, "client", session.is_client_connected(), "connected", "idle");
            ui.separator();
            flag(ui, "server", session.is_server_bound(), "bound", "idle");
            ui.separator();
            flag(ui, "reply", session.is_awaiting_reply(), "waiting", "none pending");
        });
    });
}

fn flag(ui: &mut egui::Ui, name: &str, on: bool, on_text: &str, off_text: &str) {
    let (color, text) = if on {
        (egui::Color32::GREEN, on_text)
    } else {
        (egui::Color32::GRAY, off_text)
    };
    ui.label(format!("{name}:"));
    ui.colored_label(color, text);
}
