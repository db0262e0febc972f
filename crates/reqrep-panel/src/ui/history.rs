//! Message history view.
//!
//! Shows the log oldest-first inside a fixed-height scroll area that
//! sticks to the bottom, so the newest entry stays visible.
//!
//! ```text
//! Message History (max 10):
//! +---------------------------------------------+
//! | 10:30:01  [SENT] hello                      |
//! | 10:30:01  [RECEIVED from 127.0.0.1:5555] ...|
//! +---------------------------------------------+
//! [Clear History]
//! ```

use eframe::egui;
use reqrep_core::history::MessageLog;
use reqrep_core::types::EntryKind;

const HISTORY_HEIGHT: f32 = 150.0;

/// Renders the log. Returns `true` if Clear History was clicked.
pub fn render(ui: &mut egui::Ui, history: &MessageLog) -> bool {
    ui.label(format!("Message History (max {}):", history.capacity()));

    egui::Frame::group(ui.style()).show(ui, |ui| {
        egui::ScrollArea::both()
            .max_height(HISTORY_HEIGHT)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in history.iter() {
                    let color = entry_color(ui, entry.kind());
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(entry.logged_at.format_local_time())
                                .monospace()
                                .weak(),
                        );
                        ui.label(egui::RichText::new(entry.to_string()).color(color));
                    });
                }
            });
    });

    ui.button("Clear History").clicked()
}

fn entry_color(ui: &egui::Ui, kind: EntryKind) -> egui::Color32 {
    match kind {
        EntryKind::Sent => egui::Color32::LIGHT_BLUE,
        EntryKind::Received => egui::Color32::LIGHT_GREEN,
        EntryKind::Error => ui.visuals().error_fg_color,
    }
}
