//! Connection and compose controls (top of the panel window).
//!
//! ```text
//! Target IP:
//! [127.0.0.1        ]  Port [5555]
//! [Connect as Client] [Start Server]
//! ---------------------------------------
//! Send Message (Client):
//! [hello                     ] [Send]
//! ```
//!
//! Edits to the text fields and the port are written straight into the
//! app; button presses come back as `Action`s.

use crate::app::{Action, PanelApp};
use eframe::egui;

/// Longest accepted IP/host text.
const IP_CHAR_LIMIT: usize = 63;

/// Longest accepted outbound message.
const MESSAGE_CHAR_LIMIT: usize = 511;

/// Renders the controls and returns the actions the user triggered this frame.
pub fn render(ui: &mut egui::Ui, app: &mut PanelApp) -> Vec<Action> {
    let mut actions = Vec::new();

    ui.label("Target IP:");
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut app.target_ip)
                .char_limit(IP_CHAR_LIMIT)
                .desired_width(160.0),
        );
        ui.add(egui::DragValue::new(&mut app.port).speed(1.0));
        ui.label("Port");
    });

    ui.horizontal(|ui| {
        if ui.button("Connect as Client").clicked() {
            actions.push(Action::ConnectClient);
        }
        if ui.button("Start Server").clicked() {
            actions.push(Action::StartServer);
        }
    });

    ui.separator();

    ui.label("Send Message (Client):");
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.message)
                .char_limit(MESSAGE_CHAR_LIMIT)
                .hint_text("message"),
        );
        let enter_pressed =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let send_clicked = ui
            .add_enabled(app.can_send(), egui::Button::new("Send"))
            .clicked();

        if send_clicked || (enter_pressed && app.can_send()) {
            actions.push(Action::SendMessage);
        }
    });

    actions
}
