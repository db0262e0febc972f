//! Panel application state management.
//!
//! `PanelApp` holds everything the messaging panel needs between frames.
//! It follows the **Elm Architecture** pattern (Model-View-Update):
//!
//! 1. **Model**: `PanelApp` holds the form fields, the session, and the log
//! 2. **Update**: `handle_action()` and `poll_network()` modify state
//! 3. **View**: the `ui/` modules render the state with egui and report
//!    button presses back as `Action`s
//!
//! Keeping updates out of the widgets means the state transitions can be
//! tested without opening a window.

use crate::ui;
use eframe::egui;
use reqrep_core::config::PanelConfig;
use reqrep_core::history::MessageLog;
use reqrep_core::session::{Session, SessionError};
use reqrep_core::types::LogEntry;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Holds the frame loop to at most one frame per `interval`.
///
/// eframe redraws right away on input events and otherwise follows the
/// display refresh, so each frame sleeps off what is left of the interval.
#[derive(Debug)]
struct FrameLimiter {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl FrameLimiter {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    /// How long a frame starting at `now` has to wait. The first frame never waits.
    fn remaining(&self, now: Instant) -> Duration {
        match self.last_frame {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Sleeps until the next frame may start, then marks it as started.
    fn wait(&mut self) {
        let budget = self.remaining(Instant::now());
        if !budget.is_zero() {
            std::thread::sleep(budget);
        }
        self.last_frame = Some(Instant::now());
    }
}

/// Actions that modify the application state.
///
/// Produced by the view, consumed by `handle_action()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// (Re)connect the client socket to the Target IP / Port fields.
    ConnectClient,
    /// (Re)bind the server socket on the Port field.
    StartServer,
    /// Send the message buffer as one request.
    SendMessage,
    /// Empty the message log.
    ClearHistory,
}

/// The main panel state.
pub struct PanelApp {
    /// Target IP field.
    pub target_ip: String,
    /// Port field, shared by connect and bind.
    pub port: u16,
    /// Outbound message buffer. Not cleared after sending.
    pub message: String,
    /// Client + server sockets.
    pub session: Session,
    /// The last few exchanges and errors.
    pub history: MessageLog,
    /// Frame rate cap.
    limiter: FrameLimiter,
}

impl PanelApp {
    /// Creates the panel with fields seeded from `config`.
    pub fn new(config: &PanelConfig) -> Result<Self, SessionError> {
        Ok(Self {
            target_ip: config.target_ip.clone(),
            port: config.port,
            message: String::new(),
            session: Session::new(config.recv_timeout())?,
            history: MessageLog::with_capacity(config.history_capacity),
            limiter: FrameLimiter::new(config.frame_interval()),
        })
    }

    /// Whether the Send button is enabled.
    pub fn can_send(&self) -> bool {
        self.session.can_send()
    }

    /// Processes an action and updates the state accordingly.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::ConnectClient => {
                if let Err(e) = self.session.connect_client(&self.target_ip, self.port) {
                    warn!(error = %e, ip = %self.target_ip, port = self.port, "connect failed");
                    self.history.push(LogEntry::error(e));
                }
            }

            Action::StartServer => {
                if let Err(e) = self.session.start_server(self.port) {
                    warn!(error = %e, port = self.port, "bind failed");
                    self.history.push(LogEntry::error(e));
                }
            }

            Action::SendMessage => {
                // Disabled button: nothing happens, nothing is logged.
                if !self.can_send() {
                    return;
                }
                match self.session.send(&self.message) {
                    Ok(()) => self.history.push(LogEntry::sent(self.message.clone())),
                    Err(e) if e.is_gated() => {}
                    Err(e) => {
                        warn!(error = %e, "send failed");
                        self.history.push(LogEntry::error(e));
                    }
                }
            }

            Action::ClearHistory => {
                debug!(entries = self.history.len(), "history cleared");
                self.history.clear();
            }
        }
    }

    /// One frame's worth of network work: reply first, then requests.
    ///
    /// The client's acknowledgment is consumed silently. Each request the
    /// server takes adds exactly one "received" entry.
    pub fn poll_network(&mut self) {
        self.session.poll_reply();

        if let Some(request) = self.session.poll_request() {
            self.history
                .push(LogEntry::received(request.source, request.content));
        }
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.limiter.wait();

        ui::status::render(ctx, self);

        let mut polled = false;
        egui::Window::new("Network Communication")
            .default_width(420.0)
            .show(ctx, |ui| {
                for action in ui::controls::render(ui, self) {
                    self.handle_action(action);
                }

                self.poll_network();
                polled = true;

                ui.separator();
                if ui::history::render(ui, &self.history) {
                    self.handle_action(Action::ClearHistory);
                }
            });

        // A collapsed window skips its contents; the sockets still need
        // their once-per-frame poll.
        if !polled {
            self.poll_network();
        }

        // Keep frames coming at the capped rate even without input, so
        // replies and requests are picked up while the user is idle.
        ctx.request_repaint_after(self.limiter.interval);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn app_on_free_port() -> PanelApp {
        let config = PanelConfig {
            port: portpicker::pick_unused_port().expect("no free port"),
            ..PanelConfig::default()
        };
        PanelApp::new(&config).unwrap()
    }

    fn texts(app: &PanelApp) -> Vec<String> {
        app.history.iter().map(|e| e.to_string()).collect()
    }

    /// Runs frames until `done` holds.
    fn run_frames(app: &mut PanelApp, done: impl Fn(&PanelApp) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) {
            assert!(Instant::now() < deadline, "timed out; log: {:?}", texts(app));
            app.poll_network();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn fields_seeded_from_config() {
        let app = PanelApp::new(&PanelConfig::default()).unwrap();
        assert_eq!(app.target_ip, "127.0.0.1");
        assert_eq!(app.port, 5555);
        assert!(app.message.is_empty());
        assert_eq!(app.history.capacity(), 10);
    }

    #[test]
    fn limiter_interval_follows_frame_rate() {
        let app = PanelApp::new(&PanelConfig::default()).unwrap();
        assert_eq!(app.limiter.interval, Duration::from_secs(1) / 60);
    }

    #[test]
    fn first_frame_does_not_wait() {
        let limiter = FrameLimiter::new(Duration::from_millis(50));
        assert_eq!(limiter.remaining(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn frame_waits_for_rest_of_interval() {
        let interval = PanelConfig::default().frame_interval();
        let start = Instant::now();
        let limiter = FrameLimiter {
            interval,
            last_frame: Some(start),
        };

        assert_eq!(limiter.remaining(start), interval);
        assert_eq!(
            limiter.remaining(start + Duration::from_millis(10)),
            interval - Duration::from_millis(10)
        );
        assert_eq!(limiter.remaining(start + interval), Duration::ZERO);
        assert_eq!(limiter.remaining(start + interval * 3), Duration::ZERO);
    }

    #[test]
    fn back_to_back_frames_are_spaced_by_interval() {
        let config = PanelConfig {
            frame_rate: 20,
            ..PanelConfig::default()
        };
        let mut limiter = FrameLimiter::new(config.frame_interval());

        limiter.wait();
        let first = Instant::now();
        limiter.wait();
        limiter.wait();
        assert!(first.elapsed() >= config.frame_interval() * 2);
    }

    #[test]
    fn send_when_not_connected_is_noop() {
        let mut app = app_on_free_port();
        app.message = "hello".to_string();
        app.handle_action(Action::SendMessage);

        assert!(app.history.is_empty());
        assert!(!app.session.is_awaiting_reply());
    }

    #[test]
    fn send_while_awaiting_reply_is_noop() {
        let mut app = app_on_free_port();
        app.handle_action(Action::ConnectClient);
        app.message = "first".to_string();
        app.handle_action(Action::SendMessage);
        assert!(!app.can_send());

        app.message = "second".to_string();
        app.handle_action(Action::SendMessage);
        assert_eq!(texts(&app), vec!["[SENT] first"]);
    }

    #[test]
    fn connect_error_is_logged() {
        let mut app = app_on_free_port();
        app.target_ip = "bad host!".to_string();
        app.handle_action(Action::ConnectClient);

        let log = texts(&app);
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("Connection error: "), "{log:?}");
        assert!(!app.session.is_client_connected());
    }

    #[test]
    fn bind_error_is_logged() {
        let mut first = app_on_free_port();
        first.handle_action(Action::StartServer);
        assert!(first.session.is_server_bound());

        let mut second = app_on_free_port();
        second.port = first.port;
        second.handle_action(Action::StartServer);

        let log = texts(&second);
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("Bind error: "), "{log:?}");
    }

    #[test]
    fn restarting_server_on_same_port_stays_usable() {
        let mut app = app_on_free_port();
        app.handle_action(Action::StartServer);
        app.handle_action(Action::StartServer);

        // Losing the race for the port shows up as one bind error; the
        // next press brings the server back.
        if !app.session.is_server_bound() {
            let log = texts(&app);
            assert_eq!(log.len(), 1);
            assert!(log[0].starts_with("Bind error: "), "{log:?}");

            let deadline = Instant::now() + Duration::from_secs(5);
            while !app.session.is_server_bound() {
                assert!(Instant::now() < deadline, "server never rebound");
                std::thread::sleep(Duration::from_millis(5));
                app.handle_action(Action::StartServer);
            }
        }

        app.handle_action(Action::ConnectClient);
        app.message = "still here".to_string();
        app.handle_action(Action::SendMessage);
        run_frames(&mut app, |app| !app.session.is_awaiting_reply());
        assert!(texts(&app).last().unwrap().ends_with("] still here"));
    }

    #[test]
    fn clear_history_empties_log() {
        let mut app = app_on_free_port();
        app.target_ip = "bad host!".to_string();
        for _ in 0..15 {
            app.handle_action(Action::ConnectClient);
        }
        assert_eq!(app.history.len(), 10);

        app.handle_action(Action::ClearHistory);
        assert!(app.history.is_empty());
    }

    #[test]
    fn hello_through_one_panel() {
        let mut app = app_on_free_port();
        let port = app.port;

        app.handle_action(Action::StartServer);
        app.handle_action(Action::ConnectClient);
        app.message = "hello".to_string();
        app.handle_action(Action::SendMessage);
        assert!(app.session.is_awaiting_reply());

        run_frames(&mut app, |app| !app.session.is_awaiting_reply());

        assert_eq!(
            texts(&app),
            vec![
                "[SENT] hello".to_string(),
                format!("[RECEIVED from 127.0.0.1:{port}] hello"),
            ]
        );

        // The ACK never shows up in the log, and nothing else trickles in.
        for _ in 0..5 {
            app.poll_network();
        }
        assert_eq!(app.history.len(), 2);
        assert!(app.can_send());
    }

    #[test]
    fn client_and_server_in_separate_panels() {
        let mut server = app_on_free_port();
        server.handle_action(Action::StartServer);

        let mut client = app_on_free_port();
        client.port = server.port;
        client.handle_action(Action::ConnectClient);
        client.message = "ping".to_string();
        client.handle_action(Action::SendMessage);

        run_frames(&mut server, |s| !s.history.is_empty());
        run_frames(&mut client, |c| !c.session.is_awaiting_reply());

        assert_eq!(texts(&client), vec!["[SENT] ping"]);
        assert_eq!(server.history.len(), 1);
        assert!(texts(&server)[0].ends_with("] ping"));
    }
}
