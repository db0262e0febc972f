//! REQ/REP session: the client and server sockets behind the panel.
//!
//! A `Session` owns one ZeroMQ context and two sockets:
//! - a **REQ** socket used when the user acts as a client
//! - a **REP** socket used when the user acts as a server
//!
//! Both exist from the moment the session is created. "Connect as client"
//! and "Start server" only connect/bind them, closing and recreating the
//! socket first if it was already in use.
//!
//! # Frame-driven polling
//!
//! The GUI calls into the session once per frame from its only thread.
//! Nothing here may block that thread, so every send and receive uses
//! `DONTWAIT`: a receive with nothing pending returns `EAGAIN`, which is
//! treated as "nothing this frame", not as an error.
//!
//! # Lock-step
//!
//! ```text
//! client:  Idle --send()--> AwaitingReply --poll_reply()--> Idle
//! server:  Bound --poll_request()--> (reply ACK immediately) --> Bound
//! ```
//!
//! `send()` refuses to run while a reply is outstanding, which mirrors the
//! REQ socket's own state machine instead of tripping over its `EFSM`.

use crate::protocol::{self, ACK_PAYLOAD};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by session operations.
///
/// The `Display` text of the I/O variants is what the panel shows in its
/// log, so it starts with the same prefix users already know.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Connection error: {source}")]
    Connect {
        endpoint: String,
        source: zmq::Error,
    },

    #[error("Bind error: {source}")]
    Bind {
        endpoint: String,
        source: zmq::Error,
    },

    #[error("Send error: {0}")]
    Send(zmq::Error),

    #[error("Socket error: {0}")]
    SocketSetup(zmq::Error),

    /// Send was requested before any successful connect.
    #[error("not connected")]
    NotConnected,

    /// Send was requested while the previous request has no reply yet.
    #[error("still awaiting a reply")]
    AwaitingReply,
}

impl SessionError {
    /// `true` for outcomes that only mean "the Send button is disabled".
    ///
    /// The panel does not log these.
    pub fn is_gated(&self) -> bool {
        matches!(self, SessionError::NotConnected | SessionError::AwaitingReply)
    }
}

/// A request taken off the server socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    /// Human-readable origin, e.g. `127.0.0.1:5555`.
    pub source: String,
    /// The request body, decoded as UTF-8 (lossy).
    pub content: String,
}

/// The owned pair of REQ/REP sockets plus their state flags.
pub struct Session {
    context: zmq::Context,
    client: zmq::Socket,
    server: zmq::Socket,
    client_connected: bool,
    server_bound: bool,
    awaiting_reply: bool,
    /// Applied to the server socket on every bind.
    recv_timeout: Duration,
}

impl Session {
    /// Creates a session with fresh, unconnected sockets.
    ///
    /// `recv_timeout` is set on the server socket each time it binds.
    pub fn new(recv_timeout: Duration) -> Result<Self, SessionError> {
        let context = zmq::Context::new();
        let client = new_socket(&context, zmq::REQ)?;
        let server = new_socket(&context, zmq::REP)?;
        debug!(?recv_timeout, "session created");

        Ok(Self {
            context,
            client,
            server,
            client_connected: false,
            server_bound: false,
            awaiting_reply: false,
            recv_timeout,
        })
    }

    pub fn is_client_connected(&self) -> bool {
        self.client_connected
    }

    pub fn is_server_bound(&self) -> bool {
        self.server_bound
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Whether `send()` would be attempted right now.
    pub fn can_send(&self) -> bool {
        self.client_connected && !self.awaiting_reply
    }

    /// Connects the client socket to `tcp://<ip>:<port>`.
    ///
    /// If the client was already connected, its socket is closed and
    /// replaced first, which also abandons any outstanding request.
    pub fn connect_client(&mut self, ip: &str, port: u16) -> Result<(), SessionError> {
        let endpoint = protocol::connect_endpoint(ip, port);

        if self.client_connected {
            debug!("closing previous client socket");
            self.client = new_socket(&self.context, zmq::REQ)?;
            self.client_connected = false;
        }
        self.awaiting_reply = false;

        self.client
            .connect(&endpoint)
            .map_err(|source| SessionError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        self.client_connected = true;
        info!(%endpoint, "client connected");
        Ok(())
    }

    /// Binds the server socket to `tcp://*:<port>`.
    ///
    /// If the server was already bound, its socket is closed and replaced
    /// first.
    pub fn start_server(&mut self, port: u16) -> Result<(), SessionError> {
        let endpoint = protocol::bind_endpoint(port);

        if self.server_bound {
            debug!("closing previous server socket");
            self.server = new_socket(&self.context, zmq::REP)?;
            self.server_bound = false;
        }

        self.server
            .bind(&endpoint)
            .map_err(|source| SessionError::Bind {
                endpoint: endpoint.clone(),
                source,
            })?;

        // Saturates at i32::MAX milliseconds.
        let timeout_ms = i32::try_from(self.recv_timeout.as_millis()).unwrap_or(i32::MAX);
        self.server
            .set_rcvtimeo(timeout_ms)
            .map_err(SessionError::SocketSetup)?;

        self.server_bound = true;
        info!(%endpoint, timeout_ms, "server bound");
        Ok(())
    }

    /// Sends `text` as one request without blocking.
    ///
    /// On success the session awaits a reply until `poll_reply()` sees it.
    pub fn send(&mut self, text: &str) -> Result<(), SessionError> {
        if !self.client_connected {
            return Err(SessionError::NotConnected);
        }
        if self.awaiting_reply {
            return Err(SessionError::AwaitingReply);
        }

        self.client
            .send(text.as_bytes(), zmq::DONTWAIT)
            .map_err(SessionError::Send)?;

        self.awaiting_reply = true;
        info!(bytes = text.len(), "request sent");
        Ok(())
    }

    /// Checks for the reply to an outstanding request.
    ///
    /// Returns `true` when a reply was consumed this call. The reply body
    /// is not returned: the only thing the server ever sends is the fixed
    /// acknowledgment, so it is logged at debug level and dropped.
    pub fn poll_reply(&mut self) -> bool {
        if !(self.client_connected && self.awaiting_reply) {
            return false;
        }

        match self.client.recv_msg(zmq::DONTWAIT) {
            Ok(reply) => {
                debug!(reply = %String::from_utf8_lossy(&reply), "reply received");
                self.awaiting_reply = false;
                true
            }
            Err(zmq::Error::EAGAIN) => false,
            Err(e) => {
                debug!(error = %e, "reply receive failed");
                false
            }
        }
    }

    /// Takes one pending request off the server socket and acknowledges it.
    ///
    /// Returns `None` when the server isn't bound, nothing is pending, or
    /// the receive failed. Every returned request has had exactly one
    /// `ACK` sent back for it (a failed ACK send is logged, not retried).
    pub fn poll_request(&mut self) -> Option<IncomingRequest> {
        if !self.server_bound {
            return None;
        }

        let mut msg = match self.server.recv_msg(zmq::DONTWAIT) {
            Ok(msg) => msg,
            Err(zmq::Error::EAGAIN) => return None,
            Err(e) => {
                debug!(error = %e, "request receive failed");
                return None;
            }
        };

        let content = String::from_utf8_lossy(&msg).into_owned();
        let peer_address = msg.gets("Peer-Address").map(str::to_owned);
        let bound_endpoint = self.server.get_last_endpoint().ok().and_then(Result::ok);
        let source = protocol::source_label(peer_address.as_deref(), bound_endpoint.as_deref());

        debug!(%source, bytes = content.len(), "request received");

        if let Err(e) = self.server.send(ACK_PAYLOAD, zmq::DONTWAIT) {
            warn!(error = %e, %source, "failed to send acknowledgment");
        }

        Some(IncomingRequest { source, content })
    }
}

/// Creates a socket that never lingers on close.
///
/// With the default infinite linger, dropping a REQ socket that still
/// holds an unsent request would block the context teardown, and with it
/// the render thread.
fn new_socket(context: &zmq::Context, kind: zmq::SocketType) -> Result<zmq::Socket, SessionError> {
    let socket = context.socket(kind).map_err(SessionError::SocketSetup)?;
    socket.set_linger(0).map_err(SessionError::SocketSetup)?;
    Ok(socket)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
