//! Endpoint and payload conventions for the REQ/REP exchange.
//!
//! There is no framing of our own: every request is one ZeroMQ message
//! holding the raw UTF-8 text the user typed, and every reply is the
//! fixed 3-byte acknowledgment below.
//!
//! # Endpoints
//!
//! ```text
//! client connects to   tcp://<ip>:<port>
//! server binds to      tcp://*:<port>
//! ```

/// The reply the server sends for every request it receives.
pub const ACK_PAYLOAD: &[u8] = b"ACK";

/// Label used when the server cannot tell where a request came from.
pub const LOCAL_LABEL: &str = "local";

/// Builds the endpoint a client connects to, e.g. `tcp://127.0.0.1:5555`.
///
/// Leading/trailing whitespace in the IP field is ignored.
pub fn connect_endpoint(ip: &str, port: u16) -> String {
    format!("tcp://{}:{port}", ip.trim())
}

/// Builds the wildcard endpoint a server binds to, e.g. `tcp://*:5555`.
pub fn bind_endpoint(port: u16) -> String {
    format!("tcp://*:{port}")
}

/// Removes the `scheme://` prefix from an endpoint, if present.
pub fn strip_scheme(endpoint: &str) -> &str {
    match endpoint.find("://") {
        Some(pos) => &endpoint[pos + 3..],
        None => endpoint,
    }
}

/// Returns the port part of an endpoint like `tcp://0.0.0.0:5555`.
fn endpoint_port(endpoint: &str) -> Option<&str> {
    let rest = strip_scheme(endpoint);
    let (_, port) = rest.rsplit_once(':')?;
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(port)
}

/// Joins a host and port, bracketing bare IPv6 hosts (`[::1]:5555`).
fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Resolves the human-readable "from" label for a received request.
///
/// Preference order:
/// 1. the peer address attached to the message, joined with the port we
///    are bound on (`127.0.0.1:5555`, `[::1]:5555`)
/// 2. the bound endpoint without its scheme (`0.0.0.0:5555`)
/// 3. [`LOCAL_LABEL`]
pub fn source_label(peer_address: Option<&str>, bound_endpoint: Option<&str>) -> String {
    let peer = peer_address.map(str::trim).filter(|p| !p.is_empty());

    match (peer, bound_endpoint) {
        (Some(peer), Some(endpoint)) => match endpoint_port(endpoint) {
            Some(port) => join_host_port(peer, port),
            None => peer.to_string(),
        },
        (Some(peer), None) => peer.to_string(),
        (None, Some(endpoint)) if !strip_scheme(endpoint).is_empty() => {
            strip_scheme(endpoint).to_string()
        }
        _ => LOCAL_LABEL.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
