//! Domain types for the message log.
//!
//! The panel's log used to be a list of free-text lines tagged by a
//! prefix. Here every line is a [`LogEntry`]: a structured [`LogEvent`]
//! plus the time it was recorded. The `Display` impl of `LogEvent`
//! still produces the familiar text (`[SENT] hello`,
//! `[RECEIVED from 127.0.0.1:5555] hello`, `Bind error: ...`), so the
//! UI renders exactly what a user expects while the code can match on
//! the kind of entry.

use std::fmt;

// ---------------------------------------------------------------------------
// Timestamp — Unix milliseconds since epoch
// ---------------------------------------------------------------------------

/// A point in time represented as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Returns the current time as a `Timestamp`.
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    /// Formats this timestamp as a local time string like "10:30:45".
    ///
    /// Uses the system's local timezone. Returns "??:??:??" if the
    /// timestamp can't be converted.
    pub fn format_local_time(&self) -> String {
        use chrono::{Local, TimeZone};
        match Local.timestamp_millis_opt(self.0) {
            chrono::LocalResult::Single(dt) => dt.format("%H:%M:%S").to_string(),
            _ => "??:??:??".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// EntryKind — coarse classification used for styling
// ---------------------------------------------------------------------------

/// Whether a log entry records an outgoing request, an incoming request,
/// or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Sent,
    Received,
    Error,
}

// ---------------------------------------------------------------------------
// LogEvent / LogEntry
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// The client sent a request.
    Sent { content: String },
    /// The server received a request from `source`.
    Received { source: String, content: String },
    /// A connect, bind, or send failed. `message` is already
    /// human-readable (`Connection error: ...`).
    Error { message: String },
}

impl LogEvent {
    /// Returns the coarse kind of this event.
    pub fn kind(&self) -> EntryKind {
        match self {
            LogEvent::Sent { .. } => EntryKind::Sent,
            LogEvent::Received { .. } => EntryKind::Received,
            LogEvent::Error { .. } => EntryKind::Error,
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::Sent { content } => write!(f, "[SENT] {content}"),
            LogEvent::Received { source, content } => {
                write!(f, "[RECEIVED from {source}] {content}")
            }
            LogEvent::Error { message } => write!(f, "{message}"),
        }
    }
}

/// One line of the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub event: LogEvent,
    /// When the entry was added to the log.
    pub logged_at: Timestamp,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(event: LogEvent) -> Self {
        Self {
            event,
            logged_at: Timestamp::now(),
        }
    }

    /// `[SENT] <content>`
    pub fn sent(content: impl Into<String>) -> Self {
        Self::new(LogEvent::Sent {
            content: content.into(),
        })
    }

    /// `[RECEIVED from <source>] <content>`
    pub fn received(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(LogEvent::Received {
            source: source.into(),
            content: content.into(),
        })
    }

    /// An error line. Any `Display` works; session errors already carry
    /// their `Connection error:` / `Bind error:` / `Send error:` prefix.
    pub fn error(err: impl fmt::Display) -> Self {
        Self::new(LogEvent::Error {
            message: err.to_string(),
        })
    }

    pub fn kind(&self) -> EntryKind {
        self.event.kind()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
