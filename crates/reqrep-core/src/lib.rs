//! # reqrep-core
//!
//! Shared library for the REQ/REP messaging panel.
//! Contains the log entry types, the bounded message log, endpoint helpers,
//! configuration, and the session that owns the ZeroMQ sockets.
//!
//! This crate has no GUI dependency; the `reqrep-panel` binary renders
//! its state with egui.

pub mod config;
pub mod history;
pub mod protocol;
pub mod session;
pub mod types;
