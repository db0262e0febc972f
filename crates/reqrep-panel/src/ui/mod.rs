//! egui rendering modules for the panel.
//!
//! Each module corresponds to a visual component:
//! - `controls`: endpoint fields, connect/bind buttons, message input
//! - `history`: the scrolling message log and its Clear button
//! - `status`: bottom bar with the three connection flags

pub mod controls;
pub mod history;
pub mod status;
