//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, countdown units, progress chart, overlays
//! - `input`: keyboard event handling
//! - `styles`: palette, user color parsing, text styling

pub mod input;
pub mod render;
pub mod styles;
