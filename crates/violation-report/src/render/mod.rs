//! Report renderers. Both produce a complete document as a `String`; writing
//! it to disk is left to the command layer.

pub mod html;
pub mod json;

pub use html::render_report;
pub use json::{render_locations, render_monitor_log};
