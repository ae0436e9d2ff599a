//! Adapters Layer
//!
//! Presentation of run results for the outside world.

pub mod report;

pub use report::{render_json, render_text, TextReport};
