//! Scroller application
//!
//! The animation loop that renders and transmits frames, and the HTTP configuration source
//! that feeds it with new configurations.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

pub use scroller_core as core;

pub use crate::{
    animation::{Animation, FrameStats, State},
    http::HttpServer,
};

pub mod animation;
pub mod http;

/// Default port of the HTTP configuration source.
pub const DEFAULT_HTTP_PORT: u16 = 8080;
