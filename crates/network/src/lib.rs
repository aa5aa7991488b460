//! Scroller network layer
//!
//! This crate provides the persistent connection to the LED controller. Frames are sent over a
//! blocking TCP stream by the animation thread; the optional `tokio` feature adds an async
//! reader of the incoming pixel messages used to emulate a controller.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

use std::time::Duration;

pub use scroller_core as core;

pub use crate::connection::TcpSender;

mod connection;

#[cfg(feature = "tokio")]
pub mod tokio;

/// Timeout of the connection establishment and of every frame write.
pub const TIMEOUT: Duration = Duration::from_secs(15);
