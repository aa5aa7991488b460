//! Scroller core types
//!
//! Everything the animation loop needs that does not touch the network: the animation
//! configuration, the configuration mailbox, the frame renderer and the pixel protocol codec.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

pub use smart_leds::RGB8;

pub use crate::{
    config::Configuration,
    errors::{Error, Result},
    mailbox::{mailbox, ConfigReceiver, ConfigSender, DepositError},
    render::Strip,
};

pub mod config;
pub mod errors;
pub mod mailbox;
pub mod proto;
pub mod render;

/// Color of a single pixel.
pub type Color = RGB8;

/// Number of bytes used to transmit a single pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// The longest strip whose frame still fits into a single protocol message.
pub const MAX_STRIP_LEN: usize = u16::MAX as usize / BYTES_PER_PIXEL;

/// A destination of the encoded frames, usually a connection to the LED controller.
pub trait FrameSink {
    /// Error type returned on transmission failure.
    type Error: core::fmt::Display;
    /// Transmits a single encoded frame.
    ///
    /// A failed transmission doesn't invalidate the sink, the next frame may be sent as usual.
    /// Stream based sinks may however have written a part of the failed frame, after that the
    /// receiver can no longer tell where the following frames begin.
    fn send_frame(&mut self, frame: &[u8]) -> core::result::Result<(), Self::Error>;
}

impl<T: ?Sized + FrameSink> FrameSink for &mut T {
    type Error = T::Error;

    fn send_frame(&mut self, frame: &[u8]) -> core::result::Result<(), Self::Error> {
        T::send_frame(self, frame)
    }
}

impl<T: ?Sized + FrameSink> FrameSink for Box<T> {
    type Error = T::Error;

    fn send_frame(&mut self, frame: &[u8]) -> core::result::Result<(), Self::Error> {
        T::send_frame(self, frame)
    }
}
