use displaydoc::Display;

/// A specialized result type for the scroller core.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur when building strips and processing pixel messages.
#[derive(Clone, Copy, PartialEq, Eq, Display, Debug)]
pub enum Error {
    /// The strip must contain at least one pixel.
    EmptyStrip,
    /// The strip length {0} does not fit into a single message.
    StripTooLong(usize),
    /// The message is truncated: expected {expected} bytes, got {actual}.
    Truncated { expected: usize, actual: usize },
    /// The payload length {0} is not a multiple of the pixel size.
    PayloadMisaligned(usize),
    /// Unsupported protocol command {0}.
    UnsupportedCommand(u8),
}

impl std::error::Error for Error {}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, err)
    }
}
