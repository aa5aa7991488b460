//! Minimal HTTP/1.1 configuration source.
//!
//! Accepts new animation configurations on `POST /update` and serves the static UI files.
//! Each connection carries a single request and is closed after the response.

use displaydoc::Display;

pub use self::{
    connection::{read_request, read_request_timeout, Request, Response, REQUEST_TIMEOUT},
    headers::{HttpMethod, StatusCode},
    server::HttpServer,
};

mod connection;
mod headers;
mod server;

/// Errors that can occur while reading a request.
#[derive(Debug, Display)]
pub enum HttpError {
    /// I/O error: {0}
    Io(std::io::Error),
    /// The connection has been closed before the request was complete.
    Closed,
    /// Malformed request.
    Parse,
    /// The request header section is too large.
    HeadersTooLarge,
    /// The request body is too large.
    BodyTooLarge,
    /// The request has not been received in time.
    Timeout,
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::Closed,
            _ => Self::Io(err),
        }
    }
}

pub type HttpResult<T> = Result<T, HttpError>;
