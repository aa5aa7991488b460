use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{
    headers::{find_content_length, find_header_end, parse_request_line, HttpMethod, StatusCode},
    HttpError, HttpResult,
};

/// Max length of the request line with headers.
pub const MAX_HEADER_LEN: usize = 8 * 1024;
/// Max length of the request body.
pub const MAX_BODY_LEN: usize = 64 * 1024;
/// How long a client may take to send the whole request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const READ_CHUNK_SIZE: usize = 1024;

/// Received request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: HttpMethod,
    /// Request target as it was sent by the client, including the query.
    pub target: String,
    pub body: Vec<u8>,
}

impl Request {
    /// Returns the request path without the query.
    pub fn path(&self) -> &str {
        self.target
            .split_once('?')
            .map_or(self.target.as_str(), |(path, _query)| path)
    }
}

/// Reads a single request from the stream.
pub async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> HttpResult<Request> {
    let mut buf = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0_u8; READ_CHUNK_SIZE];
    let header_end = loop {
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
        if buf.len() >= MAX_HEADER_LEN {
            return Err(HttpError::HeadersTooLarge);
        }

        let bytes_read = reader.read(&mut chunk).await?;
        if bytes_read == 0 {
            return Err(HttpError::Closed);
        }
        buf.extend_from_slice(&chunk[..bytes_read]);
    };

    let header_str = std::str::from_utf8(&buf[..header_end]).map_err(|_| HttpError::Parse)?;
    let (method, target, rest_headers) = parse_request_line(header_str).ok_or(HttpError::Parse)?;
    let content_length = find_content_length(rest_headers).unwrap_or(0);
    if content_length > MAX_BODY_LEN {
        return Err(HttpError::BodyTooLarge);
    }

    // Part of the body may have been read together with the headers.
    let mut body = buf[header_end..].to_vec();
    body.truncate(content_length);
    let received = body.len();
    body.resize(content_length, 0);
    reader.read_exact(&mut body[received..]).await?;

    Ok(Request {
        method,
        target: target.to_owned(),
        body,
    })
}

/// Reads a single request, giving up if it isn't complete within the given time.
pub async fn read_request_timeout<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> HttpResult<Request> {
    tokio::time::timeout(timeout, read_request(reader))
        .await
        .map_err(|_| HttpError::Timeout)?
}

/// Response to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a new response with the given body.
    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Creates a new plain text response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status, "text/plain; charset=utf-8", body.into())
    }

    /// Returns the status line and headers.
    pub fn head(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status.code(),
            self.status.reason_phrase(),
            self.content_type,
            self.body.len(),
        )
    }

    /// Writes the response to the stream.
    pub async fn write_to<W: AsyncWrite + Unpin>(
        &self,
        writer: &mut W,
        with_body: bool,
    ) -> std::io::Result<()> {
        writer.write_all(self.head().as_bytes()).await?;
        if with_body {
            writer.write_all(&self.body).await?;
        }
        writer.flush().await
    }
}
