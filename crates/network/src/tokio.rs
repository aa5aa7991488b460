//! Incoming pixel messages reader for the Tokio types.

use std::io;

use scroller_core::proto::{Header, Message, PackedSize};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads consecutive pixel messages from the async byte stream.
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Creates a new reader on top of the given stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Reads the next message.
    ///
    /// Returns `Ok(None)` if the stream has been closed before the next message header.
    pub async fn next_message(&mut self) -> io::Result<Option<Message<'_>>> {
        self.buf.resize(Header::PACKED_LEN, 0);
        match self.reader.read_exact(&mut self.buf).await {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err),
        }

        let header = Header::decode(&self.buf)?;
        log::trace!("Got a next message header {header:?}");

        self.buf.resize(Header::PACKED_LEN + header.payload_len(), 0);
        self.reader
            .read_exact(&mut self.buf[Header::PACKED_LEN..])
            .await?;

        Ok(Some(Message::decode(&self.buf)?))
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
