use endian_codec::{DecodeBE, EncodeBE};
pub use endian_codec::PackedSize;

use super::Command;
use crate::{Error, Result};

/// Message header: channel, command and the big-endian payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PackedSize, EncodeBE, DecodeBE)]
pub struct Header {
    pub channel: u8,
    pub command: u8,
    pub length: u16,
}

impl Header {
    /// Creates a new message header.
    pub fn new(channel: u8, command: Command, length: u16) -> Self {
        Self {
            channel,
            command: command.into(),
            length,
        }
    }

    /// Returns the message command.
    pub fn command(self) -> Command {
        Command::from(self.command)
    }

    /// Returns the payload length in bytes.
    pub fn payload_len(self) -> usize {
        usize::from(self.length)
    }

    /// Writes the header into the beginning of the buffer.
    pub fn encode(self, buf: &mut [u8]) {
        self.encode_as_be_bytes(&mut buf[..Self::PACKED_LEN]);
    }

    /// Reads the header from the beginning of the buffer.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::PACKED_LEN {
            return Err(Error::Truncated {
                expected: Self::PACKED_LEN,
                actual: buf.len(),
            });
        }
        Ok(Self::decode_from_be_bytes(&buf[..Self::PACKED_LEN]))
    }
}
