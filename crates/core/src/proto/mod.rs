//! Open Pixel Control messages.
//!
//! Every message consists of a four bytes [`Header`] followed by the payload. The only
//! command emitted here is "set pixel colors" whose payload is a sequence of RGB triples.

pub use self::packet::{Header, PackedSize};
use crate::{Color, Error, Result, BYTES_PER_PIXEL};

pub mod packet;

/// Default controller port.
pub const DEFAULT_PORT: u16 = 7890;
/// Channel addressing every strip connected to the controller.
pub const BROADCAST_CHANNEL: u8 = 0;

/// Message command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The payload contains RGB triples of the consecutive pixels.
    SetPixelColors,
    /// Vendor specific payload.
    SystemExclusive,
    Unknown(u8),
}

impl From<u8> for Command {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::SetPixelColors,
            0xFF => Self::SystemExclusive,
            other => Self::Unknown(other),
        }
    }
}

impl From<Command> for u8 {
    fn from(value: Command) -> Self {
        match value {
            Command::SetPixelColors => 0x00,
            Command::SystemExclusive => 0xFF,
            Command::Unknown(other) => other,
        }
    }
}

/// Encodes pixels into a set pixel colors message addressed to the broadcast channel.
///
/// The buffer content is replaced by the message.
pub fn encode_frame(pixels: &[Color], buf: &mut Vec<u8>) -> Result<()> {
    let length = u16::try_from(pixels.len() * BYTES_PER_PIXEL)
        .map_err(|_| Error::StripTooLong(pixels.len()))?;
    write_frame(pixels, length, buf);
    Ok(())
}

pub(crate) fn write_frame(pixels: &[Color], length: u16, buf: &mut Vec<u8>) {
    buf.clear();
    buf.resize(Header::PACKED_LEN, 0);
    Header::new(BROADCAST_CHANNEL, Command::SetPixelColors, length).encode(buf);
    buf.extend(pixels.iter().flat_map(|pixel| [pixel.r, pixel.g, pixel.b]));
}

/// Decodes a set pixel colors message back into pixels.
pub fn decode_frame(bytes: &[u8]) -> Result<Vec<Color>> {
    Ok(Message::decode(bytes)?.pixels()?.collect())
}

/// A message borrowed from the receiving buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    pub header: Header,
    pub payload: &'a [u8],
}

impl<'a> Message<'a> {
    /// Decodes the message at the beginning of the buffer.
    ///
    /// Bytes after the payload are left untouched, use [`Self::len`] to skip the message.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let header = Header::decode(bytes)?;

        let expected = Header::PACKED_LEN + header.payload_len();
        if bytes.len() < expected {
            return Err(Error::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            header,
            payload: &bytes[Header::PACKED_LEN..expected],
        })
    }

    /// Returns the total message length including the header.
    pub fn len(&self) -> usize {
        Header::PACKED_LEN + self.payload.len()
    }

    /// Returns true if the message has no payload.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Returns the pixel colors carried by a set pixel colors message.
    pub fn pixels(&self) -> Result<impl Iterator<Item = Color> + 'a> {
        if self.header.command() != Command::SetPixelColors {
            return Err(Error::UnsupportedCommand(self.header.command));
        }
        if self.payload.len() % BYTES_PER_PIXEL != 0 {
            return Err(Error::PayloadMisaligned(self.payload.len()));
        }

        Ok(self
            .payload
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|rgb| Color::new(rgb[0], rgb[1], rgb[2])))
    }
}
