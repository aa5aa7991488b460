//! Persistent connection with the LED controller.

use std::{
    io::{self, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use scroller_core::FrameSink;

use crate::TIMEOUT;

/// Sends encoded frames to the controller over a single TCP stream.
///
/// The connection is established once; failed writes are reported to the caller and the
/// sender stays usable, it never tries to reconnect.
///
/// If a write fails after part of a frame has already gone out, the controller can no longer
/// find the message boundaries. The sender remembers this, see [`TcpSender::is_in_sync`].
#[derive(Debug)]
pub struct TcpSender {
    address: SocketAddr,
    stream: TcpStream,
    in_sync: bool,
}

impl TcpSender {
    /// Connects to the controller with the given address.
    ///
    /// Each resolved address is tried in turn, the last connection error is returned if none
    /// of them accepts the connection.
    pub fn connect<A: ToSocketAddrs>(address: A) -> io::Result<Self> {
        let mut last_error = None;
        for address in address.to_socket_addrs()? {
            log::debug!("Connecting to the {address}");
            match TcpStream::connect_timeout(&address, TIMEOUT) {
                Ok(stream) => return Self::from_stream(stream),
                Err(err) => {
                    log::debug!("Unable to connect to the {address}: {err}");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "controller address resolved to nothing",
            )
        }))
    }

    /// Creates a sender on top of the already established stream.
    pub fn from_stream(stream: TcpStream) -> io::Result<Self> {
        let address = stream.peer_addr()?;
        stream.set_write_timeout(Some(TIMEOUT))?;
        stream.set_nodelay(true).ok();

        log::debug!("Connected to the {address}");
        Ok(Self {
            address,
            stream,
            in_sync: true,
        })
    }

    /// Replaces the default write timeout.
    pub fn set_write_timeout(&self, timeout: Duration) -> io::Result<()> {
        self.stream.set_write_timeout(Some(timeout))
    }

    /// Returns the controller address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.address
    }

    /// Returns `false` once a frame has been only partially transmitted.
    pub fn is_in_sync(&self) -> bool {
        self.in_sync
    }

    fn interrupted(&mut self, written: usize, total: usize, err: io::Error) -> io::Error {
        if written > 0 {
            if self.in_sync {
                log::error!(
                    "Frame interrupted after {written} of {total} bytes, the stream to the {} \
                     is out of sync",
                    self.address
                );
            }
            self.in_sync = false;
        }
        err
    }
}

impl FrameSink for TcpSender {
    type Error = io::Error;

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        log::trace!("Sending {} bytes to the {}", frame.len(), self.address);

        let mut written = 0;
        while written < frame.len() {
            match self.stream.write(&frame[written..]) {
                Ok(0) => {
                    let err = io::Error::from(io::ErrorKind::WriteZero);
                    return Err(self.interrupted(written, frame.len(), err));
                }
                Ok(n) => written += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(self.interrupted(written, frame.len(), err)),
            }
        }
        Ok(())
    }
}
