//! Helpers of the scroller command line utility.

use std::{fmt::Write as _, net::SocketAddr, str::FromStr};

use anyhow::Context;
use scroller_core::{Color, Configuration};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

/// Color given in the `rrggbb` hex notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub Color);

impl FromStr for HexColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        anyhow::ensure!(
            hex.len() == 6 && hex.is_ascii(),
            "expected a color in the `rrggbb` form, got `{s}`"
        );

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).with_context(|| format!("invalid color `{s}`"))
        };
        Ok(Self(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)))
    }
}

/// Posts the configuration to the server and returns the response text.
pub async fn send_update(address: SocketAddr, config: &Configuration) -> anyhow::Result<String> {
    let body = serde_json::to_string(config)?;
    let request = format!(
        "POST /update HTTP/1.1\r\nHost: {address}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let mut stream = TcpStream::connect(address)
        .await
        .with_context(|| format!("Unable to connect to the {address}"))?;
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;

    let (head, body) = response
        .split_once("\r\n\r\n")
        .context("Malformed response")?;
    let status: u16 = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .context("Malformed response status line")?;
    anyhow::ensure!(
        (200..300).contains(&status),
        "Server rejected the update with {status}: {body}"
    );

    Ok(body.to_owned())
}

/// Returns a short human readable description of the strip state.
///
/// Lit pixels are grouped into ranges, e.g. `0-6 #ff0000, 9 #0a0b0c`.
pub fn describe_pixels(pixels: &[Color]) -> String {
    let mut out = String::new();
    let mut index = 0;
    while index < pixels.len() {
        let color = pixels[index];
        let run = pixels[index..]
            .iter()
            .take_while(|pixel| **pixel == color)
            .count();

        if color != Color::default() {
            if !out.is_empty() {
                out.push_str(", ");
            }
            if run == 1 {
                let _ = write!(out, "{index}");
            } else {
                let _ = write!(out, "{}-{}", index, index + run - 1);
            }
            let _ = write!(out, " #{:02x}{:02x}{:02x}", color.r, color.g, color.b);
        }
        index += run;
    }

    if out.is_empty() {
        out.push_str("dark");
    }
    out
}
