use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scroller_app::{Animation, HttpServer, DEFAULT_HTTP_PORT};
use scroller_core::{mailbox, MAX_STRIP_LEN};
use scroller_network::TcpSender;

/// LED strip train animation server
///
/// Streams the animation to a Fadecandy compatible controller and accepts new animation
/// parameters via HTTP.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Fadecandy server and port to connect to
    #[arg(long, default_value = "localhost:7890", value_name = "HOST:PORT")]
    fcserver: String,
    /// Port to serve UI from
    #[arg(short, long, default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,
    /// Number of LEDs in the string
    #[arg(
        short,
        long,
        default_value_t = 64,
        value_parser = clap::value_parser!(u16).range(1..=MAX_STRIP_LEN as i64)
    )]
    leds: u16,
    /// Directory with the UI files
    #[arg(long, default_value = "./static", value_name = "DIR")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let sender = TcpSender::connect(cli.fcserver.as_str())
        .with_context(|| format!("Could not connect to Fadecandy server {}", cli.fcserver))?;
    log::info!("Connected to the controller at {}", sender.peer_addr());

    let (config_tx, config_rx) = mailbox();
    Animation::new(usize::from(cli.leds), config_rx, sender)?
        .spawn()
        .context("Unable to spawn the animation thread")?;

    let server = HttpServer::bind(("0.0.0.0", cli.port), config_tx, cli.static_dir)
        .await
        .with_context(|| format!("Unable to listen on the port {}", cli.port))?;
    server.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["scroller"]).unwrap();
        assert_eq!(cli.fcserver, "localhost:7890");
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.leds, 64);
        assert_eq!(cli.static_dir, PathBuf::from("./static"));
    }

    #[test]
    fn test_strip_length_bounds() {
        assert!(Cli::try_parse_from(["scroller", "--leds", "0"]).is_err());
        assert!(Cli::try_parse_from(["scroller", "--leds", "21846"]).is_err());
        let cli = Cli::try_parse_from(["scroller", "-l", "21845", "--fcserver", "fc:1"]).unwrap();
        assert_eq!(cli.leds, 21_845);
        assert_eq!(cli.fcserver, "fc:1");
    }
}
