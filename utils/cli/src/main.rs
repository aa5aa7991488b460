use std::net::SocketAddr;

use clap::{CommandFactory, Parser, Subcommand};
use scroller_cli::{describe_pixels, send_update, HexColor};
use scroller_core::{config, proto::DEFAULT_PORT, Configuration};
use scroller_network::tokio::FrameReader;
use tokio::net::{TcpListener, TcpStream};

/// Scroller manipulation utility
///
/// A command line application for updating the animation on a running scroller server
/// and for emulating a LED controller.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server socket address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: SocketAddr,
    /// Actual command
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send new animation parameters to the server
    Update {
        /// Delay between frames
        #[arg(short, long, default_value_t = config::DEFAULT_DELAY_MILLIS, value_name = "MS")]
        delay: u64,
        /// Number of lit pixels
        #[arg(short, long, default_value_t = config::DEFAULT_TRAIN_LEN)]
        train_len: usize,
        /// Paint the train with random colors
        #[arg(short, long)]
        random: bool,
        /// Train color
        #[arg(short, long, default_value = "ff0000", value_name = "RRGGBB")]
        color: HexColor,
    },
    /// Emulate a LED controller and print received frames
    Listen {
        /// Port to accept frames on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let address = cli.address;
    match cli.command {
        Command::Update {
            delay,
            train_len,
            random,
            color,
        } => {
            let config = Configuration {
                delay_millis: delay,
                train_len,
                random_mode: random,
                color: color.0,
            };

            log::info!("Sending {config:?} to {address}");
            let response = send_update(address, &config).await?;
            log::info!("Server responded: {response}");
        }
        Command::Listen { port } => {
            let listener = TcpListener::bind(("0.0.0.0", port)).await?;
            log::info!("Waiting for frames on the port {port}");
            loop {
                let (stream, peer) = listener.accept().await?;
                log::info!("Accepted an incoming connection from the {peer}");
                tokio::spawn(print_frames(stream, peer));
            }
        }
        Command::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn print_frames(stream: TcpStream, peer: SocketAddr) {
    let mut reader = FrameReader::new(stream);
    let mut frames = 0_u64;
    loop {
        let message = match reader.next_message().await {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(err) => {
                log::warn!("Unable to read frame from the {peer}: {err}");
                break;
            }
        };

        frames += 1;
        match message.pixels() {
            Ok(pixels) => {
                let pixels = pixels.collect::<Vec<_>>();
                log::info!(
                    "[{peer}] frame {frames}: channel {}, {} pixels, {}",
                    message.header.channel,
                    pixels.len(),
                    describe_pixels(&pixels)
                );
            }
            Err(err) => log::warn!("[{peer}] frame {frames} skipped: {err}"),
        }
    }
    log::info!("Connection with the {peer} closed after {frames} frames");
}
