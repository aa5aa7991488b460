//! Train animation loop.

use std::{
    thread::JoinHandle,
    time::{Duration, Instant},
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use scroller_core::{ConfigReceiver, Configuration, FrameSink, Result, Strip};

/// How often the frame statistics are printed.
const STATS_INTERVAL: u64 = 10_000;

/// Animation loop state.
///
/// The loop has the single running state, it is left only when the process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Rendering the train anchored at the given position.
    Running { position: usize },
}

impl State {
    /// Returns the current train position.
    pub fn position(self) -> usize {
        match self {
            Self::Running { position } => position,
        }
    }

    /// Advances the train by one pixel, wrapping to the strip beginning after the last one.
    #[must_use]
    pub fn next(self, strip_len: usize) -> Self {
        match self {
            Self::Running { position } => Self::Running {
                position: (position + 1) % strip_len,
            },
        }
    }
}

/// Transmission statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub total_frames: u64,
    pub failed_frames: u64,
    pub max_sending_time: Duration,
    pub total_sending_time: Duration,
}

impl FrameStats {
    fn update(&mut self, sending_time: Duration, succeed: bool) {
        self.total_frames += 1;
        if !succeed {
            self.failed_frames += 1;
        }
        self.max_sending_time = self.max_sending_time.max(sending_time);
        self.total_sending_time += sending_time;
    }

    fn show(&self) {
        log::debug!("Print statistics snapshot");
        log::debug!(
            "-> Failed frames {} of {}",
            self.failed_frames,
            self.total_frames
        );
        log::debug!(
            "-> Max frame sending duration is {}ms",
            self.max_sending_time.as_secs_f32() * 1_000_f32
        );
        if let Ok(frames) = u32::try_from(self.total_frames) {
            if frames > 0 {
                log::debug!(
                    "-> Average frame sending duration is {}ms",
                    (self.total_sending_time / frames).as_secs_f32() * 1_000_f32
                );
            }
        }
    }
}

/// Renders the train animation and streams frames into the sink.
///
/// The loop owns the current configuration and the train position; new configurations
/// arrive only through the mailbox, which is polled once per frame without blocking.
pub struct Animation<S, R = StdRng> {
    state: State,
    config: Configuration,
    strip: Strip,
    frame: Vec<u8>,
    mailbox: ConfigReceiver,
    sink: S,
    rng: R,
    stats: FrameStats,
}

impl<S: FrameSink> Animation<S> {
    /// Creates a new animation of a strip with the given length using the default
    /// configuration.
    pub fn new(strip_len: usize, mailbox: ConfigReceiver, sink: S) -> Result<Self> {
        Self::with_rng(strip_len, mailbox, sink, StdRng::from_entropy())
    }
}

impl<S: FrameSink, R: Rng> Animation<S, R> {
    /// Creates a new animation with the given source of random colors.
    pub fn with_rng(strip_len: usize, mailbox: ConfigReceiver, sink: S, rng: R) -> Result<Self> {
        Ok(Self {
            state: State::Running { position: 0 },
            config: Configuration::default(),
            strip: Strip::new(strip_len)?,
            frame: Vec::new(),
            mailbox,
            sink,
            rng,
            stats: FrameStats::default(),
        })
    }

    /// Returns the current loop state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Returns the strip as it has been rendered by the last step.
    pub fn strip(&self) -> &Strip {
        &self.strip
    }

    /// Returns the last encoded frame.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Returns the frame destination.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the transmission statistics collected so far.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Performs a single loop iteration.
    ///
    /// Renders and sends the frame for the current position, sleeps for the configured delay,
    /// adopts a pending configuration if there is one and then moves the train forward.
    /// A failed transmission is only logged.
    pub fn step(&mut self) {
        let position = self.state.position();

        self.strip.render(position, &self.config, &mut self.rng);
        self.strip.encode(&mut self.frame);

        let now = Instant::now();
        let result = self.sink.send_frame(&self.frame);
        self.stats.update(now.elapsed(), result.is_ok());
        if let Err(err) = result {
            log::warn!("Couldn't send frame at position {position}: {err}");
        }
        if self.stats.total_frames % STATS_INTERVAL == 0 {
            self.stats.show();
        }

        let delay = self.config.delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        if let Some(config) = self.mailbox.try_take() {
            log::info!("Applying configuration {config:?}");
            self.config = config;
        }

        self.state = self.state.next(self.strip.len());
    }

    /// Runs the animation loop forever.
    pub fn run(mut self) -> ! {
        log::info!(
            "Starting animation of {} pixels with {:?}",
            self.strip.len(),
            self.config
        );
        loop {
            self.step();
        }
    }
}

impl<S, R> Animation<S, R>
where
    S: FrameSink + Send + 'static,
    R: Rng + Send + 'static,
{
    /// Starts the animation loop on a dedicated thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("animation".to_owned())
            .spawn(move || self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wraps() {
        let mut state = State::Running { position: 0 };
        for expected in [1, 2, 3, 0, 1] {
            state = state.next(4);
            assert_eq!(state.position(), expected);
        }
    }

    #[test]
    fn test_single_pixel_strip() {
        let state = State::Running { position: 0 };
        assert_eq!(state.next(1), state);
    }

    #[test]
    fn test_stats_update() {
        let mut stats = FrameStats::default();
        stats.update(Duration::from_millis(2), true);
        stats.update(Duration::from_millis(5), false);
        stats.update(Duration::from_millis(1), true);

        assert_eq!(stats.total_frames, 3);
        assert_eq!(stats.failed_frames, 1);
        assert_eq!(stats.max_sending_time, Duration::from_millis(5));
        assert_eq!(stats.total_sending_time, Duration::from_millis(8));
    }
}
