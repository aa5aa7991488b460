//! Train pattern renderer.

use rand::Rng;

use crate::{proto, Color, Configuration, Error, Result, BYTES_PER_PIXEL, MAX_STRIP_LEN};

/// Lowest value of a randomly sampled color channel.
pub const RANDOM_CHANNEL_MIN: u8 = 2;
/// Upper bound (exclusive) of a randomly sampled color channel.
pub const RANDOM_CHANNEL_MAX: u8 = 255;

/// Returns indices of the pixels lit by a train of `train_len` pixels anchored at `position`.
///
/// Offsets that run off the end of the strip are redirected to the index
/// `train_len - offset - 1`; those which are still out of the strip are skipped. Indices are
/// yielded in the ascending offset order.
pub fn train_pixels(
    position: usize,
    train_len: usize,
    strip_len: usize,
) -> impl Iterator<Item = usize> {
    // Offsets in `fits..train_len` overflow, and only the last `strip_len` of them
    // may be redirected inside the strip.
    let fits = strip_len.saturating_sub(position).min(train_len);
    let redirect_from = fits.max(train_len.saturating_sub(strip_len));

    (0..fits)
        .map(move |offset| position + offset)
        .chain((redirect_from..train_len).map(move |offset| train_len - offset - 1))
}

/// Samples a color with each channel independently taken from the
/// `[RANDOM_CHANNEL_MIN, RANDOM_CHANNEL_MAX)` range.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let mut channel = || rng.gen_range(RANDOM_CHANNEL_MIN..RANDOM_CHANNEL_MAX);
    Color::new(channel(), channel(), channel())
}

/// LED strip frame buffer.
///
/// The buffer is never cleared between frames: rendering overwrites only the train pixels,
/// the rest keep their previous colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pixels: Vec<Color>,
    payload_len: u16,
}

impl Strip {
    /// Creates a new dark strip with the given number of pixels.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::EmptyStrip);
        }
        if len > MAX_STRIP_LEN {
            return Err(Error::StripTooLong(len));
        }

        let payload_len =
            u16::try_from(len * BYTES_PER_PIXEL).map_err(|_| Error::StripTooLong(len))?;
        Ok(Self {
            pixels: vec![Color::default(); len],
            payload_len,
        })
    }

    /// Returns the number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false, the strip has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the current pixel colors.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Paints the train anchored at the given position.
    ///
    /// In the random mode each train pixel gets its own random color, otherwise all of them get
    /// the configured one.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        position: usize,
        config: &Configuration,
        rng: &mut R,
    ) {
        for index in train_pixels(position, config.train_len, self.pixels.len()) {
            self.pixels[index] = if config.random_mode {
                random_color(rng)
            } else {
                config.color
            };
        }
    }

    /// Encodes the whole strip into a single set pixel colors message.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        proto::write_frame(&self.pixels, self.payload_len, buf);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn fixed(train_len: usize, color: Color) -> Configuration {
        Configuration {
            train_len,
            color,
            ..Configuration::default()
        }
    }

    #[test]
    fn test_train_inside_strip() {
        let pixels = train_pixels(2, 4, 10).collect::<Vec<_>>();
        assert_eq!(pixels, [2, 3, 4, 5]);
    }

    #[test]
    fn test_overflow_redirect() {
        // Offsets 2 and 3 run off the end and land on `4 - 2 - 1` and `4 - 3 - 1`.
        let pixels = train_pixels(8, 4, 10).collect::<Vec<_>>();
        assert_eq!(pixels, [8, 9, 1, 0]);
    }

    #[test]
    fn test_overflow_at_last_pixel() {
        let pixels = train_pixels(63, 7, 64).collect::<Vec<_>>();
        assert_eq!(pixels, [63, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_train_longer_than_strip() {
        // Redirected offsets 10..15 would land on 14..10 and are skipped.
        let pixels = train_pixels(0, 25, 10).collect::<Vec<_>>();
        assert_eq!(pixels, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);

        let pixels = train_pixels(3, usize::MAX, 5).collect::<Vec<_>>();
        assert_eq!(pixels, [3, 4, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_empty_train() {
        assert_eq!(train_pixels(3, 0, 10).count(), 0);
    }

    #[test]
    fn test_pixels_always_in_bounds() {
        for strip_len in 1..=24 {
            for train_len in 0..=strip_len + 3 {
                for position in 0..strip_len {
                    let mut count = 0;
                    for index in train_pixels(position, train_len, strip_len) {
                        assert!(index < strip_len, "{position} {train_len} {strip_len}");
                        count += 1;
                    }
                    if train_len <= strip_len {
                        assert_eq!(count, train_len);
                    }
                }
            }
        }
    }

    #[test]
    fn test_strip_length_limits() {
        assert_eq!(Strip::new(0), Err(Error::EmptyStrip));
        assert_eq!(
            Strip::new(MAX_STRIP_LEN + 1),
            Err(Error::StripTooLong(MAX_STRIP_LEN + 1))
        );
        assert_eq!(Strip::new(MAX_STRIP_LEN).unwrap().len(), MAX_STRIP_LEN);
    }

    #[test]
    fn test_render_keeps_previous_pixels() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut strip = Strip::new(10).unwrap();
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);

        strip.render(0, &fixed(3, red), &mut rng);
        strip.render(5, &fixed(2, blue), &mut rng);

        let black = Color::default();
        assert_eq!(
            strip.pixels(),
            [red, red, red, black, black, blue, blue, black, black, black]
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = fixed(4, Color::new(10, 20, 30));

        let mut first = Strip::new(16).unwrap();
        first.render(14, &config, &mut rng);
        let mut second = first.clone();
        second.render(14, &config, &mut rng);

        assert_eq!(first, second);
    }

    #[test]
    fn test_random_render() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = Configuration {
            random_mode: true,
            ..fixed(6, Color::default())
        };

        let mut strip = Strip::new(32).unwrap();
        strip.render(4, &config, &mut rng);

        for (index, pixel) in strip.pixels().iter().enumerate() {
            if (4..10).contains(&index) {
                for channel in [pixel.r, pixel.g, pixel.b] {
                    assert!((RANDOM_CHANNEL_MIN..RANDOM_CHANNEL_MAX).contains(&channel));
                }
            } else {
                assert_eq!(*pixel, Color::default());
            }
        }
    }
}
