//! Animation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Color;

/// Default delay between two frames.
pub const DEFAULT_DELAY_MILLIS: u64 = 100;
/// Default number of the lit pixels.
pub const DEFAULT_TRAIN_LEN: usize = 7;
/// Default train color.
pub const DEFAULT_COLOR: Color = Color {
    r: 255,
    g: 0,
    b: 0,
};

/// A snapshot of the animation parameters.
///
/// A new configuration always replaces the previous one as a whole. The JSON form uses
/// `delay`, `train_len`, `random` and `color` keys; missing keys take the default values.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Time between two rendered frames in milliseconds.
    #[serde(rename = "delay")]
    pub delay_millis: u64,
    /// Number of consecutive pixels that form the moving train.
    pub train_len: usize,
    /// Paint each train pixel with a random color instead of [`Self::color`].
    #[serde(rename = "random")]
    pub random_mode: bool,
    /// Train color.
    #[serde(with = "color_serde")]
    pub color: Color,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            delay_millis: DEFAULT_DELAY_MILLIS,
            train_len: DEFAULT_TRAIN_LEN,
            random_mode: false,
            color: DEFAULT_COLOR,
        }
    }
}

impl Configuration {
    /// Returns the delay between two frames.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }
}

mod color_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::Color;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(default)]
    struct Rgb {
        r: u8,
        g: u8,
        b: u8,
    }

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let Rgb { r, g, b } = Rgb::deserialize(deserializer)?;
        Ok(Color::new(r, g, b))
    }
}
