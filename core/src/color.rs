//! Turtle colours and the sources new turtles draw them from.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Scale applied by [`Rgb::brighter`]; each channel is divided by it.
const BRIGHTER_FACTOR: f64 = 0.7;

/// Smallest non-zero channel value [`Rgb::brighter`] can produce growth from.
const BRIGHTER_FLOOR: u8 = 3;

/// Brightness shared by every randomly generated turtle colour.
const RANDOM_BRIGHTNESS: f32 = 0.5;

/// Lower bound of the saturation range used for random colours.
const RANDOM_SATURATION_MIN: f32 = 0.25;

/// Width of the saturation range used for random colours.
const RANDOM_SATURATION_SPAN: f32 = 0.65;

/// Opaque colour with byte RGB channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a colour from byte channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Converts hue, saturation and brightness components into RGB.
    ///
    /// `hue` wraps around, so only its fractional part matters. `saturation`
    /// and `brightness` are clamped to `0.0..=1.0`.
    #[must_use]
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32) -> Self {
        let saturation = saturation.clamp(0.0, 1.0);
        let brightness = brightness.clamp(0.0, 1.0);

        if saturation == 0.0 {
            let value = to_channel(brightness);
            return Self::new(value, value, value);
        }

        let sector = (hue - hue.floor()) * 6.0;
        let fraction = sector - sector.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * fraction);
        let t = brightness * (1.0 - saturation * (1.0 - fraction));

        let (red, green, blue) = match sector as u32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };

        Self::new(to_channel(red), to_channel(green), to_channel(blue))
    }

    /// Returns a brighter variant, used for the head and legs of a turtle.
    ///
    /// Black becomes a dark grey so that repeated calls keep brightening.
    #[must_use]
    pub fn brighter(self) -> Self {
        if self == Self::BLACK {
            return Self::new(BRIGHTER_FLOOR, BRIGHTER_FLOOR, BRIGHTER_FLOOR);
        }

        Self::new(
            brighten_channel(self.red),
            brighten_channel(self.green),
            brighten_channel(self.blue),
        )
    }

    /// Mixes `other` over `self`, where `amount` of `1.0` yields `other`.
    #[must_use]
    pub fn mix(self, other: Self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let channel = |below: u8, above: u8| -> u8 {
            let value = f64::from(below) * (1.0 - amount) + f64::from(above) * amount;
            value.round().clamp(0.0, 255.0) as u8
        };

        Self::new(
            channel(self.red, other.red),
            channel(self.green, other.green),
            channel(self.blue, other.blue),
        )
    }
}

fn to_channel(value: f32) -> u8 {
    (value * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

fn brighten_channel(channel: u8) -> u8 {
    let lifted = if channel > 0 && channel < BRIGHTER_FLOOR {
        BRIGHTER_FLOOR
    } else {
        channel
    };

    (f64::from(lifted) / BRIGHTER_FACTOR).min(255.0) as u8
}

/// Supplies the primary colour of every newly constructed turtle.
pub trait ColorSource {
    /// Returns the colour for the next turtle.
    fn next_color(&mut self) -> Rgb;
}

/// Random, moderately saturated mid-brightness colours.
///
/// Hues are uniform over the whole wheel and saturation is uniform within
/// `0.25..0.90`. Seeded instances produce the same sequence on every run.
#[derive(Clone, Debug)]
pub struct RandomColors {
    rng: ChaCha8Rng,
}

impl RandomColors {
    /// Creates a source seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a deterministic source.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Rgb {
        let hue: f32 = self.rng.gen();
        let saturation = RANDOM_SATURATION_MIN + RANDOM_SATURATION_SPAN * self.rng.gen::<f32>();
        Rgb::from_hsb(hue, saturation, RANDOM_BRIGHTNESS)
    }
}

/// Hands every turtle the same colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedColor(pub Rgb);

impl ColorSource for FixedColor {
    fn next_color(&mut self) -> Rgb {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_saturation_yields_grey() {
        assert_eq!(Rgb::from_hsb(0.3, 0.0, 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn primary_hues_convert_exactly() {
        assert_eq!(Rgb::from_hsb(0.0, 1.0, 0.5), Rgb::new(128, 0, 0));
        assert_eq!(Rgb::from_hsb(0.5, 1.0, 1.0), Rgb::new(0, 255, 255));
        assert_eq!(Rgb::from_hsb(1.5, 1.0, 1.0), Rgb::new(0, 255, 255));
    }

    #[test]
    fn brighter_scales_channels_and_saturates() {
        assert_eq!(Rgb::new(100, 0, 50).brighter(), Rgb::new(142, 0, 71));
        assert_eq!(Rgb::new(1, 2, 200).brighter(), Rgb::new(4, 4, 255));
        assert_eq!(Rgb::BLACK.brighter(), Rgb::new(3, 3, 3));
        assert_eq!(Rgb::WHITE.brighter(), Rgb::WHITE);
    }

    #[test]
    fn mix_interpolates_between_colours() {
        let below = Rgb::new(0, 100, 255);
        let above = Rgb::new(200, 100, 55);

        assert_eq!(below.mix(above, 0.0), below);
        assert_eq!(below.mix(above, 1.0), above);
        assert_eq!(below.mix(above, 0.5), Rgb::new(100, 100, 155));
    }

    #[test]
    fn seeded_sources_repeat_their_sequence() {
        let mut first = RandomColors::seeded(17);
        let mut second = RandomColors::seeded(17);

        for _ in 0..32 {
            assert_eq!(first.next_color(), second.next_color());
        }
    }

    #[test]
    fn random_colours_stay_mid_bright() {
        let mut colors = RandomColors::seeded(3);

        for _ in 0..256 {
            let color = colors.next_color();
            let max = color.red.max(color.green).max(color.blue);
            let min = color.red.min(color.green).min(color.blue);
            // Brightness 0.5 pins the strongest channel; saturation >= 0.25 lifts the weakest away from it.
            assert_eq!(max, 128, "unexpected colour {color:?}");
            assert!(min <= 96, "unexpected colour {color:?}");
            assert!(min >= 12, "unexpected colour {color:?}");
        }
    }
}
