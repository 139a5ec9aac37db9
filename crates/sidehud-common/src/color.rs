//! Color values used by the configuration and the renderer.
//!
//! Colors are stored as straight (non-premultiplied) floating point channels
//! in `[0, 1]`. The configuration persists [`Rgb`] triples; the alpha channel
//! is derived from the shared transparency setting when drawing.

use serde::{Deserialize, Serialize};

/// An RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Returns the color with every channel clamped to `[0, 1]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(
            clamp_channel(self.r),
            clamp_channel(self.g),
            clamp_channel(self.b),
        )
    }

    /// Combines the color with a transparency percentage (`0..=100`).
    #[must_use]
    pub fn with_transparency(self, transparency: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, transparency / 100.0)
    }

    /// Returns the channels as an array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(color: Rgb) -> Self {
        color.to_array()
    }
}

/// An RGBA color with straight alpha, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Packs the color into 8-bit channels, saturating out-of-range values.
    #[must_use]
    pub fn to_u8_array(self) -> [u8; 4] {
        [
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b),
            to_u8(self.a),
        ]
    }
}

fn clamp_channel(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn to_u8(value: f32) -> u8 {
    (clamp_channel(value) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rgb_clamped() {
        let color = Rgb::new(-0.5, 0.5, 3.0).clamped();
        assert_eq!(color, Rgb::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_rgb_clamped_nan() {
        let color = Rgb::new(f32::NAN, 0.2, 0.2).clamped();
        assert_eq!(color.r, 0.0);
    }

    #[test]
    fn test_rgba_to_u8() {
        assert_eq!(Rgba::WHITE.to_u8_array(), [255, 255, 255, 255]);
        assert_eq!(Rgba::new(0.0, 0.5, 2.0, -1.0).to_u8_array(), [0, 128, 255, 0]);
    }

    #[test]
    fn test_rgb_serializes_as_triple() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            color: Rgb,
        }

        let text = toml::to_string(&Wrapper {
            color: Rgb::new(0.25, 0.5, 1.0),
        })
        .expect("serialize");
        assert!(text.contains("[0.25, 0.5, 1.0]"));

        let back: Wrapper = toml::from_str(&text).expect("deserialize");
        assert_eq!(back.color, Rgb::new(0.25, 0.5, 1.0));
    }

    proptest! {
        #[test]
        fn prop_clamped_stays_in_unit_range(r in any::<f32>(), g in any::<f32>(), b in any::<f32>()) {
            let color = Rgb::new(r, g, b).clamped();
            for channel in color.to_array() {
                prop_assert!((0.0..=1.0).contains(&channel));
            }
            prop_assert_eq!(color.clamped(), color);
        }

        #[test]
        fn prop_rgb_toml_roundtrip(r in 0.0f32..=1.0, g in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            #[derive(Serialize, Deserialize)]
            struct Wrapper {
                color: Rgb,
            }

            let color = Rgb::new(r, g, b);
            let text = toml::to_string(&Wrapper { color }).expect("serialize");
            let back: Wrapper = toml::from_str(&text).expect("deserialize");
            prop_assert_eq!(back.color, color);
        }
    }
}
