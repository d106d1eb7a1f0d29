// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning normalized escape steps into colours.
//!
//! The colorizer sees every pixel's value together with the smallest
//! value in the whole frame, so it can stretch the palette over the
//! range the frame actually uses instead of the theoretical `[0, 1]`.

/// An 8-bit-per-channel colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba {
    /// An opaque colour.
    pub fn opaque(r: u8, g: u8, b: u8) -> Rgba {
        Rgba { r, g, b, a: 255 }
    }

    /// Packs the channels into one word, red in the most significant
    /// byte and alpha in the least.  This is the layout of every pixel
    /// buffer the renderer hands out.
    pub fn pack(self) -> u32 {
        (u32::from(self.r) << 24)
            | (u32::from(self.g) << 16)
            | (u32::from(self.b) << 8)
            | u32::from(self.a)
    }

    /// The inverse of `pack`.
    pub fn unpack(pixel: u32) -> Rgba {
        let [r, g, b, a] = pixel.to_be_bytes();
        Rgba { r, g, b, a }
    }
}

/// The colour mapping consumed by the renderer.  Must be total and
/// pure: the same inputs always give the same colour.
pub trait Colorizer: Sync {
    /// Maps a pixel's normalized escape step to a colour, given the
    /// minimum step over the whole frame.
    fn colorize(&self, value: f64, frame_min: f64) -> Rgba;
}

/// A rainbow ramp over the frame's escape range.  Points inside the
/// set (a step of 1.0) are painted black.
#[derive(Copy, Clone, Debug)]
pub struct ColourRamp {
    saturation: f64,
}

impl Default for ColourRamp {
    fn default() -> ColourRamp {
        ColourRamp { saturation: 0.9 }
    }
}

impl ColourRamp {
    /// Position of `value` within `[frame_min, 1]`, in `[0, 1]`.
    pub fn stretch(value: f64, frame_min: f64) -> f64 {
        let range = 1.0 - frame_min;
        if range <= 0.0 {
            return 0.0;
        }
        ((value - frame_min) / range).max(0.0).min(1.0)
    }
}

impl Colorizer for ColourRamp {
    fn colorize(&self, value: f64, frame_min: f64) -> Rgba {
        if value >= 1.0 {
            return Rgba::opaque(0, 0, 0);
        }
        let t = ColourRamp::stretch(value, frame_min).sqrt();
        let (r, g, b) = hsv_to_rgb(360.0 * t, self.saturation, (0.4 + 0.6 * t).min(0.9));
        Rgba::opaque(r, g, b)
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let c = v * s;
    let h_prime = (h / 60.0) % 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let channel = |v: f64| ((v + m) * 255.0).round().max(0.0).min(255.0) as u8;
    (channel(r1), channel(g1), channel(b1))
}
