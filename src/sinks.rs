// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished frames go.
//!
//! Both sinks receive the same thing: `width * height` packed RGBA
//! words, row-major, red in the most significant byte, no padding
//! between rows.

use std::convert::TryFrom;
use std::io::Write;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::colour::Rgba;
use crate::errors::RenderError;

/// Shows live frames.
pub trait PresentationSink {
    /// Displays one frame.
    fn present(&mut self, pixels: &[u32], width: usize, height: usize) -> Result<(), RenderError>;
}

/// Writes still frames out.
pub trait ExportSink {
    /// Writes one frame to `path`.
    fn export(
        &mut self,
        pixels: &[u32],
        width: usize,
        height: usize,
        path: &Path,
    ) -> Result<(), RenderError>;
}

/// Spreads packed pixels out into R, G, B, A bytes.
pub fn unpack(pixels: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixels.len() * 4);
    for pixel in pixels {
        bytes.extend_from_slice(&pixel.to_be_bytes());
    }
    bytes
}

/// Extensions the `image` crate can encode to by name.
const ENCODABLE: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "ico", "pbm", "pgm", "ppm", "pam",
];

/// True when `path` names a format `image` will pick by itself.
fn has_known_extension(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ENCODABLE.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Writes frames with the `image` crate.  The format follows the
/// extension of the destination; anything else is written as PNG.
#[derive(Copy, Clone, Debug, Default)]
pub struct ImageExporter;

impl ExportSink for ImageExporter {
    fn export(
        &mut self,
        pixels: &[u32],
        width: usize,
        height: usize,
        path: &Path,
    ) -> Result<(), RenderError> {
        let fail = |reason: String| RenderError::Export {
            path: path.display().to_string(),
            reason,
        };
        if pixels.len() != width * height {
            return Err(fail(format!(
                "{} pixels do not make a {}x{} image",
                pixels.len(),
                width,
                height
            )));
        }
        let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(fail(format!("{}x{} is too large for an image", width, height))),
        };
        let image = RgbaImage::from_raw(w, h, unpack(pixels))
            .ok_or_else(|| fail("pixel buffer does not match the image size".to_string()))?;
        let saved = if has_known_extension(path) {
            image.save(path)
        } else {
            image.save_with_format(path, ImageFormat::PNG)
        };
        saved.map_err(|err| fail(err.to_string()))
    }
}

/// Draws live frames on a 24-bit colour terminal.  Each character cell
/// shows two pixels: the upper one as the foreground of a half block,
/// the lower one as the background.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    /// Presents to `out`, usually standard output.
    pub fn new(out: W) -> TerminalPresenter<W> {
        TerminalPresenter { out }
    }

    /// Gives the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PresentationSink for TerminalPresenter<W> {
    fn present(&mut self, pixels: &[u32], width: usize, height: usize) -> Result<(), RenderError> {
        if width == 0 || pixels.len() != width * height {
            return Err(RenderError::EmptyFrame { width, height });
        }
        let rows: Vec<&[u32]> = pixels.chunks(width).collect();
        for pair in rows.chunks(2) {
            for column in 0..width {
                let upper = Rgba::unpack(pair[0][column]);
                write!(self.out, "\x1b[38;2;{};{};{}m", upper.r, upper.g, upper.b)?;
                match pair.get(1) {
                    Some(row) => {
                        let lower = Rgba::unpack(row[column]);
                        write!(self.out, "\x1b[48;2;{};{};{}m", lower.r, lower.g, lower.b)?;
                    }
                    None => write!(self.out, "\x1b[49m")?,
                }
                write!(self.out, "\u{2580}")?;
            }
            writeln!(self.out, "\x1b[0m")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
