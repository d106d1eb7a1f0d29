// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two buffers a frame is rendered through, and the reduction
//! that joins the two halves of a render.

use crate::errors::RenderError;

/// One normalized escape step per pixel, and one packed RGBA word per
/// pixel, both row-major with no padding between rows.
#[derive(Debug)]
pub struct FrameBuffers {
    width: usize,
    height: usize,
    pub(crate) scalars: Vec<f64>,
    pub(crate) pixels: Vec<u32>,
}

impl FrameBuffers {
    /// Reserves both buffers for a `width x height` frame.  An empty
    /// frame is refused, and so is one whose buffers cannot be
    /// allocated; in either case nothing is left behind.
    pub fn new(width: usize, height: usize) -> Result<FrameBuffers, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyFrame { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(RenderError::Allocation { width, height })?;

        let mut scalars: Vec<f64> = Vec::new();
        let mut pixels: Vec<u32> = Vec::new();
        scalars
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Allocation { width, height })?;
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Allocation { width, height })?;
        scalars.resize(len, 0.0);
        pixels.resize(len, 0);

        Ok(FrameBuffers {
            width,
            height,
            scalars,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The normalized escape steps of the last frame rendered.
    pub fn scalars(&self) -> &[f64] {
        &self.scalars
    }

    /// The packed RGBA pixels of the last frame rendered.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

/// The smallest value in a frame.  Scans the whole buffer once, so it
/// must only run after every pixel has been written.  NaN values are
/// skipped unless there is nothing else.  Returns `None` only for an
/// empty buffer.
pub fn frame_minimum(values: &[f64]) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    Some(rest.iter().cloned().fold(*first, f64::min))
}
