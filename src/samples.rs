// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sub-pixel sample positions for anti-aliasing.
//!
//! Every pixel is sampled at the centres of a regular `g x g` lattice
//! laid over it.  The lattice is the same for every pixel and every
//! frame, so a render is fully deterministic: no jitter, no random
//! numbers, and the same picture every time for the same inputs.

use itertools::iproduct;

use crate::errors::RenderError;

/// A position inside a pixel, as fractions of the pixel's width and
/// height.  Both coordinates are in `[0, 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampleOffset(pub f64, pub f64);

/// The set of sample offsets for one grid density, in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    width: usize,
    offsets: Vec<SampleOffset>,
}

impl SampleGrid {
    /// Builds the `width * width` lattice.  A width of zero would mean
    /// no samples at all and a division by zero when the samples are
    /// averaged, so it is refused.
    pub fn new(width: usize) -> Result<SampleGrid, RenderError> {
        if width == 0 {
            return Err(RenderError::EmptySampleGrid);
        }
        let step = width as f64;
        let offsets = iproduct!(0..width, 0..width)
            .map(|(row, col)| SampleOffset((col as f64 + 0.5) / step, (row as f64 + 0.5) / step))
            .collect();
        Ok(SampleGrid { width, offsets })
    }

    /// Samples per axis.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Samples per pixel.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Never true for a grid built by `new`.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The offsets, row by row.
    pub fn offsets(&self) -> &[SampleOffset] {
        &self.offsets
    }
}
