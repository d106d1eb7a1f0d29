// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong while rendering a frame.

use failure::Fail;
use std::io;

/// The failures a render, a presentation or an export can report.
/// None of them are retried here; that is the caller's business.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A sample grid needs at least one sample per axis.
    #[fail(display = "sample grid width must be at least 1")]
    EmptySampleGrid,

    /// A frame with no pixels has no minimum to normalize against.
    #[fail(display = "frame of {}x{} pixels has no area", width, height)]
    EmptyFrame {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The viewport bounds are empty, inverted, or not numbers.
    #[fail(display = "invalid viewport: {}", reason)]
    InvalidViewport {
        /// What was wrong with the bounds.
        reason: String,
    },

    /// The scalar or colour buffer for a frame could not be reserved.
    #[fail(display = "could not allocate buffers for a {}x{} frame", width, height)]
    Allocation {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// One of the render workers panicked; the frame is discarded.
    #[fail(display = "a render worker panicked")]
    WorkerPanic,

    /// The presentation sink could not show the frame.
    #[fail(display = "could not present frame: {}", _0)]
    Presentation(#[cause] io::Error),

    /// The export sink could not write the frame.
    #[fail(display = "could not export frame to {}: {}", path, reason)]
    Export {
        /// Destination the sink was asked to write.
        path: String,
        /// Why the write failed.
        reason: String,
    },
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> RenderError {
        RenderError::Presentation(err)
    }
}
