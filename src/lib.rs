#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set renderer
//!
//! A Julia set is drawn by iterating `z * z + c` from every point `z`
//! of a region of the complex plane, for one fixed parameter `c`, and
//! colouring each point by how quickly it runs off to infinity.  This
//! crate renders that picture anti-aliased: every pixel is sampled on
//! a small regular grid and the samples are averaged into a single
//! "normalized escape step."  The steps of the whole frame are then
//! coloured against the smallest of them, so the palette always spans
//! the range the frame actually shows.
//!
//! The same pipeline serves a live display (small, coarse grid,
//! buffers reused frame after frame) and still exports (any size, a
//! finer grid, buffers of its own).  See `render` for the phases and
//! `workers` for how they are spread over threads.

pub mod colour;
pub mod config;
pub mod errors;
pub mod escape;
pub mod frame;
pub mod planes;
pub mod render;
pub mod samples;
pub mod sinks;
pub mod workers;

pub use crate::colour::{ColourRamp, Colorizer, Rgba};
pub use crate::config::RenderConfig;
pub use crate::errors::RenderError;
pub use crate::escape::{EscapeEvaluator, EscapeResult, JuliaEscape};
pub use crate::frame::{frame_minimum, FrameBuffers};
pub use crate::planes::{Pixel, PlaneMapper, Viewport};
pub use crate::render::{FrameContext, LiveSession, Renderer};
pub use crate::samples::{SampleGrid, SampleOffset};
pub use crate::sinks::{ExportSink, ImageExporter, PresentationSink, TerminalPresenter};
