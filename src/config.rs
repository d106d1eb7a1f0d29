// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render settings, and the validated objects built from them.

use std::path::PathBuf;

use num::Complex;

use crate::colour::ColourRamp;
use crate::errors::RenderError;
use crate::escape::JuliaEscape;
use crate::planes::Viewport;
use crate::render::{FrameContext, LiveSession, Renderer};
use crate::samples::SampleGrid;

/// Everything a render needs to know that isn't a pixel.  Nothing is
/// checked until one of the builders below is called.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Left-lower corner of the viewport.
    pub leftlower: Complex<f64>,
    /// Right-upper corner of the viewport.
    pub rightupper: Complex<f64>,
    /// The Julia parameter.
    pub parameter: Complex<f64>,
    /// Size of the live display, in pixels.
    pub live_size: (usize, usize),
    /// Samples per axis for live frames.
    pub live_grid: usize,
    /// Size of exported images, in pixels.
    pub export_size: (usize, usize),
    /// Samples per axis for exported images.
    pub export_grid: usize,
    /// Where exported images are written.
    pub output: PathBuf,
    /// Iteration limit of the escape evaluator.
    pub max_iterations: usize,
    /// Worker threads per render phase.
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            leftlower: Complex::new(-1.6, -0.9),
            rightupper: Complex::new(1.6, 0.9),
            parameter: Complex::new(-0.8, 0.156),
            live_size: (80, 48),
            live_grid: 2,
            export_size: (1920, 1080),
            export_grid: 4,
            output: PathBuf::from("julia.png"),
            max_iterations: 500,
            threads: num_cpus::get(),
        }
    }
}

impl RenderConfig {
    /// The viewport and parameter for the next frame.
    pub fn context(&self) -> Result<FrameContext, RenderError> {
        let viewport = Viewport::from_corners(self.leftlower, self.rightupper)?;
        Ok(FrameContext::new(viewport, self.parameter))
    }

    /// The buffers and grid of a live display.
    pub fn live_session(&self) -> Result<LiveSession, RenderError> {
        LiveSession::new(self.live_size.0, self.live_size.1, self.live_grid)
    }

    /// The sample grid for exported images.
    pub fn export_grid(&self) -> Result<SampleGrid, RenderError> {
        SampleGrid::new(self.export_grid)
    }

    /// A renderer with the stock evaluator and palette.
    pub fn renderer(&self) -> Renderer<JuliaEscape, ColourRamp> {
        Renderer::new(
            JuliaEscape::new(self.max_iterations),
            ColourRamp::default(),
            self.threads,
        )
    }
}
