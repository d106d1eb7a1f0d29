// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame driver.
//!
//! Every frame, live or exported, goes through the same three phases:
//!
//! 1. every pixel is sampled and its samples reduced to a normalized
//!    escape step (in parallel, one row at a time);
//! 2. once *all* of those are done, the smallest step in the frame is
//!    found;
//! 3. every pixel is coloured against that minimum (in parallel again).
//!
//! Phase 3 cannot start early: a pixel coloured against a partial
//! minimum would be wrong.  The join at the end of phase 1 is the
//! barrier.  Live and export renders differ only in who owns the
//! buffers and where the finished pixels go.

use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use num::Complex;

use crate::colour::Colorizer;
use crate::errors::RenderError;
use crate::escape::EscapeEvaluator;
use crate::frame::{frame_minimum, FrameBuffers};
use crate::planes::{PlaneMapper, Pixel, Viewport};
use crate::samples::SampleGrid;
use crate::sinks::{ExportSink, PresentationSink};
use crate::workers::for_each_row;

/// Everything a frame reads but never changes: the region of the plane
/// and the Julia parameter.  Changing either between frames means
/// building a new context.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameContext {
    /// The region of the complex plane to draw.
    pub viewport: Viewport,
    /// The constant `c` in `z * z + c`.
    pub parameter: Complex<f64>,
}

impl FrameContext {
    /// Constructor.
    pub fn new(viewport: Viewport, parameter: Complex<f64>) -> FrameContext {
        FrameContext {
            viewport,
            parameter,
        }
    }
}

/// The buffers and the sample grid of a display session.  They live as
/// long as the display does and are reused by every live frame.
#[derive(Debug)]
pub struct LiveSession {
    buffers: FrameBuffers,
    grid: SampleGrid,
}

impl LiveSession {
    /// Allocates the buffers for a `width x height` display, sampled
    /// with a `grid_width x grid_width` grid per pixel.
    pub fn new(width: usize, height: usize, grid_width: usize) -> Result<LiveSession, RenderError> {
        Ok(LiveSession {
            grid: SampleGrid::new(grid_width)?,
            buffers: FrameBuffers::new(width, height)?,
        })
    }

    /// The buffers of the last frame rendered.
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// The interactive sample grid.
    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }
}

/// Renders frames with a given evaluator and colorizer on a fixed
/// number of worker threads.
#[derive(Debug)]
pub struct Renderer<E, C> {
    evaluator: E,
    colorizer: C,
    threads: usize,
}

impl<E: EscapeEvaluator, C: Colorizer> Renderer<E, C> {
    /// Constructor.  A thread count of zero is treated as one.
    pub fn new(evaluator: E, colorizer: C, threads: usize) -> Renderer<E, C> {
        Renderer {
            evaluator,
            colorizer,
            threads: threads.max(1),
        }
    }

    /// The number of workers each phase runs on.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Runs the three phases into `frame` and returns the frame
    /// minimum.  On success every scalar and every pixel of `frame`
    /// has been overwritten.
    pub fn render(
        &self,
        context: &FrameContext,
        grid: &SampleGrid,
        frame: &mut FrameBuffers,
    ) -> Result<f64, RenderError> {
        let (width, height) = (frame.width(), frame.height());
        let plane = PlaneMapper::new(width, height, &context.viewport)?;
        let parameter = context.parameter;
        let evaluator = &self.evaluator;
        let started = Instant::now();

        for_each_row(
            &mut frame.scalars[..],
            width,
            self.threads,
            || Vec::<E::Escape>::with_capacity(grid.len()),
            |results, row, steps| {
                for (column, step) in steps.iter_mut().enumerate() {
                    let pixel = Pixel(column, row);
                    results.clear();
                    results.extend(grid.offsets().iter().map(|offset| {
                        evaluator.evaluate(plane.sample_to_point(&pixel, offset), parameter)
                    }));
                    *step = evaluator.normalize(&results[..]);
                }
            },
        )?;
        debug!(
            "sampled {}x{} pixels at {} samples each in {:?}",
            width,
            height,
            grid.len(),
            started.elapsed()
        );

        let frame_min =
            frame_minimum(&frame.scalars).ok_or(RenderError::EmptyFrame { width, height })?;
        debug!("frame minimum {}", frame_min);

        let started = Instant::now();
        let scalars = &frame.scalars;
        let colorizer = &self.colorizer;
        for_each_row(
            &mut frame.pixels[..],
            width,
            self.threads,
            || (),
            |_, row, pixels| {
                let steps = &scalars[row * width..(row + 1) * width];
                for (pixel, &step) in pixels.iter_mut().zip(steps) {
                    *pixel = colorizer.colorize(step, frame_min).pack();
                }
            },
        )?;
        debug!("coloured {}x{} pixels in {:?}", width, height, started.elapsed());

        Ok(frame_min)
    }

    /// Renders one live frame into the session's buffers and hands it
    /// to `sink`, whether or not anything changed since the last one.
    /// A sink failure is returned, but the buffers stay valid and the
    /// next frame can be rendered as usual.
    pub fn render_live<P: PresentationSink>(
        &self,
        context: &FrameContext,
        session: &mut LiveSession,
        sink: &mut P,
    ) -> Result<(), RenderError> {
        let LiveSession { buffers, grid } = session;
        self.render(context, grid, buffers)?;
        sink.present(buffers.pixels(), buffers.width(), buffers.height())
    }

    /// Renders a still at any resolution into buffers of its own and
    /// hands it to `sink` for writing to `path`.  The buffers are
    /// released on every path out of here, including failures.
    pub fn render_export<X: ExportSink>(
        &self,
        context: &FrameContext,
        grid: &SampleGrid,
        width: usize,
        height: usize,
        path: &Path,
        sink: &mut X,
    ) -> Result<(), RenderError> {
        let mut frame = FrameBuffers::new(width, height)?;
        let started = Instant::now();
        self.render(context, grid, &mut frame)?;
        sink.export(frame.pixels(), width, height, path)?;
        info!(
            "saved {}x{} fractal to '{}' in {:?}",
            width,
            height,
            path.display(),
            started.elapsed()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::{ColourRamp, Rgba};
    use crate::escape::JuliaEscape;
    use std::io;
    use std::path::PathBuf;

    /// Records every frame it is shown.
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Vec<u32>, usize, usize)>,
        fail: bool,
    }

    impl PresentationSink for Recorder {
        fn present(&mut self, pixels: &[u32], width: usize, height: usize) -> Result<(), RenderError> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "display gone").into());
            }
            self.frames.push((pixels.to_vec(), width, height));
            Ok(())
        }
    }

    impl ExportSink for Recorder {
        fn export(
            &mut self,
            pixels: &[u32],
            width: usize,
            height: usize,
            path: &Path,
        ) -> Result<(), RenderError> {
            if self.fail {
                return Err(RenderError::Export {
                    path: path.display().to_string(),
                    reason: "disk full".to_string(),
                });
            }
            self.frames.push((pixels.to_vec(), width, height));
            Ok(())
        }
    }

    /// Scores a sample by its real part, so every frame is a ramp.
    struct RealPart;

    impl EscapeEvaluator for RealPart {
        type Escape = f64;

        fn evaluate(&self, point: Complex<f64>, _parameter: Complex<f64>) -> f64 {
            point.re
        }

        fn normalize(&self, results: &[f64]) -> f64 {
            results.iter().sum::<f64>() / results.len() as f64
        }
    }

    /// Writes the distance from the frame minimum into the red channel.
    struct Offset;

    impl Colorizer for Offset {
        fn colorize(&self, value: f64, frame_min: f64) -> Rgba {
            Rgba::opaque(((value - frame_min) * 10.0).round() as u8, 0, 0)
        }
    }

    fn context() -> FrameContext {
        FrameContext::new(
            Viewport::new(-2.0, 2.0, -2.0, 2.0).unwrap(),
            Complex::new(0.0, 0.0),
        )
    }

    #[test]
    fn samples_are_reduced_per_pixel() {
        let renderer = Renderer::new(RealPart, Offset, 3);
        let grid = SampleGrid::new(3).unwrap();
        let mut frame = FrameBuffers::new(4, 2).unwrap();
        let frame_min = renderer.render(&context(), &grid, &mut frame).unwrap();
        // Averaging a symmetric grid gives the pixel centre.
        let expected = [-1.5, -0.5, 0.5, 1.5, -1.5, -0.5, 0.5, 1.5];
        for (value, want) in frame.scalars().iter().zip(expected.iter()) {
            assert!((value - want).abs() < 1e-12, "{} != {}", value, want);
        }
        assert!((frame_min + 1.5).abs() < 1e-12);
        let reds: Vec<u8> = frame.pixels().iter().map(|&p| Rgba::unpack(p).r).collect();
        assert_eq!(reds, vec![0, 10, 20, 30, 0, 10, 20, 30]);
    }

    #[test]
    fn live_frames_are_always_presented() {
        let renderer = Renderer::new(JuliaEscape::new(50), ColourRamp::default(), 2);
        let mut session = LiveSession::new(8, 6, 2).unwrap();
        let mut sink = Recorder::default();
        renderer.render_live(&context(), &mut session, &mut sink).unwrap();
        renderer.render_live(&context(), &mut session, &mut sink).unwrap();
        assert_eq!(sink.frames.len(), 2);
        assert_eq!(sink.frames[0], sink.frames[1]);
        assert_eq!(sink.frames[0].1, 8);
        assert_eq!(sink.frames[0].2, 6);
        assert_eq!(&sink.frames[0].0[..], session.buffers().pixels());
    }

    #[test]
    fn a_failed_presentation_does_not_stop_the_next_frame() {
        let renderer = Renderer::new(JuliaEscape::new(50), ColourRamp::default(), 2);
        let mut session = LiveSession::new(8, 6, 1).unwrap();
        let mut sink = Recorder {
            fail: true,
            ..Recorder::default()
        };
        match renderer.render_live(&context(), &mut session, &mut sink) {
            Err(RenderError::Presentation(_)) => {}
            other => panic!("expected Presentation, got {:?}", other),
        }
        let failed = session.buffers().pixels().to_vec();
        sink.fail = false;
        renderer.render_live(&context(), &mut session, &mut sink).unwrap();
        assert_eq!(sink.frames[0].0, failed);
    }

    #[test]
    fn exports_use_their_own_resolution() {
        let renderer = Renderer::new(JuliaEscape::new(50), ColourRamp::default(), 4);
        let grid = SampleGrid::new(3).unwrap();
        let mut sink = Recorder::default();
        let path = PathBuf::from("unused.png");
        renderer
            .render_export(&context(), &grid, 17, 5, &path, &mut sink)
            .unwrap();
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(sink.frames[0].0.len(), 17 * 5);
        assert_eq!((sink.frames[0].1, sink.frames[0].2), (17, 5));
    }

    #[test]
    fn export_failures_are_reported() {
        let renderer = Renderer::new(JuliaEscape::new(50), ColourRamp::default(), 4);
        let grid = SampleGrid::new(1).unwrap();
        let mut sink = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let path = PathBuf::from("nowhere.png");
        match renderer.render_export(&context(), &grid, 4, 4, &path, &mut sink) {
            Err(RenderError::Export { ref path, .. }) if path == "nowhere.png" => {}
            other => panic!("expected Export, got {:?}", other),
        }
    }

    #[test]
    fn empty_exports_never_reach_the_sink() {
        let renderer = Renderer::new(JuliaEscape::new(50), ColourRamp::default(), 4);
        let grid = SampleGrid::new(1).unwrap();
        let mut sink = Recorder::default();
        let path = PathBuf::from("empty.png");
        match renderer.render_export(&context(), &grid, 0, 4, &path, &mut sink) {
            Err(RenderError::EmptyFrame { .. }) => {}
            other => panic!("expected EmptyFrame, got {:?}", other),
        }
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn unallocatable_exports_never_reach_the_sink() {
        let renderer = Renderer::new(JuliaEscape::new(50), ColourRamp::default(), 4);
        let grid = SampleGrid::new(1).unwrap();
        let mut sink = Recorder::default();
        let path = PathBuf::from("huge.png");
        let result =
            renderer.render_export(&context(), &grid, usize::max_value(), 2, &path, &mut sink);
        match result {
            Err(RenderError::Allocation { height: 2, .. }) => {}
            other => panic!("expected Allocation, got {:?}", other),
        }
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn a_single_pixel_frame_is_its_own_minimum() {
        let renderer = Renderer::new(RealPart, Offset, 4);
        let grid = SampleGrid::new(2).unwrap();
        let mut frame = FrameBuffers::new(1, 1).unwrap();
        let frame_min = renderer.render(&context(), &grid, &mut frame).unwrap();
        // The whole viewport is one pixel centred on the origin.
        assert_eq!(frame.scalars(), &[0.0]);
        assert_eq!(frame_min, 0.0);
        assert_eq!(frame.pixels(), &[Rgba::opaque(0, 0, 0).pack()]);
    }

    #[test]
    fn thread_count_does_not_change_the_picture() {
        let grid = SampleGrid::new(2).unwrap();
        let mut single = FrameBuffers::new(31, 17).unwrap();
        let mut many = FrameBuffers::new(31, 17).unwrap();
        let ctx = FrameContext::new(
            Viewport::new(-1.6, 1.6, -0.9, 0.9).unwrap(),
            Complex::new(-0.8, 0.156),
        );
        Renderer::new(JuliaEscape::new(100), ColourRamp::default(), 1)
            .render(&ctx, &grid, &mut single)
            .unwrap();
        Renderer::new(JuliaEscape::new(100), ColourRamp::default(), 8)
            .render(&ctx, &grid, &mut many)
            .unwrap();
        assert_eq!(single.scalars(), many.scalars());
        assert_eq!(single.pixels(), many.pixels());
    }
}
