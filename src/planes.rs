//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! the pixel grid of a frame, and a rectangle on the complex plane,
//! the viewport.  Each pixel owns a closed-open rectangle of the
//! complex plane, and samples are placed at fixed fractions inside it.
use num::Complex;

use crate::errors::RenderError;
use crate::samples::SampleOffset;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the column (x) and row (y) of a pixel in a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane mapped onto a frame.  The real
/// part runs along x, the imaginary part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real part of the left edge.
    pub x_min: f64,
    /// Real part of the right edge.
    pub x_max: f64,
    /// Imaginary part of the first row.
    pub y_min: f64,
    /// Imaginary part past the last row.
    pub y_max: f64,
}

impl Viewport {
    /// Constructor.  The bounds must be finite and describe a
    /// rectangle with a positive, finite width and height.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Viewport, RenderError> {
        let bounds = [x_min, x_max, y_min, y_max];
        if !bounds.iter().all(|bound| bound.is_finite()) {
            return Err(RenderError::InvalidViewport {
                reason: format!(
                    "bounds must be finite, got x {}..{} and y {}..{}",
                    x_min, x_max, y_min, y_max
                ),
            });
        }
        if !(x_max > x_min) {
            return Err(RenderError::InvalidViewport {
                reason: format!("x_max ({}) must be greater than x_min ({})", x_max, x_min),
            });
        }
        if !(y_max > y_min) {
            return Err(RenderError::InvalidViewport {
                reason: format!("y_max ({}) must be greater than y_min ({})", y_max, y_min),
            });
        }
        if !(x_max - x_min).is_finite() || !(y_max - y_min).is_finite() {
            return Err(RenderError::InvalidViewport {
                reason: "viewport is too large to measure".to_string(),
            });
        }
        Ok(Viewport {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Builds a viewport from its left-lower and right-upper corners.
    pub fn from_corners(
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Viewport, RenderError> {
        Viewport::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// Width of the viewport on the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the viewport on the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps points from one to the other.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The size of the frame in pixels.
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane the frame shows.
    pub complex_plane: Viewport,
    // The width and height of one pixel on the complex plane.
    pixel_size: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the frame and the viewport it
    /// covers.  A frame without pixels cannot be mapped.
    pub fn new(width: usize, height: usize, viewport: &Viewport) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyFrame { width, height });
        }
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: *viewport,
            pixel_size: (
                viewport.width() / (width as f64),
                viewport.height() / (height as f64),
            ),
        })
    }

    /// The width and height of a single pixel on the complex plane.
    pub fn pixel_size(&self) -> (f64, f64) {
        self.pixel_size
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number at the corner of that pixel nearest the
    /// viewport's origin.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.complex_plane.x_min + (pixel.0 as f64) * self.pixel_size.0,
            self.complex_plane.y_min + (pixel.1 as f64) * self.pixel_size.1,
        )
    }

    /// Given a pixel and a sample offset inside it, return the complex
    /// number that sample evaluates.
    pub fn sample_to_point(&self, pixel: &Pixel, offset: &SampleOffset) -> Complex<f64> {
        let corner = self.pixel_to_point(pixel);
        Complex::new(
            corner.re + offset.0 * self.pixel_size.0,
            corner.im + offset.1 * self.pixel_size.1,
        )
    }

    // Inverse of pixel_to_point; checks which rectangle a sample landed in.
    #[cfg(test)]
    fn point_to_pixel(&self, point: &Complex<f64>) -> Pixel {
        let left = (point.re - self.complex_plane.x_min) / self.pixel_size.0;
        let top = (point.im - self.complex_plane.y_min) / self.pixel_size.1;
        Pixel(left as usize, top as usize)
    }
}
