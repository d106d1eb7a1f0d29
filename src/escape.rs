// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time evaluation.
//!
//! A Julia set is drawn by taking each point `z` of the plane and
//! repeatedly replacing it with `z * z + c` for a fixed parameter `c`.
//! Points that stay bounded belong to the set; the others escape, and
//! how quickly they escape is the number we turn into a colour.  The
//! renderer only needs two things from an evaluator: the result for a
//! single point, and a way to fold the results for all the samples of
//! a pixel into one "normalized escape step."

use num::Complex;

/// The escape-time function consumed by the renderer.  Implementations
/// must be total: every finite point yields a result.
pub trait EscapeEvaluator: Sync {
    /// Whatever the evaluator records about one sample.
    type Escape;

    /// Iterates `point` under the map parameterized by `parameter`.
    fn evaluate(&self, point: Complex<f64>, parameter: Complex<f64>) -> Self::Escape;

    /// Reduces the results for every sample of one pixel to a single
    /// scalar.  The slice holds exactly one result per sample of the
    /// active grid and is never empty.
    fn normalize(&self, results: &[Self::Escape]) -> f64;
}

impl<'a, E: EscapeEvaluator + ?Sized> EscapeEvaluator for &'a E {
    type Escape = E::Escape;

    fn evaluate(&self, point: Complex<f64>, parameter: Complex<f64>) -> E::Escape {
        (**self).evaluate(point, parameter)
    }

    fn normalize(&self, results: &[E::Escape]) -> f64 {
        (**self).normalize(results)
    }
}

/// What one iterated point did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeResult {
    /// Iterations performed before the orbit left the bailout radius,
    /// or the iteration limit if it never did.
    pub iterations: usize,
    /// `|z|^2` at the last iteration.
    pub norm_sqr: f64,
}

/// Orbits are followed until `|z|` passes this radius.  A radius well
/// above 2 keeps the smooth iteration count free of banding.
pub const BAILOUT: f64 = 256.0;

/// The classic quadratic Julia iteration with a smooth iteration count.
#[derive(Copy, Clone, Debug)]
pub struct JuliaEscape {
    max_iterations: usize,
}

impl JuliaEscape {
    /// Points still bounded after `max_iterations` are treated as
    /// inside the set.  A limit of zero is raised to one.
    pub fn new(max_iterations: usize) -> JuliaEscape {
        JuliaEscape {
            max_iterations: max_iterations.max(1),
        }
    }

    /// The iteration limit.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// The fractional escape step of a single sample, in `[0, 1]`.
    /// Captured points are 1.0; points that escape at once are near 0.
    pub fn escape_step(&self, result: &EscapeResult) -> f64 {
        if result.iterations >= self.max_iterations {
            return 1.0;
        }
        let log_modulus = result.norm_sqr.ln() / 2.0;
        let nu = (log_modulus.ln() / std::f64::consts::LN_2).max(0.0);
        let smooth = result.iterations as f64 + 1.0 - nu;
        (smooth / self.max_iterations as f64).max(0.0).min(1.0)
    }
}

impl EscapeEvaluator for JuliaEscape {
    type Escape = EscapeResult;

    fn evaluate(&self, point: Complex<f64>, parameter: Complex<f64>) -> EscapeResult {
        let limit = BAILOUT * BAILOUT;
        let mut z = point;
        for i in 0..self.max_iterations {
            let norm_sqr = z.norm_sqr();
            if norm_sqr >= limit {
                return EscapeResult {
                    iterations: i,
                    norm_sqr,
                };
            }
            z = z * z + parameter;
        }
        EscapeResult {
            iterations: self.max_iterations,
            norm_sqr: z.norm_sqr(),
        }
    }

    fn normalize(&self, results: &[EscapeResult]) -> f64 {
        if results.is_empty() {
            return 1.0;
        }
        let total: f64 = results.iter().map(|result| self.escape_step(result)).sum();
        total / results.len() as f64
    }
}
