//! Bell-shaped staffing curves
//!
//! A curve samples `exp(-x²)` at evenly spaced points over `[-span, span]`,
//! one point per week, and scales the samples so the largest equals the
//! requested peak.
//!
//! ```text
//! weeks = 4, span = 2
//! x      = [-2.000, -0.667, 0.667, 2.000]
//! exp    = [ 0.018,  0.641, 0.641, 0.018]
//! peak 50 -> [1.43, 50.0, 50.0, 1.43]
//! ```
//!
//! A single week has no spacing to speak of; its one sample sits at the
//! centre (x = 0), so the curve is just `[peak]`.

use manpower_core::ManpowerCurve;

/// Default half-width of the sampling interval
pub const DEFAULT_SPAN: f64 = 2.0;

/// Gaussian bump sampler
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BellCurve {
    /// Samples cover `[-span, span]`
    pub span: f64,
}

impl Default for BellCurve {
    fn default() -> Self {
        Self { span: DEFAULT_SPAN }
    }
}

impl BellCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the half-width of the sampling interval
    pub fn span(mut self, span: f64) -> Self {
        self.span = span;
        self
    }

    /// Evenly spaced sample points, first `-span`, last `span`
    pub fn sample_points(&self, weeks: usize) -> Vec<f64> {
        match weeks {
            0 => Vec::new(),
            1 => vec![0.0],
            n => {
                let step = (2.0 * self.span) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.span
                        } else {
                            -self.span + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }

    /// Generate a curve of `weeks` values whose maximum equals `peak`.
    ///
    /// Callers guarantee `weeks >= 1` and `peak >= 0`; zero weeks yields an
    /// empty curve.
    pub fn generate(&self, weeks: usize, peak: f64) -> ManpowerCurve {
        let raw: Vec<f64> = self
            .sample_points(weeks)
            .into_iter()
            .map(|x| (-x * x).exp())
            .collect();

        let max = raw.iter().copied().fold(0.0, f64::max);
        if max <= 0.0 {
            return ManpowerCurve::new(vec![0.0; raw.len()]);
        }

        ManpowerCurve::new(raw.into_iter().map(|y| y / max * peak).collect())
    }
}

/// Generate a curve with the default span
pub fn generate_curve(weeks: usize, peak: f64) -> ManpowerCurve {
    BellCurve::default().generate(weeks, peak)
}
