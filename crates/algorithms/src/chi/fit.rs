//! Least-squares fitting of elevation against chi
//!
//! Ordinary least squares over a contiguous index range of a channel
//! profile. The fit itself is elementary; the interesting part is the
//! prefix-sum arena, which answers any sub-range fit in O(1) and keeps the
//! breakpoint search in `partition` quadratic rather than cubic.

use ndarray::Array1;
use riverchi_core::{Error, Result};

/// Result of one least-squares fit over a chi-elevation range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFit {
    /// Fitted slope of elevation against chi (m_chi)
    pub slope: f64,
    /// Fitted intercept (b_chi)
    pub intercept: f64,
    /// Sum of squared vertical residuals
    pub residual: f64,
}

/// Prefix sums of chi, elevation and their products over one profile.
///
/// Arrays have length n+1 with a leading zero, so the sum over `[i, j)`
/// is `s[j] - s[i]`.
#[derive(Debug, Clone)]
pub struct ProfileSums {
    sx: Array1<f64>,
    sy: Array1<f64>,
    sxx: Array1<f64>,
    sxy: Array1<f64>,
    syy: Array1<f64>,
}

impl ProfileSums {
    /// Precompute the arena for a profile given as parallel slices.
    pub fn new(chi: &[f64], elevation: &[f64]) -> Self {
        debug_assert_eq!(chi.len(), elevation.len());
        let n = chi.len();

        let mut sx = Array1::zeros(n + 1);
        let mut sy = Array1::zeros(n + 1);
        let mut sxx = Array1::zeros(n + 1);
        let mut sxy = Array1::zeros(n + 1);
        let mut syy = Array1::zeros(n + 1);

        for i in 0..n {
            let x = chi[i];
            let y = elevation[i];
            sx[i + 1] = sx[i] + x;
            sy[i + 1] = sy[i] + y;
            sxx[i + 1] = sxx[i] + x * x;
            sxy[i + 1] = sxy[i] + x * y;
            syy[i + 1] = syy[i] + y * y;
        }

        Self { sx, sy, sxx, sxy, syy }
    }

    /// Number of samples covered by the arena
    pub fn len(&self) -> usize {
        self.sx.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fit the range `[start, end)` in O(1).
    pub fn fit(&self, start: usize, end: usize) -> Result<SegmentFit> {
        if end > self.len() || end.saturating_sub(start) < 2 {
            return Err(Error::InsufficientProfileLength {
                len: end.saturating_sub(start),
                min: 2,
            });
        }

        solve(
            start,
            end,
            self.sx[end] - self.sx[start],
            self.sy[end] - self.sy[start],
            self.sxx[end] - self.sxx[start],
            self.sxy[end] - self.sxy[start],
            self.syy[end] - self.syy[start],
        )
    }
}

/// Fit a single range directly, in one pass over the range.
///
/// Equivalent to building a [`ProfileSums`] and calling
/// [`ProfileSums::fit`]; use this form for one-off fits.
pub fn fit_segment(chi: &[f64], elevation: &[f64], start: usize, end: usize) -> Result<SegmentFit> {
    debug_assert_eq!(chi.len(), elevation.len());
    if end > chi.len() || end.saturating_sub(start) < 2 {
        return Err(Error::InsufficientProfileLength {
            len: end.saturating_sub(start),
            min: 2,
        });
    }

    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for i in start..end {
        let x = chi[i];
        let y = elevation[i];
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
        syy += y * y;
    }

    solve(start, end, sx, sy, sxx, sxy, syy)
}

fn solve(
    start: usize,
    end: usize,
    sx: f64,
    sy: f64,
    sxx: f64,
    sxy: f64,
    syy: f64,
) -> Result<SegmentFit> {
    let k = (end - start) as f64;

    let denom = k * sxx - sx * sx;
    if denom.abs() <= f64::EPSILON * (k * sxx).abs().max(1.0) {
        // Chi has no variation over the range. Strictly monotone chi makes
        // this unreachable from a valid profile.
        return Err(Error::DegenerateRange { start, end });
    }

    let slope = (k * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / k;

    // Rounding can push the closed-form residual a hair below zero on
    // exact fits.
    let residual = (syy - intercept * sy - slope * sxy).max(0.0);

    Ok(SegmentFit { slope, intercept, residual })
}
