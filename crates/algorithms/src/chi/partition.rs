//! Optimal piecewise-linear partition of a channel profile
//!
//! Chooses the breakpoints that minimize a penalized-misfit score: the sum
//! of per-segment residuals normalized by sigma², plus a complexity charge
//! per segment. Dynamic programming over candidate breakpoints; with the
//! prefix-sum arena from `fit`, every candidate segment is an O(1)
//! regression and the whole search is O(N²).
//!
//! Reference:
//! Perron, J.T. & Royden, L. (2013). An integral approach to bedrock
//! river profile analysis. ESPL 38.
//! Mudd, S.M. et al. (2014). A statistical framework to quantify spatial
//! variation in channel gradients using the integral method. JGR 119.

use riverchi_core::{Algorithm, ChannelProfile, Error, Result};

use super::fit::{ProfileSums, SegmentFit};

/// Parameters for the partition search
#[derive(Debug, Clone)]
pub struct PartitionParams {
    /// Minimum number of samples per segment
    pub minimum_segment_length: usize,
    /// Desired samples per segment; tunes the complexity penalty
    pub target_nodes: usize,
    /// Assumed elevation noise scale (m), normalizing the residuals
    pub sigma: f64,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            minimum_segment_length: 10,
            target_nodes: 80,
            sigma: 20.0,
        }
    }
}

/// One fitted segment of a partition: the half-open sample range
/// `[start, end)` and its regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedSegment {
    pub start: usize,
    pub end: usize,
    /// Fitted slope (m_chi)
    pub slope: f64,
    /// Fitted intercept (b_chi)
    pub intercept: f64,
    /// Sum of squared residuals over the range
    pub residual: f64,
}

impl FittedSegment {
    fn from_fit(start: usize, end: usize, fit: SegmentFit) -> Self {
        Self {
            start,
            end,
            slope: fit.slope,
            intercept: fit.intercept,
            residual: fit.residual,
        }
    }

    /// Number of samples in the segment
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Whether the segment covers a sample index
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// The optimal set of segments covering a whole profile, gapless and
/// non-overlapping.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Segments in profile order
    pub segments: Vec<FittedSegment>,
    /// Penalized-misfit score of the winning breakpoint set
    pub score: f64,
    /// True when the profile was too short for a real search and the
    /// whole-profile fallback was used
    pub degenerate: bool,
}

impl Partition {
    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    /// The segment covering a sample index
    pub fn segment_containing(&self, index: usize) -> Option<&FittedSegment> {
        self.segments.iter().find(|s| s.contains(index))
    }
}

/// Complexity charge per segment.
///
/// Each extra segment buys three parameters (slope, intercept,
/// breakpoint), charged two units each as in AIC. The target density
/// scales the charge logarithmically, so a sparser target buys longer
/// segments.
fn complexity_penalty(target_nodes: usize) -> f64 {
    6.0 * (target_nodes.max(2) as f64).ln()
}

/// Find the optimal partition of a profile given as parallel slices.
///
/// Profiles shorter than the minimum segment length degrade to a single
/// whole-profile segment flagged `degenerate` instead of failing; an empty
/// profile is an error.
pub fn partition(chi: &[f64], elevation: &[f64], params: &PartitionParams) -> Result<Partition> {
    debug_assert_eq!(chi.len(), elevation.len());
    let n = chi.len();
    let min_len = params.minimum_segment_length.max(2);

    if n == 0 {
        return Err(Error::InsufficientProfileLength { len: 0, min: min_len });
    }
    if n == 1 {
        // Nothing to regress; report a flat pseudo-segment.
        return Ok(Partition {
            segments: vec![FittedSegment {
                start: 0,
                end: 1,
                slope: 0.0,
                intercept: elevation[0],
                residual: 0.0,
            }],
            score: 0.0,
            degenerate: true,
        });
    }

    let sums = ProfileSums::new(chi, elevation);
    let sigma2 = params.sigma * params.sigma;
    let lambda = complexity_penalty(params.target_nodes);

    if n < min_len {
        let fit = sums.fit(0, n)?;
        let score = fit.residual / sigma2 + lambda;
        return Ok(Partition {
            segments: vec![FittedSegment::from_fit(0, n, fit)],
            score,
            degenerate: true,
        });
    }

    // best[j]: optimal score over the prefix [0, j); prefixes that cannot
    // end on a segment boundary stay at infinity. Ties are broken toward
    // fewer segments, then toward the smaller sum of squared segment
    // lengths (the most even split for a given count), so results never
    // depend on visit order.
    const NO_PARENT: usize = usize::MAX;
    let mut best = vec![f64::INFINITY; n + 1];
    let mut n_segments = vec![0usize; n + 1];
    let mut sq_lengths = vec![0.0f64; n + 1];
    let mut parent = vec![NO_PARENT; n + 1];
    best[0] = 0.0;

    for j in min_len..=n {
        for i in 0..=(j - min_len) {
            if best[i].is_infinite() {
                continue;
            }

            let fit = sums.fit(i, j)?;
            let score = best[i] + fit.residual / sigma2 + lambda;
            let segments = n_segments[i] + 1;
            let len = (j - i) as f64;
            let sq = sq_lengths[i] + len * len;

            if prefers(score, segments, sq, best[j], n_segments[j], sq_lengths[j]) {
                best[j] = score;
                n_segments[j] = segments;
                sq_lengths[j] = sq;
                parent[j] = i;
            }
        }
    }

    // Backtrack the winning breakpoint chain.
    let mut cuts = vec![n];
    let mut j = n;
    while j > 0 {
        j = parent[j];
        cuts.push(j);
    }
    cuts.reverse();

    let mut segments = Vec::with_capacity(cuts.len() - 1);
    for w in cuts.windows(2) {
        let fit = sums.fit(w[0], w[1])?;
        segments.push(FittedSegment::from_fit(w[0], w[1], fit));
    }

    Ok(Partition {
        segments,
        score: best[n],
        degenerate: false,
    })
}

/// Deterministic comparison of two DP candidates: score first (with a
/// relative tolerance so floating-point ties are real ties), then segment
/// count, then evenness.
fn prefers(
    score: f64,
    segments: usize,
    sq: f64,
    best_score: f64,
    best_segments: usize,
    best_sq: f64,
) -> bool {
    if best_score.is_infinite() {
        return score.is_finite();
    }

    let tol = 1e-9 * best_score.abs().max(1.0);
    if score < best_score - tol {
        return true;
    }
    if score > best_score + tol {
        return false;
    }
    if segments != best_segments {
        return segments < best_segments;
    }
    sq + 1e-9 < best_sq
}

/// [`partition`] over a [`ChannelProfile`].
pub fn partition_profile(profile: &ChannelProfile, params: &PartitionParams) -> Result<Partition> {
    partition(&profile.chi_values(), &profile.elevation_values(), params)
}

/// Profile partition algorithm
#[derive(Debug, Clone, Default)]
pub struct ProfilePartitioner;

impl Algorithm for ProfilePartitioner {
    type Input = ChannelProfile;
    type Output = Partition;
    type Params = PartitionParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Profile Partition"
    }

    fn description(&self) -> &'static str {
        "Split a chi-elevation profile into its most likely piecewise-linear segments"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        partition_profile(&input, &params)
    }
}
