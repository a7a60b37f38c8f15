//! Analysis configuration
//!
//! One explicit, validated struct instead of the loosely-typed key/value
//! parameter maps common in older chi-analysis tools. An external
//! parameter layer can deserialize it directly (serde).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Policy for nodes visited by more than one channel (trunk nodes).
///
/// Channels that drain through a common trunk all carry statistics for the
/// shared nodes. The merge step resolves the conflict with one of these
/// policies; the default reproduces the historical skip-and-warn behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the statistic from the first channel that visited the node.
    #[default]
    KeepFirst,
    /// Overwrite with the statistic from the last channel to visit the node.
    KeepLast,
    /// Pool statistics from all visiting channels, weighted by sample count.
    Average,
}

/// Configuration for one chi-profile analysis run.
///
/// `a_0` and `m_over_n` describe the chi transform under which the
/// collaborator built the profiles; they are validated and logged here so
/// a run's output is traceable to its transform. Defaults follow the
/// values commonly used for bedrock river analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChiAnalysisParams {
    /// Reference drainage area A₀ (m²)
    pub a_0: f64,
    /// Concavity index m/n of the chi integrand
    pub m_over_n: f64,
    /// Monte Carlo iterations per channel
    pub n_iterations: usize,
    /// Resampling stride: every `skip`-th node is kept, from a random
    /// offset. 0 or 1 keeps every node.
    pub skip: usize,
    /// Minimum number of samples per fitted segment
    pub minimum_segment_length: usize,
    /// Desired samples per segment; tunes the complexity penalty
    pub target_nodes: usize,
    /// Assumed elevation noise scale (m)
    pub sigma: f64,
    /// Probability of dropping an interior node from each resampled view
    pub omit_fraction: f64,
    /// Seed for the Monte Carlo generator; `None` draws one from entropy
    pub seed: Option<u64>,
    /// How to resolve nodes shared between channels
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ChiAnalysisParams {
    fn default() -> Self {
        Self {
            a_0: 1000.0,
            m_over_n: 0.45,
            n_iterations: 20,
            skip: 2,
            minimum_segment_length: 10,
            target_nodes: 80,
            sigma: 20.0,
            omit_fraction: 0.0,
            seed: None,
            duplicate_policy: DuplicatePolicy::KeepFirst,
        }
    }
}

impl ChiAnalysisParams {
    /// Check every field, failing with [`Error::InvalidParameter`] on the
    /// first violation.
    pub fn validate(&self) -> Result<()> {
        if !(self.a_0 > 0.0) {
            return Err(invalid("a_0", self.a_0, "must be positive"));
        }
        if !(self.m_over_n > 0.0) {
            return Err(invalid("m_over_n", self.m_over_n, "must be positive"));
        }
        if self.n_iterations == 0 {
            return Err(invalid("n_iterations", 0.0, "at least one iteration is required"));
        }
        if self.minimum_segment_length < 2 {
            return Err(invalid(
                "minimum_segment_length",
                self.minimum_segment_length as f64,
                "a segment needs at least two samples",
            ));
        }
        if self.target_nodes < 2 {
            return Err(invalid("target_nodes", self.target_nodes as f64, "must be at least 2"));
        }
        if !(self.sigma > 0.0) || !self.sigma.is_finite() {
            return Err(invalid("sigma", self.sigma, "must be positive and finite"));
        }
        if !(0.0..0.5).contains(&self.omit_fraction) {
            return Err(invalid(
                "omit_fraction",
                self.omit_fraction,
                "must lie in [0, 0.5)",
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64, reason: &str) -> Error {
    Error::InvalidParameter {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ChiAnalysisParams::default().validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let params = ChiAnalysisParams { n_iterations: 0, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_short_segment_rejected() {
        let params = ChiAnalysisParams { minimum_segment_length: 1, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_nonpositive_sigma_rejected() {
        let params = ChiAnalysisParams { sigma: 0.0, ..Default::default() };
        assert!(params.validate().is_err());

        let params = ChiAnalysisParams { sigma: f64::NAN, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_omit_fraction_bounds() {
        let params = ChiAnalysisParams { omit_fraction: 0.5, ..Default::default() };
        assert!(params.validate().is_err());

        let params = ChiAnalysisParams { omit_fraction: -0.1, ..Default::default() };
        assert!(params.validate().is_err());

        let params = ChiAnalysisParams { omit_fraction: 0.2, ..Default::default() };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_default_duplicate_policy() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::KeepFirst);
    }
}
