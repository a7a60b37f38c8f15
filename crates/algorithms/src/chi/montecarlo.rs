//! Monte Carlo resampling of channel partitions
//!
//! The partition of a single profile is sensitive to sampling density and
//! noise. Rerunning it over randomly thinned views of the profile and
//! averaging per node gives robust slope/intercept estimates with an
//! uncertainty, at the cost of `n_iterations` partition searches.
//!
//! Each run owns one seeded ChaCha generator, so a fixed seed reproduces
//! the full iteration sequence and channels can be sampled concurrently
//! without sharing state.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use riverchi_core::{Algorithm, ChannelProfile, Error, NodeId, Result};

use super::partition::{partition, PartitionParams};

/// Parameters for Monte Carlo sampling of one channel
#[derive(Debug, Clone)]
pub struct MonteCarloParams {
    /// Number of resample-and-partition iterations
    pub n_iterations: usize,
    /// Resampling stride: every `skip`-th node is kept, starting from a
    /// random offset in `[0, skip)`. 0 or 1 keeps every node.
    pub skip: usize,
    /// Probability of dropping each interior node from a view
    pub omit_fraction: f64,
    /// Minimum number of samples per fitted segment
    pub minimum_segment_length: usize,
    /// Desired samples per segment; tunes the complexity penalty
    pub target_nodes: usize,
    /// Assumed elevation noise scale (m)
    pub sigma: f64,
    /// Seed for the per-channel generator
    pub seed: u64,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            n_iterations: 20,
            skip: 2,
            omit_fraction: 0.0,
            minimum_segment_length: 10,
            target_nodes: 80,
            sigma: 20.0,
            seed: 0,
        }
    }
}

/// Mean slope/intercept for one node over the iterations in which it
/// appeared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMeans {
    /// Mean fitted slope (m_chi)
    pub m_chi: f64,
    /// Mean fitted intercept (b_chi)
    pub b_chi: f64,
    /// Variance of the slope across iterations
    pub m_chi_var: f64,
    /// Variance of the intercept across iterations
    pub b_chi_var: f64,
    /// Number of iterations that sampled the node
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    m_sum: f64,
    b_sum: f64,
    m_sq_sum: f64,
    b_sq_sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, m: f64, b: f64) {
        self.m_sum += m;
        self.b_sum += b;
        self.m_sq_sum += m * m;
        self.b_sq_sum += b * b;
        self.count += 1;
    }

    fn means(&self) -> NodeMeans {
        let n = self.count as f64;
        let m_chi = self.m_sum / n;
        let b_chi = self.b_sum / n;
        NodeMeans {
            m_chi,
            b_chi,
            m_chi_var: (self.m_sq_sum / n - m_chi * m_chi).max(0.0),
            b_chi_var: (self.b_sq_sum / n - b_chi * b_chi).max(0.0),
            samples: self.count,
        }
    }
}

/// Resample-and-partition a channel `n_iterations` times and average the
/// per-node segment slopes and intercepts.
///
/// Nodes excluded from a view by the offset, stride or omission simply do
/// not accumulate in that iteration; the final mean divides by the number
/// of appearances, not by `n_iterations`. Views that thin down to fewer
/// than two nodes are skipped.
pub fn monte_carlo_sample(
    profile: &ChannelProfile,
    params: &MonteCarloParams,
) -> Result<HashMap<NodeId, NodeMeans>> {
    if profile.is_empty() {
        return Err(Error::InsufficientProfileLength { len: 0, min: 2 });
    }

    let chi_all = profile.chi_values();
    let elevation_all = profile.elevation_values();
    let nodes = profile.nodes();
    let n = profile.len();
    let stride = params.skip.max(1);

    let partition_params = PartitionParams {
        minimum_segment_length: params.minimum_segment_length,
        target_nodes: params.target_nodes,
        sigma: params.sigma,
    };

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut accumulators: HashMap<NodeId, Accumulator> = HashMap::new();

    for _ in 0..params.n_iterations {
        let offset = if stride > 1 { rng.gen_range(0..stride) } else { 0 };
        let mut view: Vec<usize> = (offset..n).step_by(stride).collect();

        if params.omit_fraction > 0.0 && view.len() > 2 {
            let last = view.len() - 1;
            let mut thinned = Vec::with_capacity(view.len());
            for (i, &index) in view.iter().enumerate() {
                if i != 0 && i != last && rng.gen::<f64>() < params.omit_fraction {
                    continue;
                }
                thinned.push(index);
            }
            view = thinned;
        }

        if view.len() < 2 {
            continue;
        }

        let chi: Vec<f64> = view.iter().map(|&i| chi_all[i]).collect();
        let elevation: Vec<f64> = view.iter().map(|&i| elevation_all[i]).collect();

        let part = partition(&chi, &elevation, &partition_params)?;
        for segment in &part.segments {
            for view_index in segment.start..segment.end {
                let node = nodes[view[view_index]].node;
                accumulators
                    .entry(node)
                    .or_default()
                    .push(segment.slope, segment.intercept);
            }
        }
    }

    Ok(accumulators
        .into_iter()
        .map(|(node, acc)| (node, acc.means()))
        .collect())
}

/// Monte Carlo channel sampling algorithm
#[derive(Debug, Clone, Default)]
pub struct MonteCarloSampler;

impl Algorithm for MonteCarloSampler {
    type Input = ChannelProfile;
    type Output = HashMap<NodeId, NodeMeans>;
    type Params = MonteCarloParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Monte Carlo Channel Sampling"
    }

    fn description(&self) -> &'static str {
        "Average segment fits over randomly resampled views of a channel profile"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        monte_carlo_sample(&input, &params)
    }
}
