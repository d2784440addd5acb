//! Discrete Hopfield network: Hebbian training and stochastic recall.
//!
//! The network owns an N×N weight matrix and a current spin state in
//! {-1, +1}. Training is a Hebbian outer-product sum over the training
//! patterns, normalized by N, optionally sparsified by skipping a random
//! subset of unit pairs. Recall runs under one of two update disciplines:
//!
//! - **Asynchronous** ([`HopfieldNetwork::step_async`]): Glauber-style
//!   single-unit updates — pick a unit at random, keep or flip it by
//!   sampling against its stay probability.
//! - **Synchronous** ([`HopfieldNetwork::step_sync`]): one batch round —
//!   every unit keeps or flips independently against the stay
//!   probabilities of the round's starting state.
//!
//! Temperature selects the transition rule: `T = 0` is a hard threshold on
//! the local field, `T > 0` is the logistic `1 / (1 + exp(-2x/T))`.
//!
//! Weights and state are private; training, seeding, and stepping are the
//! only mutators, so symmetry, the zero diagonal, and the spin domain hold
//! by construction.

use crate::error::{Result, ReverieError};
use crate::pattern::Pattern;
use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Transition-probability rule selected by temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActivationRule {
    /// `T = 0`: unit turns on iff its local field is non-negative.
    Threshold,
    /// `T > 0`: logistic acceptance `1 / (1 + exp(-2x/T))`.
    Logistic { temperature: f64 },
}

impl ActivationRule {
    /// Probability that a unit with local field `x` turns on.
    pub fn probability(&self, x: f64) -> f64 {
        match self {
            ActivationRule::Threshold => {
                if x >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationRule::Logistic { temperature } => 1.0 / (1.0 + (-2.0 * x / temperature).exp()),
        }
    }

    /// The temperature this rule was selected for.
    pub fn temperature(&self) -> f64 {
        match self {
            ActivationRule::Threshold => 0.0,
            ActivationRule::Logistic { temperature } => *temperature,
        }
    }
}

/// Connection density of a trained network.
///
/// `requested` is the fraction asked for at training time; `effective` is
/// the fraction of pairs actually kept after rounding the skip count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub requested: f64,
    pub effective: f64,
}

/// A discrete Hopfield associative memory.
///
/// Lifecycle: construct → [`train`](Self::train) → seed a state
/// ([`seed_pattern`](Self::seed_pattern), [`seed_random`](Self::seed_random),
/// [`seed_spins`](Self::seed_spins)) → iterate
/// ([`step_async`](Self::step_async) / [`step_sync`](Self::step_sync)).
/// There is no terminal state; the caller decides when to stop.
///
/// # Example
///
/// ```rust
/// use reverie::{HopfieldNetwork, Pattern};
///
/// let patterns = vec![
///     Pattern::from_bits(vec![1, 0, 1, 0, 1, 0, 1, 0]),
///     Pattern::from_bits(vec![1, 1, 1, 1, 0, 0, 0, 0]),
/// ];
///
/// let mut net = HopfieldNetwork::with_seed(8, 42);
/// net.train(patterns, 1.0)?;
/// net.set_temperature(0.1)?;
/// net.seed_pattern(0)?;
/// net.add_noise(0.1)?;
/// net.step_async(100)?;
/// let recalled = net.state_bits()?;
/// assert_eq!(recalled.len(), 8);
/// # Ok::<(), reverie::ReverieError>(())
/// ```
pub struct HopfieldNetwork {
    size: usize,
    shape: Option<(usize, usize)>,
    /// Row-major N×N matrix; empty until trained.
    weights: Vec<f64>,
    density: Option<Density>,
    rule: ActivationRule,
    patterns: Vec<Pattern>,
    state: Option<Vec<i8>>,
    rng: ChaCha8Rng,
}

impl HopfieldNetwork {
    /// Create an untrained network of `size` units.
    pub fn new(size: usize) -> Self {
        Self::from_rng(size, ChaCha8Rng::from_entropy())
    }

    /// Create an untrained network with a fixed RNG seed.
    ///
    /// Same seed, same training call sequence, same recall trajectory —
    /// use this for reproducible runs and tests.
    pub fn with_seed(size: usize, seed: u64) -> Self {
        Self::from_rng(size, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(size: usize, rng: ChaCha8Rng) -> Self {
        Self {
            size,
            shape: None,
            weights: Vec::new(),
            density: None,
            rule: ActivationRule::Threshold,
            patterns: Vec::new(),
            state: None,
            rng,
        }
    }

    /// Replace the RNG with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Number of units.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Optional (height, width) hint for external renderers.
    ///
    /// Never read by the network's own math.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }

    /// Attach a (height, width) rendering hint.
    ///
    /// # Errors
    ///
    /// `height * width` must equal the network size.
    pub fn set_shape(&mut self, height: usize, width: usize) -> Result<()> {
        if height * width != self.size {
            return Err(ReverieError::ShapeMismatch {
                expected: self.size,
                got: height * width,
            });
        }
        self.shape = Some((height, width));
        Ok(())
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.rule.temperature()
    }

    /// The active transition rule.
    pub fn rule(&self) -> ActivationRule {
        self.rule
    }

    /// Connection density recorded at training time, if trained.
    pub fn density(&self) -> Option<Density> {
        self.density
    }

    /// The training corpus this network was built from.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Read-only view of the trained weight matrix, row-major.
    ///
    /// Empty until the network is trained.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Single weight entry.
    ///
    /// Panics if called before training or with indices out of range.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        assert!(!self.weights.is_empty(), "network is untrained");
        self.weights[i * self.size + j]
    }

    pub fn is_trained(&self) -> bool {
        !self.weights.is_empty()
    }

    pub fn is_seeded(&self) -> bool {
        self.state.is_some()
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Hebbian training over a pattern corpus.
    ///
    /// Sets `w[i][j] = (1/N) · Σ_p s_p[i] · s_p[j]` for `i ≠ j`, where
    /// `s_p` is pattern `p` in the spin domain. The matrix is symmetric by
    /// construction and the diagonal stays zero.
    ///
    /// With `density < 1`, a uniformly random subset of the `N(N-1)/2`
    /// unordered pairs — `round((1 - density) · pairs)` of them, chosen by
    /// shuffling the pair-index array — is skipped and left at zero. The
    /// density actually achieved after rounding is recorded next to the
    /// requested one.
    ///
    /// Validation happens before any weight is written; a failed call
    /// leaves the network exactly as it was.
    ///
    /// # Errors
    ///
    /// - `density` outside `(0, 1]`
    /// - empty pattern list
    /// - any pattern length ≠ network size
    pub fn train(&mut self, patterns: Vec<Pattern>, density: f64) -> Result<()> {
        if !(density > 0.0 && density <= 1.0) {
            return Err(ReverieError::Config {
                argument: "density",
                value: density,
                constraint: "0 < density <= 1",
            });
        }
        if patterns.is_empty() {
            return Err(ReverieError::EmptyInput(
                "training requires at least one pattern".into(),
            ));
        }
        for pattern in &patterns {
            if pattern.len() != self.size {
                return Err(ReverieError::ShapeMismatch {
                    expected: self.size,
                    got: pattern.len(),
                });
            }
        }

        let spins: Vec<Vec<i8>> = patterns.iter().map(|p| p.to_spins()).collect();
        let n = self.size;
        let n_pairs = n.saturating_sub(1) * n / 2;
        let n_skips = ((1.0 - density) * n_pairs as f64).round() as usize;

        let mut weights = vec![0.0; n * n];
        if n_skips == 0 {
            for i in 0..n {
                for j in (i + 1)..n {
                    let w = Self::hebb_weight(&spins, i, j, n);
                    weights[i * n + j] = w;
                    weights[j * n + i] = w;
                }
            }
        } else {
            // Shuffle-and-slice over the explicit pair-index array: the
            // first n_skips shuffled indices become the skip set.
            let mut pair_ids: Vec<usize> = (0..n_pairs).collect();
            pair_ids.shuffle(&mut self.rng);
            let mut keep = vec![true; n_pairs];
            for &id in &pair_ids[..n_skips] {
                keep[id] = false;
            }

            let mut pair = 0;
            for i in 0..n {
                for j in (i + 1)..n {
                    if keep[pair] {
                        let w = Self::hebb_weight(&spins, i, j, n);
                        weights[i * n + j] = w;
                        weights[j * n + i] = w;
                    }
                    pair += 1;
                }
            }
        }

        let effective = if n_pairs == 0 {
            1.0
        } else {
            (n_pairs - n_skips) as f64 / n_pairs as f64
        };

        debug!(
            "trained {} units on {} patterns ({} of {} pairs kept)",
            n,
            patterns.len(),
            n_pairs - n_skips,
            n_pairs
        );

        self.weights = weights;
        self.patterns = patterns;
        self.density = Some(Density {
            requested: density,
            effective,
        });
        Ok(())
    }

    fn hebb_weight(spins: &[Vec<i8>], i: usize, j: usize, n: usize) -> f64 {
        let sum: i64 = spins.iter().map(|s| i64::from(s[i]) * i64::from(s[j])).sum();
        sum as f64 / n as f64
    }

    // =========================================================================
    // Temperature
    // =========================================================================

    /// Select the transition rule for temperature `t`.
    ///
    /// `t = 0` installs the deterministic threshold rule; `t > 0` the
    /// logistic rule.
    ///
    /// # Errors
    ///
    /// `t` must be finite and non-negative.
    pub fn set_temperature(&mut self, t: f64) -> Result<()> {
        if !t.is_finite() || t < 0.0 {
            return Err(ReverieError::Config {
                argument: "temperature",
                value: t,
                constraint: "temperature >= 0",
            });
        }
        self.rule = if t == 0.0 {
            ActivationRule::Threshold
        } else {
            ActivationRule::Logistic { temperature: t }
        };
        Ok(())
    }

    // =========================================================================
    // State seeding
    // =========================================================================

    /// Seed the state from stored pattern `idx`.
    pub fn seed_pattern(&mut self, idx: usize) -> Result<()> {
        let pattern = self.patterns.get(idx).ok_or_else(|| {
            ReverieError::State(format!(
                "pattern index {} out of range ({} stored)",
                idx,
                self.patterns.len()
            ))
        })?;
        self.state = Some(pattern.to_spins());
        Ok(())
    }

    /// Seed the state with uniform random spins.
    pub fn seed_random(&mut self) {
        let state = (0..self.size)
            .map(|_| if self.rng.gen::<bool>() { 1 } else { -1 })
            .collect();
        self.state = Some(state);
    }

    /// Seed the state from an explicit spin vector.
    ///
    /// # Errors
    ///
    /// Length must equal the network size and every entry must be ±1.
    pub fn seed_spins(&mut self, spins: Vec<i8>) -> Result<()> {
        if spins.len() != self.size {
            return Err(ReverieError::ShapeMismatch {
                expected: self.size,
                got: spins.len(),
            });
        }
        if let Some(&bad) = spins.iter().find(|&&s| s != 1 && s != -1) {
            return Err(ReverieError::Config {
                argument: "spins",
                value: f64::from(bad),
                constraint: "every entry must be -1 or +1",
            });
        }
        self.state = Some(spins);
        Ok(())
    }

    /// Independently flip each unit's spin with probability `flip_chance`.
    ///
    /// # Errors
    ///
    /// `flip_chance` outside `[0, 1]`, or no seeded state.
    pub fn add_noise(&mut self, flip_chance: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&flip_chance) {
            return Err(ReverieError::Config {
                argument: "flip_chance",
                value: flip_chance,
                constraint: "0 <= flip_chance <= 1",
            });
        }
        let state = self.state.as_mut().ok_or_else(Self::unseeded)?;
        for spin in state.iter_mut() {
            if self.rng.gen::<f64>() < flip_chance {
                *spin = -*spin;
            }
        }
        Ok(())
    }

    /// Current state reprojected to bits.
    pub fn state_bits(&self) -> Result<Pattern> {
        Ok(Pattern::from_spins(self.seeded_state()?))
    }

    /// Current state as spins.
    pub fn state_spins(&self) -> Result<&[i8]> {
        self.seeded_state()
    }

    // =========================================================================
    // Dynamics
    // =========================================================================

    /// Local field `weights · state` per unit.
    pub fn activation(&self) -> Result<Vec<f64>> {
        let state = self.seeded_state()?;
        let weights = self.trained_weights()?;
        let act = (0..self.size)
            .map(|i| {
                weights[i * self.size..(i + 1) * self.size]
                    .iter()
                    .zip(state)
                    .map(|(w, &s)| w * f64::from(s))
                    .sum()
            })
            .collect();
        Ok(act)
    }

    /// Per-unit probability of being "on" if resampled under the current
    /// rule.
    pub fn ones_probability(&self) -> Result<Vec<f64>> {
        Ok(self
            .activation()?
            .into_iter()
            .map(|x| self.rule.probability(x))
            .collect())
    }

    /// Per-unit probability of keeping the present sign on the next draw.
    ///
    /// Equals `ones_probability` for a unit that is off and
    /// `1 - ones_probability` for a unit that is on; both update rules
    /// sample against this quantity.
    pub fn stay_probabilities(&self) -> Result<Vec<f64>> {
        let ones = self.ones_probability()?;
        let state = self.seeded_state()?;
        Ok(ones
            .iter()
            .zip(state)
            .map(|(&p, &s)| (p + f64::from(s.min(0))).abs())
            .collect())
    }

    /// Mean stay probability across all units, in [0, 1].
    ///
    /// 1.0 means every unit already sits at its most probable value. A
    /// diagnostic heuristic only — no convergence guarantee.
    pub fn stability(&self) -> Result<f64> {
        let stay = self.stay_probabilities()?;
        Ok(stay.iter().sum::<f64>() / stay.len() as f64)
    }

    /// `updates` sequential single-unit stochastic updates.
    ///
    /// Each update draws a unit uniformly at random and flips it when a
    /// uniform sample exceeds its stay probability. Stay probabilities are
    /// recomputed after every flip, since they depend on the changed state.
    pub fn step_async(&mut self, updates: usize) -> Result<()> {
        let mut stay = self.stay_probabilities()?;
        for _ in 0..updates {
            let unit = self.rng.gen_range(0..self.size);
            let draw: f64 = self.rng.gen();
            if draw > stay[unit] {
                if let Some(state) = self.state.as_mut() {
                    state[unit] = -state[unit];
                }
                stay = self.stay_probabilities()?;
            }
        }
        Ok(())
    }

    /// One synchronous update round.
    ///
    /// Stay probabilities are computed once from the round's starting
    /// state; every unit then keeps or flips independently. Synchronous
    /// rounds can oscillate between states indefinitely for some
    /// weight/temperature combinations; that is a property of the rule,
    /// not detected or damped here.
    pub fn step_sync(&mut self) -> Result<()> {
        let stay = self.stay_probabilities()?;
        let rng = &mut self.rng;
        let flips: Vec<i8> = stay
            .iter()
            .map(|&p| if rng.gen::<f64>() <= p { 1 } else { -1 })
            .collect();
        if let Some(state) = self.state.as_mut() {
            for (spin, flip) in state.iter_mut().zip(&flips) {
                *spin *= flip;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn seeded_state(&self) -> Result<&[i8]> {
        self.state.as_deref().ok_or_else(Self::unseeded)
    }

    fn trained_weights(&self) -> Result<&[f64]> {
        if self.weights.is_empty() {
            return Err(ReverieError::State(
                "network is untrained; call train first".into(),
            ));
        }
        Ok(&self.weights)
    }

    fn unseeded() -> ReverieError {
        ReverieError::State(
            "state not seeded; call seed_pattern, seed_random, or seed_spins first".into(),
        )
    }

    /// Rebuild a trained network from persisted parts. Dimensions must be
    /// pre-validated by the caller.
    pub(crate) fn restore(
        size: usize,
        shape: Option<(usize, usize)>,
        rule: ActivationRule,
        density: Option<Density>,
        weights: Vec<f64>,
        patterns: Vec<Pattern>,
    ) -> Self {
        Self {
            size,
            shape,
            weights,
            density,
            rule,
            patterns,
            state: None,
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}
