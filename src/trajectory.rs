//! Trajectory sampling: drive a recall run and record snapshots.
//!
//! A trajectory is the ordered sequence of `(state, ones-probability)`
//! snapshots captured while a network relaxes. The samplers here are pure
//! drivers — they mutate the network's state in place and never touch its
//! weights or patterns. Consumers hand the snapshots to an external
//! renderer (heat maps, GIF frames) outside this crate.

use crate::error::{Result, ReverieError};
use crate::network::HopfieldNetwork;
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};

/// One recorded point of a recall run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// State reprojected to bits.
    pub state: Pattern,
    /// Per-unit probability the stochastic rule would currently turn the
    /// unit on, in [0, 1].
    pub ones_probability: Vec<f64>,
}

/// An ordered, finite sequence of snapshots from one recall run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Trajectory {
    snapshots: Vec<Snapshot>,
}

impl Trajectory {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Snapshot> {
        self.snapshots.get(idx)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

fn snapshot(network: &HopfieldNetwork) -> Result<Snapshot> {
    Ok(Snapshot {
        state: network.state_bits()?,
        ones_probability: network.ones_probability()?,
    })
}

/// Run asynchronous recall, snapshotting every `sample_rate` updates.
///
/// Records the starting state, then `⌊total_steps / sample_rate⌋` rounds of
/// [`HopfieldNetwork::step_async`] with one snapshot after each, for a
/// trajectory of length `⌊total_steps / sample_rate⌋ + 1`.
///
/// # Errors
///
/// `sample_rate` of zero, or a network that is untrained or unseeded.
pub fn run_async(
    network: &mut HopfieldNetwork,
    total_steps: usize,
    sample_rate: usize,
) -> Result<Trajectory> {
    if sample_rate == 0 {
        return Err(ReverieError::Config {
            argument: "sample_rate",
            value: 0.0,
            constraint: "sample_rate >= 1",
        });
    }

    let rounds = total_steps / sample_rate;
    let mut trajectory = Trajectory::with_capacity(rounds + 1);
    trajectory.push(snapshot(network)?);
    for _ in 0..rounds {
        network.step_async(sample_rate)?;
        trajectory.push(snapshot(network)?);
    }
    Ok(trajectory)
}

/// Run synchronous recall for `rounds` batch rounds.
///
/// Records the starting state plus one snapshot per
/// [`HopfieldNetwork::step_sync`] round, for a trajectory of length
/// `rounds + 1`.
pub fn run_sync(network: &mut HopfieldNetwork, rounds: usize) -> Result<Trajectory> {
    let mut trajectory = Trajectory::with_capacity(rounds + 1);
    trajectory.push(snapshot(network)?);
    for _ in 0..rounds {
        network.step_sync()?;
        trajectory.push(snapshot(network)?);
    }
    Ok(trajectory)
}

/// Standard recall preparation: set the temperature, seed from a stored
/// pattern, and corrupt it with noise.
pub fn prepare_recall(
    network: &mut HopfieldNetwork,
    pattern_idx: usize,
    temperature: f64,
    noise: f64,
) -> Result<()> {
    network.set_temperature(temperature)?;
    network.seed_pattern(pattern_idx)?;
    network.add_noise(noise)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_net(seed: u64) -> HopfieldNetwork {
        let bits: Vec<u8> = (0..16).map(|i| (i % 2) as u8).collect();
        let mut net = HopfieldNetwork::with_seed(16, seed);
        net.train(vec![Pattern::from_bits(bits)], 1.0).unwrap();
        net
    }

    #[test]
    fn test_run_async_length() {
        let mut net = trained_net(1);
        net.seed_pattern(0).unwrap();
        let trajectory = run_async(&mut net, 100, 10).unwrap();
        assert_eq!(trajectory.len(), 11);
    }

    #[test]
    fn test_run_async_truncating_division() {
        let mut net = trained_net(2);
        net.seed_pattern(0).unwrap();
        // 25 / 10 rounds down: 2 sampled rounds + initial snapshot
        let trajectory = run_async(&mut net, 25, 10).unwrap();
        assert_eq!(trajectory.len(), 3);
    }

    #[test]
    fn test_run_async_rejects_zero_sample_rate() {
        let mut net = trained_net(3);
        net.seed_pattern(0).unwrap();
        assert!(matches!(
            run_async(&mut net, 100, 0),
            Err(ReverieError::Config { argument: "sample_rate", .. })
        ));
    }

    #[test]
    fn test_run_sync_length() {
        let mut net = trained_net(4);
        net.seed_pattern(0).unwrap();
        let trajectory = run_sync(&mut net, 5).unwrap();
        assert_eq!(trajectory.len(), 6);
    }

    #[test]
    fn test_snapshot_contents() {
        let mut net = trained_net(5);
        net.set_temperature(0.4).unwrap();
        net.seed_pattern(0).unwrap();
        let trajectory = run_async(&mut net, 20, 5).unwrap();

        for snap in trajectory.iter() {
            assert_eq!(snap.state.len(), 16);
            assert_eq!(snap.ones_probability.len(), 16);
            assert!(snap
                .ones_probability
                .iter()
                .all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn test_first_snapshot_is_seeded_state() {
        let mut net = trained_net(6);
        net.seed_pattern(0).unwrap();
        let seeded = net.state_bits().unwrap();
        let trajectory = run_sync(&mut net, 3).unwrap();
        assert_eq!(trajectory.get(0).unwrap().state, seeded);
    }

    #[test]
    fn test_samplers_leave_weights_untouched() {
        let mut net = trained_net(7);
        net.set_temperature(1.0).unwrap();
        net.seed_random();
        let weights_before = net.weights().to_vec();
        let patterns_before = net.patterns().to_vec();

        run_async(&mut net, 50, 5).unwrap();
        run_sync(&mut net, 5).unwrap();

        assert_eq!(net.weights(), weights_before.as_slice());
        assert_eq!(net.patterns(), patterns_before.as_slice());
    }

    #[test]
    fn test_run_requires_seeded_state() {
        let mut net = trained_net(8);
        assert!(matches!(
            run_sync(&mut net, 1),
            Err(ReverieError::State(_))
        ));
    }

    #[test]
    fn test_prepare_recall_wires_all_three() {
        let mut net = trained_net(9);
        prepare_recall(&mut net, 0, 0.2, 0.1).unwrap();
        assert_eq!(net.temperature(), 0.2);
        assert!(net.is_seeded());

        // Out-of-range pattern index propagates
        assert!(prepare_recall(&mut net, 5, 0.2, 0.1).is_err());
        // Bad temperature propagates before any seeding happens
        assert!(prepare_recall(&mut net, 0, -1.0, 0.1).is_err());
    }
}
