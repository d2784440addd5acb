//! # Reverie: Discrete Hopfield Associative Memory
//!
//! Reverie turns a set of binary patterns into an associative memory and
//! replays noisy recall as snapshot trajectories. It is the engine behind
//! image-recall animations: a surrounding application converts image tiles
//! to bit vectors and renders snapshots back to pixels; this crate does
//! everything in between.
//!
//! ## Quick Start
//!
//! ```rust
//! use reverie::{build_network, dedupe_patterns, trajectory, Pattern};
//!
//! // Bit vectors, e.g. derived from image tiles
//! let raw = vec![
//!     Pattern::from_bits(vec![1, 0, 1, 0, 1, 0, 1, 0]),
//!     Pattern::from_bits(vec![0, 1, 0, 1, 0, 1, 0, 1]), // complement of the first
//!     Pattern::from_bits(vec![1, 1, 1, 1, 0, 0, 0, 0]),
//! ];
//!
//! // Drop near-duplicate and near-complementary patterns
//! let corpus = dedupe_patterns(&raw, 0.3)?;
//! assert_eq!(corpus.len(), 2);
//!
//! // Train, corrupt a stored pattern, and record the recall run
//! let mut net = build_network(corpus, 1.0, Some((2, 4)))?;
//! trajectory::prepare_recall(&mut net, 0, 0.1, 0.1)?;
//! let run = trajectory::run_async(&mut net, 100, 10)?;
//! assert_eq!(run.len(), 11);
//! # Ok::<(), reverie::ReverieError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Pattern**: an immutable bit vector; bit 1 ⇄ spin +1, bit 0 ⇄ spin −1
//! - **Deduplication**: sibling filtering by normalized Hamming distance
//! - **Training**: Hebbian outer-product weights, dense or sparsified
//! - **Recall**: asynchronous (Glauber) or synchronous stochastic updates,
//!   temperature-controlled
//! - **Trajectory**: the recorded snapshots of one recall run

pub mod dedupe;
pub mod error;
pub mod network;
pub mod pattern;
pub mod persist;
pub mod trajectory;

// Re-exports for convenience
pub use dedupe::dedupe_patterns;
pub use error::{Result, ReverieError};
pub use network::{ActivationRule, Density, HopfieldNetwork};
pub use pattern::Pattern;
pub use persist::SavedNetwork;
pub use trajectory::{Snapshot, Trajectory};

/// Build a trained network from a deduplicated corpus.
///
/// The network size is taken from the first pattern; `shape`, when given,
/// must multiply out to that size and is kept as a rendering hint.
///
/// # Errors
///
/// Empty corpus, inconsistent pattern lengths, shape/size mismatch, or
/// `density` outside `(0, 1]`.
pub fn build_network(
    patterns: Vec<Pattern>,
    density: f64,
    shape: Option<(usize, usize)>,
) -> Result<HopfieldNetwork> {
    let Some(first) = patterns.first() else {
        return Err(ReverieError::EmptyInput(
            "cannot build a network from an empty corpus".into(),
        ));
    };

    let mut network = HopfieldNetwork::new(first.len());
    if let Some((height, width)) = shape {
        network.set_shape(height, width)?;
    }
    network.train(patterns, density)?;
    Ok(network)
}
