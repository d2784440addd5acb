//! Persistence: serializable network records with a JSON file round trip.
//!
//! A [`SavedNetwork`] captures everything needed to reconstruct a trained
//! network — weight matrix, training patterns, temperature, density, and
//! shape. Numeric fields survive the round trip bit-for-bit (serde_json
//! emits shortest-round-trip floats). The transient recall state is not
//! persisted; a loaded network resumes its lifecycle at "trained".

use crate::error::{Result, ReverieError};
use crate::network::{ActivationRule, Density, HopfieldNetwork};
use crate::pattern::Pattern;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// A serializable record of a trained network.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedNetwork {
    size: usize,
    shape: Option<(usize, usize)>,
    temperature: f64,
    density: Option<Density>,
    /// Row-major N×N weight matrix.
    weights: Vec<f64>,
    patterns: Vec<Pattern>,
}

impl SavedNetwork {
    /// Capture a trained network.
    ///
    /// # Errors
    ///
    /// The network must be trained.
    pub fn from_network(network: &HopfieldNetwork) -> Result<Self> {
        if !network.is_trained() {
            return Err(ReverieError::State(
                "cannot persist an untrained network".into(),
            ));
        }
        Ok(Self {
            size: network.size(),
            shape: network.shape(),
            temperature: network.temperature(),
            density: network.density(),
            weights: network.weights().to_vec(),
            patterns: network.patterns().to_vec(),
        })
    }

    /// Reconstruct the network this record was captured from.
    ///
    /// # Errors
    ///
    /// - weight matrix length ≠ size²
    /// - any pattern length ≠ size
    /// - shape whose height × width ≠ size
    /// - negative or non-finite temperature
    pub fn into_network(self) -> Result<HopfieldNetwork> {
        if self.weights.len() != self.size * self.size {
            return Err(ReverieError::ShapeMismatch {
                expected: self.size * self.size,
                got: self.weights.len(),
            });
        }
        for pattern in &self.patterns {
            if pattern.len() != self.size {
                return Err(ReverieError::ShapeMismatch {
                    expected: self.size,
                    got: pattern.len(),
                });
            }
        }
        if let Some((height, width)) = self.shape {
            if height * width != self.size {
                return Err(ReverieError::ShapeMismatch {
                    expected: self.size,
                    got: height * width,
                });
            }
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(ReverieError::Config {
                argument: "temperature",
                value: self.temperature,
                constraint: "temperature >= 0",
            });
        }

        let rule = if self.temperature == 0.0 {
            ActivationRule::Threshold
        } else {
            ActivationRule::Logistic {
                temperature: self.temperature,
            }
        };

        Ok(HopfieldNetwork::restore(
            self.size,
            self.shape,
            rule,
            self.density,
            self.weights,
            self.patterns,
        ))
    }

    /// Persist to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        std::fs::write(&path, json)?;
        debug!("saved {}-unit network to {}", self.size, path.as_ref().display());
        Ok(())
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_net() -> HopfieldNetwork {
        let patterns = vec![
            Pattern::from_bits(vec![1, 0, 1, 0, 1, 1, 0, 0, 1, 0, 1, 0]),
            Pattern::from_bits(vec![0, 0, 1, 1, 0, 1, 1, 0, 0, 1, 1, 1]),
        ];
        let mut net = HopfieldNetwork::with_seed(12, 21);
        net.train(patterns, 0.8).unwrap();
        net.set_temperature(0.25).unwrap();
        net.set_shape(3, 4).unwrap();
        net
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let net = trained_net();
        let path = "/tmp/reverie_test_saved_network.json";

        SavedNetwork::from_network(&net).unwrap().save(path).unwrap();
        let loaded = SavedNetwork::load(path).unwrap().into_network().unwrap();

        assert_eq!(loaded.size(), net.size());
        assert_eq!(loaded.shape(), net.shape());
        assert_eq!(loaded.temperature(), net.temperature());
        assert_eq!(loaded.density(), net.density());
        assert_eq!(loaded.weights(), net.weights());
        assert_eq!(loaded.patterns(), net.patterns());
        assert!(loaded.is_trained());
        assert!(!loaded.is_seeded());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_loaded_network_can_recall() {
        let net = trained_net();
        let record = SavedNetwork::from_network(&net).unwrap();
        let mut loaded = record.into_network().unwrap();

        loaded.reseed(7);
        loaded.seed_pattern(0).unwrap();
        loaded.add_noise(0.1).unwrap();
        loaded.step_async(50).unwrap();
        assert_eq!(loaded.state_bits().unwrap().len(), 12);
    }

    #[test]
    fn test_untrained_network_not_persistable() {
        let net = HopfieldNetwork::with_seed(4, 1);
        assert!(matches!(
            SavedNetwork::from_network(&net),
            Err(ReverieError::State(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_weight_matrix() {
        let json = r#"{
            "size": 4,
            "shape": null,
            "temperature": 0.0,
            "density": null,
            "weights": [0.0, 0.0, 0.0],
            "patterns": []
        }"#;
        let record: SavedNetwork = serde_json::from_str(json).unwrap();
        assert!(matches!(
            record.into_network(),
            Err(ReverieError::ShapeMismatch { expected: 16, got: 3 })
        ));
    }

    #[test]
    fn test_rejects_inconsistent_shape() {
        let json = r#"{
            "size": 4,
            "shape": [2, 3],
            "temperature": 0.0,
            "density": null,
            "weights": [0.0, 0.0, 0.0, 0.0,
                        0.0, 0.0, 0.0, 0.0,
                        0.0, 0.0, 0.0, 0.0,
                        0.0, 0.0, 0.0, 0.0],
            "patterns": []
        }"#;
        let record: SavedNetwork = serde_json::from_str(json).unwrap();
        assert!(matches!(
            record.into_network(),
            Err(ReverieError::ShapeMismatch { expected: 4, got: 6 })
        ));
    }

    #[test]
    fn test_rejects_negative_temperature() {
        let json = r#"{
            "size": 1,
            "shape": null,
            "temperature": -0.5,
            "density": null,
            "weights": [0.0],
            "patterns": []
        }"#;
        let record: SavedNetwork = serde_json::from_str(json).unwrap();
        assert!(matches!(
            record.into_network(),
            Err(ReverieError::Config { argument: "temperature", .. })
        ));
    }
}
