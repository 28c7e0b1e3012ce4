//! The five-weight vector that biases the playout policy.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Relative preference for each kind of move.
///
/// Serialized as a five-element array in the order
/// `[standard, king_check, black_attack, white_border, capture]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 5]")]
pub struct Weights {
    /// Any move with nothing special about it.
    pub standard: f64,
    /// A move that opens an escape line for the King.
    pub king_check: f64,
    /// A Black move next to the King or on its row or column.
    pub black_attack: f64,
    /// A White move from the King's line out to the board edge.
    pub white_border: f64,
    pub capture: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            standard: 1.0,
            king_check: 75.0,
            black_attack: 75.0,
            white_border: 75.0,
            capture: 150.0,
        }
    }
}

impl Weights {
    /// Build from exactly five positive, finite values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let [standard, king_check, black_attack, white_border, capture] = values else {
            return Err(Error::InvalidWeights {
                message: format!("expected 5 values, got {}", values.len()),
            });
        };
        if let Some(bad) = values.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(Error::InvalidWeights {
                message: format!("weights must be positive, got {bad}"),
            });
        }
        Ok(Self {
            standard: *standard,
            king_check: *king_check,
            black_attack: *black_attack,
            white_border: *white_border,
            capture: *capture,
        })
    }

    /// Load a JSON array of five numbers.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("read weights from {}", path.display()), e))?;
        Ok(serde_json::from_str(&text)?)
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 5] {
        [
            self.standard,
            self.king_check,
            self.black_attack,
            self.white_border,
            self.capture,
        ]
    }
}

impl TryFrom<Vec<f64>> for Weights {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_slice(&values)
    }
}

impl From<Weights> for [f64; 5] {
    fn from(weights: Weights) -> Self {
        weights.to_array()
    }
}

impl FromStr for Weights {
    type Err = Error;

    /// Parse a comma-separated list such as `"1,75,75,75,150"`.
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| Error::InvalidWeights {
                    message: format!("'{}' is not a number", part.trim()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_slice(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        assert_eq!(Weights::default().to_array(), [1.0, 75.0, 75.0, 75.0, 150.0]);
    }

    #[test]
    fn test_parse() {
        let weights: Weights = "2, 10,20,30,40".parse().unwrap();
        assert_eq!(weights.to_array(), [2.0, 10.0, 20.0, 30.0, 40.0]);
        assert!("1,2,3".parse::<Weights>().is_err());
        assert!("1,2,3,4,x".parse::<Weights>().is_err());
        assert!("1,2,3,4,0".parse::<Weights>().is_err());
        assert!("1,2,3,4,-5".parse::<Weights>().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::to_string(&Weights::default()).unwrap();
        assert_eq!(json, "[1.0,75.0,75.0,75.0,150.0]");
        let back: Weights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Weights::default());
        assert!(serde_json::from_str::<Weights>("[1,2]").is_err());
    }
}
