//! Band table configuration schema.
//!
//! A `BandConfig` is deserialized from TOML and holds the ordered list of
//! bands. Structural rules (ordering, a single open-ended last band) are
//! checked by `BandConfig::validate`, not by serde.
//!
//! Example:
//! ```toml
//! [[bands]]
//! level = "low"
//! max_score = 3
//! description = "Stable condition, routine monitoring"
//!
//! [[bands]]
//! level = "critical"
//! description = "Immediate attention required"
//! ```

use serde::{Deserialize, Serialize};

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    score::AcuityBand,
};

/// The top-level structure deserialized from a band TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandConfig {
    /// Ordered from lowest to highest severity.
    pub bands: Vec<AcuityBand>,
}

impl BandConfig {
    /// Check that the bands form a total, non-overlapping partition of scores.
    ///
    /// - at least one band
    /// - `max_score` strictly increasing and below `u32::MAX`
    /// - every band except the last has a `max_score`
    /// - the last band has none, so every score classifies
    pub fn validate(&self) -> AcuityResult<()> {
        let Some((last, bounded)) = self.bands.split_last() else {
            return Err(config_error("band table must contain at least one band"));
        };

        let mut previous: Option<u32> = None;
        for (idx, band) in bounded.iter().enumerate() {
            let Some(max) = band.max_score else {
                return Err(config_error(format!(
                    "band {idx} ({}) has no max_score; only the last band may be open-ended",
                    band.level
                )));
            };
            if let Some(prev) = previous {
                if max <= prev {
                    return Err(config_error(format!(
                        "band {idx} ({}) max_score {max} must be greater than the previous band's {prev}",
                        band.level
                    )));
                }
            }
            if max == u32::MAX {
                return Err(config_error(format!(
                    "band {idx} ({}) max_score {max} leaves no scores for the last band",
                    band.level
                )));
            }
            previous = Some(max);
        }

        if let Some(max) = last.max_score {
            return Err(config_error(format!(
                "last band ({}) must omit max_score to cover all scores, found {max}",
                last.level
            )));
        }

        Ok(())
    }
}

fn config_error(reason: impl Into<String>) -> AcuityError {
    AcuityError::ConfigError {
        reason: reason.into(),
    }
}
