//! TOML-driven band table implementation.
//!
//! `BandTable` loads a `BandConfig` from a TOML string or file, validates
//! it, and implements the `Interpreter` trait from acuity-core.
//!
//! Classification walks the bands in order and returns the first one whose
//! inclusive upper bound covers the score. Validation guarantees the last
//! band is open-ended, so every score classifies.

use std::path::Path;

use tracing::debug;

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    score::{AcuityBand, Interpretation},
};
use acuity_core::traits::Interpreter;

use crate::config::BandConfig;

/// The standard table: ≤3 Low, 4–6 Moderate, 7–9 High, ≥10 Critical.
pub const STANDARD_BANDS: &str = include_str!("../bands/standard.toml");

/// An ordered interpretation table.
///
/// ```rust,ignore
/// use acuity_bands::BandTable;
///
/// let table = BandTable::from_file(Path::new("bands/site.toml"))?;
/// let band = table.classify(7);
/// ```
#[derive(Debug, Clone)]
pub struct BandTable {
    config: BandConfig,
}

impl BandTable {
    /// The embedded standard table.
    pub fn standard() -> AcuityResult<Self> {
        Self::from_toml_str(STANDARD_BANDS)
    }

    /// Parse `s` as TOML and validate the resulting table.
    ///
    /// Returns `AcuityError::ConfigError` if the TOML is malformed or the
    /// bands do not form an ordered, total partition.
    pub fn from_toml_str(s: &str) -> AcuityResult<Self> {
        let config: BandConfig = toml::from_str(s).map_err(|e| AcuityError::ConfigError {
            reason: format!("failed to parse band TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a band table.
    pub fn from_file(path: &Path) -> AcuityResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AcuityError::ConfigError {
            reason: format!("failed to read band file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_config(config: BandConfig) -> AcuityResult<Self> {
        config.validate()?;
        debug!(band_count = config.bands.len(), "band table loaded");
        Ok(Self { config })
    }

    pub fn bands(&self) -> &[AcuityBand] {
        &self.config.bands
    }

    /// Return the band covering `total_score`.
    ///
    /// Always `Some` for a validated table; `None` only if the last band
    /// were bounded.
    pub fn classify(&self, total_score: u32) -> Option<&AcuityBand> {
        self.config.bands.iter().find(|b| b.covers(total_score))
    }

    /// The inclusive score range a band covers, as `(min, max)`.
    pub fn range_of(&self, index: usize) -> Option<(u32, Option<u32>)> {
        let band = self.config.bands.get(index)?;
        let min = match index {
            0 => 0,
            _ => self.config.bands[index - 1].max_score.map_or(0, |m| m.saturating_add(1)),
        };
        Some((min, band.max_score))
    }
}

impl Interpreter for BandTable {
    fn interpret(&self, total_score: u32) -> AcuityResult<Interpretation> {
        let band = self.classify(total_score).ok_or_else(|| AcuityError::ConfigError {
            reason: format!("no band covers total score {total_score}"),
        })?;
        debug!(total_score, level = %band.level, "score classified");
        Ok(Interpretation {
            level: band.level,
            description: band.description.clone(),
            total_score,
        })
    }
}
