//! # Reliability Parameters
//!
//! AASHTO 1993 Table 4.1: standard normal deviate Zr for a chosen design
//! reliability, together with the overall standard deviation So.
//!
//! ```rust
//! use pave_core::reliability::{zr_for_reliability, ReliabilityParameters};
//!
//! let zr = zr_for_reliability(90.0).unwrap();
//! assert_eq!(zr, -1.282);
//!
//! let params = ReliabilityParameters::from_percent(95.0, 0.45).unwrap();
//! assert_eq!(params.zr, -1.645);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, CalcError, CalcResult};

/// Reliability (%) to Zr lookup, ascending by reliability
pub const RELIABILITY_ZR: [(f64, f64); 17] = [
    (50.0, -0.000),
    (60.0, -0.253),
    (70.0, -0.524),
    (75.0, -0.674),
    (80.0, -0.841),
    (85.0, -1.037),
    (90.0, -1.282),
    (91.0, -1.340),
    (92.0, -1.405),
    (93.0, -1.476),
    (94.0, -1.555),
    (95.0, -1.645),
    (96.0, -1.751),
    (97.0, -1.881),
    (98.0, -2.054),
    (99.0, -2.327),
    (99.9, -3.090),
];

/// Typical So for flexible pavements
pub const DEFAULT_SO_FLEXIBLE: f64 = 0.45;

/// Typical So for rigid pavements
pub const DEFAULT_SO_RIGID: f64 = 0.35;

/// Look up Zr for a reliability percentage listed in the table.
///
/// Only tabulated values are accepted; intermediate reliabilities are not
/// interpolated.
pub fn zr_for_reliability(percent: f64) -> CalcResult<f64> {
    RELIABILITY_ZR
        .iter()
        .find(|(r, _)| (r - percent).abs() < 1e-9)
        .map(|&(_, zr)| zr)
        .ok_or_else(|| {
            CalcError::invalid_input(
                "reliability_percent",
                percent.to_string(),
                "Reliability must be one of the tabulated levels (50, 60, 70, 75, 80, 85, 90-99, 99.9)",
            )
        })
}

/// Statistical design-confidence parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityParameters {
    /// Standard normal deviate Zr (non-positive for reliability ≥ 50%)
    pub zr: f64,

    /// Overall standard deviation So
    pub so: f64,
}

impl ReliabilityParameters {
    /// Build from a tabulated reliability percentage and So.
    pub fn from_percent(percent: f64, so: f64) -> CalcResult<Self> {
        let params = ReliabilityParameters {
            zr: zr_for_reliability(percent)?,
            so,
        };
        params.validate()?;
        Ok(params)
    }

    /// The combined reliability term Zr·So
    pub fn term(&self) -> f64 {
        self.zr * self.so
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_finite("zr", self.zr)?;
        require_finite("so", self.so)?;
        if self.so <= 0.0 || self.so >= 1.0 {
            return Err(CalcError::invalid_input(
                "so",
                self.so.to_string(),
                "Overall standard deviation must be between 0 and 1 (typically 0.30-0.60)",
            ));
        }
        Ok(())
    }
}

/// Initial and terminal serviceability indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Serviceability {
    /// Initial serviceability p0
    pub initial: f64,

    /// Terminal serviceability pt
    pub terminal: f64,
}

impl Serviceability {
    pub fn new(initial: f64, terminal: f64) -> Self {
        Serviceability { initial, terminal }
    }

    /// ΔPSI = p0 − pt
    pub fn loss(&self) -> f64 {
        self.initial - self.terminal
    }

    /// Loss must be strictly positive and smaller than p0.
    pub fn validate(&self) -> CalcResult<()> {
        require_finite("initial_serviceability", self.initial)?;
        require_finite("terminal_serviceability", self.terminal)?;
        if self.initial > 5.0 {
            return Err(CalcError::invalid_input(
                "initial_serviceability",
                self.initial.to_string(),
                "Serviceability index cannot exceed 5.0",
            ));
        }
        if self.loss() <= 0.0 {
            return Err(CalcError::invalid_input(
                "delta_psi",
                self.loss().to_string(),
                "Serviceability loss must be positive (terminal below initial)",
            ));
        }
        if self.terminal <= 0.0 {
            return Err(CalcError::invalid_input(
                "terminal_serviceability",
                self.terminal.to_string(),
                "Serviceability loss must be less than the initial index",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zr_lookup() {
        assert_eq!(zr_for_reliability(50.0).unwrap(), 0.0);
        assert_eq!(zr_for_reliability(99.9).unwrap(), -3.090);
        assert!(zr_for_reliability(88.0).is_err());
    }

    #[test]
    fn test_table_is_monotonic() {
        for pair in RELIABILITY_ZR.windows(2) {
            assert!(pair[1].0 > pair[0].0);
            assert!(pair[1].1 < pair[0].1);
        }
    }

    #[test]
    fn test_so_bounds() {
        assert!(ReliabilityParameters::from_percent(90.0, 0.45).is_ok());
        assert!(ReliabilityParameters::from_percent(90.0, 0.0).is_err());
        assert!(ReliabilityParameters::from_percent(90.0, 1.2).is_err());
    }

    #[test]
    fn test_serviceability_loss() {
        let s = Serviceability::new(4.2, 2.5);
        assert!((s.loss() - 1.7).abs() < 1e-12);
        assert!(s.validate().is_ok());

        assert!(Serviceability::new(2.5, 4.2).validate().is_err());
        assert!(Serviceability::new(4.2, 0.0).validate().is_err());
    }
}
