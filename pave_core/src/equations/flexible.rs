//! # Flexible Pavement Performance Equation
//!
//! AASHTO 1993 design equation for flexible pavements (Guide Part II, Eq. 3.1):
//!
//! ```text
//! log10(W18) = Zr·So + 9.36·log10(SN+1) − 0.20
//!            + log10(ΔPSI / (4.2 − 1.5)) / (0.40 + 1094 / (SN+1)^5.19)
//!            + 2.32·log10(Mr) − 8.07
//! ```
//!
//! The residual form `log10(W18) − RHS(SN)` is the objective for the
//! structural-number solver. It decreases with SN over the whole search
//! bracket for realistic inputs.
//!
//! ## Notation
//!
//! - `SN` = Structural Number (trial value)
//! - `W18` = cumulative 18-kip ESAL
//! - `Zr`, `So` = reliability deviate and overall standard deviation
//! - `ΔPSI` = serviceability loss
//! - `Mr` = resilient modulus of the supporting material (psi)

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};
use crate::reliability::ReliabilityParameters;

/// Serviceability span the flexible equation is normalized to (4.2 − 1.5)
pub const FLEXIBLE_PSI_SPAN: f64 = 2.7;

/// Everything the flexible equation needs except the trial SN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEquation {
    /// Design traffic W18 (ESAL)
    pub w18: f64,

    /// Reliability deviate and standard deviation
    pub reliability: ReliabilityParameters,

    /// Serviceability loss ΔPSI
    pub delta_psi: f64,

    /// Resilient modulus of the material below (psi)
    pub support_mr_psi: f64,
}

impl PerformanceEquation {
    pub fn new(w18: f64, reliability: ReliabilityParameters, delta_psi: f64, support_mr_psi: f64) -> Self {
        PerformanceEquation {
            w18,
            reliability,
            delta_psi,
            support_mr_psi,
        }
    }

    /// Same inputs, different support modulus.
    pub fn with_support(&self, support_mr_psi: f64) -> Self {
        PerformanceEquation {
            support_mr_psi,
            ..*self
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("w18", self.w18)?;
        self.reliability.validate()?;
        require_positive("delta_psi", self.delta_psi)?;
        require_positive("support_mr_psi", self.support_mr_psi)?;
        Ok(())
    }

    /// Right-hand side of the equation: log10 of the traffic that `sn` supports.
    ///
    /// Returns `None` when a logarithm argument is non-positive
    /// (SN ≤ −1, ΔPSI ≤ 0, or Mr ≤ 0).
    pub fn log_supported_w18(&self, sn: f64) -> Option<f64> {
        let sn1 = sn + 1.0;
        let psi_ratio = self.delta_psi / FLEXIBLE_PSI_SPAN;
        if sn1 <= 0.0 || psi_ratio <= 0.0 || self.support_mr_psi <= 0.0 {
            return None;
        }

        let reliability_term = self.reliability.term();
        let sn_term = 9.36 * sn1.log10() - 0.20;
        let serviceability_term = psi_ratio.log10() / (0.40 + 1094.0 / sn1.powf(5.19));
        let support_term = 2.32 * self.support_mr_psi.log10() - 8.07;

        Some(reliability_term + sn_term + serviceability_term + support_term)
    }

    /// Residual `log10(W18) − RHS(sn)`; `None` outside the equation's domain.
    pub fn residual(&self, sn: f64) -> Option<f64> {
        if self.w18 <= 0.0 {
            return None;
        }
        self.log_supported_w18(sn).map(|rhs| self.w18.log10() - rhs)
    }

    /// W18 supported by a structure with the given SN.
    pub fn supported_w18(&self, sn: f64) -> Option<f64> {
        self.log_supported_w18(sn).map(|log_w| 10f64.powf(log_w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> PerformanceEquation {
        PerformanceEquation::new(
            5_000_000.0,
            ReliabilityParameters { zr: -1.282, so: 0.45 },
            1.7,
            7500.0,
        )
    }

    #[test]
    fn test_residual_sign_change_across_bracket() {
        let eq = scenario();
        assert!(eq.residual(0.01).unwrap() > 0.0);
        assert!(eq.residual(25.0).unwrap() < 0.0);
    }

    #[test]
    fn test_residual_near_known_root() {
        // Hand evaluation: RHS(4.47) ≈ 6.70 = log10(5e6)
        let eq = scenario();
        assert!(eq.residual(4.47).unwrap().abs() < 0.02);
    }

    #[test]
    fn test_undefined_domain_is_none() {
        let eq = scenario();
        assert!(eq.residual(-1.0).is_none());
        assert!(eq.residual(-3.0).is_none());
        assert!(eq.with_support(0.0).residual(3.0).is_none());
    }

    #[test]
    fn test_supported_w18_inverts_residual() {
        let eq = scenario();
        let w = eq.supported_w18(4.0).unwrap();
        let residual_at_w = PerformanceEquation { w18: w, ..eq }.residual(4.0).unwrap();
        assert!(residual_at_w.abs() < 1e-9);
    }

    #[test]
    fn test_validation() {
        assert!(scenario().validate().is_ok());
        assert!(scenario().with_support(-10.0).validate().is_err());
        let mut eq = scenario();
        eq.delta_psi = 0.0;
        assert!(eq.validate().is_err());
    }
}
