//! # Rigid Pavement Performance Equation
//!
//! AASHTO 1993 design equation for rigid pavements (Guide Part II, Eq. 3.6),
//! split into its four additive terms so reports can show each one:
//!
//! ```text
//! log10(W18) = Zr·So                                           (reliability)
//!            + 7.35·log10(D+1) − 0.06                          (thickness)
//!            + log10(ΔPSI/(4.5−1.5)) / (1 + 1.624e7/(D+1)^8.46) (serviceability)
//!            + (4.22 − 0.32·pt)·log10[ Sc·Cd·(D^0.75 − 1.132)
//!                / (215.63·J·(D^0.75 − 18.42/(Ec/k)^0.25)) ]   (strength/support)
//! ```
//!
//! ## Notation
//!
//! - `D` = slab thickness (in)
//! - `Sc` = modulus of rupture (psi), `Ec` = concrete elastic modulus (psi)
//! - `J` = load transfer coefficient, `Cd` = drainage coefficient
//! - `k` = effective modulus of subgrade reaction (pci)
//! - `pt` = terminal serviceability

use serde::{Deserialize, Serialize};

/// Serviceability span the rigid equation is normalized to (4.5 − 1.5)
pub const RIGID_PSI_SPAN: f64 = 3.0;

/// Strength/support ratio of the fourth term, kept as its parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthSupportRatio {
    /// D^0.75
    pub d_power: f64,
    /// Ec / k
    pub ec_k_ratio: f64,
    /// Sc·Cd·(D^0.75 − 1.132)
    pub numerator: f64,
    /// 215.63·J·(D^0.75 − 18.42/(Ec/k)^0.25)
    pub denominator: f64,
}

impl StrengthSupportRatio {
    pub fn compute(d_in: f64, sc_psi: f64, cd: f64, j: f64, ec_psi: f64, k_pci: f64) -> Self {
        let d_power = d_in.powf(0.75);
        let ec_k_ratio = ec_psi / k_pci;
        StrengthSupportRatio {
            d_power,
            ec_k_ratio,
            numerator: sc_psi * cd * (d_power - 1.132),
            denominator: 215.63 * j * (d_power - 18.42 / ec_k_ratio.powf(0.25)),
        }
    }

    /// True when both parts are positive and the logarithm is defined.
    pub fn is_positive(&self) -> bool {
        self.numerator > 0.0 && self.denominator > 0.0
    }

    /// numerator / denominator, only when both are positive
    pub fn value(&self) -> Option<f64> {
        self.is_positive().then(|| self.numerator / self.denominator)
    }
}

/// The four terms of the rigid equation for one slab thickness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTerms {
    /// Zr·So
    pub reliability: f64,
    /// 7.35·log10(D+1) − 0.06
    pub thickness: f64,
    /// Serviceability-loss term
    pub serviceability: f64,
    /// (4.22 − 0.32·pt), the multiplier of the strength/support logarithm
    pub strength_coefficient: f64,
    /// Strength/support ratio parts
    pub ratio: StrengthSupportRatio,
    /// Fourth term; `None` when the ratio is non-positive
    pub strength_support: Option<f64>,
}

impl RigidTerms {
    /// Sum of the four terms, `None` when the strength/support term is undefined.
    pub fn log10_w18(&self) -> Option<f64> {
        self.strength_support
            .map(|t4| self.reliability + self.thickness + self.serviceability + t4)
    }
}

/// Thickness term 7.35·log10(D+1) − 0.06
#[inline]
pub fn thickness_term(d_in: f64) -> f64 {
    7.35 * (d_in + 1.0).log10() - 0.06
}

/// Serviceability term log10(ΔPSI/3.0) / (1 + 1.624e7/(D+1)^8.46)
#[inline]
pub fn serviceability_term(d_in: f64, delta_psi: f64) -> f64 {
    (delta_psi / RIGID_PSI_SPAN).log10() / (1.0 + 1.624e7 / (d_in + 1.0).powf(8.46))
}

/// Evaluate every term of the rigid equation.
///
/// Inputs are assumed validated by the caller (positive moduli, ΔPSI > 0,
/// D ≥ 0); only the strength/support ratio can leave the domain.
#[allow(clippy::too_many_arguments)]
pub fn rigid_terms(
    d_in: f64,
    zr: f64,
    so: f64,
    delta_psi: f64,
    pt: f64,
    sc_psi: f64,
    cd: f64,
    j: f64,
    ec_psi: f64,
    k_pci: f64,
) -> RigidTerms {
    let ratio = StrengthSupportRatio::compute(d_in, sc_psi, cd, j, ec_psi, k_pci);
    let strength_coefficient = 4.22 - 0.32 * pt;
    RigidTerms {
        reliability: zr * so,
        thickness: thickness_term(d_in),
        serviceability: serviceability_term(d_in, delta_psi),
        strength_coefficient,
        ratio,
        strength_support: ratio.value().map(|r| strength_coefficient * r.log10()),
    }
}
