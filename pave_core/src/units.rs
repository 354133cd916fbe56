//! # Unit Types and Conversions
//!
//! Type-safe wrappers for the units that appear in pavement design, plus the
//! handful of empirical strength/modulus conversions the design equations
//! consume. These are lightweight f64 newtypes that serialize as bare numbers.
//!
//! ## Working Units
//!
//! The AASHTO 1993 equations are calibrated in US customary units, while
//! field data usually arrives in metric:
//! - Thickness: inches (equations), centimeters (drawings and input)
//! - Modulus / stress: psi (equations), MPa and ksc (input)
//! - Subgrade reaction: pci
//!
//! ## Example
//!
//! ```rust
//! use pave_core::units::{Centimeters, Inches, Mpa, Psi};
//!
//! let slab = Centimeters(30.48);
//! let slab_in: Inches = slab.into();
//! assert!((slab_in.0 - 12.0).abs() < 1e-12);
//!
//! let mr: Psi = Mpa(100.0).into();
//! assert!((mr.0 - 14_503.8).abs() < 0.1);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// psi per MPa
pub const PSI_PER_MPA: f64 = 145.038;

/// psi per ksc (kg/cm²)
pub const PSI_PER_KSC: f64 = 14.223;

/// Heukelom-Klomp style CBR correlation used for subgrade Mr (psi per CBR %)
pub const MR_PSI_PER_CBR: f64 = 1500.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl From<Centimeters> for Inches {
    fn from(cm: Centimeters) -> Self {
        Inches(cm.0 / CM_PER_INCH)
    }
}

impl From<Inches> for Centimeters {
    fn from(inches: Inches) -> Self {
        Centimeters(inches.0 * CM_PER_INCH)
    }
}

// ============================================================================
// Stress / Modulus Units
// ============================================================================

/// Stress or modulus in pounds per square inch
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Psi(pub f64);

/// Stress or modulus in megapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mpa(pub f64);

/// Stress in kilograms-force per square centimeter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksc(pub f64);

impl From<Mpa> for Psi {
    fn from(mpa: Mpa) -> Self {
        Psi(mpa.0 * PSI_PER_MPA)
    }
}

impl From<Psi> for Mpa {
    fn from(psi: Psi) -> Self {
        Mpa(psi.0 / PSI_PER_MPA)
    }
}

impl From<Ksc> for Psi {
    fn from(ksc: Ksc) -> Self {
        Psi(ksc.0 * PSI_PER_KSC)
    }
}

impl From<Psi> for Ksc {
    fn from(psi: Psi) -> Self {
        Ksc(psi.0 / PSI_PER_KSC)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Inches);
impl_arithmetic!(Centimeters);
impl_arithmetic!(Psi);
impl_arithmetic!(Mpa);
impl_arithmetic!(Ksc);

// ============================================================================
// Empirical Conversions
// ============================================================================

/// Convert centimeters to inches (plain f64 form used by the equations)
#[inline]
pub fn cm_to_in(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Convert inches to centimeters
#[inline]
pub fn in_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Subgrade resilient modulus from CBR: Mr = 1500 × CBR (psi)
#[inline]
pub fn mr_from_cbr(cbr_percent: f64) -> Psi {
    Psi(MR_PSI_PER_CBR * cbr_percent)
}

/// Cylinder compressive strength from cube strength: f'c ≈ 0.8 × f_cube
#[inline]
pub fn cube_to_cylinder(fc_cube: Ksc) -> Ksc {
    Ksc(0.8 * fc_cube.0)
}

/// Concrete elastic modulus (ACI 318): Ec = 57000 √f'c, f'c in psi
///
/// Takes the *cylinder* strength.
#[inline]
pub fn concrete_modulus(fc_cylinder: Ksc) -> Psi {
    let fc_psi: Psi = fc_cylinder.into();
    Psi(57_000.0 * fc_psi.0.sqrt())
}

/// Modulus of rupture estimate: Sc = 10 √f'c, f'c in psi
#[inline]
pub fn modulus_of_rupture(fc_cylinder: Ksc) -> Psi {
    let fc_psi: Psi = fc_cylinder.into();
    Psi(10.0 * fc_psi.0.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_inches() {
        let inches: Inches = Centimeters(12.7).into();
        assert!((inches.0 - 5.0).abs() < 1e-12);
        assert!((cm_to_in(5.0) - 1.9685).abs() < 1e-4);
        assert!((in_to_cm(5.0) - 12.7).abs() < 1e-12);
    }

    #[test]
    fn test_modulus_conversions() {
        let psi: Psi = Mpa(2500.0).into();
        assert!((psi.0 - 362_595.0).abs() < 1.0);
        let ksc: Ksc = Psi(14.223).into();
        assert!((ksc.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mr_from_cbr() {
        assert_eq!(mr_from_cbr(5.0).0, 7500.0);
    }

    #[test]
    fn test_concrete_estimates() {
        // 350 ksc cube -> 280 ksc cylinder -> 3982.4 psi
        let fc = cube_to_cylinder(Ksc(350.0));
        assert!((fc.0 - 280.0).abs() < 1e-9);

        let ec = concrete_modulus(fc);
        assert!((ec.0 - 3_597_082.0).abs() < 50.0);

        let sc = modulus_of_rupture(fc);
        assert!((sc.0 - 631.07).abs() < 0.05);
    }

    #[test]
    fn test_arithmetic() {
        let a = Inches(10.0);
        let b = Inches(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let psi = Psi(7500.0);
        let json = serde_json::to_string(&psi).unwrap();
        assert_eq!(json, "7500.0");

        let roundtrip: Psi = serde_json::from_str(&json).unwrap();
        assert_eq!(psi, roundtrip);
    }
}
