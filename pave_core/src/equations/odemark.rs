//! # Odemark Equivalent Thickness
//!
//! Transforms a multi-layer foundation into a single equivalent thickness
//! relative to the subgrade modulus:
//!
//! ```text
//! he = h × (E_layer / E_subgrade)^(1/3)
//! ```
//!
//! Layers with non-positive thickness are skipped. A non-positive subgrade
//! modulus is rejected.

use serde::{Deserialize, Serialize};

use crate::errors::{require_finite, require_positive, CalcResult};

/// One foundation layer beneath a slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationLayer {
    /// Display name (opaque to the calculation)
    pub name: String,

    /// Layer thickness (cm)
    pub thickness_cm: f64,

    /// Layer elastic modulus (MPa)
    pub modulus_mpa: f64,
}

/// Per-layer transform record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdemarkLayer {
    pub name: String,
    pub thickness_cm: f64,
    pub modulus_mpa: f64,
    /// E_layer / E_subgrade
    pub modulus_ratio: f64,
    /// (E_layer / E_subgrade)^(1/3)
    pub factor: f64,
    pub equivalent_thickness_cm: f64,
}

/// Totals over all transformed layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdemarkResult {
    pub subgrade_modulus_mpa: f64,
    pub layers: Vec<OdemarkLayer>,
    pub total_thickness_cm: f64,
    pub total_equivalent_thickness_cm: f64,
}

/// Compute equivalent thicknesses for a foundation stack.
pub fn equivalent_thickness(layers: &[FoundationLayer], subgrade_modulus_mpa: f64) -> CalcResult<OdemarkResult> {
    require_positive("subgrade_modulus_mpa", subgrade_modulus_mpa)?;

    let mut transformed = Vec::with_capacity(layers.len());
    for layer in layers {
        require_finite("thickness_cm", layer.thickness_cm)?;
        if layer.thickness_cm <= 0.0 {
            continue;
        }
        require_positive("modulus_mpa", layer.modulus_mpa)?;

        let modulus_ratio = layer.modulus_mpa / subgrade_modulus_mpa;
        let factor = modulus_ratio.cbrt();
        transformed.push(OdemarkLayer {
            name: layer.name.clone(),
            thickness_cm: layer.thickness_cm,
            modulus_mpa: layer.modulus_mpa,
            modulus_ratio,
            factor,
            equivalent_thickness_cm: layer.thickness_cm * factor,
        });
    }

    Ok(OdemarkResult {
        subgrade_modulus_mpa,
        total_thickness_cm: transformed.iter().map(|l| l.thickness_cm).sum(),
        total_equivalent_thickness_cm: transformed.iter().map(|l| l.equivalent_thickness_cm).sum(),
        layers: transformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, thickness_cm: f64, modulus_mpa: f64) -> FoundationLayer {
        FoundationLayer {
            name: name.to_string(),
            thickness_cm,
            modulus_mpa,
        }
    }

    #[test]
    fn test_eightfold_modulus_doubles_thickness() {
        let result = equivalent_thickness(&[layer("CTB", 20.0, 400.0)], 50.0).unwrap();
        assert!((result.layers[0].factor - 2.0).abs() < 1e-12);
        assert!((result.total_equivalent_thickness_cm - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_skips_empty_layers() {
        let result = equivalent_thickness(&[layer("A", 0.0, 100.0), layer("B", 15.0, 50.0)], 50.0).unwrap();
        assert_eq!(result.layers.len(), 1);
        assert!((result.total_thickness_cm - 15.0).abs() < 1e-12);
        assert!((result.total_equivalent_thickness_cm - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_subgrade() {
        assert!(equivalent_thickness(&[layer("A", 10.0, 100.0)], 0.0).is_err());
    }
}
