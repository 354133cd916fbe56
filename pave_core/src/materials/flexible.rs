//! Flexible Pavement Layer Materials
//!
//! Default layer coefficients, drainage coefficients and resilient moduli for
//! the standard highway-department layer materials. The `None` entry is a
//! placeholder for an omitted layer: it carries a zero layer coefficient and
//! zero modulus, and the allocator treats it as a degenerate layer.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Position of a material in the pavement structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerRole {
    Surface,
    Base,
    Subbase,
    Selected,
    /// Placeholder for an unused layer slot
    None,
}

/// Flexible pavement layer materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlexibleMaterial {
    /// Asphalt concrete surface
    #[serde(rename = "AC")]
    AsphaltConcrete,
    /// Polymer modified asphalt surface
    #[serde(rename = "PMA")]
    PolymerModifiedAsphalt,
    /// Cement treated base
    #[serde(rename = "CTB")]
    CementTreatedBase,
    /// Modified crushed rock base (UCS 24.5 ksc)
    #[serde(rename = "MOD.CRB")]
    ModifiedCrushedRockBase,
    /// Crushed rock base (CBR 80%)
    #[serde(rename = "CAB")]
    CrushedRockBase,
    /// Soil cement base (UCS 17.5 ksc)
    #[serde(rename = "SCB")]
    SoilCementBase,
    /// Recycled asphalt pavement base
    #[serde(rename = "RAP")]
    RecycledBase,
    /// Aggregate subbase (CBR 25%)
    #[serde(rename = "GSB")]
    AggregateSubbase,
    /// Selected material, grade A
    #[serde(rename = "SM-A")]
    SelectedMaterial,
    /// No material (layer omitted)
    #[serde(rename = "NONE")]
    None,
}

/// Default design values for a layer material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerMaterialProperties {
    /// AASHTO layer coefficient a_i
    pub layer_coeff: f64,
    /// Drainage coefficient m_i
    pub drainage_coeff: f64,
    /// Resilient modulus (psi)
    pub mr_psi: f64,
    /// Resilient modulus (MPa)
    pub mr_mpa: f64,
    pub role: LayerRole,
}

static BY_CODE: Lazy<HashMap<&'static str, FlexibleMaterial>> = Lazy::new(|| {
    FlexibleMaterial::ALL
        .iter()
        .map(|m| (m.code(), *m))
        .collect()
});

impl FlexibleMaterial {
    /// All materials, surface first
    pub const ALL: [FlexibleMaterial; 10] = [
        FlexibleMaterial::AsphaltConcrete,
        FlexibleMaterial::PolymerModifiedAsphalt,
        FlexibleMaterial::CementTreatedBase,
        FlexibleMaterial::ModifiedCrushedRockBase,
        FlexibleMaterial::CrushedRockBase,
        FlexibleMaterial::SoilCementBase,
        FlexibleMaterial::RecycledBase,
        FlexibleMaterial::AggregateSubbase,
        FlexibleMaterial::SelectedMaterial,
        FlexibleMaterial::None,
    ];

    /// Short code (e.g., "AC", "CTB")
    pub fn code(&self) -> &'static str {
        match self {
            FlexibleMaterial::AsphaltConcrete => "AC",
            FlexibleMaterial::PolymerModifiedAsphalt => "PMA",
            FlexibleMaterial::CementTreatedBase => "CTB",
            FlexibleMaterial::ModifiedCrushedRockBase => "MOD.CRB",
            FlexibleMaterial::CrushedRockBase => "CAB",
            FlexibleMaterial::SoilCementBase => "SCB",
            FlexibleMaterial::RecycledBase => "RAP",
            FlexibleMaterial::AggregateSubbase => "GSB",
            FlexibleMaterial::SelectedMaterial => "SM-A",
            FlexibleMaterial::None => "NONE",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FlexibleMaterial::AsphaltConcrete => "Asphalt Concrete",
            FlexibleMaterial::PolymerModifiedAsphalt => "Polymer Modified Asphalt",
            FlexibleMaterial::CementTreatedBase => "Cement Treated Base",
            FlexibleMaterial::ModifiedCrushedRockBase => "Modified Crushed Rock Base",
            FlexibleMaterial::CrushedRockBase => "Crushed Rock Base",
            FlexibleMaterial::SoilCementBase => "Soil Cement Base",
            FlexibleMaterial::RecycledBase => "Recycled Asphalt Pavement",
            FlexibleMaterial::AggregateSubbase => "Aggregate Subbase",
            FlexibleMaterial::SelectedMaterial => "Selected Material",
            FlexibleMaterial::None => "None",
        }
    }

    /// Parse from a code or display name, ignoring case and separators
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '_'], "-");
        if let Some(material) = BY_CODE.get(normalized.as_str()) {
            return Ok(*material);
        }
        FlexibleMaterial::ALL
            .iter()
            .find(|m| m.display_name().to_uppercase().replace(' ', "-") == normalized)
            .copied()
            .ok_or_else(|| CalcError::material_not_found(s))
    }

    /// Default design values
    pub fn properties(&self) -> LayerMaterialProperties {
        let (layer_coeff, mr_psi, mr_mpa, role) = match self {
            FlexibleMaterial::AsphaltConcrete => (0.40, 362_500.0, 2500.0, LayerRole::Surface),
            FlexibleMaterial::PolymerModifiedAsphalt => (0.40, 536_500.0, 3700.0, LayerRole::Surface),
            FlexibleMaterial::CementTreatedBase => (0.18, 174_000.0, 1200.0, LayerRole::Base),
            FlexibleMaterial::ModifiedCrushedRockBase => (0.15, 123_250.0, 850.0, LayerRole::Base),
            FlexibleMaterial::CrushedRockBase => (0.13, 50_750.0, 350.0, LayerRole::Base),
            FlexibleMaterial::SoilCementBase => (0.13, 50_750.0, 350.0, LayerRole::Base),
            FlexibleMaterial::RecycledBase => (0.15, 123_250.0, 850.0, LayerRole::Base),
            FlexibleMaterial::AggregateSubbase => (0.10, 21_750.0, 150.0, LayerRole::Subbase),
            FlexibleMaterial::SelectedMaterial => (0.08, 14_504.0, 100.0, LayerRole::Selected),
            FlexibleMaterial::None => (0.0, 0.0, 0.0, LayerRole::None),
        };
        LayerMaterialProperties {
            layer_coeff,
            drainage_coeff: 1.0,
            mr_psi,
            mr_mpa,
            role,
        }
    }
}

impl std::fmt::Display for FlexibleMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
