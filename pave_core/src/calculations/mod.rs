//! # Pavement Design Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`flexible`] - Layered flexible pavement allocation (AASHTO 1993)
//! - [`rigid`] - Concrete slab capacity and thickness scan (AASHTO 1993)
//! - [`nomograph`] - Readings from a calibrated design chart

pub mod flexible;
pub mod nomograph;
pub mod rigid;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::project::GlobalSettings;

// Re-export commonly used types
pub use flexible::{FlexibleDesignInput, FlexibleResult, LayerAllocator, LayerInput, LayerReport};
pub use nomograph::{NomographInput, NomographResult, ReadingRequest};
pub use rigid::{Capacity, RigidCapacityEvaluator, RigidDesignInput, RigidResult, RigidSlabParameters};

/// Enum wrapper for all calculation types.
///
/// This allows storing heterogeneous calculations in a single collection
/// while maintaining type safety and clean serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Flexible pavement layer allocation
    Flexible(FlexibleDesignInput),
    /// Rigid pavement capacity
    Rigid(RigidDesignInput),
    /// Nomograph chart reading
    Nomograph(NomographInput),
}

/// Output of running a [`CalculationItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Flexible(FlexibleResult),
    Rigid(RigidResult),
    Nomograph(NomographResult),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Flexible(f) => &f.label,
            CalculationItem::Rigid(r) => &r.label,
            CalculationItem::Nomograph(n) => &n.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Flexible(_) => "Flexible",
            CalculationItem::Rigid(_) => "Rigid",
            CalculationItem::Nomograph(_) => "Nomograph",
        }
    }

    /// Run the calculation with the project's settings.
    pub fn run(&self, settings: &GlobalSettings) -> CalcResult<CalculationOutput> {
        match self {
            CalculationItem::Flexible(input) => {
                flexible::calculate(input, &settings.solver).map(CalculationOutput::Flexible)
            }
            CalculationItem::Rigid(input) => rigid::calculate(input).map(CalculationOutput::Rigid),
            CalculationItem::Nomograph(input) => nomograph::calculate(input).map(CalculationOutput::Nomograph),
        }
    }
}

impl CalculationOutput {
    /// Whether the design passes; nomograph readings have no verdict
    pub fn passes(&self) -> Option<bool> {
        match self {
            CalculationOutput::Flexible(r) => Some(r.passes()),
            CalculationOutput::Rigid(r) => Some(r.passes()),
            CalculationOutput::Nomograph(_) => None,
        }
    }
}
