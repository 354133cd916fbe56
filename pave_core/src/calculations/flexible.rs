//! # Flexible Pavement Layer Allocation
//!
//! Sizes the layers of a flexible pavement per the AASHTO 1993 layered
//! analysis. For each layer, surface first:
//!
//! 1. Solve the SN required at the top of the layer, using the resilient
//!    modulus of the material immediately below it (the next layer, or the
//!    subgrade for the bottom layer).
//! 2. Minimum thickness = `max(0, SN_required − SN_cumulative) / (a·m)`.
//! 3. The layer passes if its design thickness is at least the minimum.
//! 4. The design thickness contributes `a·D·m` to the cumulative SN.
//!
//! Each requirement depends only on the support beneath that layer. Building
//! a shallow layer thicker raises the cumulative SN that deeper layers start
//! from, but never lowers what those deeper layers require.
//!
//! A layer with a zero layer or drainage coefficient is a placeholder: its
//! minimum thickness is reported as zero, it contributes nothing, and it is
//! skipped when looking for the support under the layer above it.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::flexible::{calculate, FlexibleDesignInput, LayerInput};
//! use pave_core::materials::FlexibleMaterial;
//! use pave_core::reliability::{ReliabilityParameters, Serviceability};
//! use pave_core::solver::SolverConfig;
//!
//! let input = FlexibleDesignInput {
//!     label: "Main carriageway".to_string(),
//!     w18: 5_000_000.0,
//!     reliability: ReliabilityParameters::from_percent(90.0, 0.45).unwrap(),
//!     serviceability: Serviceability::new(4.2, 2.5),
//!     subgrade_mr_psi: 7500.0,
//!     layers: vec![
//!         LayerInput::from_material(FlexibleMaterial::AsphaltConcrete, 10.0),
//!         LayerInput::from_material(FlexibleMaterial::CementTreatedBase, 20.0),
//!         LayerInput::from_material(FlexibleMaterial::AggregateSubbase, 30.0),
//!     ],
//! };
//!
//! let result = calculate(&input, &SolverConfig::default()).unwrap();
//! println!("SN required: {:.2}", result.total_sn_required);
//! println!("SN provided: {:.2}", result.total_sn_provided);
//! println!("Pass: {}", result.passes());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::equations::PerformanceEquation;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::materials::FlexibleMaterial;
use crate::reliability::{ReliabilityParameters, Serviceability};
use crate::solver::{SolverConfig, StructuralNumberSolver};
use crate::units::{cm_to_in, in_to_cm};

/// Slack when comparing a design thickness against its minimum (in)
const THICKNESS_TOLERANCE_IN: f64 = 1e-9;

/// One layer of the structure, as entered by the designer.
///
/// ## JSON Example
///
/// ```json
/// {
///   "material": "AC",
///   "layer_coeff": 0.40,
///   "drainage_coeff": 1.0,
///   "modulus_psi": 362500.0,
///   "thickness_cm": 10.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInput {
    /// Material identity (opaque to the calculation)
    pub material: String,

    /// AASHTO layer coefficient a_i
    pub layer_coeff: f64,

    /// Drainage coefficient m_i
    pub drainage_coeff: f64,

    /// Resilient modulus of this layer (psi); the support for the layer above
    pub modulus_psi: f64,

    /// Design thickness (cm)
    pub thickness_cm: f64,
}

impl LayerInput {
    /// Layer with catalog defaults for the given material.
    pub fn from_material(material: FlexibleMaterial, thickness_cm: f64) -> Self {
        let props = material.properties();
        LayerInput {
            material: material.code().to_string(),
            layer_coeff: props.layer_coeff,
            drainage_coeff: props.drainage_coeff,
            modulus_psi: props.mr_psi,
            thickness_cm,
        }
    }

    /// Override the drainage coefficient.
    pub fn with_drainage(mut self, drainage_coeff: f64) -> Self {
        self.drainage_coeff = drainage_coeff;
        self
    }

    /// Zero layer or drainage coefficient: the layer cannot carry SN.
    pub fn is_degenerate(&self) -> bool {
        self.layer_coeff == 0.0 || self.drainage_coeff == 0.0
    }

    pub fn thickness_in(&self) -> f64 {
        cm_to_in(self.thickness_cm)
    }

    /// SN contributed by the design thickness: a·D·m
    pub fn sn_contribution(&self) -> f64 {
        self.layer_coeff * self.thickness_in() * self.drainage_coeff
    }

    fn validate(&self, index: usize) -> CalcResult<()> {
        let field = |name: &str| format!("layers[{}].{}", index, name);
        require_non_negative(&field("layer_coeff"), self.layer_coeff)?;
        require_non_negative(&field("drainage_coeff"), self.drainage_coeff)?;
        require_non_negative(&field("thickness_cm"), self.thickness_cm)?;
        if self.is_degenerate() {
            require_non_negative(&field("modulus_psi"), self.modulus_psi)
        } else {
            require_positive(&field("modulus_psi"), self.modulus_psi)
        }
    }
}

/// Input parameters for a flexible pavement design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexibleDesignInput {
    /// User label (e.g., "Main carriageway")
    pub label: String,

    /// Design traffic W18 (ESAL)
    pub w18: f64,

    pub reliability: ReliabilityParameters,

    pub serviceability: Serviceability,

    /// Subgrade resilient modulus (psi)
    pub subgrade_mr_psi: f64,

    /// Layers, surface first
    pub layers: Vec<LayerInput>,
}

impl FlexibleDesignInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("w18", self.w18)?;
        self.reliability.validate()?;
        self.serviceability.validate()?;
        require_positive("subgrade_mr_psi", self.subgrade_mr_psi)?;
        if self.layers.is_empty() {
            return Err(CalcError::invalid_input("layers", "[]", "At least one layer is required"));
        }
        for (index, layer) in self.layers.iter().enumerate() {
            layer.validate(index)?;
        }
        Ok(())
    }

    /// Performance equation on the subgrade.
    pub fn equation(&self) -> PerformanceEquation {
        PerformanceEquation::new(self.w18, self.reliability, self.serviceability.loss(), self.subgrade_mr_psi)
    }

    /// Modulus of the material directly beneath each layer.
    ///
    /// Degenerate layers are transparent: a layer resting on a placeholder
    /// takes its support from the next real layer, or the subgrade.
    pub fn support_moduli(&self) -> Vec<f64> {
        (0..self.layers.len())
            .map(|i| {
                self.layers[i + 1..]
                    .iter()
                    .find(|layer| !layer.is_degenerate())
                    .map(|layer| layer.modulus_psi)
                    .unwrap_or(self.subgrade_mr_psi)
            })
            .collect()
    }

    /// Total design thickness of all layers (cm)
    pub fn total_thickness_cm(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness_cm).sum()
    }
}

/// Requirement and check for one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerReport {
    /// 1-based position from the surface
    pub layer_no: usize,
    pub material: String,
    pub layer_coeff: f64,
    pub drainage_coeff: f64,

    /// Modulus of the material below this layer (psi)
    pub support_mr_psi: f64,

    /// SN required at the top of this layer
    pub sn_required: f64,

    /// Minimum thickness (in)
    pub min_thickness_in: f64,
    /// Minimum thickness (cm)
    pub min_thickness_cm: f64,

    pub design_thickness_cm: f64,
    pub design_thickness_in: f64,

    /// How far the design falls short of the minimum (in); zero when it passes
    pub shortfall_in: f64,

    /// a·D·m for the design thickness
    pub sn_contribution: f64,

    /// Running SN through this layer
    pub cumulative_sn: f64,

    /// Design thickness meets the minimum
    pub is_ok: bool,

    /// Zero layer or drainage coefficient; minimum forced to zero
    pub degenerate: bool,
}

/// Overall SN check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnCheck {
    pub passed: bool,
    /// SN provided − SN required
    pub safety_margin: f64,
}

/// Results from a flexible allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexibleResult {
    pub layers: Vec<LayerReport>,

    /// SN required on the subgrade
    pub total_sn_required: f64,

    /// Σ a·D·m over all layers
    pub total_sn_provided: f64,

    pub check: SnCheck,

    /// W18 the provided structure supports on this subgrade
    pub w18_supported: Option<f64>,
}

impl FlexibleResult {
    /// Every layer meets its minimum and the total SN suffices
    pub fn passes(&self) -> bool {
        self.check.passed && self.layers.iter().all(|l| l.is_ok)
    }

    /// Layers that fail their minimum thickness
    pub fn failing_layers(&self) -> impl Iterator<Item = &LayerReport> {
        self.layers.iter().filter(|l| !l.is_ok)
    }
}

/// Minimum thickness (in) to supply the SN still missing above a layer.
///
/// Returns `None` for a degenerate layer (zero or negative a·m), where the
/// formula has no meaning.
pub fn minimum_thickness_in(sn_required: f64, cumulative_sn: f64, layer_coeff: f64, drainage_coeff: f64) -> Option<f64> {
    let capacity = layer_coeff * drainage_coeff;
    if capacity <= 0.0 {
        return None;
    }
    Some((sn_required - cumulative_sn).max(0.0) / capacity)
}

/// Compare provided against required SN.
pub fn check_design(sn_required: f64, sn_provided: f64) -> SnCheck {
    SnCheck {
        passed: sn_provided >= sn_required,
        safety_margin: sn_provided - sn_required,
    }
}

/// Cascade known per-layer requirements down the structure.
///
/// `sn_required[i]` is the SN required at the top of `layers[i]` and
/// `support_moduli[i]` the modulus beneath it; both must be as long as
/// `layers`.
pub fn cascade(layers: &[LayerInput], sn_required: &[f64], support_moduli: &[f64]) -> Vec<LayerReport> {
    debug_assert_eq!(layers.len(), sn_required.len());
    debug_assert_eq!(layers.len(), support_moduli.len());

    let mut cumulative_sn = 0.0;
    layers
        .iter()
        .zip(sn_required)
        .zip(support_moduli)
        .enumerate()
        .map(|(i, ((layer, &required), &support))| {
            let min_in = minimum_thickness_in(required, cumulative_sn, layer.layer_coeff, layer.drainage_coeff);
            let degenerate = min_in.is_none();
            let min_thickness_in = min_in.unwrap_or(0.0);
            let design_thickness_in = layer.thickness_in();
            let is_ok = design_thickness_in + THICKNESS_TOLERANCE_IN >= min_thickness_in;

            let sn_contribution = if degenerate { 0.0 } else { layer.sn_contribution() };
            cumulative_sn += sn_contribution;

            LayerReport {
                layer_no: i + 1,
                material: layer.material.clone(),
                layer_coeff: layer.layer_coeff,
                drainage_coeff: layer.drainage_coeff,
                support_mr_psi: support,
                sn_required: required,
                min_thickness_in,
                min_thickness_cm: in_to_cm(min_thickness_in),
                design_thickness_cm: layer.thickness_cm,
                design_thickness_in,
                shortfall_in: if is_ok { 0.0 } else { min_thickness_in - design_thickness_in },
                sn_contribution,
                cumulative_sn,
                is_ok,
                degenerate,
            }
        })
        .collect()
}

/// Runs the structural-number solver once per layer and cascades the results.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerAllocator {
    solver: StructuralNumberSolver,
}

impl LayerAllocator {
    pub fn new(config: SolverConfig) -> Self {
        LayerAllocator {
            solver: StructuralNumberSolver::new(config),
        }
    }

    /// SN required at the top of each layer, one solver call per layer.
    pub fn requirements(&self, input: &FlexibleDesignInput) -> CalcResult<Vec<f64>> {
        let equation = input.equation();
        input
            .support_moduli()
            .into_iter()
            .map(|mr| self.solver.solve(&equation.with_support(mr)).map(|s| s.sn))
            .collect()
    }

    /// The structure rebuilt with every layer at its minimum thickness.
    ///
    /// Minimums cascade from the surface: each layer's minimum is taken
    /// against the SN of the minimal layers above it, not the design ones.
    pub fn minimum_structure(&self, input: &FlexibleDesignInput) -> CalcResult<FlexibleDesignInput> {
        input.validate()?;
        let sn_required = self.requirements(input)?;

        let mut minimal = input.clone();
        let mut cumulative_sn = 0.0;
        for (layer, required) in minimal.layers.iter_mut().zip(sn_required) {
            match minimum_thickness_in(required, cumulative_sn, layer.layer_coeff, layer.drainage_coeff) {
                Some(min_in) => {
                    layer.thickness_cm = in_to_cm(min_in);
                    cumulative_sn += layer.sn_contribution();
                }
                None => layer.thickness_cm = 0.0,
            }
        }
        Ok(minimal)
    }

    /// Allocate minimum thicknesses and check the design.
    pub fn allocate(&self, input: &FlexibleDesignInput) -> CalcResult<FlexibleResult> {
        input.validate()?;

        info!(
            event = "allocation_start",
            label = %input.label,
            layers = input.layers.len(),
            w18 = input.w18,
            subgrade_mr_psi = input.subgrade_mr_psi,
        );

        let support_moduli = input.support_moduli();
        let sn_required = self.requirements(input)?;
        let layers = cascade(&input.layers, &sn_required, &support_moduli);

        for layer in layers.iter().filter(|l| l.degenerate) {
            warn!(
                event = "degenerate_layer",
                layer_no = layer.layer_no,
                material = %layer.material,
                "layer has a zero coefficient; minimum thickness reported as zero"
            );
        }

        let equation = input.equation();
        let total_sn_required = self.solver.solve(&equation)?.sn;
        let total_sn_provided = layers.last().map(|l| l.cumulative_sn).unwrap_or(0.0);
        let check = check_design(total_sn_required, total_sn_provided);

        info!(
            event = "allocation_end",
            total_sn_required,
            total_sn_provided,
            passed = check.passed,
        );

        Ok(FlexibleResult {
            layers,
            total_sn_required,
            total_sn_provided,
            check,
            w18_supported: equation.supported_w18(total_sn_provided),
        })
    }
}

/// Calculate a flexible pavement design.
///
/// # Returns
///
/// * `Ok(FlexibleResult)` - Per-layer report and overall check
/// * `Err(CalcError::InvalidDomainInput)` - A parameter is out of its domain
/// * `Err(CalcError::NoRootInBracket)` - The traffic target cannot be met by any SN in the bracket
pub fn calculate(input: &FlexibleDesignInput, config: &SolverConfig) -> CalcResult<FlexibleResult> {
    LayerAllocator::new(*config).allocate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input(layers: Vec<LayerInput>) -> FlexibleDesignInput {
        FlexibleDesignInput {
            label: "Test Section".to_string(),
            w18: 5_000_000.0,
            reliability: ReliabilityParameters { zr: -1.282, so: 0.45 },
            serviceability: Serviceability::new(4.2, 2.5),
            subgrade_mr_psi: 7500.0,
            layers,
        }
    }

    fn typical_layers() -> Vec<LayerInput> {
        vec![
            LayerInput::from_material(FlexibleMaterial::AsphaltConcrete, 10.0),
            LayerInput::from_material(FlexibleMaterial::CementTreatedBase, 20.0),
            LayerInput::from_material(FlexibleMaterial::AggregateSubbase, 30.0),
            LayerInput::from_material(FlexibleMaterial::SelectedMaterial, 30.0),
        ]
    }

    fn layer(a: f64, m: f64, modulus_psi: f64, thickness_cm: f64) -> LayerInput {
        LayerInput {
            material: "X".to_string(),
            layer_coeff: a,
            drainage_coeff: m,
            modulus_psi,
            thickness_cm,
        }
    }

    #[test]
    fn test_single_layer_closed_form() {
        let input = test_input(vec![layer(0.40, 1.0, 362_500.0, 12.0)]);
        let result = calculate(&input, &SolverConfig::default()).unwrap();
        let report = &result.layers[0];

        assert!((report.sn_required - result.total_sn_required).abs() < 1e-12);
        assert_eq!(report.min_thickness_in, report.sn_required / (0.40 * 1.0));
    }

    #[test]
    fn test_single_layer_shortfall() {
        // SN required 2.0, a = 0.40, m = 1.0, design 5 cm
        let layers = vec![layer(0.40, 1.0, 362_500.0, 5.0)];
        let reports = cascade(&layers, &[2.0], &[7500.0]);
        let report = &reports[0];

        assert!((report.min_thickness_in - 5.0).abs() < 1e-12);
        assert!((report.min_thickness_cm - 12.7).abs() < 1e-9);
        assert!(!report.is_ok);
        assert!((report.shortfall_in - 3.031).abs() < 1e-3);
    }

    #[test]
    fn test_minimum_thicknesses_sum_to_subgrade_requirement() {
        let allocator = LayerAllocator::new(SolverConfig::default());
        let minimal = allocator.minimum_structure(&test_input(typical_layers())).unwrap();
        let result = allocator.allocate(&minimal).unwrap();

        let sum: f64 = result.layers.iter().map(|l| l.sn_contribution).sum();
        assert!((sum - result.total_sn_required).abs() < 1e-6);
        assert!(result.layers.iter().all(|l| l.is_ok && l.shortfall_in == 0.0));
    }

    #[test]
    fn test_design_at_reported_minimum_passes() {
        let config = SolverConfig::default();
        let mut input = test_input(typical_layers());
        let first = calculate(&input, &config).unwrap();
        input.layers[0].thickness_cm = first.layers[0].min_thickness_cm;

        let report = &calculate(&input, &config).unwrap().layers[0];
        assert!(report.is_ok);
        assert_eq!(report.shortfall_in, 0.0);

        // Just under the minimum still fails
        input.layers[0].thickness_cm -= 0.01;
        let report = &calculate(&input, &config).unwrap().layers[0];
        assert!(!report.is_ok);
        assert!(report.shortfall_in > 0.0);
    }

    #[test]
    fn test_requirements_follow_support_below() {
        let input = test_input(typical_layers());
        let result = calculate(&input, &SolverConfig::default()).unwrap();

        assert_eq!(result.layers[0].support_mr_psi, 174_000.0);
        assert_eq!(result.layers[3].support_mr_psi, 7500.0);
        // Softer support deeper down -> larger requirement
        for pair in result.layers.windows(2) {
            assert!(pair[1].sn_required > pair[0].sn_required);
        }
        assert!((result.layers[3].sn_required - result.total_sn_required).abs() < 1e-12);
    }

    #[test]
    fn test_overbuilt_surface_keeps_deeper_requirements() {
        let config = SolverConfig::default();
        let thin = test_input(typical_layers());
        let mut thick = thin.clone();
        thick.layers[0].thickness_cm = 40.0;

        let thin_result = calculate(&thin, &config).unwrap();
        let thick_result = calculate(&thick, &config).unwrap();

        for (a, b) in thin_result.layers.iter().zip(&thick_result.layers) {
            assert_eq!(a.sn_required, b.sn_required);
        }
        assert!(thick_result.layers[1].min_thickness_in <= thin_result.layers[1].min_thickness_in);
        assert!(thick_result.layers[1].cumulative_sn > thin_result.layers[1].cumulative_sn);
    }

    #[test]
    fn test_degenerate_layer_reports_zero_minimum() {
        let mut layers = typical_layers();
        layers.insert(2, LayerInput::from_material(FlexibleMaterial::None, 0.0));
        let input = test_input(layers);
        let result = calculate(&input, &SolverConfig::default()).unwrap();

        let placeholder = &result.layers[2];
        assert!(placeholder.degenerate);
        assert_eq!(placeholder.min_thickness_in, 0.0);
        assert_eq!(placeholder.sn_contribution, 0.0);
        assert!(placeholder.is_ok);
        assert!(placeholder.min_thickness_in.is_finite());

        // The base above the placeholder rests on the subbase
        assert_eq!(result.layers[1].support_mr_psi, 21_750.0);
        assert_eq!(result.layers[2].cumulative_sn, result.layers[1].cumulative_sn);
    }

    #[test]
    fn test_zero_drainage_is_degenerate() {
        assert!(minimum_thickness_in(3.0, 1.0, 0.14, 0.0).is_none());
        assert_eq!(minimum_thickness_in(1.0, 3.0, 0.14, 1.0), Some(0.0));
    }

    #[test]
    fn test_check_design() {
        let check = check_design(4.5, 5.0);
        assert!(check.passed);
        assert!((check.safety_margin - 0.5).abs() < 1e-12);
        assert!(!check_design(4.5, 4.0).passed);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut input = test_input(typical_layers());
        input.subgrade_mr_psi = 0.0;
        assert!(calculate(&input, &SolverConfig::default()).is_err());

        let mut input = test_input(typical_layers());
        input.layers[1].layer_coeff = -0.1;
        let err = calculate(&input, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDomainInput { ref field, .. } if field == "layers[1].layer_coeff"));

        let input = test_input(vec![]);
        assert!(calculate(&input, &SolverConfig::default()).is_err());
    }

    #[test]
    fn test_infeasible_traffic_is_reported() {
        let mut input = test_input(typical_layers());
        input.w18 = 1e30;
        let err = calculate(&input, &SolverConfig::default()).unwrap_err();
        assert!(err.is_design_envelope());
    }

    #[test]
    fn test_supported_traffic_reported() {
        let input = test_input(typical_layers());
        let result = calculate(&input, &SolverConfig::default()).unwrap();
        let supported = result.w18_supported.unwrap();
        assert_eq!(supported > input.w18, result.check.passed);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let input = test_input(typical_layers());
        let json = serde_json::to_string_pretty(&input).unwrap();
        let roundtrip: FlexibleDesignInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
