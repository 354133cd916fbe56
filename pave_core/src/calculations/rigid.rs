//! # Rigid Pavement Capacity
//!
//! Evaluates the traffic a concrete slab can carry per the AASHTO 1993 rigid
//! equation and checks it against the design traffic. Also scans a range of
//! candidate thicknesses and reports the smallest one that passes.
//!
//! When the strength/support ratio has a non-positive numerator or
//! denominator (very thin slabs, or an extreme Ec/k), the logarithm is
//! undefined and the slab is reported as having no capacity rather than an
//! infinite or NaN value.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::rigid::{calculate, RigidDesignInput, RigidSlabParameters, ThicknessScan};
//! use pave_core::materials::PavementType;
//! use pave_core::reliability::{ReliabilityParameters, Serviceability};
//!
//! let input = RigidDesignInput {
//!     label: "Toll plaza".to_string(),
//!     w18: 5_000_000.0,
//!     reliability: ReliabilityParameters::from_percent(90.0, 0.35).unwrap(),
//!     serviceability: Serviceability::new(4.5, 2.5),
//!     pavement_type: PavementType::Jpcp,
//!     slab: RigidSlabParameters {
//!         thickness_in: 12.0,
//!         sc_psi: 650.0,
//!         ec_psi: 3_600_000.0,
//!         load_transfer: 2.8,
//!         drainage_coeff: 1.0,
//!         k_pci: 200.0,
//!     },
//!     scan: ThicknessScan::default(),
//!     foundation: None,
//! };
//!
//! let result = calculate(&input).unwrap();
//! println!("Capacity: {:.3e} ESAL", result.evaluation.capacity.w18());
//! println!("Smallest passing: {:?} in", result.min_passing_thickness_in);
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::equations::{equivalent_thickness, rigid_terms, FoundationLayer, OdemarkResult, RigidTerms};
use crate::errors::{require_finite, require_non_negative, require_positive, CalcError, CalcResult};
use crate::materials::{ConcreteMix, PavementType};
use crate::reliability::{ReliabilityParameters, Serviceability};

/// Slab and support parameters for one candidate thickness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidSlabParameters {
    /// Slab thickness D (in); zero is the "no slab" candidate
    pub thickness_in: f64,

    /// Concrete modulus of rupture Sc (psi)
    pub sc_psi: f64,

    /// Concrete elastic modulus Ec (psi)
    pub ec_psi: f64,

    /// Load transfer coefficient J
    pub load_transfer: f64,

    /// Drainage coefficient Cd
    pub drainage_coeff: f64,

    /// Effective modulus of subgrade reaction k (pci)
    pub k_pci: f64,
}

impl RigidSlabParameters {
    /// Slab with strength-derived moduli and the pavement type's default J.
    pub fn from_mix(
        thickness_in: f64,
        mix: &ConcreteMix,
        pavement_type: PavementType,
        drainage_coeff: f64,
        k_pci: f64,
    ) -> CalcResult<Self> {
        let props = mix.properties()?;
        Ok(RigidSlabParameters {
            thickness_in,
            sc_psi: props.sc_psi,
            ec_psi: props.ec_psi,
            load_transfer: pavement_type.default_load_transfer(),
            drainage_coeff,
            k_pci,
        })
    }

    /// Same slab at a different thickness.
    pub fn with_thickness(&self, thickness_in: f64) -> Self {
        RigidSlabParameters { thickness_in, ..*self }
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("thickness_in", self.thickness_in)?;
        require_positive("sc_psi", self.sc_psi)?;
        require_positive("ec_psi", self.ec_psi)?;
        require_positive("load_transfer", self.load_transfer)?;
        require_positive("drainage_coeff", self.drainage_coeff)?;
        require_positive("k_pci", self.k_pci)
    }
}

/// Why a slab has no capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason")]
pub enum NoCapacityReason {
    /// Strength/support ratio has a non-positive part
    NonPositiveCapacityRatio { numerator: f64, denominator: f64 },
}

/// Supportable traffic of a slab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Capacity {
    /// The equation is undefined for this slab; capacity is zero
    None { cause: NoCapacityReason },
    /// Defined capacity
    Value { log10_w18: f64, w18: f64 },
}

impl Capacity {
    fn from_terms(terms: &RigidTerms) -> Self {
        match terms.log10_w18() {
            Some(log10_w18) => Capacity::Value {
                log10_w18,
                w18: 10f64.powf(log10_w18),
            },
            None => Capacity::None {
                cause: NoCapacityReason::NonPositiveCapacityRatio {
                    numerator: terms.ratio.numerator,
                    denominator: terms.ratio.denominator,
                },
            },
        }
    }

    /// Supportable W18; zero when there is no capacity
    pub fn w18(&self) -> f64 {
        match self {
            Capacity::None { .. } => 0.0,
            Capacity::Value { w18, .. } => *w18,
        }
    }

    pub fn log10_w18(&self) -> Option<f64> {
        match self {
            Capacity::None { .. } => None,
            Capacity::Value { log10_w18, .. } => Some(*log10_w18),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Capacity::None { .. })
    }
}

/// Capacity against required traffic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityCheck {
    pub passed: bool,

    /// capacity / required; +∞ when nothing is required
    pub ratio: f64,

    pub required_w18: f64,
    pub capacity_w18: f64,
}

/// Compare a capacity against the required traffic.
pub fn capacity_check(capacity_w18: f64, required_w18: f64) -> CapacityCheck {
    let ratio = if required_w18 == 0.0 {
        f64::INFINITY
    } else {
        capacity_w18 / required_w18
    };
    CapacityCheck {
        passed: capacity_w18 >= required_w18,
        ratio,
        required_w18,
        capacity_w18,
    }
}

/// Full evaluation of one slab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidEvaluation {
    pub slab: RigidSlabParameters,
    pub terms: RigidTerms,
    pub capacity: Capacity,
    pub check: CapacityCheck,
}

/// Closed-form rigid capacity for fixed traffic and reliability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidCapacityEvaluator {
    pub required_w18: f64,
    pub reliability: ReliabilityParameters,
    pub serviceability: Serviceability,
}

impl RigidCapacityEvaluator {
    pub fn new(required_w18: f64, reliability: ReliabilityParameters, serviceability: Serviceability) -> Self {
        RigidCapacityEvaluator {
            required_w18,
            reliability,
            serviceability,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("w18", self.required_w18)?;
        self.reliability.validate()?;
        self.serviceability.validate()
    }

    /// Per-term breakdown of the rigid equation for a slab.
    pub fn terms(&self, slab: &RigidSlabParameters) -> RigidTerms {
        rigid_terms(
            slab.thickness_in,
            self.reliability.zr,
            self.reliability.so,
            self.serviceability.loss(),
            self.serviceability.terminal,
            slab.sc_psi,
            slab.drainage_coeff,
            slab.load_transfer,
            slab.ec_psi,
            slab.k_pci,
        )
    }

    /// Evaluate capacity and check one slab.
    pub fn evaluate(&self, slab: &RigidSlabParameters) -> CalcResult<RigidEvaluation> {
        self.validate()?;
        slab.validate()?;

        let terms = self.terms(slab);
        let capacity = Capacity::from_terms(&terms);
        Ok(RigidEvaluation {
            slab: *slab,
            terms,
            capacity,
            check: capacity_check(capacity.w18(), self.required_w18),
        })
    }

    /// Evaluate the slab at each candidate thickness.
    pub fn scan(&self, slab: &RigidSlabParameters, thicknesses: &[f64]) -> CalcResult<Vec<RigidEvaluation>> {
        thicknesses
            .iter()
            .map(|&d| self.evaluate(&slab.with_thickness(d)))
            .collect()
    }
}

/// Smallest candidate thickness whose capacity passes.
pub fn min_passing_thickness(scan: &[RigidEvaluation]) -> Option<f64> {
    scan.iter()
        .filter(|e| e.check.passed)
        .map(|e| e.slab.thickness_in)
        .fold(None, |min, d| Some(min.map_or(d, |m: f64| m.min(d))))
}

/// Most candidates a single scan may evaluate
pub const MAX_SCAN_CANDIDATES: usize = 1000;

/// Candidate thicknesses for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThicknessScan {
    pub from_in: f64,
    pub to_in: f64,
    pub step_in: f64,
}

impl Default for ThicknessScan {
    fn default() -> Self {
        ThicknessScan {
            from_in: 8.0,
            to_in: 16.0,
            step_in: 1.0,
        }
    }
}

impl ThicknessScan {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("scan.from_in", self.from_in)?;
        require_finite("scan.to_in", self.to_in)?;
        require_positive("scan.step_in", self.step_in)?;
        if self.to_in < self.from_in {
            return Err(CalcError::invalid_input(
                "scan.to_in",
                self.to_in.to_string(),
                "Scan end must not be below scan start",
            ));
        }
        if self.step_count() >= MAX_SCAN_CANDIDATES as f64 {
            return Err(CalcError::invalid_input(
                "scan.step_in",
                self.step_in.to_string(),
                format!("Scan would evaluate more than {} thicknesses", MAX_SCAN_CANDIDATES),
            ));
        }
        Ok(())
    }

    fn step_count(&self) -> f64 {
        ((self.to_in - self.from_in) / self.step_in + 1e-9).floor()
    }

    /// from, from + step, ... up to and including `to` (within 1e-9)
    ///
    /// Call [`ThicknessScan::validate`] first; an unvalidated scan is
    /// clamped to [`MAX_SCAN_CANDIDATES`] candidates.
    pub fn thicknesses(&self) -> Vec<f64> {
        let count = (self.step_count().max(0.0) as usize).min(MAX_SCAN_CANDIDATES - 1);
        (0..=count)
            .map(|i| self.from_in + i as f64 * self.step_in)
            .collect()
    }
}

/// Foundation beneath the slab, transformed with Odemark's method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationInput {
    pub layers: Vec<FoundationLayer>,
    pub subgrade_modulus_mpa: f64,
}

/// Input parameters for a rigid pavement design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidDesignInput {
    /// User label
    pub label: String,

    /// Design traffic W18 (ESAL)
    pub w18: f64,

    pub reliability: ReliabilityParameters,

    pub serviceability: Serviceability,

    pub pavement_type: PavementType,

    /// Slab at the design thickness
    pub slab: RigidSlabParameters,

    #[serde(default)]
    pub scan: ThicknessScan,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foundation: Option<FoundationInput>,
}

impl RigidDesignInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("w18", self.w18)?;
        self.reliability.validate()?;
        self.serviceability.validate()?;
        self.slab.validate()?;
        self.scan.validate()
    }

    pub fn evaluator(&self) -> RigidCapacityEvaluator {
        RigidCapacityEvaluator::new(self.w18, self.reliability, self.serviceability)
    }
}

/// Row of a thickness scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub thickness_in: f64,
    pub capacity: Capacity,
    pub check: CapacityCheck,
}

impl From<&RigidEvaluation> for ScanRow {
    fn from(e: &RigidEvaluation) -> Self {
        ScanRow {
            thickness_in: e.slab.thickness_in,
            capacity: e.capacity,
            check: e.check,
        }
    }
}

/// Results from a rigid design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidResult {
    /// Design thickness evaluation
    pub evaluation: RigidEvaluation,

    pub scan: Vec<ScanRow>,

    /// Smallest scanned thickness that passes
    pub min_passing_thickness_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foundation: Option<OdemarkResult>,
}

impl RigidResult {
    pub fn passes(&self) -> bool {
        self.evaluation.check.passed
    }
}

/// Calculate a rigid pavement design.
///
/// # Returns
///
/// * `Ok(RigidResult)` - Design evaluation, thickness scan and foundation transform
/// * `Err(CalcError::InvalidDomainInput)` - A parameter is out of its domain
pub fn calculate(input: &RigidDesignInput) -> CalcResult<RigidResult> {
    input.validate()?;

    info!(
        event = "rigid_evaluation_start",
        label = %input.label,
        pavement_type = input.pavement_type.code(),
        w18 = input.w18,
        thickness_in = input.slab.thickness_in,
    );

    let evaluator = input.evaluator();
    let evaluation = evaluator.evaluate(&input.slab)?;
    let scanned = evaluator.scan(&input.slab, &input.scan.thicknesses())?;
    let min_passing_thickness_in = min_passing_thickness(&scanned);

    let foundation = input
        .foundation
        .as_ref()
        .map(|f| equivalent_thickness(&f.layers, f.subgrade_modulus_mpa))
        .transpose()?;

    info!(
        event = "rigid_evaluation_end",
        capacity_w18 = evaluation.capacity.w18(),
        passed = evaluation.check.passed,
        min_passing_thickness_in = ?min_passing_thickness_in,
    );

    Ok(RigidResult {
        evaluation,
        scan: scanned.iter().map(ScanRow::from).collect(),
        min_passing_thickness_in,
        foundation,
    })
}
