//! End-to-end design scenarios and properties of the numeric core.

use pave_core::calculations::flexible::{
    cascade, calculate as calculate_flexible, FlexibleDesignInput, LayerAllocator, LayerInput,
};
use pave_core::calculations::rigid::{RigidCapacityEvaluator, RigidSlabParameters};
use pave_core::equations::PerformanceEquation;
use pave_core::errors::CalcError;
use pave_core::materials::FlexibleMaterial;
use pave_core::nomograph::{AxisScale, CalibrationPoint, NomographAxis, NomographCalibrator};
use pave_core::reliability::{ReliabilityParameters, Serviceability};
use pave_core::solver::{SolverConfig, StructuralNumberSolver};
use proptest::prelude::*;

fn reliability_90(so: f64) -> ReliabilityParameters {
    ReliabilityParameters::from_percent(90.0, so).unwrap()
}

fn equation(w18: f64, mr_psi: f64) -> PerformanceEquation {
    PerformanceEquation::new(w18, reliability_90(0.45), 1.7, mr_psi)
}

fn solve(w18: f64, mr_psi: f64) -> f64 {
    StructuralNumberSolver::default().solve(&equation(w18, mr_psi)).unwrap().sn
}

fn slab(thickness_in: f64, ec_psi: f64, k_pci: f64) -> RigidSlabParameters {
    RigidSlabParameters {
        thickness_in,
        sc_psi: 650.0,
        ec_psi,
        load_transfer: 2.8,
        drainage_coeff: 1.0,
        k_pci,
    }
}

fn rigid_evaluator() -> RigidCapacityEvaluator {
    RigidCapacityEvaluator::new(5_000_000.0, reliability_90(0.35), Serviceability::new(4.5, 2.5))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_subgrade_structural_number() {
    // W18 = 5e6, R = 90%, So = 0.45, ΔPSI = 1.7, Mr = 7500 psi
    let sn = solve(5_000_000.0, 7500.0);
    assert!(sn > 4.0 && sn < 6.0);
    assert!((sn - 4.479).abs() < 1e-3);
}

#[test]
fn scenario_single_layer_shortfall() {
    let layers = vec![LayerInput {
        material: "AC".to_string(),
        layer_coeff: 0.40,
        drainage_coeff: 1.0,
        modulus_psi: 362_500.0,
        thickness_cm: 5.0,
    }];
    let report = &cascade(&layers, &[2.0], &[7500.0])[0];

    assert!((report.min_thickness_in - 5.0).abs() < 1e-12);
    assert!(!report.is_ok);
    assert!((report.shortfall_in - 3.03).abs() < 0.01);
}

#[test]
fn scenario_rigid_terms_sum() {
    let eval = rigid_evaluator().evaluate(&slab(12.0, 3_600_000.0, 200.0)).unwrap();
    let t = eval.terms;
    let sum = t.reliability + t.thickness + t.serviceability + t.strength_support.unwrap();
    assert!((eval.capacity.log10_w18().unwrap() - sum).abs() < 1e-6);
}

#[test]
fn scenario_axis_calibration() {
    let axis = NomographCalibrator::new("Mr", AxisScale::Log)
        .with_point(100.0, 1000.0)
        .with_point(800.0, 20000.0)
        .calibrate()
        .unwrap();

    assert_eq!(axis.map(1000.0).unwrap().position, 100.0);
    assert_eq!(axis.map(20000.0).unwrap().position, 800.0);

    let reading = axis.unmap(450.0).unwrap();
    assert!(reading.value > 1000.0 && reading.value < 20000.0);
    assert!(!reading.extrapolated);
}

#[test]
fn scenario_astronomical_traffic() {
    let err = StructuralNumberSolver::default()
        .solve(&equation(1e30, 7500.0))
        .unwrap_err();
    assert!(matches!(err, CalcError::NoRootInBracket { .. }));
    assert!(err.is_design_envelope());
}

#[test]
fn scenario_typical_four_layer_design() {
    let input = FlexibleDesignInput {
        label: "Route 304".to_string(),
        w18: 5_000_000.0,
        reliability: reliability_90(0.45),
        serviceability: Serviceability::new(4.2, 2.5),
        subgrade_mr_psi: 7500.0,
        layers: vec![
            LayerInput::from_material(FlexibleMaterial::AsphaltConcrete, 15.0),
            LayerInput::from_material(FlexibleMaterial::CementTreatedBase, 25.0),
            LayerInput::from_material(FlexibleMaterial::AggregateSubbase, 30.0),
            LayerInput::from_material(FlexibleMaterial::SelectedMaterial, 30.0),
        ],
    };
    let result = calculate_flexible(&input, &SolverConfig::default()).unwrap();

    // 0.40·15/2.54 + 0.18·25/2.54 + 0.10·30/2.54 + 0.08·30/2.54
    let expected = (0.40 * 15.0 + 0.18 * 25.0 + 0.10 * 30.0 + 0.08 * 30.0) / 2.54;
    assert!((result.total_sn_provided - expected).abs() < 1e-9);
    assert!(result.check.passed);
    assert!(result.passes());
    assert!(result.w18_supported.unwrap() > input.w18);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn residual_vanishes_at_solved_sn(w18 in 1.0e5f64..1.0e8, mr in 3000.0f64..30000.0) {
        let eq = equation(w18, mr);
        let solved = StructuralNumberSolver::default().solve(&eq).unwrap();
        prop_assert!(eq.residual(solved.sn).unwrap().abs() < 1e-4);
    }

    #[test]
    fn required_sn_decreases_with_support(mr in 1000.0f64..100_000.0, factor in 1.05f64..3.0) {
        prop_assert!(solve(5_000_000.0, mr * factor) < solve(5_000_000.0, mr));
    }

    #[test]
    fn single_layer_minimum_is_sn_over_am(sn in 0.1f64..10.0, a in 0.05f64..0.45, m in 0.5f64..1.5) {
        let layers = vec![LayerInput {
            material: "X".to_string(),
            layer_coeff: a,
            drainage_coeff: m,
            modulus_psi: 100_000.0,
            thickness_cm: 10.0,
        }];
        let report = &cascade(&layers, &[sn], &[7500.0])[0];
        prop_assert!((report.min_thickness_in - sn / (a * m)).abs() < 1e-9);
    }

    #[test]
    fn minimum_contributions_sum_to_subgrade_requirement(
        w18 in 1.0e5f64..1.0e7,
        subgrade in 3000.0f64..15000.0,
        mut layers in prop::collection::vec((0.05f64..0.45, 0.6f64..1.3, 1.5f64..40.0), 1..5),
    ) {
        // Stiffer materials on top, so each requirement grows with depth
        layers.sort_by(|a, b| b.2.total_cmp(&a.2));
        let layers: Vec<LayerInput> = layers
            .into_iter()
            .map(|(a, m, modulus_factor)| LayerInput {
                material: "X".to_string(),
                layer_coeff: a,
                drainage_coeff: m,
                modulus_psi: subgrade * modulus_factor,
                thickness_cm: 0.0,
            })
            .collect();
        let input = FlexibleDesignInput {
            label: "P".to_string(),
            w18,
            reliability: reliability_90(0.45),
            serviceability: Serviceability::new(4.2, 2.5),
            subgrade_mr_psi: subgrade,
            layers,
        };

        let allocator = LayerAllocator::new(SolverConfig::default());
        let minimal = allocator.allocate(&allocator.minimum_structure(&input).unwrap()).unwrap();

        let sum: f64 = minimal.layers.iter().map(|l| l.sn_contribution).sum();
        prop_assert!((sum - minimal.total_sn_required).abs() < 1e-6);
        prop_assert!(minimal.layers.iter().all(|l| l.is_ok));
    }

    #[test]
    fn rigid_capacity_increases_with_thickness(
        d in 6.0f64..30.0,
        delta in 0.1f64..5.0,
        ec in 2.0e6f64..5.0e6,
        k in 50.0f64..1000.0,
    ) {
        let evaluator = rigid_evaluator();
        let thin = evaluator.evaluate(&slab(d, ec, k)).unwrap();
        let thick = evaluator.evaluate(&slab(d + delta, ec, k)).unwrap();
        prop_assert!(thick.capacity.log10_w18().unwrap() > thin.capacity.log10_w18().unwrap());
    }

    #[test]
    fn axis_round_trip(value in 1.0e-3f64..1.0e7, p0 in -500.0f64..500.0, span in 10.0f64..2000.0) {
        let axis = NomographAxis::from_points(
            "v",
            AxisScale::Log,
            CalibrationPoint::new(p0, 1.0),
            CalibrationPoint::new(p0 + span, 1000.0),
        )
        .unwrap();
        let back = axis.value_at(axis.position_of(value).unwrap());
        prop_assert!(((back - value) / value).abs() < 1e-9);
    }

    #[test]
    fn map_reproduces_calibration_positions(
        p0 in -500.0f64..500.0,
        span in 10.0f64..2000.0,
        v0 in 1.0f64..100.0,
        ratio in 1.5f64..1000.0,
    ) {
        let axis = NomographAxis::from_points(
            "v",
            AxisScale::Log,
            CalibrationPoint::new(p0, v0),
            CalibrationPoint::new(p0 + span, v0 * ratio),
        )
        .unwrap();
        prop_assert_eq!(axis.position_of(v0).unwrap(), p0);
        prop_assert_eq!(axis.position_of(v0 * ratio).unwrap(), p0 + span);
    }
}
