//! # Pavestack CLI Application
//!
//! Prompt-driven front end for the pavement design engine.
//!
//! ## Usage
//!
//! ```text
//! pave_cli                 # interactive demo: flexible allocation + rigid scan
//! pave_cli project.pvd     # run every item in a saved project
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `pave_core=info`).

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use pave_core::calculations::flexible::{self, FlexibleDesignInput, FlexibleResult, LayerInput};
use pave_core::calculations::rigid::{self, RigidDesignInput, RigidResult, RigidSlabParameters, ThicknessScan};
use pave_core::file_io::load_project;
use pave_core::materials::{ConcreteMix, FlexibleMaterial, PavementType};
use pave_core::reliability::{ReliabilityParameters, Serviceability, DEFAULT_SO_RIGID};
use pave_core::units::mr_from_cbr;
use pave_core::{CalcError, SolverConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pave_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn print_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

fn run_project(path: &Path) -> ExitCode {
    let project = match load_project(path) {
        Ok(project) => project,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    println!("Project {} ({}) - {} item(s)", project.meta.job_id, project.meta.client, project.item_count());
    println!();

    let mut failures = 0;
    for (id, item, outcome) in project.run_all() {
        println!("── {} [{}] {}", item.label(), item.calc_type(), id);
        match outcome {
            Ok(output) => {
                if let Some(pass) = output.passes() {
                    println!("   {}", status_icon(pass));
                }
                print_json(&output);
            }
            Err(e) => {
                failures += 1;
                error!(event = "item_failed", item = %id, code = e.error_code());
                print_error(&e);
            }
        }
        println!();
    }

    if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn print_flexible(result: &FlexibleResult) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  FLEXIBLE PAVEMENT LAYER ALLOCATION");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  #  Material  Support Mr  SN req  Min (cm)  Design (cm)  ΣSN");
    for layer in &result.layers {
        println!(
            "  {}  {:<8}  {:>10.0}  {:>6.2}  {:>8.1}  {:>11.1}  {:>5.2} {}",
            layer.layer_no,
            layer.material,
            layer.support_mr_psi,
            layer.sn_required,
            layer.min_thickness_cm,
            layer.design_thickness_cm,
            layer.cumulative_sn,
            status_icon(layer.is_ok),
        );
    }
    println!();
    println!("  SN required (subgrade): {:.2}", result.total_sn_required);
    println!("  SN provided:            {:.2}", result.total_sn_provided);
    println!("  Safety margin:          {:+.2} {}", result.check.safety_margin, status_icon(result.check.passed));
    if let Some(w18) = result.w18_supported {
        println!("  Supported W18:          {:.3e}", w18);
    }
    println!();
}

fn print_rigid(result: &RigidResult) {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  RIGID PAVEMENT THICKNESS SCAN");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  D (in)   log W18   Capacity W18   Ratio");
    for row in &result.scan {
        match row.capacity.log10_w18() {
            Some(log_w18) => println!(
                "  {:>6.1}   {:>7.3}   {:>12.3e}   {:>5.2} {}",
                row.thickness_in,
                log_w18,
                row.capacity.w18(),
                row.check.ratio,
                status_icon(row.check.passed),
            ),
            None => println!("  {:>6.1}   no capacity", row.thickness_in),
        }
    }
    println!();
    match result.min_passing_thickness_in {
        Some(d) => println!("  Smallest passing thickness: {:.1} in", d),
        None => println!("  No scanned thickness carries the design traffic"),
    }
    println!();
}

fn run_demo() -> ExitCode {
    println!("Pavestack CLI - AASHTO 1993 Pavement Design");
    println!("===========================================");
    println!();

    let w18 = prompt_f64("Design traffic W18 (ESAL) [5000000]: ", 5_000_000.0);
    let reliability_pct = prompt_f64("Reliability (%) [90]: ", 90.0);
    let so = prompt_f64("Overall standard deviation So [0.45]: ", 0.45);
    let cbr = prompt_f64("Subgrade CBR (%) [5]: ", 5.0);
    println!();

    let reliability = match ReliabilityParameters::from_percent(reliability_pct, so) {
        Ok(r) => r,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let flexible_input = FlexibleDesignInput {
        label: "CLI-Demo".to_string(),
        w18,
        reliability,
        serviceability: Serviceability::new(4.2, 2.5),
        subgrade_mr_psi: mr_from_cbr(cbr).0,
        layers: vec![
            LayerInput::from_material(FlexibleMaterial::AsphaltConcrete, 10.0),
            LayerInput::from_material(FlexibleMaterial::CementTreatedBase, 20.0),
            LayerInput::from_material(FlexibleMaterial::AggregateSubbase, 30.0),
            LayerInput::from_material(FlexibleMaterial::SelectedMaterial, 30.0),
        ],
    };

    let mut ok = true;
    match flexible::calculate(&flexible_input, &SolverConfig::default()) {
        Ok(result) => {
            print_flexible(&result);
            println!("JSON Output:");
            print_json(&result);
            println!();
        }
        Err(e) => {
            ok = false;
            print_error(&e);
        }
    }

    let slab = ConcreteMix::new(350.0)
        .properties()
        .map(|props| RigidSlabParameters {
            thickness_in: 10.0,
            sc_psi: props.sc_psi,
            ec_psi: props.ec_psi,
            load_transfer: PavementType::Jpcp.default_load_transfer(),
            drainage_coeff: 1.0,
            k_pci: 200.0,
        });
    let rigid_result = slab.and_then(|slab| {
        let rigid_reliability = ReliabilityParameters { so: DEFAULT_SO_RIGID, ..reliability };
        rigid::calculate(&RigidDesignInput {
            label: "CLI-Demo slab".to_string(),
            w18,
            reliability: rigid_reliability,
            serviceability: Serviceability::new(4.5, 2.5),
            pavement_type: PavementType::Jpcp,
            slab,
            scan: ThicknessScan::default(),
            foundation: None,
        })
    });

    match rigid_result {
        Ok(result) => {
            print_rigid(&result);
            println!("JSON Output:");
            print_json(&result);
        }
        Err(e) => {
            ok = false;
            print_error(&e);
        }
    }

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn main() -> ExitCode {
    init_tracing();

    match std::env::args().nth(1) {
        Some(path) => run_project(Path::new(&path)),
        None => run_demo(),
    }
}
