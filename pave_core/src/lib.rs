//! # pave_core - AASHTO 1993 Pavement Design Engine
//!
//! `pave_core` sizes flexible pavements, evaluates rigid slabs and reads
//! calibrated design charts. All inputs and outputs are JSON-serializable,
//! so the same structures drive the CLI, project files and any external
//! caller.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types naming the offending parameter
//! - **Caller-owned configuration**: solver settings travel with the input
//!
//! ## Quick Start
//!
//! ```rust
//! use pave_core::equations::PerformanceEquation;
//! use pave_core::reliability::ReliabilityParameters;
//! use pave_core::solver::StructuralNumberSolver;
//!
//! let reliability = ReliabilityParameters::from_percent(90.0, 0.45).unwrap();
//! let equation = PerformanceEquation::new(5_000_000.0, reliability, 1.7, 7500.0);
//! let sn = StructuralNumberSolver::default().solve(&equation).unwrap();
//! println!("SN required: {:.2}", sn.sn);
//! ```
//!
//! ## Modules
//!
//! - [`equations`] - Flexible and rigid performance equations, Odemark transform
//! - [`solver`] - Bracketed root finder for the structural number
//! - [`calculations`] - Flexible allocation, rigid capacity, nomograph readings
//! - [`nomograph`] - Chart axis calibration and geometry
//! - [`materials`] - Flexible layer catalog and concrete properties
//! - [`reliability`] - Reliability table and serviceability
//! - [`project`] - Project container, metadata, and settings
//! - [`file_io`] - Atomic project saves and version-checked loads
//! - [`units`] - Unit wrappers and conversions
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod nomograph;
pub mod project;
pub mod reliability;
pub mod solver;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project};
pub use project::{GlobalSettings, Project, ProjectMetadata};
pub use solver::{SolverConfig, StructuralNumberSolver};
