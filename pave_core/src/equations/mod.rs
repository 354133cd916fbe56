//! # Pavement Design Equations
//!
//! The closed-form relations used by the design calculations. Keeping them
//! in one place makes them easy to check against the AASHTO guide.
//!
//! ## Modules
//!
//! - [`flexible`] - Flexible performance equation (residual form for the SN solver)
//! - [`rigid`] - Rigid performance equation, term by term
//! - [`odemark`] - Odemark equivalent thickness of a foundation stack
//!
//! ## References
//!
//! - AASHTO Guide for Design of Pavement Structures, 1993, Part II Ch. 3
//! - Ullidtz, Pavement Analysis (Odemark's method of equivalent thicknesses)

pub mod flexible;
pub mod odemark;
pub mod rigid;

pub use flexible::{PerformanceEquation, FLEXIBLE_PSI_SPAN};
pub use odemark::{equivalent_thickness, FoundationLayer, OdemarkLayer, OdemarkResult};
pub use rigid::{rigid_terms, serviceability_term, thickness_term, RigidTerms, StrengthSupportRatio, RIGID_PSI_SPAN};
