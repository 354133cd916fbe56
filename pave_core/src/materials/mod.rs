//! # Materials Catalog
//!
//! Typed material records used to fill in design inputs. The numeric core
//! never looks materials up by name; the catalog resolves a material into
//! plain coefficients once, when the input is built.
//!
//! ## Material Types
//!
//! - **Flexible layers**: highway-department surface, base, subbase and
//!   selected materials with AASHTO layer coefficients and resilient moduli
//! - **Concrete**: pavement types with default load-transfer coefficients,
//!   and strength-derived slab properties
//!
//! ## Example
//!
//! ```rust
//! use pave_core::materials::FlexibleMaterial;
//!
//! let ac = FlexibleMaterial::AsphaltConcrete.properties();
//! assert_eq!(ac.layer_coeff, 0.40);
//! assert_eq!(ac.mr_psi, 362_500.0);
//!
//! let crb = FlexibleMaterial::from_str_flexible("crushed rock base").unwrap();
//! assert_eq!(crb, FlexibleMaterial::CrushedRockBase);
//! ```

pub mod concrete;
pub mod flexible;

pub use concrete::{ConcreteMix, PavementType};
pub use flexible::{FlexibleMaterial, LayerRole, LayerMaterialProperties};
