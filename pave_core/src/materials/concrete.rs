//! Concrete Pavement Materials
//!
//! Pavement types with their default load-transfer coefficient J, and a
//! concrete mix described by cube strength from which the slab's elastic
//! modulus and modulus of rupture are estimated.

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};
use crate::units::{concrete_modulus, cube_to_cylinder, modulus_of_rupture, Ksc, Psi};

/// Rigid pavement types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PavementType {
    /// Jointed plain concrete pavement
    #[serde(rename = "JPCP")]
    Jpcp,
    /// Jointed reinforced concrete pavement
    #[serde(rename = "JRCP")]
    Jrcp,
    /// Continuously reinforced concrete pavement
    #[serde(rename = "CRCP")]
    Crcp,
}

impl PavementType {
    pub const ALL: [PavementType; 3] = [PavementType::Jpcp, PavementType::Jrcp, PavementType::Crcp];

    /// Default load transfer coefficient (tied shoulders, dowelled joints)
    pub fn default_load_transfer(&self) -> f64 {
        match self {
            PavementType::Jpcp | PavementType::Jrcp => 2.8,
            PavementType::Crcp => 2.5,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PavementType::Jpcp => "JPCP",
            PavementType::Jrcp => "JRCP",
            PavementType::Crcp => "CRCP",
        }
    }
}

/// Concrete mix given by 28-day cube strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteMix {
    /// Cube compressive strength (ksc)
    pub fc_cube_ksc: f64,
}

/// Strength-derived slab properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteProperties {
    /// Cylinder strength f'c (ksc)
    pub fc_cylinder_ksc: f64,
    /// Elastic modulus Ec (psi)
    pub ec_psi: f64,
    /// Modulus of rupture Sc (psi)
    pub sc_psi: f64,
}

impl ConcreteMix {
    pub fn new(fc_cube_ksc: f64) -> Self {
        ConcreteMix { fc_cube_ksc }
    }

    pub fn properties(&self) -> CalcResult<ConcreteProperties> {
        require_positive("fc_cube_ksc", self.fc_cube_ksc)?;
        let cylinder = cube_to_cylinder(Ksc(self.fc_cube_ksc));
        let Psi(ec_psi) = concrete_modulus(cylinder);
        let Psi(sc_psi) = modulus_of_rupture(cylinder);
        Ok(ConcreteProperties {
            fc_cylinder_ksc: cylinder.0,
            ec_psi,
            sc_psi,
        })
    }
}
