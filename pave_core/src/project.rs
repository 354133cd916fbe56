//! # Project Data Structures
//!
//! The `Project` struct is the root container for a design job. Projects
//! serialize to `.pvd` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (design guide, default So/reliability, solver)
//! └── items: HashMap<Uuid, CalculationItem> (all calculations)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pave_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "Department of Highways");
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("AASHTO1993"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutput};
use crate::errors::CalcResult;
use crate::reliability::{ReliabilityParameters, DEFAULT_SO_FLEXIBLE, DEFAULT_SO_RIGID};
use crate::solver::SolverConfig;

/// Current schema version for .pvd files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map for O(1) lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Settings shared by every calculation
    pub settings: GlobalSettings,

    /// All calculation items, keyed by UUID
    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a calculation item to the project.
    ///
    /// Returns the UUID assigned to the item.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Mutable access; marks the project as modified when the item exists.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Run one item with the project settings.
    pub fn run_item(&self, id: &Uuid) -> Option<CalcResult<CalculationOutput>> {
        self.items.get(id).map(|item| item.run(&self.settings))
    }

    /// Run every item, ordered by label then id for stable output.
    pub fn run_all(&self) -> Vec<(Uuid, &CalculationItem, CalcResult<CalculationOutput>)> {
        let mut entries: Vec<_> = self.items.iter().collect();
        entries.sort_by(|(a_id, a), (b_id, b)| a.label().cmp(b.label()).then(a_id.cmp(b_id)));
        entries
            .into_iter()
            .map(|(id, item)| (*id, item, item.run(&self.settings)))
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Design guide (e.g., "AASHTO1993")
    pub code: DesignCode,

    /// Default So for new flexible designs
    pub default_so_flexible: f64,

    /// Default So for new rigid designs
    pub default_so_rigid: f64,

    /// Default reliability for new designs (%)
    pub default_reliability: f64,

    /// Root-finder settings used by every flexible calculation
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            code: DesignCode::Aashto1993,
            default_so_flexible: DEFAULT_SO_FLEXIBLE,
            default_so_rigid: DEFAULT_SO_RIGID,
            default_reliability: 90.0,
            solver: SolverConfig::default(),
        }
    }
}

impl GlobalSettings {
    /// Reliability parameters for a new flexible design.
    pub fn flexible_reliability(&self) -> CalcResult<ReliabilityParameters> {
        ReliabilityParameters::from_percent(self.default_reliability, self.default_so_flexible)
    }

    /// Reliability parameters for a new rigid design.
    pub fn rigid_reliability(&self) -> CalcResult<ReliabilityParameters> {
        ReliabilityParameters::from_percent(self.default_reliability, self.default_so_rigid)
    }
}

/// Pavement design guide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DesignCode {
    #[default]
    #[serde(rename = "AASHTO1993")]
    Aashto1993,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{FlexibleDesignInput, LayerInput};
    use crate::materials::FlexibleMaterial;
    use crate::reliability::Serviceability;

    fn flexible_item(label: &str, settings: &GlobalSettings) -> CalculationItem {
        CalculationItem::Flexible(FlexibleDesignInput {
            label: label.to_string(),
            w18: 5_000_000.0,
            reliability: settings.flexible_reliability().unwrap(),
            serviceability: Serviceability::new(4.2, 2.5),
            subgrade_mr_psi: 7500.0,
            layers: vec![
                LayerInput::from_material(FlexibleMaterial::AsphaltConcrete, 15.0),
                LayerInput::from_material(FlexibleMaterial::CrushedRockBase, 30.0),
            ],
        })
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "25-001");
        assert_eq!(project.meta.client, "Acme Corp");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Engineer", "25-042", "Test Client");
        let item = flexible_item("Main line", &project.settings);
        project.add_item(item);
        let json = serde_json::to_string_pretty(&project).unwrap();

        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("AASHTO1993"));
        assert!(json.contains("\"type\": \"Flexible\""));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, project);
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        let item = flexible_item("Main line", &project.settings);

        let id = project.add_item(item);
        assert_eq!(project.item_count(), 1);
        assert_eq!(project.get_item(&id).map(|i| i.calc_type()), Some("Flexible"));

        assert!(project.remove_item(&id).is_some());
        assert_eq!(project.item_count(), 0);
        assert!(project.run_item(&id).is_none());
    }

    #[test]
    fn test_run_uses_settings() {
        let mut project = Project::default();
        let item = flexible_item("Main line", &project.settings);
        let id = project.add_item(item);
        assert!(project.run_item(&id).unwrap().is_ok());

        project.settings.solver.max_iterations = 0;
        let err = project.run_item(&id).unwrap().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DOMAIN_INPUT");
    }

    #[test]
    fn test_default_settings() {
        let settings = GlobalSettings::default();
        let flexible = settings.flexible_reliability().unwrap();
        assert!((flexible.zr + 1.282).abs() < 1e-9);
        assert_eq!(flexible.so, 0.45);
        assert_eq!(settings.rigid_reliability().unwrap().so, 0.35);
    }
}
