//! # Project Persistence
//!
//! Projects are stored as pretty-printed JSON in `.pvd` files. Saves go
//! through a sibling temporary file that is synced and then renamed over the
//! target, so a crash mid-save leaves the previous file intact.
//!
//! Loading checks the schema version before handing the project back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pave_core::file_io::{load_project, save_project};
//! use pave_core::project::Project;
//! use std::path::Path;
//!
//! let path = Path::new("route-304.pvd");
//! save_project(&Project::new("Engineer", "25-001", "Client"), path)?;
//! let project = load_project(path)?;
//! println!("{} items", project.item_count());
//! # Ok::<(), pave_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// File extension for project files
pub const PROJECT_EXTENSION: &str = "pvd";

fn tmp_path_for(path: &Path) -> PathBuf {
    path.with_extension(format!("{}.tmp", PROJECT_EXTENSION))
}

fn io_error(operation: &str, path: &Path, err: std::io::Error) -> CalcError {
    CalcError::file_error(operation, path.display().to_string(), err.to_string())
}

/// Write bytes to `path` via tmp-file, fsync and rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp = File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            io_error("write temp file", &tmp_path, e)
        })?;
    drop(tmp);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })
}

/// Save a project with atomic write semantics.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, json.as_bytes())?;

    info!(event = "project_saved", path = %path.display(), items = project.item_count());
    Ok(())
}

/// Parse a project from JSON and check its schema version.
pub fn project_from_json(json: &str) -> CalcResult<Project> {
    let project: Project = serde_json::from_str(json).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;
    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;
    let project = project_from_json(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), reason),
        },
        other => other,
    })?;

    info!(event = "project_loaded", path = %path.display(), items = project.item_count());
    Ok(project)
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().ok());
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    Some((major, minor))
}

/// Accept files with the same major version; within 0.x, reject newer minors.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = parse_version(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse_version(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}
