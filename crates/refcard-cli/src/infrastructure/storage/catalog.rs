//! Loads the control and device catalogs from a TOML catalog file.
//!
//! The file has four optional tables: `controls` (binding tag → command),
//! `devices` (supported device records in drawing order), `geometry`
//! (per-device hit-boxes) and `rewrites` (device id substitutions).
//!
//! Loading never validates.  Overlapping device records are only checked by
//! [`validate_catalog_file`], which backs the `validate-catalog` command.

use std::path::{Path, PathBuf};

use refcard_core::{Catalog, CatalogError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("I/O error reading catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("catalog is inconsistent: {0}")]
    Invalid(#[from] CatalogError),
}

/// Reads the catalog at `path`.
///
/// # Errors
///
/// Returns [`CatalogLoadError::Io`] if the file cannot be read and
/// [`CatalogLoadError::Parse`] if it is not a catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&content)?;
    info!(
        path = %path.display(),
        controls = catalog.controls.len(),
        devices = catalog.devices.supported().count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parses catalog TOML text.
///
/// # Errors
///
/// Returns [`CatalogLoadError::Parse`] if the text is not a catalog.
pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogLoadError> {
    Ok(toml::from_str(content)?)
}

/// Loads the catalog at `path` and checks its device records.
///
/// # Errors
///
/// Any [`load_catalog`] error, or [`CatalogLoadError::Invalid`] if two
/// records handle the same device.
pub fn validate_catalog_file(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let catalog = load_catalog(path)?;
    catalog.devices.validate()?;
    Ok(catalog)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
