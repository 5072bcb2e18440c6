//! Writes reports as pretty-printed JSON to a file or standard output.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes `value` to `out`, or to standard output when `out` is `None`.
///
/// # Errors
///
/// Returns [`OutputError::Io`] if the destination cannot be written and
/// [`OutputError::Serialize`] if `value` cannot be encoded.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<(), OutputError> {
    match out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(|source| OutputError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
            let file = std::fs::File::create(path).map_err(|source| OutputError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            write_json_to(value, std::io::BufWriter::new(file), path)?;
            info!(path = %path.display(), "report written");
            Ok(())
        }
        None => write_json_to(value, std::io::stdout().lock(), Path::new("<stdout>")),
    }
}

fn write_json_to<T: Serialize, W: Write>(value: &T, mut writer: W, path: &Path) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
