//! Text measurement backed by real font files.
//!
//! The layout passes only need advance widths and line metrics, so faces are
//! loaded with `fontdue` and never rasterized.
//!
//! # Font directory layout (for beginners)
//!
//! The directory holds one file per face, named after the face:
//! `Exo2.0-Regular.otf`, `Exo2.0-Bold.otf`, `Exo2.0-Italic.otf` and so on
//! (see [`FontFace::file_name`]).  The regular face is required; any other
//! face that is missing is measured with the regular one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use refcard_core::domain::style::{FontSlant, FontWeight};
use refcard_core::{FontFace, TextMeasurer, TextMetrics};
use thiserror::Error;
use tracing::debug;

const WEIGHTS: [FontWeight; 3] = [FontWeight::Regular, FontWeight::SemiBold, FontWeight::Bold];
const SLANTS: [FontSlant; 2] = [FontSlant::Normal, FontSlant::Italic];

/// Used when a face carries no horizontal line metrics.
const FALLBACK_ASCENT: f32 = 0.8;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("I/O error reading font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a usable font: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// [`TextMeasurer`] over the faces found in one font directory.
pub struct FontdueMeasurer {
    regular: Font,
    faces: HashMap<FontFace, Font>,
}

impl FontdueMeasurer {
    /// Loads every face of the family present in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Io`] if the regular face cannot be read, or any
    /// present face fails to read for a reason other than absence, and
    /// [`FontError::Invalid`] if a present file is not a font.
    pub fn load_dir(dir: &Path) -> Result<Self, FontError> {
        let regular = load_face(&dir.join(FontFace::REGULAR.file_name()))?;

        let mut faces = HashMap::new();
        for weight in WEIGHTS {
            for slant in SLANTS {
                let face = FontFace::new(weight, slant);
                if face == FontFace::REGULAR {
                    continue;
                }
                let path = dir.join(face.file_name());
                match load_face(&path) {
                    Ok(font) => {
                        faces.insert(face, font);
                    }
                    Err(FontError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                        debug!(path = %path.display(), "face not present, regular face used instead");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        debug!(dir = %dir.display(), faces = faces.len() + 1, "fonts loaded");
        Ok(Self { regular, faces })
    }

    fn face(&self, face: FontFace) -> &Font {
        self.faces.get(&face).unwrap_or(&self.regular)
    }
}

impl TextMeasurer for FontdueMeasurer {
    fn measure(&self, text: &str, font: FontFace, size: u32) -> TextMetrics {
        let font = self.face(font);
        let px = size as f32;
        let text_width = text.chars().map(|c| font.metrics(c, px).advance_width).sum();
        let (ascender, text_height) = font
            .horizontal_line_metrics(px)
            .map_or((px * FALLBACK_ASCENT, px), |line| (line.ascent, line.new_line_size));
        TextMetrics {
            text_width,
            text_height,
            ascender,
            character_width: font.metrics('M', px).advance_width,
        }
    }
}

fn load_face(path: &Path) -> Result<Font, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| FontError::Invalid {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
