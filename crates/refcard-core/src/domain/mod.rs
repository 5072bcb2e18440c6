//! Domain entities for the reference-card pipeline.
//!
//! Pure data and rules with no file system or rendering dependencies.
//!
//! # Layers (for beginners)
//!
//! Everything the pipeline exchanges lives here: the catalogs it consumes,
//! the binding model the parser builds, the modifier registry, the style
//! tables and the draw instructions it finally emits.  The `parser`, `assign`
//! and `layout` modules hold the algorithms that move data between these
//! types.

pub mod catalog;
pub mod draw;
pub mod model;
pub mod modifier;
pub mod style;
pub mod warnings;
