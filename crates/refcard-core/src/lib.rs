//! # refcard-core
//!
//! Turns exported game control bindings into annotated device reference
//! cards: which command is bound to which button, under which modifier, laid
//! out inside the button's box on a device template.
//!
//! This crate is the pure pipeline.  It reads no files and draws no pixels;
//! catalogs come in as data and draw instructions go out as data.
//!
//! # Architecture overview (for beginners)
//!
//! - **`domain`** – The shared vocabulary: catalogs, the physical-key model,
//!   modifier sets and their numbers, style tables, advisories and draw
//!   instructions.
//!
//! - **`parser`** – Reads the bindings XML into the model.  Modifier sets are
//!   canonicalized and numbered here, once, so every later stage reads the
//!   same numbers.
//!
//! - **`assign`** – Decides which labels go into which hit-box of a device
//!   image, in which order and style.
//!
//! - **`layout`** – Picks a font size and positions labels inside each
//!   hit-box, and flows the keyboard summary sheet.
//!
//! - **`keymap`** – Printable names for keyboard keys.

pub mod assign;
pub mod domain;
pub mod keymap;
pub mod layout;
pub mod parser;

pub use assign::{HitBoxLabels, TextAssigner, TextItem, MODIFIER_SCAN_CEILING};
pub use domain::catalog::{
    Catalog, CatalogError, ControlCatalog, ControlDef, ControlType, DeviceCatalog, DeviceRecord, HitBox,
};
pub use domain::draw::{DrawInstruction, DrawSurface, RectangleSpec, TextSpec};
pub use domain::model::{Bind, DeviceUsage, ParsedBindings, PhysicalKey, PhysicalKeyModel};
pub use domain::modifier::{Modifier, ModifierRegistry, ModifierSetKey};
pub use domain::style::{FontFace, Style, StylingMode};
pub use domain::warnings::{Advisory, Warnings};
pub use layout::sheet::KeyboardSheet;
pub use layout::{LayoutEngine, MonospaceMeasurer, PlacedText, TextMeasurer, TextMetrics, MIN_FONT_SIZE};
pub use parser::{BindingParser, DocumentParseError, ModifierResolver};
