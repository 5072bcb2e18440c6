//! Application layer use cases for the refcard tool.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (here the `refcard_core` pipeline) and the infrastructure (files, fonts,
//! the command line).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** the core pipeline to fulfil one user goal, such as
//!   "turn this bindings file into a set of image plans".
//! - **Depend on abstractions** such as the `TextMeasurer` trait rather than
//!   on a concrete font library.
//! - **Contain no file system access**: documents and catalogs arrive as
//!   values, reports leave as values.
//!
//! # Sub-modules
//!
//! - **`generate_refcard`** – The main use case: parse, select images, lay out
//!   labels, build the keyboard sheet and fill the advisory channels.
//!
//! - **`select_images`** – Which catalog records produce an image, without
//!   drawing shared devices twice.
//!
//! - **`advisories`** – Unknown devices, mapping software and the "nothing to
//!   draw" error.
//!
//! - **`blank_template`** – Outlines every hit-box of one device, for checking
//!   catalog geometry.

pub mod advisories;
pub mod blank_template;
pub mod generate_refcard;
pub mod select_images;
