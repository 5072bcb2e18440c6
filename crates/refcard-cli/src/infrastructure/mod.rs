//! Infrastructure layer for the refcard tool.
//!
//! Contains the file-facing adapters: configuration and catalog storage,
//! font-backed text measurement, and JSON report output.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `refcard_core`, but MUST NOT be imported by the `application` layer or the
//! core library.

pub mod measure;
pub mod output;
pub mod storage;
