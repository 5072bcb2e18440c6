//! User-facing advisories gathered while generating a card.

use std::fmt;

use serde::Serialize;

/// A single accumulated advisory message.
///
/// The first entry opens the message with a header sentence; later entries
/// are appended as `", entry"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Advisory {
    message: String,
}

impl Advisory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry`, opening the message with `header(entry)` if it is empty.
    pub fn append(&mut self, entry: &str, header: impl FnOnce(&str) -> String) {
        if self.message.is_empty() {
            self.message = header(entry);
        } else {
            self.message.push_str(", ");
            self.message.push_str(entry);
        }
    }

    /// Replaces the whole message.
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The four advisory channels reported alongside a generated card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Warnings {
    pub errors: Advisory,
    pub unhandled_devices: Advisory,
    pub misconfiguration: Advisory,
    pub device_software: Advisory,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no channel carries a message.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
            && self.unhandled_devices.is_empty()
            && self.misconfiguration.is_empty()
            && self.device_software.is_empty()
    }
}
