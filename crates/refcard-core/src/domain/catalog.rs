//! Catalog data consumed by the pipeline: command metadata and device geometry.
//!
//! Both catalogs are static configuration owned by the surrounding application.
//! This module only fixes the field contracts and offers the lookups the parser
//! and the text assigner need.
//!
//! # Device classification (for beginners)
//!
//! A bindings document names *physical* device ids (`T16000M`, `Keyboard`,
//! `ThrustMasterWarthogJoystick`, ...).  A *supported device* is one printable
//! template that may cover several physical ids at once (a stick and its
//! throttle drawn on the same image).  Classification maps a physical id to the
//! supported device whose `handled_devices` set contains it.
//!
//! Entries must not overlap.  That is checked offline by
//! [`DeviceCatalog::validate`]; at runtime the first entry in catalog order wins.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Height used for hit-boxes whose geometry omits one.
pub const DEFAULT_HIT_BOX_HEIGHT: i32 = 54;

/// Group assigned to commands missing from the control catalog.
pub const DEFAULT_GROUP: &str = "General";

/// Sort order assigned to commands missing from the control catalog.
pub const DEFAULT_ORDER: u32 = 999;

/// Errors reported by offline catalog validation.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A physical device id is claimed by more than one supported device.
    #[error("device {device} is handled by both {first} and {second}")]
    OverlappingDevice {
        device: String,
        first: String,
        second: String,
    },

    /// A supported device handles no physical device at all.
    #[error("supported device {0} has no handled devices")]
    NoHandledDevices(String),

    /// A key device is not among the handled devices of its entry.
    #[error("supported device {name} lists key device {device} that it does not handle")]
    UnhandledKeyDevice { name: String, device: String },
}

// ── Control catalog ───────────────────────────────────────────────────────────

/// Whether a command (or a hit-box) is a button or an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    #[default]
    Digital,
    Analogue,
}

/// Metadata for one command tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDef {
    /// Label drawn on the card.
    pub name: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default = "default_group")]
    pub category: String,
    /// Sort key on the keyboard sheet.
    #[serde(default = "default_order")]
    pub order: u32,
    /// More general commands that make this one redundant when bound alongside.
    #[serde(default)]
    pub hide_if_same_as: BTreeSet<String>,
    #[serde(default, rename = "type")]
    pub control_type: ControlType,
    /// `true` for digital commands that also exist as an axis command.
    #[serde(default)]
    pub has_analogue: bool,
}

impl ControlDef {
    /// Synthetic definition for a command tag the catalog does not know.
    pub fn fallback(tag: &str) -> Self {
        Self {
            name: tag.to_string(),
            group: default_group(),
            category: default_group(),
            order: DEFAULT_ORDER,
            hide_if_same_as: BTreeSet::new(),
            control_type: ControlType::Digital,
            has_analogue: false,
        }
    }
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_order() -> u32 {
    DEFAULT_ORDER
}

/// Command tag → [`ControlDef`] lookup table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ControlCatalog {
    controls: HashMap<String, ControlDef>,
}

impl ControlCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, control: ControlDef) {
        self.controls.insert(tag.into(), control);
    }

    pub fn get(&self, tag: &str) -> Option<&ControlDef> {
        self.controls.get(tag)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

// ── Device catalog ────────────────────────────────────────────────────────────

/// One printable device template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Template image id the renderer draws on.
    pub template: String,
    /// Physical device ids drawn on this template.
    pub handled_devices: Vec<String>,
    /// Devices whose presence triggers an image; defaults to `handled_devices`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_devices: Option<Vec<String>>,
    /// Vendor mapping software that is known to hide bindings from the game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_software: Option<String>,
}

impl DeviceRecord {
    /// Devices that decide whether this template gets an image.
    pub fn key_devices(&self) -> &[String] {
        self.key_devices.as_deref().unwrap_or(&self.handled_devices)
    }

    pub fn handles(&self, device: &str) -> bool {
        self.handled_devices.iter().any(|d| d == device)
    }
}

/// Rectangle on a template into which one physical key's labels are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    #[serde(default = "default_hit_box_height")]
    pub height: i32,
    /// Set for hit-boxes that sit on an axis.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub control_type: Option<ControlType>,
}

impl HitBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            control_type: None,
        }
    }

    /// Returns the rightmost X coordinate (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn is_analogue(&self) -> bool {
        self.control_type == Some(ControlType::Analogue)
    }
}

fn default_hit_box_height() -> i32 {
    DEFAULT_HIT_BOX_HEIGHT
}

/// Hit-box geometry for every key of one physical device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub keys: IndexMap<String, HitBox>,
}

/// Replaces `device` by `replacement` whenever the document mentions `trigger`.
///
/// Used for sticks that the game reports under a different id once the
/// matching throttle is plugged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRewrite {
    pub device: String,
    pub replacement: String,
    pub trigger: String,
}

/// The rewrite rules used when a catalog does not specify its own.
pub fn default_rewrites() -> Vec<DeviceRewrite> {
    vec![DeviceRewrite {
        device: "T16000M".to_string(),
        replacement: "T16000MFCS".to_string(),
        trigger: "T16000MTHROTTLE".to_string(),
    }]
}

/// Supported devices, per-device geometry and device rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    supported: IndexMap<String, DeviceRecord>,
    geometry: HashMap<String, DeviceGeometry>,
    rewrites: Vec<DeviceRewrite>,
    /// Physical device id → supported device name, first match in catalog order.
    index: HashMap<String, String>,
}

impl DeviceCatalog {
    pub fn new(
        supported: IndexMap<String, DeviceRecord>,
        geometry: HashMap<String, DeviceGeometry>,
        rewrites: Vec<DeviceRewrite>,
    ) -> Self {
        let mut index = HashMap::new();
        for (name, record) in &supported {
            for device in &record.handled_devices {
                index.entry(device.clone()).or_insert_with(|| name.clone());
            }
        }
        Self {
            supported,
            geometry,
            rewrites,
            index,
        }
    }

    /// Returns the supported device that handles the physical `device` id.
    pub fn classify(&self, device: &str) -> Option<&str> {
        self.index.get(device).map(String::as_str)
    }

    pub fn record(&self, name: &str) -> Option<&DeviceRecord> {
        self.supported.get(name)
    }

    /// Supported devices in catalog order.
    pub fn supported(&self) -> impl Iterator<Item = (&str, &DeviceRecord)> {
        self.supported.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn geometry(&self, device: &str) -> Option<&DeviceGeometry> {
        self.geometry.get(device)
    }

    pub fn hit_box(&self, device: &str, key: &str) -> Option<&HitBox> {
        self.geometry.get(device)?.keys.get(key)
    }

    pub fn rewrites(&self) -> &[DeviceRewrite] {
        &self.rewrites
    }

    /// Checks the invariants the runtime relies on without re-checking them.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found, in catalog order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for (name, record) in &self.supported {
            if record.handled_devices.is_empty() {
                return Err(CatalogError::NoHandledDevices(name.clone()));
            }
            for device in &record.handled_devices {
                if let Some(first) = owners.insert(device, name) {
                    return Err(CatalogError::OverlappingDevice {
                        device: device.clone(),
                        first: first.to_string(),
                        second: name.clone(),
                    });
                }
            }
            if let Some(device) = record.key_devices().iter().find(|d| !record.handles(d)) {
                return Err(CatalogError::UnhandledKeyDevice {
                    name: name.clone(),
                    device: device.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Both catalogs as loaded from one catalog file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "CatalogFile")]
pub struct Catalog {
    pub controls: ControlCatalog,
    pub devices: DeviceCatalog,
}

/// On-disk shape of a catalog file.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    controls: ControlCatalog,
    #[serde(default)]
    devices: IndexMap<String, DeviceRecord>,
    #[serde(default)]
    geometry: HashMap<String, DeviceGeometry>,
    #[serde(default = "default_rewrites")]
    rewrites: Vec<DeviceRewrite>,
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        Self {
            controls: file.controls,
            devices: DeviceCatalog::new(file.devices, file.geometry, file.rewrites),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
