//! The normalized binding model produced by one parse.

use indexmap::IndexMap;
use serde::Serialize;

use super::catalog::ControlDef;
use super::modifier::{ModifierRegistry, ModifierSetKey};

/// Device id meaning "not bound".
pub const NO_DEVICE: &str = "{NoDevice}";

static AXIS_PREFIXES: [&str; 2] = ["Neg_", "Pos_"];

/// `Device::Index::Key` spec of a physical key or modifier component.
pub fn key_spec(device: &str, device_index: u32, key: &str) -> String {
    format!("{device}::{device_index}::{key}")
}

/// `Device::Index` spec used by [`DeviceUsage`].
pub fn device_spec(device: &str, device_index: u32) -> String {
    format!("{device}::{device_index}")
}

/// Strips one leading `Neg_` and then one leading `Pos_`.
///
/// A digital button bound to one direction of an axis shares the axis'
/// hit-box, so both collapse onto the same physical key.
pub fn normalize_key(key: &str) -> &str {
    let key = key.strip_prefix("Neg_").unwrap_or(key);
    key.strip_prefix("Pos_").unwrap_or(key)
}

/// The `Pos_`/`Neg_` variants of `key`, used when collapsing axis directions.
pub fn axis_variants(key: &str) -> impl Iterator<Item = String> + '_ {
    AXIS_PREFIXES
        .iter()
        .rev()
        .map(move |prefix| format!("{prefix}{key}"))
}

/// Commands attached to a physical key under one modifier context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bind {
    /// Command tag → definition, in document encounter order.
    pub controls: IndexMap<String, ControlDef>,
}

impl Bind {
    pub fn contains(&self, tag: &str) -> bool {
        self.controls.contains_key(tag)
    }

    /// `true` when a more general command named by `control` shares this bind.
    pub fn is_redundant(&self, control: &ControlDef) -> bool {
        control
            .hide_if_same_as
            .iter()
            .any(|general| self.contains(general))
    }
}

/// One distinct device + index + input element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalKey {
    pub device: String,
    pub device_index: u32,
    /// Key as first written in the document, possibly `Neg_`/`Pos_` prefixed.
    pub base_key: String,
    /// Normalized key used for identity and hit-box lookup.
    pub key: String,
    pub binds: IndexMap<ModifierSetKey, Bind>,
}

impl PhysicalKey {
    pub fn spec(&self) -> String {
        key_spec(&self.device, self.device_index, &self.key)
    }

    pub fn unmodified(&self) -> Option<&Bind> {
        self.binds.get(&ModifierSetKey::unmodified())
    }
}

/// All physical keys of one document, keyed by `Device::Index::Key`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PhysicalKeyModel {
    keys: IndexMap<String, PhysicalKey>,
}

impl PhysicalKeyModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, spec: &str) -> Option<&PhysicalKey> {
        self.keys.get(spec)
    }

    pub fn contains(&self, spec: &str) -> bool {
        self.keys.contains_key(spec)
    }

    /// Returns the bind for `set_key` on the physical key, creating both as needed.
    pub fn bind_mut(
        &mut self,
        device: &str,
        device_index: u32,
        base_key: &str,
        set_key: ModifierSetKey,
    ) -> &mut Bind {
        let key = normalize_key(base_key);
        let physical = self
            .keys
            .entry(key_spec(device, device_index, key))
            .or_insert_with(|| PhysicalKey {
                device: device.to_string(),
                device_index,
                base_key: base_key.to_string(),
                key: key.to_string(),
                binds: IndexMap::new(),
            });
        physical.binds.entry(set_key).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicalKey> {
        self.keys.values()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// `Device::Index` → supported device name (`None` when unclassified).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceUsage {
    devices: IndexMap<String, Option<String>>,
}

impl DeviceUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, device: &str, device_index: u32, supported: Option<&str>) {
        self.devices
            .insert(device_spec(device, device_index), supported.map(str::to_string));
    }

    /// `Some(classification)` when the device was used at all.
    pub fn get(&self, device: &str, device_index: u32) -> Option<Option<&str>> {
        self.devices
            .get(&device_spec(device, device_index))
            .map(Option::as_deref)
    }

    /// `true` when the device was used and belongs to a supported device.
    pub fn is_supported(&self, device: &str, device_index: u32) -> bool {
        matches!(self.get(device, device_index), Some(Some(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.devices
            .iter()
            .map(|(spec, supported)| (spec.as_str(), supported.as_deref()))
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Everything the parser extracts from one bindings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedBindings {
    pub keys: PhysicalKeyModel,
    pub modifiers: ModifierRegistry,
    pub devices: DeviceUsage,
}

impl ParsedBindings {
    /// The model of a document that yielded no bindings.
    pub fn empty() -> Self {
        Self::default()
    }
}
