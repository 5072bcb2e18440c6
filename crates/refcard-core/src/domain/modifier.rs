//! Modifier sets and their stable numbering.
//!
//! A binding may require one or more *modifier* keys to be held.  The set of
//! held keys is identified by a canonical [`ModifierSetKey`] so that the same
//! combination written in a different element order maps to the same key.
//!
//! # Numbering (for beginners)
//!
//! Every new modifier set gets a number that the card prints next to both the
//! modifier key ("Modifier 3") and the commands it unlocks ("Fire[3]").  Two
//! counters exist so keyboard modifiers never collide with controller
//! modifiers: controller ("hotas") numbers start at 1, keyboard numbers at 101.
//! Numbers are handed out in first-encounter order and never change during a
//! parse, so a render pass reads them back instead of assigning new ones.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::model::key_spec;

/// Sentinel set key for bindings without modifiers.
pub const UNMODIFIED: &str = "Unmodified";

/// Device id whose modifiers draw from the keyboard counter.
pub const KEYBOARD_DEVICE: &str = "Keyboard";

/// First number handed out to controller modifiers.
pub const HOTAS_MODIFIER_START: u32 = 1;

/// First number handed out to keyboard modifiers.
pub const KEYBOARD_MODIFIER_START: u32 = 101;

/// One held key inside a modifier set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModifierComponent {
    pub device: String,
    pub device_index: u32,
    /// Raw key as written in the document (not `Neg_`/`Pos_` normalized).
    pub key: String,
}

impl ModifierComponent {
    /// `Device::Index::Key` spec of this component.
    pub fn spec(&self) -> String {
        key_spec(&self.device, self.device_index, &self.key)
    }
}

/// Canonical identifier of a (possibly composite) set of held modifier keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModifierSetKey(String);

impl ModifierSetKey {
    pub fn unmodified() -> Self {
        Self(UNMODIFIED.to_string())
    }

    /// Builds the key from components, sorting their specs first.
    ///
    /// Returns [`ModifierSetKey::unmodified`] for an empty slice.
    pub fn from_components(components: &[ModifierComponent]) -> Self {
        if components.is_empty() {
            return Self::unmodified();
        }
        let mut specs: Vec<String> = components.iter().map(ModifierComponent::spec).collect();
        specs.sort();
        Self(specs.join("/"))
    }

    /// Wraps an already canonical spec, such as a single component spec.
    pub fn from_spec(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    pub fn is_unmodified(&self) -> bool {
        self.0 == UNMODIFIED
    }

    /// `true` when more than one key must be held.
    pub fn is_composite(&self) -> bool {
        self.0.contains('/')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModifierSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modifier {
    /// The full set this record was created for.
    pub set_key: ModifierSetKey,
    pub number: u32,
    /// Held key for component records; `None` for the composite record.
    pub component: Option<ModifierComponent>,
}

/// The two modifier-number counters threaded through one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierCounters {
    hotas: u32,
    keyboard: u32,
}

impl ModifierCounters {
    pub fn new() -> Self {
        Self {
            hotas: HOTAS_MODIFIER_START,
            keyboard: KEYBOARD_MODIFIER_START,
        }
    }

    /// Number the next modifier on `device` would receive.
    pub fn current(&self, device: &str) -> u32 {
        if device == KEYBOARD_DEVICE {
            self.keyboard
        } else {
            self.hotas
        }
    }

    /// Advances the counter of the range `device` draws from.
    pub fn advance(&mut self, device: &str) {
        if device == KEYBOARD_DEVICE {
            self.keyboard += 1;
        } else {
            self.hotas += 1;
        }
    }
}

impl Default for ModifierCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Spec → modifier records, in first-registration order.
///
/// Specs are either single-component `Device::Index::Key` strings or full
/// composite set keys.  A component list may hold records of several sets
/// (the same key can take part in several combinations).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModifierRegistry {
    entries: IndexMap<String, Vec<Modifier>>,
}

impl ModifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records stored under `spec`, empty if none.
    pub fn records(&self, spec: &str) -> &[Modifier] {
        self.entries.get(spec).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the number of the set, reading the record created for it.
    pub fn number_for(&self, set_key: &ModifierSetKey) -> Option<u32> {
        self.records(set_key.as_str())
            .iter()
            .find(|m| &m.set_key == set_key)
            .map(|m| m.number)
    }

    /// `true` once the set has been registered.
    pub fn contains_set(&self, set_key: &ModifierSetKey) -> bool {
        self.number_for(set_key).is_some()
    }

    /// Makes sure `spec` has an entry, keeping its first-seen position.
    pub fn ensure_spec(&mut self, spec: &str) {
        if !self.entries.contains_key(spec) {
            self.entries.insert(spec.to_string(), Vec::new());
        }
    }

    pub fn push(&mut self, spec: String, modifier: Modifier) {
        self.entries.entry(spec).or_default().push(modifier);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Modifier])> {
        self.entries
            .iter()
            .map(|(spec, records)| (spec.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
