//! Bindings document parser.
//!
//! Turns an exported bindings XML document into a [`ParsedBindings`] model:
//! physical keys with their binds, the modifier registry and the device usage
//! map.
//!
//! # Document shape (for beginners)
//!
//! Every command is an element named after its tag.  Its bindings are child
//! elements named `Binding`, `Primary` or `Secondary`, each carrying `Device`,
//! an optional `DeviceIndex` and `Key`.  A binding may have `Modifier`
//! children with the same attributes, naming keys that must be held:
//!
//! ```xml
//! <FireWeapon>
//!   <Primary Device="T16000M" Key="Joy_1">
//!     <Modifier Device="Keyboard" Key="Key_LeftShift" />
//!   </Primary>
//!   <Secondary Device="{NoDevice}" Key="" />
//! </FireWeapon>
//! ```

mod resolver;

pub use resolver::ModifierResolver;

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::catalog::{ControlCatalog, ControlDef, DeviceCatalog};
use crate::domain::model::{ParsedBindings, NO_DEVICE};
use crate::domain::modifier::ModifierComponent;

/// Binding element names, in the order their elements are visited.
const BINDING_ELEMENTS: [&str; 3] = ["Binding", "Primary", "Secondary"];

/// Raised when the bindings document is not well-formed XML.
///
/// Callers recover with [`ParsedBindings::empty`] and surface the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("bindings document is not valid XML ({message})")]
pub struct DocumentParseError {
    pub message: String,
    /// 1-based line of the failure.
    pub line: u32,
    /// 1-based column of the failure.
    pub column: u32,
}

impl From<roxmltree::Error> for DocumentParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        Self {
            message: err.to_string(),
            line: pos.row,
            column: pos.col,
        }
    }
}

/// Parses bindings documents against a pair of catalogs.
///
/// The parser itself is stateless; every call to [`BindingParser::parse`]
/// starts with fresh modifier counters.
#[derive(Debug, Clone, Copy)]
pub struct BindingParser<'c> {
    controls: &'c ControlCatalog,
    devices: &'c DeviceCatalog,
}

impl<'c> BindingParser<'c> {
    pub fn new(controls: &'c ControlCatalog, devices: &'c DeviceCatalog) -> Self {
        Self { controls, devices }
    }

    /// Parses `xml`, keeping only controls whose group is in `display_groups`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentParseError`] when the document is not well-formed.
    /// An empty but well-formed document yields an empty model instead.
    pub fn parse(
        &self,
        xml: &str,
        display_groups: &[String],
    ) -> Result<ParsedBindings, DocumentParseError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let doc = Document::parse(xml)?;
        let rewrites = ActiveRewrites::detect(&doc, self.devices);

        let mut resolver = ModifierResolver::new();
        let mut parsed = ParsedBindings::empty();

        for binding in binding_elements(&doc) {
            let Some(tag) = binding.parent_element().map(|p| p.tag_name().name()) else {
                continue;
            };
            let device = match binding.attribute("Device") {
                Some(NO_DEVICE) | None => continue,
                Some(device) => rewrites.apply(device),
            };
            let components = modifier_components(&binding, &rewrites);
            let set_key = resolver.resolve(components);

            let Some(base_key) = binding.attribute("Key") else {
                debug!(tag, device, "binding without a key skipped");
                continue;
            };
            let device_index = device_index(&binding);

            let control = self.resolve_control(tag);
            if !display_groups.iter().any(|group| *group == control.group) {
                continue;
            }

            parsed
                .devices
                .record(device, device_index, self.devices.classify(device));
            parsed
                .keys
                .bind_mut(device, device_index, base_key, set_key)
                .controls
                .insert(tag.to_string(), control);
        }

        parsed.modifiers = resolver.into_registry();
        debug!(
            keys = parsed.keys.len(),
            modifiers = parsed.modifiers.len(),
            "bindings parsed"
        );
        Ok(parsed)
    }

    fn resolve_control(&self, tag: &str) -> ControlDef {
        match self.controls.get(tag) {
            Some(control) => control.clone(),
            None => {
                warn!(tag, "no catalog entry for control, using default");
                ControlDef::fallback(tag)
            }
        }
    }
}

/// All binding elements: every `Binding`, then every `Primary`, then every
/// `Secondary`, each in document order.
fn binding_elements<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    BINDING_ELEMENTS
        .iter()
        .flat_map(|name| {
            doc.descendants()
                .filter(move |node| node.is_element() && node.tag_name().name() == *name)
        })
        .collect()
}

fn device_index(node: &Node<'_, '_>) -> u32 {
    match node.attribute("DeviceIndex") {
        None => 0,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = raw, "unparsable DeviceIndex, using 0");
            0
        }),
    }
}

/// Direct `Modifier` children, with device rewrites applied.
fn modifier_components(
    binding: &Node<'_, '_>,
    rewrites: &ActiveRewrites<'_>,
) -> Vec<ModifierComponent> {
    binding
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == "Modifier")
        .filter_map(|child| {
            let (Some(device), Some(key)) = (child.attribute("Device"), child.attribute("Key"))
            else {
                warn!("modifier without Device or Key ignored");
                return None;
            };
            Some(ModifierComponent {
                device: rewrites.apply(device).to_string(),
                device_index: device_index(&child),
                key: key.to_string(),
            })
        })
        .collect()
}

/// Device rewrites whose trigger device appears somewhere in the document.
struct ActiveRewrites<'c> {
    rules: Vec<(&'c str, &'c str)>,
}

impl<'c> ActiveRewrites<'c> {
    fn detect(doc: &Document<'_>, devices: &'c DeviceCatalog) -> Self {
        let rules = devices
            .rewrites()
            .iter()
            .filter(|rule| {
                doc.descendants()
                    .any(|node| node.attribute("Device") == Some(rule.trigger.as_str()))
            })
            .map(|rule| (rule.device.as_str(), rule.replacement.as_str()))
            .collect::<Vec<_>>();
        if !rules.is_empty() {
            debug!(count = rules.len(), "device rewrites active");
        }
        Self { rules }
    }

    fn apply<'d>(&self, device: &'d str) -> &'d str
    where
        'c: 'd,
    {
        self.rules
            .iter()
            .find(|(from, _)| *from == device)
            .map(|(_, to)| *to)
            .unwrap_or(device)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use indexmap::IndexMap;

    use super::*;
    use crate::domain::catalog::{default_rewrites, DeviceRecord};
    use crate::domain::modifier::ModifierSetKey;

    fn controls() -> ControlCatalog {
        let mut controls = ControlCatalog::new();
        let mut fire = ControlDef::fallback("PrimaryFire");
        fire.name = "Primary fire".to_string();
        fire.group = "Ship".to_string();
        controls.insert("PrimaryFire", fire);
        let mut map = ControlDef::fallback("GalaxyMapOpen");
        map.group = "Galaxy map".to_string();
        controls.insert("GalaxyMapOpen", map);
        controls
    }

    fn devices() -> DeviceCatalog {
        let mut supported = IndexMap::new();
        for (name, handled) in [
            ("Keyboard", vec!["Keyboard"]),
            ("T16000M", vec!["T16000M"]),
            ("T16000MFCS", vec!["T16000MFCS", "T16000MTHROTTLE"]),
        ] {
            supported.insert(
                name.to_string(),
                DeviceRecord {
                    template: name.to_lowercase(),
                    handled_devices: handled.into_iter().map(String::from).collect(),
                    key_devices: None,
                    mapping_software: None,
                },
            );
        }
        DeviceCatalog::new(supported, HashMap::new(), default_rewrites())
    }

    fn groups() -> Vec<String> {
        vec!["General".to_string(), "Ship".to_string()]
    }

    fn parse(xml: &str) -> ParsedBindings {
        let (controls, devices) = (controls(), devices());
        BindingParser::new(&controls, &devices)
            .parse(xml, &groups())
            .expect("document must parse")
    }

    #[test]
    fn test_single_binding_yields_one_unmodified_bind() {
        // Arrange
        let xml = r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1"/></PrimaryFire></Root>"#;

        // Act
        let parsed = parse(xml);

        // Assert
        assert_eq!(parsed.keys.len(), 1);
        let key = parsed.keys.get("T16000M::0::Joy_1").expect("physical key");
        assert_eq!(key.binds.len(), 1);
        let bind = key.unmodified().expect("unmodified bind");
        assert_eq!(bind.controls.len(), 1);
        assert_eq!(bind.controls["PrimaryFire"].name, "Primary fire");
        assert!(parsed.modifiers.is_empty());
    }

    #[test]
    fn test_malformed_document_returns_structured_error() {
        let (controls, devices) = (controls(), devices());
        let err = BindingParser::new(&controls, &devices)
            .parse("<Root><Unclosed></Root>", &groups())
            .expect_err("malformed XML must fail");
        assert!(err.line >= 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_empty_document_is_success_with_empty_model() {
        let parsed = parse("<Root/>");
        assert_eq!(parsed, ParsedBindings::empty());
    }

    #[test]
    fn test_no_device_bindings_are_skipped() {
        let xml = r#"<Root><PrimaryFire>
            <Primary Device="{NoDevice}" Key=""/>
            <Secondary Device="T16000M" Key="Joy_2"/>
        </PrimaryFire></Root>"#;
        let parsed = parse(xml);
        assert_eq!(parsed.keys.len(), 1);
        assert!(parsed.keys.contains("T16000M::0::Joy_2"));
    }

    #[test]
    fn test_binding_elements_visited_binding_then_primary_then_secondary() {
        // Secondary written first in the document still lands after Primary.
        let xml = r#"<Root>
            <GalaxyMapOpen><Secondary Device="T16000M" Key="Joy_3"/></GalaxyMapOpen>
            <PrimaryFire><Primary Device="T16000M" Key="Joy_3"/></PrimaryFire>
            <Unknown><Binding Device="T16000M" Key="Joy_3"/></Unknown>
        </Root>"#;
        let (controls, devices) = (controls(), devices());
        let all: Vec<String> = vec!["General".into(), "Ship".into(), "Galaxy map".into()];
        let parsed = BindingParser::new(&controls, &devices)
            .parse(xml, &all)
            .expect("parse");

        let bind = parsed
            .keys
            .get("T16000M::0::Joy_3")
            .and_then(|k| k.unmodified())
            .expect("bind");
        let tags: Vec<&str> = bind.controls.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["Unknown", "PrimaryFire", "GalaxyMapOpen"]);
    }

    #[test]
    fn test_unknown_control_is_stored_with_default_definition() {
        let xml = r#"<Root><MysteryCommand><Binding Device="Keyboard" Key="Key_M"/></MysteryCommand></Root>"#;
        let parsed = parse(xml);
        let bind = parsed
            .keys
            .get("Keyboard::0::Key_M")
            .and_then(|k| k.unmodified())
            .expect("synthetic bind must be stored");
        let control = &bind.controls["MysteryCommand"];
        assert_eq!(control.group, "General");
        assert_eq!(control.order, 999);
    }

    #[test]
    fn test_controls_outside_display_groups_are_dropped() {
        let xml = r#"<Root><GalaxyMapOpen><Primary Device="Keyboard" Key="Key_G"/></GalaxyMapOpen></Root>"#;
        let parsed = parse(xml);
        assert!(parsed.keys.is_empty());
        assert!(parsed.devices.is_empty());
    }

    #[test]
    fn test_filtered_control_still_registers_its_modifier() {
        let xml = r#"<Root><GalaxyMapOpen><Primary Device="Keyboard" Key="Key_G">
            <Modifier Device="Keyboard" Key="Key_LeftAlt"/>
        </Primary></GalaxyMapOpen></Root>"#;
        let parsed = parse(xml);
        assert!(parsed.keys.is_empty());
        assert_eq!(
            parsed
                .modifiers
                .number_for(&ModifierSetKey::from_spec("Keyboard::0::Key_LeftAlt")),
            Some(101)
        );
    }

    #[test]
    fn test_binding_without_key_still_registers_its_modifier() {
        // Arrange
        let xml = r#"<Root><PrimaryFire><Primary Device="T16000M">
            <Modifier Device="T16000M" Key="Joy_2"/>
        </Primary></PrimaryFire></Root>"#;

        // Act
        let parsed = parse(xml);

        // Assert
        assert!(parsed.keys.is_empty());
        assert_eq!(
            parsed
                .modifiers
                .number_for(&ModifierSetKey::from_spec("T16000M::0::Joy_2")),
            Some(1)
        );
    }

    #[test]
    fn test_axis_direction_keys_collapse_onto_one_physical_key() {
        let xml = r#"<Root>
            <YawLeftButton><Primary Device="T16000M" Key="Neg_Joy_X"/></YawLeftButton>
            <YawRightButton><Primary Device="T16000M" Key="Pos_Joy_X"/></YawRightButton>
        </Root>"#;
        let parsed = parse(xml);
        assert_eq!(parsed.keys.len(), 1);
        let key = parsed.keys.get("T16000M::0::Joy_X").expect("collapsed key");
        assert_eq!(key.key, "Joy_X");
        assert_eq!(key.unmodified().map(|b| b.controls.len()), Some(2));
    }

    #[test]
    fn test_stick_rewritten_when_combined_throttle_present() {
        let xml = r#"<Root>
            <PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_2"/>
            </Primary></PrimaryFire>
            <Throttle><Binding Device="T16000MTHROTTLE" Key="Joy_UAxis"/></Throttle>
        </Root>"#;
        let parsed = parse(xml);
        assert!(parsed.keys.contains("T16000MFCS::0::Joy_1"));
        assert!(!parsed.keys.contains("T16000M::0::Joy_1"));
        assert_eq!(parsed.modifiers.records("T16000MFCS::0::Joy_2").len(), 1);
        assert!(parsed.devices.is_supported("T16000MFCS", 0));
    }

    #[test]
    fn test_stick_not_rewritten_without_throttle() {
        let parsed = parse(r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1"/></PrimaryFire></Root>"#);
        assert!(parsed.keys.contains("T16000M::0::Joy_1"));
    }

    #[test]
    fn test_device_index_defaults_to_zero_and_tolerates_garbage() {
        let xml = r#"<Root>
            <PrimaryFire><Primary Device="T16000M" DeviceIndex="1" Key="Joy_1"/></PrimaryFire>
            <Other><Primary Device="T16000M" DeviceIndex="x" Key="Joy_2"/></Other>
        </Root>"#;
        let parsed = parse(xml);
        assert!(parsed.keys.contains("T16000M::1::Joy_1"));
        assert!(parsed.keys.contains("T16000M::0::Joy_2"));
    }

    #[test]
    fn test_modifier_child_order_does_not_change_set_key() {
        let forward = r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1">
            <Modifier Device="T16000M" Key="Joy_2"/>
            <Modifier Device="Keyboard" Key="Key_LeftShift"/>
        </Primary></PrimaryFire></Root>"#;
        let backward = r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1">
            <Modifier Device="Keyboard" Key="Key_LeftShift"/>
            <Modifier Device="T16000M" Key="Joy_2"/>
        </Primary></PrimaryFire></Root>"#;

        let a = parse(forward);
        let b = parse(backward);

        let keys_a: Vec<_> = a.keys.get("T16000M::0::Joy_1").expect("key").binds.keys().cloned().collect();
        let keys_b: Vec<_> = b.keys.get("T16000M::0::Joy_1").expect("key").binds.keys().cloned().collect();
        assert_eq!(keys_a, keys_b);
        assert_eq!(keys_a[0].as_str(), "Keyboard::0::Key_LeftShift/T16000M::0::Joy_2");
    }

    #[test]
    fn test_parsing_twice_gives_identical_numbers() {
        let xml = r#"<Root>
            <PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_2"/>
            </Primary></PrimaryFire>
            <Other><Primary Device="Keyboard" Key="Key_A">
                <Modifier Device="Keyboard" Key="Key_LeftShift"/>
            </Primary></Other>
        </Root>"#;
        let first = parse(xml);
        let second = parse(xml);
        assert_eq!(first.modifiers, second.modifiers);
        assert_eq!(first.keys, second.keys);
    }
}
