//! Label assignment: which texts go into which hit-box of one device image.
//!
//! # Label order per physical key (for beginners)
//!
//! 1. `Modifier n` for every modifier record on the key, including records
//!    on the key's `Pos_`/`Neg_` axis directions.
//! 2. The commands bound without modifiers.
//! 3. The commands bound with modifiers, by ascending modifier number.
//!
//! Commands that a more general command on the same bind already covers are
//! hidden (see [`Bind::is_redundant`]).

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::catalog::{ControlDef, ControlType, DeviceCatalog, HitBox};
use crate::domain::model::{axis_variants, key_spec, normalize_key, Bind, ParsedBindings, PhysicalKey};
use crate::domain::modifier::{Modifier, ModifierComponent};
use crate::domain::style::{category_style, group_style, modifier_style, Style, StylingMode};
use crate::domain::warnings::Advisory;

/// Modifier numbers at or above this value are never printed.
pub const MODIFIER_SCAN_CEILING: u32 = 200;

/// Group name of modifier labels.
pub const MODIFIER_GROUP: &str = "Modifier";

/// One label before layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub text: String,
    pub group: String,
    pub style: Style,
}

/// The ordered labels of one hit-box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitBoxLabels {
    /// `Device::Index::Key` of the physical key or standalone modifier.
    pub spec: String,
    pub hit_box: HitBox,
    pub items: Vec<TextItem>,
}

/// Opening sentence of the misconfiguration advisory.
pub fn misconfiguration_header(first: &str) -> String {
    format!(
        "Misconfiguration detected: one or more analogue controls are bound as digital \
         buttons. Your misconfigured controls: {first}"
    )
}

/// Assigns labels to hit-boxes for one parsed document.
#[derive(Debug, Clone, Copy)]
pub struct TextAssigner<'a> {
    parsed: &'a ParsedBindings,
    devices: &'a DeviceCatalog,
    styling: StylingMode,
}

impl<'a> TextAssigner<'a> {
    pub fn new(parsed: &'a ParsedBindings, devices: &'a DeviceCatalog, styling: StylingMode) -> Self {
        Self {
            parsed,
            devices,
            styling,
        }
    }

    /// Labels for every physical key of `image_devices` at `device_index`,
    /// followed by the standalone modifiers of the same image.
    ///
    /// Digital commands bound to an analogue hit-box are appended to
    /// `misconfiguration`.
    pub fn assign(
        &self,
        image_devices: &[String],
        device_index: u32,
        misconfiguration: &mut Advisory,
    ) -> Vec<HitBoxLabels> {
        let mut labels = Vec::new();
        for key in self.parsed.keys.iter() {
            if key.device_index != device_index || !image_devices.contains(&key.device) {
                continue;
            }
            let Some(hit_box) = self.devices.hit_box(&key.device, &key.key) else {
                warn!(spec = %key.spec(), "no hit-box for physical key, skipped");
                continue;
            };
            let items = self.key_items(key, hit_box, misconfiguration);
            labels.push(HitBoxLabels {
                spec: key.spec(),
                hit_box: *hit_box,
                items,
            });
        }
        labels.extend(self.standalone_modifiers(image_devices, device_index));
        debug!(device_index, hit_boxes = labels.len(), "labels assigned");
        labels
    }

    /// Modifier keys that carry no bindings of their own on this image.
    pub fn standalone_modifiers(&self, image_devices: &[String], device_index: u32) -> Vec<HitBoxLabels> {
        let mut labels = Vec::new();
        for (spec, records) in self.parsed.modifiers.iter() {
            if spec.contains('/') {
                continue;
            }
            let on_image: Vec<(&Modifier, &ModifierComponent)> = records
                .iter()
                .filter_map(|record| record.component.as_ref().map(|c| (record, c)))
                .filter(|(_, c)| c.device_index == device_index && image_devices.contains(&c.device))
                .collect();
            let Some((_, component)) = on_image.last() else {
                continue;
            };
            let normalized = normalize_key(&component.key);
            if self.parsed.keys.contains(spec)
                || self.parsed.keys.contains(&key_spec(&component.device, component.device_index, normalized))
            {
                continue;
            }
            let Some(hit_box) = self
                .devices
                .hit_box(&component.device, &component.key)
                .or_else(|| self.devices.hit_box(&component.device, normalized))
            else {
                warn!(spec, "no hit-box for standalone modifier, skipped");
                continue;
            };
            labels.push(HitBoxLabels {
                spec: spec.to_string(),
                hit_box: *hit_box,
                items: on_image
                    .iter()
                    .map(|(record, _)| self.modifier_item(record.number))
                    .collect(),
            });
        }
        labels
    }

    fn key_items(&self, key: &PhysicalKey, hit_box: &HitBox, misconfiguration: &mut Advisory) -> Vec<TextItem> {
        let mut items = Vec::new();

        let spec = key.spec();
        let direction_specs = axis_variants(&key.key).map(|k| key_spec(&key.device, key.device_index, &k));
        for spec in std::iter::once(spec).chain(direction_specs) {
            items.extend(
                self.parsed
                    .modifiers
                    .records(&spec)
                    .iter()
                    .map(|record| self.modifier_item(record.number)),
            );
        }

        if let Some(bind) = key.unmodified() {
            for control in visible_controls(bind) {
                if control.control_type == ControlType::Digital && control.has_analogue && hit_box.is_analogue() {
                    misconfiguration.append(&control.name, misconfiguration_header);
                }
                items.push(self.control_item(control, None));
            }
        }

        let mut modified: Vec<(u32, &Bind)> = key
            .binds
            .iter()
            .filter(|(set_key, _)| !set_key.is_unmodified())
            .filter_map(|(set_key, bind)| {
                let number = self.parsed.modifiers.number_for(set_key)?;
                (1..MODIFIER_SCAN_CEILING).contains(&number).then_some((number, bind))
            })
            .collect();
        modified.sort_by_key(|(number, _)| *number);
        for (number, bind) in modified {
            items.extend(visible_controls(bind).map(|control| self.control_item(control, Some(number))));
        }

        items
    }

    fn modifier_item(&self, number: u32) -> TextItem {
        let style = match self.styling {
            StylingMode::Modifier => modifier_style(number),
            _ => group_style(MODIFIER_GROUP),
        };
        TextItem {
            text: format!("Modifier {number}"),
            group: MODIFIER_GROUP.to_string(),
            style,
        }
    }

    fn control_item(&self, control: &ControlDef, modifier: Option<u32>) -> TextItem {
        let style = match self.styling {
            StylingMode::Modifier => modifier_style(modifier.unwrap_or(0)),
            StylingMode::Category => category_style(&control.category),
            StylingMode::Group | StylingMode::None => group_style(&control.group),
        };
        let text = match modifier {
            Some(number) if self.styling.shows_modifier_suffix() => format!("{}[{number}]", control.name),
            _ => control.name.clone(),
        };
        TextItem {
            text,
            group: control.group.clone(),
            style,
        }
    }
}

fn visible_controls(bind: &Bind) -> impl Iterator<Item = &ControlDef> {
    bind.controls
        .values()
        .filter(move |control| !bind.is_redundant(control))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use indexmap::IndexMap;

    use super::*;
    use crate::domain::catalog::{default_rewrites, ControlCatalog, DeviceGeometry, DeviceRecord};
    use crate::domain::modifier::ModifierSetKey;
    use crate::parser::BindingParser;

    fn devices() -> DeviceCatalog {
        let mut supported = IndexMap::new();
        supported.insert(
            "T16000M".to_string(),
            DeviceRecord {
                template: "t16000m".to_string(),
                handled_devices: vec!["T16000M".to_string()],
                key_devices: None,
                mapping_software: None,
            },
        );
        let mut keys = IndexMap::new();
        keys.insert("Joy_1".to_string(), HitBox::new(100, 100, 400, 54));
        keys.insert("Joy_2".to_string(), HitBox::new(100, 200, 400, 54));
        keys.insert("Joy_3".to_string(), HitBox::new(100, 300, 400, 54));
        let mut axis = HitBox::new(100, 400, 400, 108);
        axis.control_type = Some(ControlType::Analogue);
        keys.insert("Joy_X".to_string(), axis);
        let mut geometry = HashMap::new();
        geometry.insert(
            "T16000M".to_string(),
            DeviceGeometry {
                display_name: None,
                keys,
            },
        );
        DeviceCatalog::new(supported, geometry, default_rewrites())
    }

    fn controls() -> ControlCatalog {
        let mut controls = ControlCatalog::new();
        let mut roll_left = ControlDef::fallback("RollLeftButton");
        roll_left.name = "Roll left".to_string();
        roll_left.has_analogue = true;
        roll_left.hide_if_same_as.insert("RollAxisRaw".to_string());
        controls.insert("RollLeftButton", roll_left);
        let mut roll_axis = ControlDef::fallback("RollAxisRaw");
        roll_axis.name = "Roll".to_string();
        roll_axis.control_type = ControlType::Analogue;
        controls.insert("RollAxisRaw", roll_axis);
        let mut yaw_left = ControlDef::fallback("YawLeftButton");
        yaw_left.name = "Yaw left".to_string();
        yaw_left.has_analogue = true;
        controls.insert("YawLeftButton", yaw_left);
        let mut yaw_right = ControlDef::fallback("YawRightButton");
        yaw_right.name = "Yaw right".to_string();
        yaw_right.has_analogue = true;
        controls.insert("YawRightButton", yaw_right);
        let mut fire = ControlDef::fallback("PrimaryFire");
        fire.name = "Fire".to_string();
        fire.group = "Ship".to_string();
        fire.category = "Combat".to_string();
        controls.insert("PrimaryFire", fire);
        controls
    }

    fn parse(xml: &str) -> ParsedBindings {
        let groups = vec!["General".to_string(), "Ship".to_string()];
        BindingParser::new(&controls(), &devices())
            .parse(xml, &groups)
            .expect("document must parse")
    }

    fn texts(labels: &[HitBoxLabels], spec: &str) -> Vec<String> {
        labels
            .iter()
            .find(|l| l.spec == spec)
            .map(|l| l.items.iter().map(|i| i.text.clone()).collect())
            .unwrap_or_default()
    }

    fn stick() -> Vec<String> {
        vec!["T16000M".to_string()]
    }

    #[test]
    fn test_redundant_specialisation_is_hidden() {
        // Arrange
        let parsed = parse(
            r#"<Root>
            <RollLeftButton><Primary Device="T16000M" Key="Joy_1"/></RollLeftButton>
            <RollAxisRaw><Binding Device="T16000M" Key="Joy_1"/></RollAxisRaw>
        </Root>"#,
        );
        let devices = devices();
        let mut advisory = Advisory::new();

        // Act
        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Group).assign(&stick(), 0, &mut advisory);

        // Assert
        assert_eq!(texts(&labels, "T16000M::0::Joy_1"), vec!["Roll"]);
    }

    #[test]
    fn test_misconfigured_controls_accumulate_in_encounter_order() {
        let parsed = parse(
            r#"<Root>
            <YawLeftButton><Primary Device="T16000M" Key="Neg_Joy_X"/></YawLeftButton>
            <YawRightButton><Primary Device="T16000M" Key="Pos_Joy_X"/></YawRightButton>
        </Root>"#,
        );
        let devices = devices();
        let mut advisory = Advisory::new();

        TextAssigner::new(&parsed, &devices, StylingMode::None).assign(&stick(), 0, &mut advisory);

        let message = advisory.as_str();
        let left = message.find("Yaw left").expect("first control listed");
        let right = message.find("Yaw right").expect("second control listed");
        assert!(left < right);
        assert!(message.ends_with("Yaw left, Yaw right"));
    }

    #[test]
    fn test_digital_control_on_digital_hit_box_is_not_misconfigured() {
        let parsed = parse(r#"<Root><YawLeftButton><Primary Device="T16000M" Key="Joy_1"/></YawLeftButton></Root>"#);
        let devices = devices();
        let mut advisory = Advisory::new();
        TextAssigner::new(&parsed, &devices, StylingMode::None).assign(&stick(), 0, &mut advisory);
        assert!(advisory.is_empty());
    }

    #[test]
    fn test_modifier_labels_then_unmodified_then_modified_by_number() {
        let parsed = parse(
            r#"<Root>
            <PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_3"/>
            </Primary></PrimaryFire>
            <YawLeftButton><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_2"/>
            </Primary></YawLeftButton>
            <YawRightButton><Primary Device="T16000M" Key="Joy_2"/></YawRightButton>
            <RollAxisRaw><Secondary Device="T16000M" Key="Joy_1"/></RollAxisRaw>
        </Root>"#,
        );
        let devices = devices();
        let mut advisory = Advisory::new();

        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Group).assign(&stick(), 0, &mut advisory);

        // Joy_3 registered first (number 1), Joy_2 second (number 2).
        assert_eq!(texts(&labels, "T16000M::0::Joy_1"), vec!["Roll", "Fire[1]", "Yaw left[2]"]);
        assert_eq!(texts(&labels, "T16000M::0::Joy_2"), vec!["Modifier 2", "Yaw right"]);
    }

    #[test]
    fn test_modifier_styling_drops_suffix_and_colours_by_number() {
        let parsed = parse(
            r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_2"/>
            </Primary></PrimaryFire></Root>"#,
        );
        let devices = devices();
        let mut advisory = Advisory::new();

        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Modifier).assign(&stick(), 0, &mut advisory);

        let key = labels.iter().find(|l| l.spec == "T16000M::0::Joy_1").expect("labels");
        assert_eq!(key.items[0].text, "Fire");
        assert_eq!(key.items[0].style, modifier_style(1));
    }

    #[test]
    fn test_category_styling_uses_category_table() {
        let parsed = parse(r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1"/></PrimaryFire></Root>"#);
        let devices = devices();
        let mut advisory = Advisory::new();
        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Category).assign(&stick(), 0, &mut advisory);
        assert_eq!(labels[0].items[0].style, category_style("Combat"));
    }

    #[test]
    fn test_standalone_modifier_gets_its_own_hit_box() {
        let parsed = parse(
            r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_2"/>
            </Primary></PrimaryFire></Root>"#,
        );
        let devices = devices();
        let mut advisory = Advisory::new();

        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Group).assign(&stick(), 0, &mut advisory);

        let standalone = labels.iter().find(|l| l.spec == "T16000M::0::Joy_2").expect("standalone");
        assert_eq!(standalone.hit_box, HitBox::new(100, 200, 400, 54));
        assert_eq!(standalone.items[0].text, "Modifier 1");
        assert_eq!(standalone.items[0].group, MODIFIER_GROUP);
    }

    #[test]
    fn test_standalone_modifier_skipped_when_key_has_binds() {
        let parsed = parse(
            r#"<Root>
            <PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_2"/>
            </Primary></PrimaryFire>
            <YawLeftButton><Primary Device="T16000M" Key="Joy_2"/></YawLeftButton>
        </Root>"#,
        );
        let devices = devices();
        let standalone = TextAssigner::new(&parsed, &devices, StylingMode::Group).standalone_modifiers(&stick(), 0);
        assert!(standalone.is_empty());
    }

    #[test]
    fn test_composite_modifier_has_no_standalone_label_of_its_own() {
        // Arrange: Joy_2 and Joy_3 held together
        let parsed = parse(
            r#"<Root><PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Joy_2"/>
                <Modifier Device="T16000M" Key="Joy_3"/>
            </Primary></PrimaryFire></Root>"#,
        );
        let devices = devices();

        // Act
        let standalone = TextAssigner::new(&parsed, &devices, StylingMode::Group).standalone_modifiers(&stick(), 0);

        // Assert
        let specs: Vec<&str> = standalone.iter().map(|l| l.spec.as_str()).collect();
        assert_eq!(specs, vec!["T16000M::0::Joy_2", "T16000M::0::Joy_3"]);
        assert!(!parsed.modifiers.records("T16000M::0::Joy_2/T16000M::0::Joy_3").is_empty());
        assert_eq!(texts(&standalone, "T16000M::0::Joy_3"), vec!["Modifier 1"]);
    }

    #[test]
    fn test_modifier_numbers_at_or_above_ceiling_are_not_printed() {
        // Arrange: keyboard modifiers number from 101, so 105 sets reach 205
        let binds: String = (0..105)
            .map(|i| {
                format!(r#"<Primary Device="T16000M" Key="Joy_1"><Modifier Device="Keyboard" Key="Key_{i}"/></Primary>"#)
            })
            .collect();
        let parsed = parse(&format!("<Root><PrimaryFire>{binds}</PrimaryFire></Root>"));
        let devices = devices();
        let mut advisory = Advisory::new();

        // Act
        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Group).assign(&stick(), 0, &mut advisory);

        // Assert
        assert_eq!(
            parsed.modifiers.number_for(&ModifierSetKey::from_spec("Keyboard::0::Key_99")),
            Some(MODIFIER_SCAN_CEILING)
        );
        let texts = texts(&labels, "T16000M::0::Joy_1");
        assert_eq!(texts.len(), 99);
        assert_eq!(texts.first().map(String::as_str), Some("Fire[101]"));
        assert_eq!(texts.last().map(String::as_str), Some("Fire[199]"));
        assert!(!texts.iter().any(|t| t == "Fire[200]"));
    }

    #[test]
    fn test_axis_direction_modifier_shows_on_collapsed_key() {
        let parsed = parse(
            r#"<Root>
            <PrimaryFire><Primary Device="T16000M" Key="Joy_1">
                <Modifier Device="T16000M" Key="Pos_Joy_X"/>
            </Primary></PrimaryFire>
            <RollAxisRaw><Binding Device="T16000M" Key="Joy_X"/></RollAxisRaw>
        </Root>"#,
        );
        let devices = devices();
        let mut advisory = Advisory::new();

        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Group).assign(&stick(), 0, &mut advisory);

        assert_eq!(texts(&labels, "T16000M::0::Joy_X"), vec!["Modifier 1", "Roll"]);
        assert!(labels.iter().all(|l| l.spec != "T16000M::0::Pos_Joy_X"));
    }

    #[test]
    fn test_keys_without_geometry_or_on_other_index_are_skipped() {
        let parsed = parse(
            r#"<Root>
            <PrimaryFire><Primary Device="T16000M" Key="Joy_99"/></PrimaryFire>
            <YawLeftButton><Primary Device="T16000M" DeviceIndex="1" Key="Joy_1"/></YawLeftButton>
        </Root>"#,
        );
        let devices = devices();
        let mut advisory = Advisory::new();
        let labels = TextAssigner::new(&parsed, &devices, StylingMode::Group).assign(&stick(), 0, &mut advisory);
        assert!(labels.is_empty());
    }
}
