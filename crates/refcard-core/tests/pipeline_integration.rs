//! Integration tests for the parse → assign → layout pipeline.
//!
//! These tests drive the public API only, with a catalog loaded from TOML the
//! way an application would supply it.

use refcard_core::domain::style::all_groups;
use refcard_core::{
    Advisory, BindingParser, Catalog, LayoutEngine, ModifierSetKey, MonospaceMeasurer, StylingMode, TextAssigner,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const CATALOG: &str = r#"
[controls.PrimaryFire]
name = "Fire"
group = "Ship"
category = "Combat"
order = 10

[controls.YawLeftButton]
name = "Yaw left"
group = "Ship"
category = "Navigation"
has_analogue = true
hide_if_same_as = ["YawAxisRaw"]

[controls.YawAxisRaw]
name = "Yaw"
group = "Ship"
category = "Navigation"
type = "Analogue"

[devices.T16000M]
template = "t16000m"
handled_devices = ["T16000M"]

[devices.Keyboard]
template = "keyboard"
handled_devices = ["Keyboard"]

[geometry.T16000M.keys.Joy_1]
x = 1000
y = 500
width = 600

[geometry.T16000M.keys.Joy_2]
x = 1000
y = 600
width = 600

[geometry.T16000M.keys.Joy_XAxis]
x = 1000
y = 700
width = 600
height = 108
type = "Analogue"
"#;

const BINDS: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<Root PresetName="Custom" MajorVersion="4" MinorVersion="0">
  <YawAxisRaw>
    <Binding Device="T16000M" Key="Joy_XAxis" />
    <Inverted Value="0" />
  </YawAxisRaw>
  <YawLeftButton>
    <Primary Device="T16000M" Key="Neg_Joy_XAxis" />
    <Secondary Device="{NoDevice}" Key="" />
  </YawLeftButton>
  <PrimaryFire>
    <Primary Device="T16000M" Key="Joy_1" />
    <Secondary Device="T16000M" Key="Joy_1">
      <Modifier Device="T16000M" Key="Joy_2" />
    </Secondary>
  </PrimaryFire>
</Root>
"#;

fn catalog() -> Catalog {
    toml::from_str(CATALOG).expect("fixture catalog must parse")
}

fn stick() -> Vec<String> {
    vec!["T16000M".to_string()]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_pipeline_labels_every_hit_box_inside_its_bounds() {
    // Arrange
    let catalog = catalog();
    let parsed = BindingParser::new(&catalog.controls, &catalog.devices)
        .parse(BINDS, &all_groups())
        .expect("fixture must parse");
    let mut misconfiguration = Advisory::new();
    let engine = LayoutEngine::new(MonospaceMeasurer);

    // Act
    let labels = TextAssigner::new(&parsed, &catalog.devices, StylingMode::Group).assign(
        &stick(),
        0,
        &mut misconfiguration,
    );

    // Assert
    let specs: Vec<&str> = labels.iter().map(|l| l.spec.as_str()).collect();
    assert_eq!(specs, vec!["T16000M::0::Joy_XAxis", "T16000M::0::Joy_1", "T16000M::0::Joy_2"]);
    for hit_box_labels in &labels {
        let placed = engine.layout(&hit_box_labels.items, &hit_box_labels.hit_box, 40);
        assert_eq!(placed.len(), hit_box_labels.items.len());
        for text in placed {
            assert!(text.x >= hit_box_labels.hit_box.x);
            assert!(text.y >= hit_box_labels.hit_box.y);
        }
    }
}

#[test]
fn test_pipeline_hides_button_covered_by_axis_on_same_bind() {
    let catalog = catalog();
    let parsed = BindingParser::new(&catalog.controls, &catalog.devices)
        .parse(BINDS, &all_groups())
        .expect("fixture must parse");
    let mut misconfiguration = Advisory::new();

    let labels = TextAssigner::new(&parsed, &catalog.devices, StylingMode::Group).assign(
        &stick(),
        0,
        &mut misconfiguration,
    );

    let axis = labels.iter().find(|l| l.spec == "T16000M::0::Joy_XAxis").expect("axis labels");
    let texts: Vec<&str> = axis.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["Yaw"]);
    // Hidden controls are not reported as misconfigured either.
    assert!(misconfiguration.is_empty());
}

#[test]
fn test_pipeline_modifier_number_read_back_at_render_time() {
    let catalog = catalog();
    let parsed = BindingParser::new(&catalog.controls, &catalog.devices)
        .parse(BINDS, &all_groups())
        .expect("fixture must parse");
    let mut misconfiguration = Advisory::new();

    let labels = TextAssigner::new(&parsed, &catalog.devices, StylingMode::Category).assign(
        &stick(),
        0,
        &mut misconfiguration,
    );

    let number = parsed
        .modifiers
        .number_for(&ModifierSetKey::from_spec("T16000M::0::Joy_2"))
        .expect("modifier registered");
    let fire = labels.iter().find(|l| l.spec == "T16000M::0::Joy_1").expect("fire labels");
    let texts: Vec<&str> = fire.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["Fire".to_string(), format!("Fire[{number}]")]);
    let modifier = labels.iter().find(|l| l.spec == "T16000M::0::Joy_2").expect("standalone modifier");
    assert_eq!(modifier.items[0].text, format!("Modifier {number}"));
}

#[test]
fn test_pipeline_malformed_document_reports_error() {
    let catalog = catalog();
    let result = BindingParser::new(&catalog.controls, &catalog.devices).parse("<Root><Broken></Root>", &all_groups());
    assert!(result.is_err());
}
