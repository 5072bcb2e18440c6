//! Blank template plans: every hit-box of one device outlined and labelled
//! with its key id, for checking catalog geometry against the artwork.

use refcard_core::domain::catalog::DEFAULT_GROUP;
use refcard_core::domain::style::group_style;
use refcard_core::{Catalog, DrawInstruction, LayoutEngine, RectangleSpec, TextItem, TextMeasurer, TextSpec};
use thiserror::Error;
use tracing::{debug, warn};

use super::generate_refcard::{ImagePlan, DEFAULT_MAX_FONT_SIZE};

const BOX_STROKE: &str = "Red";
const BOX_FILL: &str = "LightGreen";

#[derive(Debug, Error, PartialEq)]
pub enum BlankTemplateError {
    #[error("{0} is not a supported controller")]
    UnknownDevice(String),
}

/// Plans the blank template of the catalog record `device`.
///
/// # Errors
///
/// Returns [`BlankTemplateError::UnknownDevice`] if no record has that name.
pub fn blank_template<M: TextMeasurer>(
    catalog: &Catalog,
    measurer: M,
    device: &str,
) -> Result<ImagePlan, BlankTemplateError> {
    let record = catalog
        .devices
        .record(device)
        .ok_or_else(|| BlankTemplateError::UnknownDevice(device.to_string()))?;
    let engine = LayoutEngine::new(measurer);
    let style = group_style(DEFAULT_GROUP);

    let mut instructions = Vec::new();
    for key_device in record.key_devices() {
        let Some(geometry) = catalog.devices.geometry(key_device) else {
            warn!(device = %key_device, "no geometry for key device");
            continue;
        };
        for (key, hit_box) in &geometry.keys {
            instructions.push(DrawInstruction::Rectangle(RectangleSpec {
                x: hit_box.x,
                y: hit_box.y,
                width: hit_box.width,
                height: hit_box.height,
                radius: 0,
                stroke: Some(BOX_STROKE.to_string()),
                fill: Some(BOX_FILL.to_string()),
            }));
            let label = [TextItem {
                text: key.clone(),
                group: DEFAULT_GROUP.to_string(),
                style,
            }];
            instructions.extend(engine.layout(&label, hit_box, DEFAULT_MAX_FONT_SIZE).into_iter().map(
                |placed| {
                    DrawInstruction::Text(TextSpec {
                        x: placed.x,
                        y: placed.y,
                        text: placed.item.text,
                        font: placed.item.style.font,
                        size: placed.size,
                        color: None,
                    })
                },
            ));
        }
    }
    debug!(device, instructions = instructions.len(), "blank template planned");

    Ok(ImagePlan {
        id: format!("{device}::blank"),
        name: format!("{}-blank", record.template),
        template: record.template.clone(),
        supported_device: device.to_string(),
        device_index: 0,
        instructions,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
