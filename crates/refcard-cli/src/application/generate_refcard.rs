//! GenerateRefcardUseCase: one bindings document in, one card report out.
//!
//! # Steps (for beginners)
//!
//! 1. **Parse** the document.  A document that cannot be read becomes an
//!    empty model plus a message on the `errors` channel, so the report is
//!    still produced.
//! 2. **Select images**: one per catalog record and device index with new
//!    bindings (see [`select_device_images`]).
//! 3. **Assign and lay out** labels for every hit-box of every image.
//! 4. **Keyboard sheet** when the first keyboard carries bindings.
//! 5. **Advisories**: unknown devices, mapping software, and the "nothing to
//!    draw" error.
//!
//! Every step runs inside an `info_span!("refcard")` tagged with the run id,
//! so log lines from the core library can be traced back to one document.

use refcard_core::domain::modifier::KEYBOARD_DEVICE;
use refcard_core::domain::style::{FontSlant, FontWeight};
use refcard_core::layout::sheet::{font_size_for_items, keyboard_item_count, sheet_entries};
use refcard_core::{
    Advisory, BindingParser, Catalog, DeviceUsage, DrawInstruction, FontFace, KeyboardSheet, LayoutEngine,
    ParsedBindings, StylingMode, TextAssigner, TextMeasurer, TextSpec, Warnings,
};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::advisories::{
    default_benign_devices, parse_error_message, report_device_software, report_no_bindings,
    report_unhandled_devices,
};
use super::select_images::{select_device_images, wants_keyboard_sheet, ImageSelection};

/// Largest label size tried on a device image.
pub const DEFAULT_MAX_FONT_SIZE: u32 = 40;

/// Device indices scanned for images.
pub const DEFAULT_DEVICE_INDICES: [u32; 2] = [0, 1];

/// Template used for the keyboard sheet when the catalog has no keyboard record.
pub const DEFAULT_KEYBOARD_TEMPLATE: &str = "keyboard";

/// Where the optional card title is drawn, and how.
const TITLE_X: i32 = 23;
const TITLE_Y: i32 = 252;
const TITLE_SIZE: u32 = 72;
const TITLE_FONT: FontFace = FontFace::new(FontWeight::SemiBold, FontSlant::Normal);

/// Everything a single generation needs besides the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RefcardRequest {
    pub binds: String,
    /// Groups shown on the keyboard sheet and kept by the parser.
    pub display_groups: Vec<String>,
    pub styling: StylingMode,
    pub max_font_size: u32,
    pub device_indices: Vec<u32>,
    /// `Device::Index` specs that never raise the unknown-device advisory.
    pub benign_devices: Vec<String>,
    /// Optional heading drawn on every image.
    pub title: Option<String>,
}

impl RefcardRequest {
    /// A request with default options for `binds`.
    pub fn new(binds: impl Into<String>) -> Self {
        Self {
            binds: binds.into(),
            display_groups: refcard_core::domain::style::all_groups(),
            styling: StylingMode::None,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            device_indices: DEFAULT_DEVICE_INDICES.to_vec(),
            benign_devices: default_benign_devices(),
            title: None,
        }
    }
}

/// Draw plan of one output image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePlan {
    /// `SupportedDevice::index`, or `Keyboard` for the summary sheet.
    pub id: String,
    /// Output file stem.
    pub name: String,
    pub template: String,
    pub supported_device: String,
    pub device_index: u32,
    pub instructions: Vec<DrawInstruction>,
}

/// Result of one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefcardReport {
    pub run_id: Uuid,
    pub images: Vec<ImagePlan>,
    pub warnings: Warnings,
    /// Every device the document used, with its catalog record if any.
    pub devices: DeviceUsage,
}

/// Orchestrates the core pipeline over one catalog and one measurer.
pub struct GenerateRefcardUseCase<'a, M> {
    catalog: &'a Catalog,
    measurer: M,
}

impl<'a, M: TextMeasurer> GenerateRefcardUseCase<'a, M> {
    pub fn new(catalog: &'a Catalog, measurer: M) -> Self {
        Self { catalog, measurer }
    }

    /// Runs the pipeline with a fresh run id.
    pub fn execute(&self, request: &RefcardRequest) -> RefcardReport {
        self.execute_with_id(Uuid::new_v4(), request)
    }

    /// Runs the pipeline under a caller-chosen run id.
    pub fn execute_with_id(&self, run_id: Uuid, request: &RefcardRequest) -> RefcardReport {
        let span = info_span!("refcard", %run_id);
        let _enter = span.enter();

        let mut warnings = Warnings::new();
        let parser = BindingParser::new(&self.catalog.controls, &self.catalog.devices);
        let parsed = match parser.parse(&request.binds, &request.display_groups) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "bindings document rejected, continuing with an empty model");
                warnings.errors.set(parse_error_message(&err));
                ParsedBindings::empty()
            }
        };
        debug!(keys = parsed.keys.len(), modifiers = parsed.modifiers.len(), "document parsed");

        let mut images: Vec<ImagePlan> = select_device_images(&self.catalog.devices, &parsed.devices, &request.device_indices)
            .into_iter()
            .map(|selection| self.device_image(&parsed, selection, request, &mut warnings.misconfiguration))
            .collect();

        if wants_keyboard_sheet(&parsed.devices) {
            images.push(self.keyboard_image(&parsed, request));
        }

        report_unhandled_devices(&parsed.devices, &request.benign_devices, run_id, &mut warnings.unhandled_devices);
        report_device_software(&parsed.devices, &self.catalog.devices, &mut warnings.device_software);
        report_no_bindings(images.len(), &mut warnings);

        info!(images = images.len(), clean = warnings.is_empty(), "refcard generated");
        RefcardReport {
            run_id,
            images,
            warnings,
            devices: parsed.devices,
        }
    }

    fn device_image(
        &self,
        parsed: &ParsedBindings,
        selection: ImageSelection,
        request: &RefcardRequest,
        misconfiguration: &mut Advisory,
    ) -> ImagePlan {
        let assigner = TextAssigner::new(parsed, &self.catalog.devices, request.styling);
        let engine = LayoutEngine::new(&self.measurer);

        let mut instructions = title_instructions(request.title.as_deref());
        for labels in assigner.assign(&selection.handled_devices, selection.device_index, misconfiguration) {
            for placed in engine.layout(&labels.items, &labels.hit_box, request.max_font_size) {
                instructions.push(DrawInstruction::Text(TextSpec {
                    x: placed.x,
                    y: placed.y,
                    font: placed.item.style.font,
                    size: placed.size,
                    color: request
                        .styling
                        .applies_color()
                        .then(|| placed.item.style.color.to_string()),
                    text: placed.item.text,
                }));
            }
        }
        debug!(image = %selection.id, instructions = instructions.len(), "device image planned");

        ImagePlan {
            id: selection.id,
            name: selection.name,
            template: selection.template,
            supported_device: selection.supported_device,
            device_index: selection.device_index,
            instructions,
        }
    }

    fn keyboard_image(&self, parsed: &ParsedBindings, request: &RefcardRequest) -> ImagePlan {
        let template = self
            .catalog
            .devices
            .record(KEYBOARD_DEVICE)
            .map_or(DEFAULT_KEYBOARD_TEMPLATE, |record| record.template.as_str())
            .to_string();
        let image_devices = [KEYBOARD_DEVICE.to_string()];
        let font_size = font_size_for_items(keyboard_item_count(parsed));
        let groups = sheet_entries(parsed, &image_devices, &request.display_groups);

        let mut instructions = title_instructions(request.title.as_deref());
        instructions.extend(KeyboardSheet::new(&self.measurer, font_size).render(&groups));
        debug!(font_size, instructions = instructions.len(), "keyboard sheet planned");

        ImagePlan {
            id: KEYBOARD_DEVICE.to_string(),
            name: template.clone(),
            template,
            supported_device: KEYBOARD_DEVICE.to_string(),
            device_index: 0,
            instructions,
        }
    }
}

fn title_instructions(title: Option<&str>) -> Vec<DrawInstruction> {
    title
        .filter(|t| !t.is_empty())
        .map(|text| {
            DrawInstruction::Text(TextSpec {
                x: TITLE_X,
                y: TITLE_Y,
                text: text.to_string(),
                font: TITLE_FONT,
                size: TITLE_SIZE,
                color: None,
            })
        })
        .into_iter()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
