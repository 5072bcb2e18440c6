//! Keyboard summary sheet.
//!
//! Keyboards have too many keys for per-key hit-boxes, so keyboard bindings
//! are printed as a list instead: one section per display group, one line per
//! command with its modifier and key drawn as boxed "chips".  Lines flow down
//! a column and continue in a new column once the page bottom is reached.

use indexmap::IndexMap;
use serde::Serialize;

use super::TextMeasurer;
use crate::domain::catalog::ControlDef;
use crate::domain::draw::{DrawInstruction, RectangleSpec, TextSpec};
use crate::domain::model::ParsedBindings;
use crate::domain::modifier::KEYBOARD_DEVICE;
use crate::domain::style::FontFace;
use crate::keymap::display_name;

/// Left edge of the first column.
pub const SHEET_BASE_X: i32 = 60;
/// Top of every column.
pub const SHEET_BASE_Y: i32 = 320;
/// Lines may not extend below this.
pub const SHEET_BOTTOM: i32 = 2160;
/// Horizontal gap between columns.
pub const COLUMN_GAP: i32 = 49;
/// Vertical gap added below every line.
pub const LINE_GAP: f32 = 32.0;
pub const CHIP_BORDER: i32 = 4;
pub const CHIP_RADIUS: i32 = 30;

/// Font size for sheets with up to [`FULL_SIZE_ITEMS`] commands.
pub const SHEET_FONT_MAX: u32 = 40;
/// Font size never drops below this.
pub const SHEET_FONT_MIN: u32 = 24;
pub const FULL_SIZE_ITEMS: usize = 48;

/// Text drawn in place of an empty label.
const INVALID_TEXT: &str = "invalid";

/// One line of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetEntry {
    pub control: ControlDef,
    /// Raw key identifier the command is bound to.
    pub key: String,
    /// Raw key identifiers that must be held, in registry order.
    pub modifier_keys: Vec<String>,
}

/// Font size for a sheet listing `count` keyboard commands.
///
/// Shrinks by 4 points per 20 commands beyond [`FULL_SIZE_ITEMS`].
pub fn font_size_for_items(count: usize) -> u32 {
    if count <= FULL_SIZE_ITEMS {
        return SHEET_FONT_MAX;
    }
    let shrink = ((count - FULL_SIZE_ITEMS) as f32 / 20.0 * 4.0) as u32;
    SHEET_FONT_MAX.saturating_sub(shrink).max(SHEET_FONT_MIN)
}

/// Counts every keyboard command in the model, across all modifier contexts.
pub fn keyboard_item_count(parsed: &ParsedBindings) -> usize {
    parsed
        .keys
        .iter()
        .filter(|key| key.device == KEYBOARD_DEVICE)
        .flat_map(|key| key.binds.values())
        .map(|bind| bind.controls.len())
        .sum()
}

/// Groups the commands bound on `image_devices` by display group.
///
/// Groups keep the order of `display_groups`; a command name bound twice keeps
/// its first position but shows its last binding.  Entries within a group are
/// sorted by catalog order.
pub fn sheet_entries(
    parsed: &ParsedBindings,
    image_devices: &[String],
    display_groups: &[String],
) -> IndexMap<String, Vec<SheetEntry>> {
    let mut outputs: IndexMap<String, IndexMap<String, SheetEntry>> = display_groups
        .iter()
        .map(|group| (group.clone(), IndexMap::new()))
        .collect();

    for key in parsed.keys.iter() {
        if !image_devices.contains(&key.device) {
            continue;
        }
        for (set_key, bind) in &key.binds {
            let modifier_keys: Vec<String> = if set_key.is_unmodified() {
                Vec::new()
            } else {
                parsed
                    .modifiers
                    .iter()
                    .flat_map(|(_, records)| records)
                    .filter(|record| &record.set_key == set_key)
                    .filter_map(|record| record.component.as_ref().map(|c| c.key.clone()))
                    .collect()
            };
            for control in bind.controls.values() {
                let Some(group) = outputs.get_mut(&control.group) else {
                    continue;
                };
                group.insert(
                    control.name.clone(),
                    SheetEntry {
                        control: control.clone(),
                        key: key.key.clone(),
                        modifier_keys: modifier_keys.clone(),
                    },
                );
            }
        }
    }

    outputs
        .into_iter()
        .map(|(group, entries)| {
            let mut entries: Vec<SheetEntry> = entries.into_values().collect();
            entries.sort_by_key(|entry| entry.control.order);
            (group, entries)
        })
        .collect()
}

/// Flow position on the sheet.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    base_x: i32,
    x: i32,
    y: i32,
    /// Widest line of the current column.
    max_width: i32,
    /// Width of the current line so far.
    line_width: i32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            base_x: SHEET_BASE_X,
            x: SHEET_BASE_X,
            y: SHEET_BASE_Y,
            max_width: 0,
            line_width: 0,
        }
    }

    fn next_column(&mut self) {
        self.y = SHEET_BASE_Y;
        self.base_x += self.max_width + COLUMN_GAP;
        self.x = self.base_x;
        self.max_width = 0;
        self.line_width = 0;
    }
}

/// Lays out a keyboard summary sheet as draw instructions.
#[derive(Debug, Clone)]
pub struct KeyboardSheet<M> {
    measurer: M,
    font_size: u32,
}

impl<M: TextMeasurer> KeyboardSheet<M> {
    pub fn new(measurer: M, font_size: u32) -> Self {
        Self { measurer, font_size }
    }

    /// Renders every non-empty group: a title line, then per entry its
    /// modifier chips, its key chip and the command name.
    pub fn render(&self, groups: &IndexMap<String, Vec<SheetEntry>>) -> Vec<DrawInstruction> {
        let mut out = Vec::new();
        let mut cursor = Cursor::new();
        for (group, entries) in groups {
            if entries.is_empty() {
                continue;
            }
            self.write(&mut out, &mut cursor, group, self.font_size * 2, false, true);
            for entry in entries {
                for modifier in &entry.modifier_keys {
                    self.write(&mut out, &mut cursor, &display_name(modifier), self.font_size, true, false);
                }
                self.write(&mut out, &mut cursor, &display_name(&entry.key), self.font_size, true, false);
                self.write(&mut out, &mut cursor, &entry.control.name, self.font_size, false, true);
            }
        }
        out
    }

    fn write(
        &self,
        out: &mut Vec<DrawInstruction>,
        cursor: &mut Cursor,
        text: &str,
        size: u32,
        surround: bool,
        new_line: bool,
    ) {
        let (text, color) = if text.is_empty() {
            (INVALID_TEXT, "Red")
        } else {
            (text, "Black")
        };
        let metrics = self.measurer.measure(text, FontFace::REGULAR, size);
        let line_advance = (metrics.text_height + LINE_GAP) as i32;

        if cursor.y + line_advance > SHEET_BOTTOM {
            cursor.next_column();
        }

        let x = cursor.x;
        out.push(DrawInstruction::Text(TextSpec {
            x,
            y: cursor.y + metrics.ascender as i32,
            text: text.to_string(),
            font: FontFace::REGULAR,
            size,
            color: Some(color.to_string()),
        }));

        let width = if surround {
            let top = cursor.y - CHIP_BORDER;
            out.push(DrawInstruction::Rectangle(RectangleSpec {
                x: x - CHIP_BORDER * 4,
                y: top - CHIP_BORDER * 2,
                width: metrics.text_width as i32 + CHIP_BORDER * 8,
                height: metrics.text_height as i32 + CHIP_BORDER * 4,
                radius: CHIP_RADIUS,
                stroke: Some("Black".to_string()),
                fill: None,
            }));
            (metrics.text_width + 48.0) as i32
        } else {
            ((metrics.text_width + 72.0) / 48.0) as i32 * 48
        };
        cursor.line_width += width;

        if new_line {
            cursor.max_width = cursor.max_width.max(cursor.line_width);
            cursor.y += line_advance;
            cursor.x = cursor.base_x;
            cursor.line_width = 0;
        } else {
            cursor.x += width;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
