//! Hit-box text layout.
//!
//! Given the ordered labels of one hit-box, [`LayoutEngine::layout`] picks the
//! largest font size at which the labels fit and positions each label.
//!
//! # Algorithm (for beginners)
//!
//! Labels flow left to right like words in a paragraph.  A label that would
//! cross the right edge starts a new line, one font size further down.  A
//! label that does not fit even on an empty line forces a smaller font.
//!
//! 1. **Size search**: starting at the maximum font size, shrink one point at
//!    a time until the flow uses less height than the box offers.
//! 2. **Placement**: replay the flow from the box origin and record each
//!    label's left edge and baseline.
//! 3. **Centring**: shift everything down by half the unused height, less a
//!    sixth of the font size to balance ascenders against descenders.
//!
//! The result is greedy rather than optimal: a box may be under-filled, but
//! at the chosen size nothing crosses its right edge.

pub mod sheet;

use serde::Serialize;

use crate::assign::TextItem;
use crate::domain::catalog::HitBox;
use crate::domain::style::FontFace;

/// Smallest font size the size search will settle on.
pub const MIN_FONT_SIZE: u32 = 1;

/// Measurements of one text run at one size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub text_width: f32,
    pub text_height: f32,
    /// Distance from the top of the line to the baseline.
    pub ascender: f32,
    /// Gap left after a run before the next one starts.
    pub character_width: f32,
}

/// Font metrics provider used by the layout passes.
#[cfg_attr(test, mockall::automock)]
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: FontFace, size: u32) -> TextMetrics;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: FontFace, size: u32) -> TextMetrics {
        (**self).measure(text, font, size)
    }
}

/// Fixed-pitch approximation: every character is `0.6 × size` wide.
///
/// Used where no font files are available, such as tests and benches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer;

impl MonospaceMeasurer {
    const ADVANCE: f32 = 0.6;
    const ASCENDER: f32 = 0.8;
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, _font: FontFace, size: u32) -> TextMetrics {
        let size = size as f32;
        TextMetrics {
            text_width: text.chars().count() as f32 * size * Self::ADVANCE,
            text_height: size,
            ascender: size * Self::ASCENDER,
            character_width: size * Self::ADVANCE,
        }
    }
}

/// A label with its final size and position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedText {
    pub item: TextItem,
    pub size: u32,
    /// Left edge.
    pub x: i32,
    /// Baseline.
    pub y: i32,
}

/// Pure hit-box layout over a [`TextMeasurer`].
///
/// Holds no mutable state, so one engine can lay out independent images
/// concurrently when its measurer is `Sync`.
#[derive(Debug, Clone)]
pub struct LayoutEngine<M> {
    measurer: M,
}

impl<M: TextMeasurer> LayoutEngine<M> {
    pub fn new(measurer: M) -> Self {
        Self { measurer }
    }

    /// Lays out `items` inside `hit_box`, starting the size search at
    /// `max_font_size`.  Returns an empty list for empty input.
    pub fn layout(&self, items: &[TextItem], hit_box: &HitBox, max_font_size: u32) -> Vec<PlacedText> {
        if items.is_empty() {
            return Vec::new();
        }
        let size = self.best_fit_font_size(items, hit_box.width, hit_box.height, max_font_size);
        let line_height = size as i32;

        let mut x = hit_box.x;
        let mut y = hit_box.y;
        let mut placed = Vec::with_capacity(items.len());
        for item in items {
            let metrics = self.measurer.measure(&item.text, item.style.font, size);
            if x > hit_box.x && x + metrics.text_width as i32 > hit_box.right() {
                x = hit_box.x;
                y += line_height;
            }
            placed.push(PlacedText {
                item: item.clone(),
                size,
                x,
                y: y + metrics.ascender as i32,
            });
            x += (metrics.text_width + metrics.character_width) as i32;
        }

        let occupied = y + line_height - hit_box.y;
        let offset = (hit_box.height - occupied) / 2 - line_height / 6;
        for text in &mut placed {
            text.y = (text.y + offset).max(hit_box.y);
        }
        placed
    }

    /// Largest size in `MIN_FONT_SIZE..=max_font_size` at which `items` flow
    /// into a `width × height` box; `MIN_FONT_SIZE` if none does.
    pub fn best_fit_font_size(&self, items: &[TextItem], width: i32, height: i32, max_font_size: u32) -> u32 {
        let mut size = max_font_size.max(MIN_FONT_SIZE);
        while size > MIN_FONT_SIZE && !self.fits(items, width, height, size) {
            size -= 1;
        }
        size
    }

    fn fits(&self, items: &[TextItem], width: i32, height: i32, size: u32) -> bool {
        let mut x = 0;
        let mut y = 0;
        let mut last_height = 0.0;
        for item in items {
            let metrics = self.measurer.measure(&item.text, item.style.font, size);
            let text_width = metrics.text_width as i32;
            if x > 0 && x + text_width > width {
                x = 0;
                y += size as i32;
            }
            // First on its line and still too wide: only a smaller size helps.
            if text_width > width {
                return false;
            }
            x += (metrics.text_width + metrics.character_width) as i32;
            last_height = metrics.text_height;
        }
        (y as f32 + last_height) < height as f32
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
