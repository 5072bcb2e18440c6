//! Drawing instructions handed to whatever rasterizes the card.
//!
//! The pipeline never touches pixels.  It emits an ordered list of
//! rectangles and text runs in template coordinates, which a renderer (or a
//! test) can consume directly or serialize as JSON.

use serde::Serialize;

use super::style::FontFace;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectangleSpec {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Corner radius, 0 for square corners.
    pub radius: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpec {
    /// Left edge of the run.
    pub x: i32,
    /// Baseline of the run.
    pub y: i32,
    pub text: String,
    pub font: FontFace,
    pub size: u32,
    /// Fill colour; `None` draws in the renderer's default (black).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawInstruction {
    Rectangle(RectangleSpec),
    Text(TextSpec),
}

impl DrawInstruction {
    pub fn as_text(&self) -> Option<&TextSpec> {
        match self {
            DrawInstruction::Text(text) => Some(text),
            DrawInstruction::Rectangle(_) => None,
        }
    }

    pub fn as_rectangle(&self) -> Option<&RectangleSpec> {
        match self {
            DrawInstruction::Rectangle(rect) => Some(rect),
            DrawInstruction::Text(_) => None,
        }
    }
}

/// A drawing target for one output image.
///
/// Obtained per image and borrowed only while a plan is replayed onto it, so
/// the handle is released on every exit path by the caller's scope.
#[cfg_attr(test, mockall::automock)]
pub trait DrawSurface {
    fn rectangle(&mut self, spec: &RectangleSpec);
    fn text(&mut self, spec: &TextSpec);
}

/// Replays `plan` onto `surface` in order.
pub fn replay(plan: &[DrawInstruction], surface: &mut dyn DrawSurface) {
    for instruction in plan {
        match instruction {
            DrawInstruction::Rectangle(rect) => surface.rectangle(rect),
            DrawInstruction::Text(text) => surface.text(text),
        }
    }
}
