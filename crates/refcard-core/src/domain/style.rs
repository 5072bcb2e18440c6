//! Label styling: colours and font faces per group, category and modifier.
//!
//! The tables are immutable configuration shared by every render.

use serde::{Deserialize, Serialize};

/// Font family the templates are drawn with.
pub const FONT_FAMILY: &str = "Exo2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Regular,
    SemiBold,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontSlant {
    Normal,
    Italic,
}

/// One face of [`FONT_FAMILY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontFace {
    pub weight: FontWeight,
    pub slant: FontSlant,
}

impl FontFace {
    pub const REGULAR: FontFace = FontFace::new(FontWeight::Regular, FontSlant::Normal);

    pub const fn new(weight: FontWeight, slant: FontSlant) -> Self {
        Self { weight, slant }
    }

    /// File name of the face, e.g. `Exo2.0-Bold.otf` or `Exo2.0-Italic.otf`.
    pub fn file_name(&self) -> String {
        let slant = match self.slant {
            FontSlant::Normal => "",
            FontSlant::Italic => "Italic",
        };
        let weight = match (self.weight, self.slant) {
            (FontWeight::Regular, FontSlant::Italic) => "",
            (FontWeight::Regular, FontSlant::Normal) => "Regular",
            (FontWeight::SemiBold, _) => "SemiBold",
            (FontWeight::Bold, _) => "Bold",
        };
        format!("{FONT_FAMILY}-{weight}{slant}.otf")
    }
}

/// Colour and face of one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Style {
    pub color: &'static str,
    pub font: FontFace,
}

impl Style {
    const fn regular(color: &'static str) -> Self {
        Self {
            color,
            font: FontFace::new(FontWeight::Regular, FontSlant::Normal),
        }
    }

    const fn bold(color: &'static str) -> Self {
        Self {
            color,
            font: FontFace::new(FontWeight::Bold, FontSlant::Normal),
        }
    }
}

/// Which attribute drives label colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylingMode {
    /// Group fonts, everything drawn in black.
    #[default]
    None,
    Group,
    Category,
    /// Colour encodes the modifier number.
    Modifier,
}

impl StylingMode {
    /// Parses a user option (`"group"`, `"category"`, `"modifier"`); anything
    /// else selects [`StylingMode::None`].
    pub fn from_option(option: &str) -> Self {
        match option.trim().to_ascii_lowercase().as_str() {
            "group" => StylingMode::Group,
            "category" => StylingMode::Category,
            "modifier" => StylingMode::Modifier,
            _ => StylingMode::None,
        }
    }

    /// Whether style colours are applied at all.
    pub fn applies_color(&self) -> bool {
        *self != StylingMode::None
    }

    /// Whether modified commands carry a `[n]` suffix.
    pub fn shows_modifier_suffix(&self) -> bool {
        *self != StylingMode::Modifier
    }
}

/// Group name → style, in the order groups are offered to users.
pub static GROUP_STYLES: [(&str, Style); 14] = [
    ("General", Style::regular("Black")),
    ("Misc", Style::regular("Black")),
    ("Modifier", Style::bold("Black")),
    ("Galaxy map", Style::regular("ForestGreen")),
    ("Holo-Me", Style::regular("Sienna")),
    ("Multicrew", Style::bold("SteelBlue")),
    ("Fighter", Style::regular("DarkSlateBlue")),
    ("Camera", Style::regular("OliveDrab")),
    ("Head look", Style::regular("IndianRed")),
    ("Ship", Style::regular("Crimson")),
    ("SRV", Style::regular("MediumPurple")),
    ("Scanners", Style::regular("DarkOrchid")),
    ("UI", Style::regular("DarkOrange")),
    ("OnFoot", Style::regular("CornflowerBlue")),
];

pub static CATEGORY_STYLES: [(&str, Style); 5] = [
    ("General", Style::regular("DarkSlateBlue")),
    ("Combat", Style::regular("Crimson")),
    ("Social", Style::regular("ForestGreen")),
    ("Navigation", Style::regular("Black")),
    ("UI", Style::regular("DarkOrange")),
];

/// Indexed by modifier number modulo the table length.
pub static MODIFIER_STYLES: [Style; 14] = [
    Style::regular("Black"),
    Style::regular("Crimson"),
    Style::regular("ForestGreen"),
    Style::regular("DarkSlateBlue"),
    Style::regular("DarkOrange"),
    Style::regular("DarkOrchid"),
    Style::regular("SteelBlue"),
    Style::regular("Sienna"),
    Style::regular("IndianRed"),
    Style::regular("CornflowerBlue"),
    Style::regular("OliveDrab"),
    Style::regular("MediumPurple"),
    Style::regular("DarkSalmon"),
    Style::regular("LightSlateGray"),
];

fn lookup(table: &[(&str, Style)], name: &str) -> Style {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .or_else(|| table.first())
        .map(|(_, style)| *style)
        .unwrap_or(Style::regular("Black"))
}

/// Style of a control group; unknown groups fall back to `General`.
pub fn group_style(group: &str) -> Style {
    lookup(&GROUP_STYLES, group)
}

/// Style of a control category; unknown categories fall back to `General`.
pub fn category_style(category: &str) -> Style {
    lookup(&CATEGORY_STYLES, category)
}

pub fn modifier_style(number: u32) -> Style {
    MODIFIER_STYLES[number as usize % MODIFIER_STYLES.len()]
}

/// Every group name, the default display-group selection.
pub fn all_groups() -> Vec<String> {
    GROUP_STYLES.iter().map(|(name, _)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_file_names_follow_family_naming() {
        assert_eq!(FontFace::REGULAR.file_name(), "Exo2.0-Regular.otf");
        assert_eq!(
            FontFace::new(FontWeight::Bold, FontSlant::Normal).file_name(),
            "Exo2.0-Bold.otf"
        );
        assert_eq!(
            FontFace::new(FontWeight::Regular, FontSlant::Italic).file_name(),
            "Exo2.0-Italic.otf"
        );
        assert_eq!(
            FontFace::new(FontWeight::SemiBold, FontSlant::Italic).file_name(),
            "Exo2.0-SemiBoldItalic.otf"
        );
    }

    #[test]
    fn test_styling_mode_from_option_defaults_to_none() {
        assert_eq!(StylingMode::from_option("group"), StylingMode::Group);
        assert_eq!(StylingMode::from_option("Category"), StylingMode::Category);
        assert_eq!(StylingMode::from_option("modifier"), StylingMode::Modifier);
        assert_eq!(StylingMode::from_option("rainbow"), StylingMode::None);
    }

    #[test]
    fn test_modifier_suffix_only_omitted_in_modifier_mode() {
        assert!(StylingMode::Group.shows_modifier_suffix());
        assert!(StylingMode::Category.shows_modifier_suffix());
        assert!(StylingMode::None.shows_modifier_suffix());
        assert!(!StylingMode::Modifier.shows_modifier_suffix());
    }

    #[test]
    fn test_modifier_style_wraps_around_table() {
        assert_eq!(modifier_style(1).color, "Crimson");
        assert_eq!(modifier_style(15), modifier_style(1));
    }

    #[test]
    fn test_unknown_group_falls_back_to_general() {
        assert_eq!(group_style("Nonexistent"), group_style("General"));
        assert_eq!(group_style("Modifier").font.weight, FontWeight::Bold);
        assert_eq!(category_style("Combat").color, "Crimson");
    }
}
