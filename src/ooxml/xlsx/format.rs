//! Style component types requested by callers and interned by the
//! [`StyleRegistry`](super::writer::StyleRegistry).
//!
//! Every component carries structural equality so that two requests for the
//! same font, fill or border collapse onto a single physical record.

use crate::common::error::{Error, Result};
use std::hash::{Hash, Hasher};

/// Default font family used for font 0 and for header rows.
pub const DEFAULT_FONT_NAME: &str = "Calibri";
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Composite cell style request.
///
/// Components left as `None` fall back to the registry defaults (font 0,
/// fill 0, border 0, number format "General").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub font: Option<CellFont>,
    pub fill: Option<CellFill>,
    pub border: Option<CellBorder>,
    pub number_format: Option<String>,
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: CellFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_fill(mut self, fill: CellFill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_border(mut self, border: CellBorder) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_number_format(mut self, code: impl Into<String>) -> Self {
        self.number_format = Some(code.into());
        self
    }

    pub fn with_alignment(mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    /// Style used for header rows: default font in bold.
    pub fn header() -> Self {
        Self::new().with_font(CellFont {
            bold: true,
            ..CellFont::default()
        })
    }
}

/// Font properties for a cell.
#[derive(Debug, Clone)]
pub struct CellFont {
    /// Font family name; must not be empty
    pub name: String,
    /// Size in points; must be positive
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// ARGB hex color, e.g. "FFFF0000"
    pub color: Option<String>,
}

impl CellFont {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
            ..Self::default()
        }
    }

    /// Reject fonts a spreadsheet reader cannot render.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidStyle("font family name is empty".to_string()));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(Error::InvalidStyle(format!(
                "font size must be positive, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

impl Default for CellFont {
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_string(),
            size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            color: None,
        }
    }
}

// Sizes compare by bit pattern so fonts can key a hash map.
impl PartialEq for CellFont {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size.to_bits() == other.size.to_bits()
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strike == other.strike
            && self.color == other.color
    }
}

impl Eq for CellFont {}

impl Hash for CellFont {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strike.hash(state);
        self.color.hash(state);
    }
}

/// Fill properties for a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellFill {
    pub pattern_type: CellFillPatternType,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
}

impl CellFill {
    /// Solid fill in the given ARGB color.
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            pattern_type: CellFillPatternType::Solid,
            fg_color: Some(color.into()),
            bg_color: None,
        }
    }

    pub(crate) fn pattern(pattern_type: CellFillPatternType) -> Self {
        Self {
            pattern_type,
            fg_color: None,
            bg_color: None,
        }
    }
}

/// Cell fill pattern types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellFillPatternType {
    None,
    Solid,
    Gray125,
    DarkGray,
    MediumGray,
    LightGray,
    Gray0625,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
}

impl CellFillPatternType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::Gray125 => "gray125",
            Self::DarkGray => "darkGray",
            Self::MediumGray => "mediumGray",
            Self::LightGray => "lightGray",
            Self::Gray0625 => "gray0625",
            Self::DarkHorizontal => "darkHorizontal",
            Self::DarkVertical => "darkVertical",
            Self::DarkDown => "darkDown",
            Self::DarkUp => "darkUp",
            Self::DarkGrid => "darkGrid",
            Self::DarkTrellis => "darkTrellis",
        }
    }
}

/// Border properties for a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellBorder {
    pub left: Option<CellBorderSide>,
    pub right: Option<CellBorderSide>,
    pub top: Option<CellBorderSide>,
    pub bottom: Option<CellBorderSide>,
    pub diagonal: Option<CellBorderSide>,
}

impl CellBorder {
    /// The same line on all four outer edges.
    pub fn all(style: CellBorderLineStyle, color: Option<String>) -> Self {
        let side = Some(CellBorderSide { style, color });
        Self {
            left: side.clone(),
            right: side.clone(),
            top: side.clone(),
            bottom: side,
            diagonal: None,
        }
    }
}

/// Border side properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellBorderSide {
    pub style: CellBorderLineStyle,
    pub color: Option<String>,
}

/// Border line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellBorderLineStyle {
    None,
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl CellBorderLineStyle {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thin => "thin",
            Self::Medium => "medium",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Thick => "thick",
            Self::Double => "double",
            Self::Hair => "hair",
            Self::MediumDashed => "mediumDashed",
            Self::DashDot => "dashDot",
            Self::MediumDashDot => "mediumDashDot",
            Self::DashDotDot => "dashDotDot",
            Self::MediumDashDotDot => "mediumDashDotDot",
            Self::SlantDashDot => "slantDashDot",
        }
    }
}

/// Horizontal alignment. The discriminant is the value packed into a style key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HorizontalAlignment {
    #[default]
    General = 0,
    Left = 1,
    Center = 2,
    Right = 3,
    Fill = 4,
    Justify = 5,
    CenterContinuous = 6,
    Distributed = 7,
}

impl HorizontalAlignment {
    pub(crate) fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::General,
            1 => Self::Left,
            2 => Self::Center,
            3 => Self::Right,
            4 => Self::Fill,
            5 => Self::Justify,
            6 => Self::CenterContinuous,
            7 => Self::Distributed,
            _ => return None,
        })
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Fill => "fill",
            Self::Justify => "justify",
            Self::CenterContinuous => "centerContinuous",
            Self::Distributed => "distributed",
        }
    }
}

/// Vertical alignment. Bottom is the reader default and packs as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VerticalAlignment {
    #[default]
    Bottom = 0,
    Top = 1,
    Center = 2,
    Justify = 3,
    Distributed = 4,
}

impl VerticalAlignment {
    pub(crate) fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Bottom,
            1 => Self::Top,
            2 => Self::Center,
            3 => Self::Justify,
            4 => Self::Distributed,
            _ => return None,
        })
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Top => "top",
            Self::Center => "center",
            Self::Justify => "justify",
            Self::Distributed => "distributed",
        }
    }
}
