//! Compact packed style keys.
//!
//! A [`StyleKey`] packs the six axes of a composite style into one `u32`:
//!
//! | bits    | field                |
//! |---------|----------------------|
//! | 0..3    | horizontal alignment |
//! | 3..6    | vertical alignment   |
//! | 6..12   | border index         |
//! | 12..18  | fill index           |
//! | 18..24  | font index           |
//! | 24..32  | number format id     |
//!
//! Keys are cheap to compare and hash, which is what lets the registry
//! collapse thousands of logical style requests onto a few `xf` records.

use crate::common::error::{Error, Result};

/// One axis of a packed style key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleField {
    NumberFormat,
    Font,
    Fill,
    Border,
    Vertical,
    Horizontal,
}

impl StyleField {
    pub const ALL: [StyleField; 6] = [
        StyleField::NumberFormat,
        StyleField::Font,
        StyleField::Fill,
        StyleField::Border,
        StyleField::Vertical,
        StyleField::Horizontal,
    ];

    #[inline]
    const fn offset(self) -> u32 {
        match self {
            StyleField::Horizontal => 0,
            StyleField::Vertical => 3,
            StyleField::Border => 6,
            StyleField::Fill => 12,
            StyleField::Font => 18,
            StyleField::NumberFormat => 24,
        }
    }

    #[inline]
    const fn bits(self) -> u32 {
        match self {
            StyleField::Horizontal | StyleField::Vertical => 3,
            StyleField::Border | StyleField::Fill | StyleField::Font => 6,
            StyleField::NumberFormat => 8,
        }
    }

    /// Largest value this field can hold.
    #[inline]
    pub const fn max_value(self) -> u32 {
        (1u32 << self.bits()) - 1
    }

    #[inline]
    const fn mask(self) -> u32 {
        self.max_value() << self.offset()
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            StyleField::NumberFormat => "number format",
            StyleField::Font => "font",
            StyleField::Fill => "fill",
            StyleField::Border => "border",
            StyleField::Vertical => "vertical alignment",
            StyleField::Horizontal => "horizontal alignment",
        }
    }
}

/// Unpacked field values of a [`StyleKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StyleFields {
    pub number_format: u32,
    pub font: u32,
    pub fill: u32,
    pub border: u32,
    pub vertical: u32,
    pub horizontal: u32,
}

impl StyleFields {
    #[inline]
    pub fn get(&self, field: StyleField) -> u32 {
        match field {
            StyleField::NumberFormat => self.number_format,
            StyleField::Font => self.font,
            StyleField::Fill => self.fill,
            StyleField::Border => self.border,
            StyleField::Vertical => self.vertical,
            StyleField::Horizontal => self.horizontal,
        }
    }
}

/// Packed composite style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleKey(u32);

impl StyleKey {
    /// Key of the default style: every field zero.
    pub const DEFAULT: StyleKey = StyleKey(0);

    /// Pack field values, rejecting any that overflow their bit width.
    pub fn pack(fields: StyleFields) -> Result<Self> {
        let mut key = StyleKey::DEFAULT;
        for field in StyleField::ALL {
            key = key.set_field(field, fields.get(field))?;
        }
        Ok(key)
    }

    /// Recover the six field values.
    pub fn unpack(self) -> StyleFields {
        StyleFields {
            number_format: self.field(StyleField::NumberFormat),
            font: self.field(StyleField::Font),
            fill: self.field(StyleField::Fill),
            border: self.field(StyleField::Border),
            vertical: self.field(StyleField::Vertical),
            horizontal: self.field(StyleField::Horizontal),
        }
    }

    #[inline]
    pub fn field(self, field: StyleField) -> u32 {
        (self.0 & field.mask()) >> field.offset()
    }

    /// Whether `field` holds a non-default value.
    #[inline]
    pub fn has_field(self, field: StyleField) -> bool {
        self.0 & field.mask() != 0
    }

    /// Reset one field to its default, leaving the others untouched.
    #[inline]
    pub fn clear_field(self, field: StyleField) -> Self {
        StyleKey(self.0 & !field.mask())
    }

    /// Replace one field.
    pub fn set_field(self, field: StyleField, value: u32) -> Result<Self> {
        if value > field.max_value() {
            return Err(Error::StyleCapacity {
                component: field.name(),
                limit: field.max_value() as usize + 1,
            });
        }
        Ok(StyleKey(self.clear_field(field).0 | (value << field.offset())))
    }

    /// Raw packed value.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}
