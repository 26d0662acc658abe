//! Style interning and the styles.xml manifest.
//!
//! Fonts, fills, borders and number formats are interned into append-only
//! [`ComponentTable`]s; composite styles are packed into a [`StyleKey`] and
//! resolved to an output `xf` index exactly once. The registry is shared by
//! every worksheet of a document, so all parts converge on the same small set
//! of physical style records.

use super::style_key::{StyleField, StyleFields, StyleKey};
use crate::common::error::{Error, Result};
use crate::common::xml::escape_xml;
use crate::ooxml::xlsx::format::{
    CellBorder, CellBorderSide, CellFill, CellFillPatternType, CellFont, CellStyle,
    HorizontalAlignment, VerticalAlignment,
};
use crate::ooxml::xlsx::styles::number_format::{
    FIRST_CUSTOM_FORMAT_ID, MAX_FORMAT_ID, builtin_format_code, builtin_format_id,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::hash::Hash;

/// Append-only list with structural-equality dedup.
///
/// Insertion order is preserved and significant: it is the index written into
/// the manifest and referenced from `xf` records.
#[derive(Debug, Clone)]
pub struct ComponentTable<T> {
    items: Vec<T>,
    index: HashMap<T, usize>,
    name: &'static str,
    limit: usize,
}

impl<T: Eq + Hash + Clone> ComponentTable<T> {
    /// Create an empty table holding at most `limit` entries.
    pub fn new(name: &'static str, limit: usize) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            name,
            limit,
        }
    }

    /// Return the index of an equal value, appending it on first sight.
    pub fn intern(&mut self, value: &T) -> Result<usize> {
        if let Some(&index) = self.index.get(value) {
            return Ok(index);
        }
        if self.items.len() >= self.limit {
            return Err(Error::StyleCapacity {
                component: self.name,
                limit: self.limit,
            });
        }

        let index = self.items.len();
        self.items.push(value.clone());
        self.index.insert(value.clone(), index);
        Ok(index)
    }

    pub fn position(&self, value: &T) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

/// One composite `xf` record of the output manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XfRecord {
    pub num_fmt_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl XfRecord {
    fn has_alignment(&self) -> bool {
        self.horizontal != HorizontalAlignment::General
            || self.vertical != VerticalAlignment::Bottom
    }
}

#[derive(Debug)]
struct RegistryState {
    fonts: ComponentTable<CellFont>,
    fills: ComponentTable<CellFill>,
    borders: ComponentTable<CellBorder>,
    /// Custom format codes; id = FIRST_CUSTOM_FORMAT_ID + position
    number_formats: ComponentTable<String>,
    xfs: Vec<XfRecord>,
    xf_keys: Vec<StyleKey>,
    xf_index: HashMap<StyleKey, u32>,
}

impl RegistryState {
    fn seeded() -> Result<Self> {
        let field_limit = |field: StyleField| field.max_value() as usize + 1;
        let mut state = Self {
            fonts: ComponentTable::new("font", field_limit(StyleField::Font)),
            fills: ComponentTable::new("fill", field_limit(StyleField::Fill)),
            borders: ComponentTable::new("border", field_limit(StyleField::Border)),
            number_formats: ComponentTable::new(
                "number format",
                (MAX_FORMAT_ID - FIRST_CUSTOM_FORMAT_ID + 1) as usize,
            ),
            xfs: Vec::new(),
            xf_keys: Vec::new(),
            xf_index: HashMap::new(),
        };

        // Readers require font 0, fills 0/1 (none, gray125) and border 0
        state.fonts.intern(&CellFont::default())?;
        state.fills.intern(&CellFill::pattern(CellFillPatternType::None))?;
        state.fills.intern(&CellFill::pattern(CellFillPatternType::Gray125))?;
        state.borders.intern(&CellBorder::default())?;
        state.resolve(StyleKey::DEFAULT)?;
        Ok(state)
    }

    fn intern_number_format(&mut self, code: &str) -> Result<u32> {
        if let Some(id) = builtin_format_id(code) {
            return Ok(id);
        }
        let position = self.number_formats.intern(&code.to_string())?;
        Ok(FIRST_CUSTOM_FORMAT_ID + position as u32)
    }

    fn number_format_code(&self, id: u32) -> Option<&str> {
        if id >= FIRST_CUSTOM_FORMAT_ID {
            self.number_formats
                .get((id - FIRST_CUSTOM_FORMAT_ID) as usize)
                .map(String::as_str)
        } else {
            builtin_format_code(id)
        }
    }

    fn resolve(&mut self, key: StyleKey) -> Result<u32> {
        if let Some(&xf) = self.xf_index.get(&key) {
            return Ok(xf);
        }

        let fields = key.unpack();
        self.check_references(&fields)?;
        let record = XfRecord {
            num_fmt_id: fields.number_format,
            font_id: fields.font,
            fill_id: fields.fill,
            border_id: fields.border,
            horizontal: HorizontalAlignment::from_code(fields.horizontal as u8).ok_or_else(
                || Error::InvalidStyle(format!("unknown horizontal alignment {}", fields.horizontal)),
            )?,
            vertical: VerticalAlignment::from_code(fields.vertical as u8).ok_or_else(|| {
                Error::InvalidStyle(format!("unknown vertical alignment {}", fields.vertical))
            })?,
        };

        let xf = self.xfs.len() as u32;
        self.xfs.push(record);
        self.xf_keys.push(key);
        self.xf_index.insert(key, xf);
        Ok(xf)
    }

    fn check_references(&self, fields: &StyleFields) -> Result<()> {
        let dangling = |what: &str, id: u32| {
            Err(Error::InvalidStyle(format!("{} {} has not been interned", what, id)))
        };
        if fields.font as usize >= self.fonts.len() {
            return dangling("font", fields.font);
        }
        if fields.fill as usize >= self.fills.len() {
            return dangling("fill", fields.fill);
        }
        if fields.border as usize >= self.borders.len() {
            return dangling("border", fields.border);
        }
        if self.number_format_code(fields.number_format).is_none() {
            return dangling("number format", fields.number_format);
        }
        Ok(())
    }
}

/// Document-wide style registry.
///
/// Mutation is serialized internally, so sheet writers running on different
/// threads may share one registry by reference.
#[derive(Debug)]
pub struct StyleRegistry {
    state: Mutex<RegistryState>,
}

impl StyleRegistry {
    /// Create a registry seeded with the records every reader expects.
    pub fn new() -> Self {
        let state = match RegistryState::seeded() {
            Ok(state) => state,
            // The seed records are far below every table limit
            Err(e) => unreachable!("seeding the style registry failed: {}", e),
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Intern a font and return its index.
    pub fn intern_font(&self, font: &CellFont) -> Result<u32> {
        font.validate()?;
        Ok(self.state.lock().fonts.intern(font)? as u32)
    }

    /// Intern a fill and return its index.
    pub fn intern_fill(&self, fill: &CellFill) -> Result<u32> {
        Ok(self.state.lock().fills.intern(fill)? as u32)
    }

    /// Intern a border and return its index.
    pub fn intern_border(&self, border: &CellBorder) -> Result<u32> {
        Ok(self.state.lock().borders.intern(border)? as u32)
    }

    /// Intern a number format code and return its `numFmtId`.
    ///
    /// Built-in codes reuse their well-known id; custom codes are numbered
    /// from [`FIRST_CUSTOM_FORMAT_ID`].
    pub fn intern_number_format(&self, code: &str) -> Result<u32> {
        if code.is_empty() {
            return Err(Error::InvalidStyle("number format code is empty".to_string()));
        }
        self.state.lock().intern_number_format(code)
    }

    /// Intern every component of `style` and pack the result.
    pub fn key_for(&self, style: &CellStyle) -> Result<StyleKey> {
        if let Some(font) = &style.font {
            font.validate()?;
        }
        if matches!(&style.number_format, Some(code) if code.is_empty()) {
            return Err(Error::InvalidStyle("number format code is empty".to_string()));
        }

        let mut state = self.state.lock();
        let font = match &style.font {
            Some(font) => state.fonts.intern(font)? as u32,
            None => 0,
        };
        let fill = match &style.fill {
            Some(fill) => state.fills.intern(fill)? as u32,
            None => 0,
        };
        let border = match &style.border {
            Some(border) => state.borders.intern(border)? as u32,
            None => 0,
        };
        let number_format = match &style.number_format {
            Some(code) => state.intern_number_format(code)?,
            None => 0,
        };

        StyleKey::pack(StyleFields {
            number_format,
            font,
            fill,
            border,
            vertical: style.vertical as u32,
            horizontal: style.horizontal as u32,
        })
    }

    /// Map a packed key to its `xf` index, appending a record on first use.
    pub fn resolve(&self, key: StyleKey) -> Result<u32> {
        self.state.lock().resolve(key)
    }

    /// Intern and resolve a full style request.
    pub fn style_index(&self, style: &CellStyle) -> Result<u32> {
        let key = self.key_for(style)?;
        self.resolve(key)
    }

    /// Field values of a packed key.
    #[inline]
    pub fn unpack(&self, key: StyleKey) -> StyleFields {
        key.unpack()
    }

    /// The key an `xf` index was resolved from.
    pub fn key_of(&self, xf: u32) -> Option<StyleKey> {
        self.state.lock().xf_keys.get(xf as usize).copied()
    }

    /// The `xf` record at an index.
    pub fn xf(&self, xf: u32) -> Option<XfRecord> {
        self.state.lock().xfs.get(xf as usize).copied()
    }

    /// Format code of a `numFmtId`, built-in or custom.
    pub fn number_format_code(&self, id: u32) -> Option<String> {
        self.state.lock().number_format_code(id).map(str::to_string)
    }

    pub fn font_count(&self) -> usize {
        self.state.lock().fonts.len()
    }

    pub fn fill_count(&self) -> usize {
        self.state.lock().fills.len()
    }

    pub fn border_count(&self) -> usize {
        self.state.lock().borders.len()
    }

    pub fn custom_format_count(&self) -> usize {
        self.state.lock().number_formats.len()
    }

    pub fn xf_count(&self) -> usize {
        self.state.lock().xfs.len()
    }

    /// Generate the complete styles.xml content.
    pub fn to_xml(&self) -> Result<String> {
        let state = self.state.lock();
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        // Only custom formats are listed; built-ins are implied by their id
        if !state.number_formats.is_empty() {
            write!(xml, r#"<numFmts count="{}">"#, state.number_formats.len())?;
            for (i, code) in state.number_formats.iter().enumerate() {
                write!(
                    xml,
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    FIRST_CUSTOM_FORMAT_ID as usize + i,
                    escape_xml(code)
                )?;
            }
            xml.push_str("</numFmts>");
        }

        write!(xml, r#"<fonts count="{}">"#, state.fonts.len())?;
        for font in state.fonts.iter() {
            write_font(&mut xml, font)?;
        }
        xml.push_str("</fonts>");

        write!(xml, r#"<fills count="{}">"#, state.fills.len())?;
        for fill in state.fills.iter() {
            write_fill(&mut xml, fill)?;
        }
        xml.push_str("</fills>");

        write!(xml, r#"<borders count="{}">"#, state.borders.len())?;
        for border in state.borders.iter() {
            write_border(&mut xml, border)?;
        }
        xml.push_str("</borders>");

        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        write!(xml, r#"<cellXfs count="{}">"#, state.xfs.len())?;
        for record in &state.xfs {
            write_xf(&mut xml, record)?;
        }
        xml.push_str("</cellXfs>");

        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        xml.push_str("</styleSheet>");

        Ok(xml)
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn write_xf(xml: &mut String, record: &XfRecord) -> Result<()> {
    write!(
        xml,
        r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="0""#,
        record.num_fmt_id, record.font_id, record.fill_id, record.border_id
    )?;

    if record.num_fmt_id != 0 {
        xml.push_str(r#" applyNumberFormat="1""#);
    }
    if record.font_id != 0 {
        xml.push_str(r#" applyFont="1""#);
    }
    if record.fill_id != 0 {
        xml.push_str(r#" applyFill="1""#);
    }
    if record.border_id != 0 {
        xml.push_str(r#" applyBorder="1""#);
    }

    if !record.has_alignment() {
        xml.push_str("/>");
        return Ok(());
    }

    xml.push_str(r#" applyAlignment="1"><alignment"#);
    if record.horizontal != HorizontalAlignment::General {
        write!(xml, r#" horizontal="{}""#, record.horizontal.as_str())?;
    }
    if record.vertical != VerticalAlignment::Bottom {
        write!(xml, r#" vertical="{}""#, record.vertical.as_str())?;
    }
    xml.push_str("/></xf>");
    Ok(())
}

fn write_font(xml: &mut String, font: &CellFont) -> Result<()> {
    xml.push_str("<font>");

    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if font.strike {
        xml.push_str("<strike/>");
    }
    if font.underline {
        xml.push_str("<u/>");
    }

    write!(xml, r#"<sz val="{}"/>"#, font.size)?;
    if let Some(ref color) = font.color {
        write!(xml, r#"<color rgb="{}"/>"#, escape_xml(color))?;
    }
    write!(xml, r#"<name val="{}"/><family val="2"/>"#, escape_xml(&font.name))?;

    xml.push_str("</font>");
    Ok(())
}

fn write_fill(xml: &mut String, fill: &CellFill) -> Result<()> {
    if fill.fg_color.is_none() && fill.bg_color.is_none() {
        write!(
            xml,
            r#"<fill><patternFill patternType="{}"/></fill>"#,
            fill.pattern_type.as_str()
        )?;
        return Ok(());
    }

    write!(
        xml,
        r#"<fill><patternFill patternType="{}">"#,
        fill.pattern_type.as_str()
    )?;
    if let Some(ref fg_color) = fill.fg_color {
        write!(xml, r#"<fgColor rgb="{}"/>"#, escape_xml(fg_color))?;
    }
    if let Some(ref bg_color) = fill.bg_color {
        write!(xml, r#"<bgColor rgb="{}"/>"#, escape_xml(bg_color))?;
    }
    xml.push_str("</patternFill></fill>");
    Ok(())
}

fn write_border(xml: &mut String, border: &CellBorder) -> Result<()> {
    xml.push_str("<border>");
    write_border_side(xml, "left", border.left.as_ref())?;
    write_border_side(xml, "right", border.right.as_ref())?;
    write_border_side(xml, "top", border.top.as_ref())?;
    write_border_side(xml, "bottom", border.bottom.as_ref())?;
    write_border_side(xml, "diagonal", border.diagonal.as_ref())?;
    xml.push_str("</border>");
    Ok(())
}

fn write_border_side(xml: &mut String, side: &str, border_side: Option<&CellBorderSide>) -> Result<()> {
    let Some(bs) = border_side else {
        write!(xml, "<{}/>", side)?;
        return Ok(());
    };

    write!(xml, r#"<{} style="{}">"#, side, bs.style.as_str())?;
    if let Some(ref color) = bs.color {
        write!(xml, r#"<color rgb="{}"/>"#, escape_xml(color))?;
    }
    write!(xml, "</{}>", side)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::format::CellBorderLineStyle;

    #[test]
    fn test_create_default_styles() {
        let registry = StyleRegistry::new();
        assert_eq!(registry.font_count(), 1);
        assert_eq!(registry.fill_count(), 2);
        assert_eq!(registry.border_count(), 1);
        assert_eq!(registry.xf_count(), 1);
        assert_eq!(registry.key_of(0), Some(StyleKey::DEFAULT));
    }

    #[test]
    fn test_component_table_dedup() {
        let mut table = ComponentTable::new("label", 3);
        assert_eq!(table.intern(&"a".to_string()).unwrap(), 0);
        assert_eq!(table.intern(&"b".to_string()).unwrap(), 1);
        assert_eq!(table.intern(&"a".to_string()).unwrap(), 0);
        assert_eq!(table.intern(&"c".to_string()).unwrap(), 2);
        assert!(matches!(
            table.intern(&"d".to_string()),
            Err(Error::StyleCapacity { component: "label", limit: 3 })
        ));
        // Known values still resolve once the table is full
        assert_eq!(table.intern(&"b".to_string()).unwrap(), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_resolve_same_style_twice() {
        let registry = StyleRegistry::new();
        let style = CellStyle::new()
            .with_font(CellFont {
                bold: true,
                ..Default::default()
            })
            .with_fill(CellFill::solid("FFFFFF00"))
            .with_border(CellBorder::all(CellBorderLineStyle::Thin, None))
            .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Top);

        let first = registry.style_index(&style).unwrap();
        let fonts = registry.font_count();
        let fills = registry.fill_count();
        let borders = registry.border_count();

        let second = registry.style_index(&style.clone()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, 1);
        assert_eq!(registry.font_count(), fonts);
        assert_eq!(registry.fill_count(), fills);
        assert_eq!(registry.border_count(), borders);
        assert_eq!(registry.xf_count(), 2);
        assert_eq!(fonts, 2);
        assert_eq!(fills, 3);
        assert_eq!(borders, 2);
    }

    #[test]
    fn test_default_components_map_to_zero() {
        let registry = StyleRegistry::new();
        let style = CellStyle::new()
            .with_font(CellFont::default())
            .with_border(CellBorder::default());
        assert_eq!(registry.style_index(&style).unwrap(), 0);
        assert_eq!(registry.xf_count(), 1);
    }

    #[test]
    fn test_number_format_builtin_and_custom() {
        let registry = StyleRegistry::new();
        assert_eq!(registry.intern_number_format("0").unwrap(), 1);
        assert_eq!(registry.intern_number_format("mm-dd-yy").unwrap(), 14);
        assert_eq!(registry.intern_number_format("h:mm:ss").unwrap(), 21);
        assert_eq!(registry.custom_format_count(), 0);

        assert_eq!(registry.intern_number_format("0.000").unwrap(), 176);
        assert_eq!(registry.intern_number_format("yyyy-mm-dd").unwrap(), 177);
        assert_eq!(registry.intern_number_format("0.000").unwrap(), 176);
        assert_eq!(registry.number_format_code(177).as_deref(), Some("yyyy-mm-dd"));
        assert_eq!(registry.number_format_code(14).as_deref(), Some("mm-dd-yy"));
    }

    #[test]
    fn test_custom_format_capacity() {
        let registry = StyleRegistry::new();
        for i in 0..80 {
            registry.intern_number_format(&format!("0.{}", "0".repeat(i + 3))).unwrap();
        }
        assert!(matches!(
            registry.intern_number_format("#.##"),
            Err(Error::StyleCapacity { .. })
        ));
    }

    #[test]
    fn test_invalid_font_rejected() {
        let registry = StyleRegistry::new();
        assert!(matches!(
            registry.intern_font(&CellFont::new("", 11.0)),
            Err(Error::InvalidStyle(_))
        ));
        let style = CellStyle::new().with_font(CellFont::new("Arial", 0.0));
        assert!(registry.style_index(&style).is_err());
        assert_eq!(registry.font_count(), 1);
    }

    #[test]
    fn test_resolve_rejects_dangling_reference() {
        let registry = StyleRegistry::new();
        let key = StyleKey::DEFAULT.set_field(StyleField::Font, 9).unwrap();
        assert!(matches!(registry.resolve(key), Err(Error::InvalidStyle(_))));
    }

    #[test]
    fn test_field_override_resolves_new_record() {
        let registry = StyleRegistry::new();
        let base = registry
            .key_for(&CellStyle::new().with_fill(CellFill::solid("FF00FF00")))
            .unwrap();
        assert!(!base.has_field(StyleField::NumberFormat));

        let dated = base.set_field(StyleField::NumberFormat, 14).unwrap();
        let xf = registry.resolve(dated).unwrap();
        let record = registry.xf(xf).unwrap();
        assert_eq!(record.num_fmt_id, 14);
        assert_eq!(record.fill_id, 2);
        assert_eq!(registry.unpack(registry.key_of(xf).unwrap()).fill, 2);
    }

    #[test]
    fn test_generate_xml() {
        let registry = StyleRegistry::new();
        registry
            .style_index(
                &CellStyle::new()
                    .with_font(CellFont {
                        bold: true,
                        size: 12.0,
                        ..Default::default()
                    })
                    .with_fill(CellFill::solid("FFFF0000"))
                    .with_number_format("0.000")
                    .with_alignment(HorizontalAlignment::Right, VerticalAlignment::Bottom),
            )
            .unwrap();

        let xml = registry.to_xml().unwrap();
        assert!(xml.contains(r#"<numFmts count="1"><numFmt numFmtId="176" formatCode="0.000"/></numFmts>"#));
        assert!(xml.contains(r#"<fonts count="2">"#));
        assert!(xml.contains(r#"<fills count="3">"#));
        assert!(xml.contains(r#"<patternFill patternType="gray125"/>"#));
        assert!(xml.contains(r#"<fgColor rgb="FFFF0000"/>"#));
        assert!(xml.contains(r#"<cellXfs count="2">"#));
        assert!(xml.contains(
            r#"<xf numFmtId="176" fontId="1" fillId="2" borderId="0" xfId="0" applyNumberFormat="1" applyFont="1" applyFill="1" applyAlignment="1"><alignment horizontal="right"/></xf>"#
        ));
    }

    #[test]
    fn test_concurrent_interning_converges() {
        let registry = StyleRegistry::new();
        let style = CellStyle::new().with_fill(CellFill::solid("FF123456"));
        let indices: Vec<u32> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| registry.style_index(&style).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(indices.iter().all(|&i| i == indices[0]));
        assert_eq!(registry.xf_count(), 2);
    }
}
