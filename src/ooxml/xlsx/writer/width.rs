//! Per-column content width tracking.
//!
//! Widths are measured while rows stream past, from values the writer already
//! holds; already-written bytes are never read back.

use super::column::ColumnWidth;

/// Width assumed for boolean cells ("FALSE").
pub(crate) const BOOL_WIDTH: f64 = 5.0;

/// Smallest width given to date cells regardless of their format code.
pub(crate) const MIN_DATE_WIDTH: f64 = 10.0;

/// Widest content observed per column, in character units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidthAccumulator {
    widths: Vec<Option<f64>>,
}

impl WidthAccumulator {
    pub fn new(columns: usize) -> Self {
        Self {
            widths: vec![None; columns],
        }
    }

    /// Record a measurement for a zero-based column.
    #[inline]
    pub fn observe(&mut self, column: usize, width: f64) {
        if column >= self.widths.len() {
            self.widths.resize(column + 1, None);
        }
        let slot = &mut self.widths[column];
        *slot = Some(slot.map_or(width, |current| current.max(width)));
    }

    /// Widest content seen in a zero-based column.
    pub fn observed(&self, column: usize) -> Option<f64> {
        self.widths.get(column).copied().flatten()
    }

    /// Number of columns tracked.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Final width of every column.
    ///
    /// Fixed columns keep their width; auto columns get their widest content
    /// plus `padding` (capped at `max`); columns nothing was measured for get
    /// `default`.
    pub fn resolve(&self, specs: &[ColumnWidth], padding: f64, default: f64, max: f64) -> Vec<f64> {
        let columns = specs.len().max(self.widths.len());
        (0..columns)
            .map(|i| match specs.get(i).copied().unwrap_or_default() {
                ColumnWidth::Fixed(width) => width,
                ColumnWidth::Auto => self
                    .observed(i)
                    .map_or(default, |width| (width + padding).min(max)),
            })
            .collect()
    }
}
