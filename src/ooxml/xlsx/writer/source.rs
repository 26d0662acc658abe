//! Row sources pulled by the worksheet writer.
//!
//! Sources are pulled, never pushed: a slow writer throttles a fast producer.
//! A source is not restarted at a part boundary; the writer keeps pulling
//! from where it left off.

use super::cell::Row;
use crate::common::error::Result;

/// Produces rows in batches.
pub trait RowSource {
    /// Next batch of rows. `None` or an empty batch ends the sheet.
    fn next_batch(&mut self) -> Result<Option<Vec<Row>>>;
}

impl<F> RowSource for F
where
    F: FnMut() -> Result<Option<Vec<Row>>>,
{
    fn next_batch(&mut self) -> Result<Option<Vec<Row>>> {
        self()
    }
}

/// Batches an iterator of rows.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
    batch_size: usize,
}

impl<I: Iterator<Item = Row>> IterSource<I> {
    pub fn new(iter: I) -> Self {
        Self::with_batch_size(iter, 1024)
    }

    pub fn with_batch_size(iter: I, batch_size: usize) -> Self {
        Self {
            iter,
            batch_size: batch_size.max(1),
        }
    }
}

impl<I: Iterator<Item = Row>> RowSource for IterSource<I> {
    fn next_batch(&mut self) -> Result<Option<Vec<Row>>> {
        let batch: Vec<Row> = self.iter.by_ref().take(self.batch_size).collect();
        Ok((!batch.is_empty()).then_some(batch))
    }
}
