use std::collections::HashSet;
use std::sync::Arc;

use arrow::util::pretty::pretty_format_batches;
use arrow_array::RecordBatch;
use arrow_cast::display::{ArrayFormatter, FormatOptions};
use arrow_schema::SchemaRef;

use crate::{Error, Result};

/// In-memory table: an Arrow schema plus its record batches in row order
#[derive(Debug, Clone)]
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Table {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Project onto the named columns, in the order given
    pub fn project(&self, columns: &[String]) -> Result<Table> {
        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
            let idx = self
                .schema
                .index_of(name)
                .map_err(|_| Error::UnknownColumn(name.clone()))?;
            indices.push(idx);
        }

        let schema = Arc::new(self.schema.project(&indices)?);
        let batches = self
            .batches
            .iter()
            .map(|b| b.project(&indices))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Table::new(schema, batches))
    }

    /// Every cell formatted as text, row by row; nulls become empty strings
    pub fn rows_as_strings(&self) -> Result<Vec<Vec<String>>> {
        let options = FormatOptions::default();
        let mut rows = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            let formatters = batch
                .columns()
                .iter()
                .map(|c| ArrayFormatter::try_new(c.as_ref(), &options))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for row in 0..batch.num_rows() {
                rows.push(formatters.iter().map(|f| f.value(row).to_string()).collect());
            }
        }
        Ok(rows)
    }

    /// Box-drawn text table, as printed by the query display
    pub fn pretty(&self) -> Result<String> {
        if self.batches.is_empty() {
            let empty = RecordBatch::new_empty(self.schema.clone());
            return Ok(pretty_format_batches(&[empty])?.to_string());
        }
        Ok(pretty_format_batches(&self.batches)?.to_string())
    }
}
