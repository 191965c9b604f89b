//! The two canned statements and their typed results
//!
//! A count over the whole table, and a selection of every column grouped
//! by the first one. What each result means is fixed here, so rendering
//! never has to guess from the width of a row.

use arrow_array::{Array, Float64Array, Int64Array};
use arrow_cast::display::{ArrayFormatter, FormatOptions};
use arrow_schema::{DataType, Schema};

use crate::ident;
use crate::store::{Store, sql_type};
use crate::table::Table;
use crate::{Error, Result};

/// Column alias of the count statement
pub const COUNT_COLUMN: &str = "Count";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedQuery {
    pub sql: String,
    /// Grouping column, always the first selected column
    pub key: String,
    /// First numeric non-key column, if any
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQueries {
    pub count: CountQuery,
    pub grouped: GroupedQuery,
}

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Build both statements for `table` from the selected columns
pub fn generate(table: &str, schema: &Schema) -> Result<GeneratedQueries> {
    let quoted_table = ident::quoted_table(table)?;
    let fields = schema.fields();
    let Some(first) = fields.first() else {
        return Err(Error::EmptySelection);
    };

    let key = ident::quoted_column(first.name())?;
    let mut projections = vec![key.clone()];
    let mut value = None;
    for field in fields.iter().skip(1) {
        let column = ident::quoted_column(field.name())?;
        if is_numeric(field.data_type()) {
            if value.is_none() {
                value = Some(field.name().clone());
            }
            projections.push(format!(
                "CAST(SUM({column}) AS {}) AS {column}",
                sql_type(field.data_type())
            ));
        } else {
            projections.push(format!("ANY_VALUE({column}) AS {column}"));
        }
    }

    let count = CountQuery {
        sql: format!(
            "SELECT COUNT(*) AS {} FROM {quoted_table}",
            ident::quote(COUNT_COLUMN)
        ),
    };
    let grouped = GroupedQuery {
        sql: format!(
            "SELECT {} FROM {quoted_table} GROUP BY {key} ORDER BY {key}",
            projections.join(", ")
        ),
        key: first.name().clone(),
        value,
    };

    diagnostics::debug!("Generated count query {sql}", sql: count.sql.as_str());
    diagnostics::debug!("Generated grouped query {sql}", sql: grouped.sql.as_str());

    Ok(GeneratedQueries { count, grouped })
}

/// Rows of the count statement
#[derive(Debug, Clone)]
pub struct CountResult {
    pub counts: Vec<i64>,
    pub table: Table,
}

/// Rows of the grouped statement, with the chartable `(key, value)` pairs
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub key: String,
    pub value: Option<String>,
    /// Rows with a null value are left out
    pub pairs: Vec<(String, f64)>,
    pub table: Table,
}

impl CountQuery {
    pub fn run(&self, store: &Store) -> Result<CountResult> {
        let table = store.execute(&self.sql)?;
        let mut counts = Vec::with_capacity(table.num_rows());
        for batch in table.batches() {
            let column = arrow_cast::cast(batch.column(0), &DataType::Int64)?;
            let column = column
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| Error::render("count column is not an integer"))?;
            counts.extend(column.iter().map(|v| v.unwrap_or(0)));
        }
        Ok(CountResult { counts, table })
    }
}

impl GroupedQuery {
    pub fn run(&self, store: &Store) -> Result<AggregateResult> {
        let table = store.execute(&self.sql)?;
        let value_index = match &self.value {
            Some(name) => Some(table.schema().index_of(name)?),
            None => None,
        };

        let options = FormatOptions::default();
        let mut pairs = Vec::new();
        if let Some(value_index) = value_index {
            for batch in table.batches() {
                let keys = ArrayFormatter::try_new(batch.column(0).as_ref(), &options)?;
                let values = arrow_cast::cast(batch.column(value_index), &DataType::Float64)?;
                let values = values
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| Error::render("value column is not numeric"))?;
                for row in 0..batch.num_rows() {
                    if values.is_valid(row) {
                        pairs.push((keys.value(row).to_string(), values.value(row)));
                    }
                }
            }
        }

        Ok(AggregateResult {
            key: self.key.clone(),
            value: self.value.clone(),
            pairs,
            table,
        })
    }
}
