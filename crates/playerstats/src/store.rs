//! DuckDB-backed store
//!
//! Every operation opens its own connection and drops it before returning.
//! Writes replace the whole table: the previous schema and rows are gone
//! after a successful [`Store::replace_table`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::{DataType, Field, Schema, SchemaRef, TimeUnit};
use duckdb::Connection;

use crate::ident;
use crate::table::Table;
use crate::{Error, Result};

/// Placeholder columns for a store that has never seen an upload
const DEFAULT_COLUMNS: &str = "player_id INTEGER PRIMARY KEY, \
     \"Player’s_information\" VARCHAR, \
     games_played INTEGER, \
     total_winnings DOUBLE";

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection> {
        diagnostics::debug!("Opening store {path}", path: self.path.display().to_string());
        Ok(Connection::open(&self.path)?)
    }

    /// Create `table` with the placeholder schema unless it already exists
    pub fn ensure_schema(&self, table: &str) -> Result<()> {
        let quoted = ident::quoted_table(table)?;
        let conn = self.connect()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {quoted} ({DEFAULT_COLUMNS});"
        ))?;
        diagnostics::info!("Schema ready for {table}", table: table);
        Ok(())
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Drop and recreate `table` from `data` in one transaction; returns rows written
    pub fn replace_table(&self, table: &str, data: &Table) -> Result<usize> {
        let quoted = ident::quoted_table(table)?;
        let storage_schema = storage_schema(data.schema());

        let mut definitions = Vec::with_capacity(storage_schema.fields().len());
        for field in storage_schema.fields() {
            definitions.push(format!(
                "{} {}",
                ident::quoted_column(field.name())?,
                sql_type(field.data_type())
            ));
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {quoted}; CREATE TABLE {quoted} ({});",
            definitions.join(", ")
        ))?;

        let mut rows = 0;
        {
            let mut appender = tx.appender(table)?;
            for batch in data.batches() {
                if batch.num_rows() == 0 {
                    continue;
                }
                rows += batch.num_rows();
                appender.append_record_batch(to_storage(batch, &storage_schema)?)?;
            }
            appender.flush()?;
        }
        tx.commit()?;

        diagnostics::info!(
            "Replaced {table} with {rows} rows, {columns} columns",
            table: table,
            rows: rows,
            columns: definitions.len()
        );
        Ok(rows)
    }

    /// Run one statement and fetch every row
    pub fn execute(&self, sql: &str) -> Result<Table> {
        diagnostics::debug!("Executing {sql}", sql: sql);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql).map_err(|e| Error::query(sql, e))?;
        let arrow = stmt.query_arrow([]).map_err(|e| Error::query(sql, e))?;
        let schema = arrow.get_schema();
        let batches: Vec<RecordBatch> = arrow.collect();
        Ok(Table::new(schema, batches))
    }

    /// Current columns of a stored table
    pub fn table_schema(&self, table: &str) -> Result<SchemaRef> {
        let sql = format!("SELECT * FROM {} LIMIT 0", ident::quoted_table(table)?);
        Ok(self.execute(&sql)?.schema().clone())
    }
}

/// The column type a CSV-inferred Arrow type is stored as
fn storage_type(data_type: &DataType) -> DataType {
    match data_type {
        DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64
        | DataType::Date32
        | DataType::Utf8 => data_type.clone(),
        DataType::Timestamp(_, None) => DataType::Timestamp(TimeUnit::Microsecond, None),
        _ => DataType::Utf8,
    }
}

fn storage_schema(schema: &SchemaRef) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), storage_type(f.data_type()), true))
        .collect();
    Arc::new(Schema::new(fields))
}

fn to_storage(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let columns = batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(column, field)| {
            if column.data_type() == field.data_type() {
                Ok(column.clone())
            } else {
                arrow_cast::cast(column, field.data_type())
            }
        })
        .collect::<std::result::Result<Vec<ArrayRef>, _>>()?;
    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}

/// DuckDB column type for a storage Arrow type
pub(crate) fn sql_type(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Boolean => "BOOLEAN",
        DataType::Int8 => "TINYINT",
        DataType::Int16 => "SMALLINT",
        DataType::Int32 => "INTEGER",
        DataType::Int64 => "BIGINT",
        DataType::UInt8 => "UTINYINT",
        DataType::UInt16 => "USMALLINT",
        DataType::UInt32 => "UINTEGER",
        DataType::UInt64 => "UBIGINT",
        DataType::Float32 => "FLOAT",
        DataType::Float64 => "DOUBLE",
        DataType::Date32 => "DATE",
        DataType::Timestamp(_, None) => "TIMESTAMP",
        _ => "VARCHAR",
    }
}
