//! Upload normalization
//!
//! Tab-delimited `.txt` uploads are re-emitted as comma-delimited `.csv`
//! files; `.csv` uploads pass through. Every accepted upload is parsed
//! into a [`Table`] so downstream stages never look at delimiters again.

use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_csv::reader::Format;
use arrow_csv::{ReaderBuilder, WriterBuilder};
use arrow_schema::{Field, Schema};

use crate::table::Table;
use crate::{Error, Result};

/// Rows sampled for type inference
const SCHEMA_INFER_MAX_RECORDS: usize = 1000;

/// A user upload: a filename and its bytes
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
    /// Where the bytes came from on the host, when known
    pub source: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new<S: Into<String>>(name: S, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
            source: None,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            content,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    pub fn stem(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    }
}

/// Supported upload encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    TabSeparated,
    CommaSeparated,
}

impl UploadFormat {
    /// Decide the format from the file extension alone
    pub fn detect(file: &UploadedFile) -> Result<Self> {
        match file.extension().as_deref() {
            Some("txt") => Ok(UploadFormat::TabSeparated),
            Some("csv") => Ok(UploadFormat::CommaSeparated),
            _ => Err(Error::UnsupportedFormat {
                name: file.name.clone(),
            }),
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            UploadFormat::TabSeparated => b'\t',
            UploadFormat::CommaSeparated => b',',
        }
    }
}

/// The outcome of normalizing an upload
#[derive(Debug, Clone)]
pub struct NormalizedFile {
    /// Comma-delimited file on disk
    pub path: PathBuf,
    pub format: UploadFormat,
    pub table: Table,
}

/// Parse delimited text with a header row into a [`Table`]
pub fn parse_delimited(name: &str, content: &[u8], delimiter: u8) -> Result<Table> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter);

    let (schema, _) = format
        .infer_schema(Cursor::new(content), Some(SCHEMA_INFER_MAX_RECORDS))
        .map_err(|e| Error::parse(name, e))?;
    if schema.fields().is_empty() {
        return Err(Error::parse(name, "no header row"));
    }
    let schema = Arc::new(unique_field_names(&schema));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(delimiter)
        .build(Cursor::new(content))
        .map_err(|e| Error::parse(name, e))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::parse(name, e))?;

    diagnostics::debug!(
        "Parsed {name}: {columns} columns, {batches} batches",
        name: name,
        columns: schema.fields().len(),
        batches: batches.len()
    );

    Ok(Table::new(schema, batches))
}

/// Rename repeated header names `x`, `x` to `x`, `x.1`, skipping names already taken
fn unique_field_names(schema: &Schema) -> Schema {
    let mut taken: HashSet<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let mut seen = HashSet::new();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| {
            if seen.insert(field.name().clone()) {
                return field.as_ref().clone();
            }
            let mut n = 1;
            let mut renamed = format!("{}.{n}", field.name());
            while taken.contains(&renamed) {
                n += 1;
                renamed = format!("{}.{n}", field.name());
            }
            taken.insert(renamed.clone());
            seen.insert(renamed.clone());
            field.as_ref().clone().with_name(renamed)
        })
        .collect();
    Schema::new(fields)
}

/// Write a table as comma-delimited text with a header row
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);

    if table.batches().is_empty() {
        // Still emit the header
        writer.write(&RecordBatch::new_empty(table.schema().clone()))?;
    }
    for batch in table.batches() {
        writer.write(batch)?;
    }
    Ok(())
}

/// Normalize an optional upload into a comma-delimited file under `workdir`
pub fn normalize(upload: Option<&UploadedFile>, workdir: &Path) -> Result<NormalizedFile> {
    let file = upload.ok_or(Error::NoUpload)?;
    let format = UploadFormat::detect(file)?;
    let table = parse_delimited(&file.name, &file.content, format.delimiter())?;

    let path = match (format, &file.source) {
        (UploadFormat::CommaSeparated, Some(source)) => source.clone(),
        (UploadFormat::CommaSeparated, None) => {
            fs::create_dir_all(workdir)?;
            let path = workdir.join(&file.name);
            fs::write(&path, &file.content)?;
            path
        }
        (UploadFormat::TabSeparated, _) => {
            fs::create_dir_all(workdir)?;
            let path = workdir.join(format!("{}.csv", file.stem()));
            write_csv(&path, &table)?;
            path
        }
    };

    diagnostics::info!(
        "Normalized {upload} to {path} ({rows} rows)",
        upload: file.name.as_str(),
        path: path.display().to_string(),
        rows: table.num_rows()
    );

    Ok(NormalizedFile {
        path,
        format,
        table,
    })
}
