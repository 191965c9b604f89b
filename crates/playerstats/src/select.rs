//! Column selection
//!
//! The available columns are offered to a [`ColumnChooser`]; the table is
//! narrowed to whatever it picks. Picking nothing is a warning and nothing
//! downstream runs.

use std::io::{BufRead, Write};

use crate::table::Table;
use crate::{Error, Result};

/// Something that can pick columns, usually the person at the keyboard
pub trait ColumnChooser {
    fn choose(&mut self, available: &[String]) -> Result<Vec<String>>;
}

/// Always picks the same names
#[derive(Debug, Clone, Default)]
pub struct FixedColumns(pub Vec<String>);

impl FixedColumns {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FixedColumns(names.into_iter().map(Into::into).collect())
    }
}

impl ColumnChooser for FixedColumns {
    fn choose(&mut self, _available: &[String]) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Picks every column
#[derive(Debug, Clone, Copy, Default)]
pub struct AllColumns;

impl ColumnChooser for AllColumns {
    fn choose(&mut self, available: &[String]) -> Result<Vec<String>> {
        Ok(available.to_vec())
    }
}

/// Numbered prompt over a reader/writer pair, e.g. stdin/stdout
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ColumnChooser for PromptChooser<R, W> {
    fn choose(&mut self, available: &[String]) -> Result<Vec<String>> {
        writeln!(
            self.output,
            "Please select the columns you want to include in the analysis:"
        )?;
        for (i, name) in available.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", i + 1, name)?;
        }
        write!(self.output, "Columns (numbers or names, comma separated; '*' for all): ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        parse_choice(&line, available)
    }
}

/// Interpret a comma separated answer of names, 1-based indices or `*`
///
/// A token that exactly matches a column name selects that column, even
/// when it also reads as an index.
pub fn parse_choice(answer: &str, available: &[String]) -> Result<Vec<String>> {
    let answer = answer.trim();
    if answer == "*" {
        return Ok(available.to_vec());
    }

    let mut chosen = Vec::new();
    for token in answer.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if available.iter().any(|name| name == token) {
            chosen.push(token.to_string());
            continue;
        }
        let name = match token.parse::<usize>() {
            Ok(n) if n >= 1 && n <= available.len() => available[n - 1].clone(),
            _ => token.to_string(),
        };
        chosen.push(name);
    }
    Ok(chosen)
}

/// Narrow `table` to the chooser's columns
pub fn select_columns(table: &Table, chooser: &mut dyn ColumnChooser) -> Result<Table> {
    let available = table.column_names();
    let chosen = chooser.choose(&available)?;
    if chosen.is_empty() {
        return Err(Error::EmptySelection);
    }
    diagnostics::debug!("Selected columns {columns}", columns: chosen.join(", ").as_str());
    table.project(&chosen)
}
