//! Where user-facing output goes
//!
//! The pipeline never prints. It hands messages, tables and charts to a
//! [`Surface`]; the command line uses [`TerminalSurface`], tests use
//! [`MemorySurface`].

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::Severity;
use crate::render::BarChart;

pub trait Surface {
    fn message(&mut self, severity: Severity, text: &str);
    fn table(&mut self, title: &str, rendered: &str);
    fn chart(&mut self, name: &str, chart: &BarChart);
}

/// Writes to any `Write`, normally stdout
pub struct TerminalSurface<W: Write> {
    out: W,
    chart_width: usize,
    chart_dir: Option<PathBuf>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, chart_width: usize) -> Self {
        Self {
            out,
            chart_width,
            chart_dir: None,
        }
    }

    /// Also save each chart as `<dir>/<name>.vl.json`
    pub fn with_chart_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.chart_dir = dir;
        self
    }

    fn write_line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            diagnostics::error!("Failed to write output: {reason}", reason: e.to_string());
        }
    }

    fn save_chart(&mut self, name: &str, chart: &BarChart) -> std::io::Result<PathBuf> {
        let dir = self.chart_dir.clone().unwrap_or_default();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{name}.vl.json"));
        let doc = serde_json::to_string_pretty(&chart.to_vega_lite())?;
        fs::write(&path, doc)?;
        Ok(path)
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn message(&mut self, severity: Severity, text: &str) {
        let prefix = match severity {
            Severity::Info => "",
            Severity::Success => "✅ ",
            Severity::Warning => "⚠️  Warning: ",
            Severity::Error => "❌ Error: ",
        };
        self.write_line(&format!("{prefix}{text}"));
    }

    fn table(&mut self, title: &str, rendered: &str) {
        self.write_line(title);
        self.write_line(rendered);
    }

    fn chart(&mut self, name: &str, chart: &BarChart) {
        let text = chart.to_text(self.chart_width);
        self.write_line(&text);
        if self.chart_dir.is_some() {
            match self.save_chart(name, chart) {
                Ok(path) => self.write_line(&format!("Chart written to {}", path.display())),
                Err(e) => self.message(Severity::Error, &format!("Failed to write chart {name}: {e}")),
            }
        }
    }
}

/// Everything shown, kept in order
#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Message(Severity, String),
    Table(String, String),
    Chart(String, BarChart),
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    pub shown: Vec<Shown>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Message(sev, text) if *sev == severity => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn charts(&self) -> Vec<&BarChart> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Chart(_, chart) => Some(chart),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Table(_, rendered) => Some(rendered.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for MemorySurface {
    fn message(&mut self, severity: Severity, text: &str) {
        self.shown.push(Shown::Message(severity, text.to_string()));
    }

    fn table(&mut self, title: &str, rendered: &str) {
        self.shown
            .push(Shown::Table(title.to_string(), rendered.to_string()));
    }

    fn chart(&mut self, name: &str, chart: &BarChart) {
        self.shown.push(Shown::Chart(name.to_string(), chart.clone()));
    }
}
