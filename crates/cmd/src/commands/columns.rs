use std::path::Path;

use anyhow::{Result, anyhow};
use playerstats::normalize::normalize;
use playerstats::{Severity, Surface, UploadedFile};

use crate::common::StatsContext;
use crate::error_utils::ErrorContext;

/// Normalize an upload and list the columns it offers
pub fn columns_command(ctx: &StatsContext, file: &Path, surface: &mut dyn Surface) -> Result<Vec<String>> {
    let upload = UploadedFile::from_path(file).file_context("read", &file.display().to_string())?;

    let normalized = match normalize(Some(&upload), &ctx.config.workdir) {
        Ok(n) => n,
        Err(e) => {
            surface.message(e.severity(), &e.to_string());
            return Err(anyhow!("{}", e));
        }
    };

    let columns = normalized.table.column_names();
    surface.message(
        Severity::Info,
        &format!(
            "{} ({} rows) has {} columns:",
            normalized.path.display(),
            normalized.table.num_rows(),
            columns.len()
        ),
    );
    for (i, name) in columns.iter().enumerate() {
        surface.message(Severity::Info, &format!("  {:>2}) {}", i + 1, name));
    }
    Ok(columns)
}
