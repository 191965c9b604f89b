use anyhow::Result;
use playerstats::{RunReport, Surface};

use crate::common::StatsContext;
use crate::error_utils::check_report;

/// Re-run both queries over the stored table without uploading anything
pub fn report_command(ctx: &StatsContext, surface: &mut dyn Surface) -> Result<RunReport> {
    let store = ctx.store();
    let report = ctx.pipeline(&store).report(surface);
    check_report("report", &report)?;
    Ok(report)
}
