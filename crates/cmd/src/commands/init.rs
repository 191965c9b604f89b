use anyhow::{Result, anyhow};
use playerstats::{Severity, Surface};

use crate::common::StatsContext;
use crate::error_utils::ErrorContext;

/// Create the session's table with the placeholder schema if it is missing
///
/// Returns true when the table was created, false when it was already there.
pub fn init_command(ctx: &StatsContext, surface: &mut dyn Surface) -> Result<bool> {
    diagnostics::info!("init with database {db}", db: ctx.config.database.display().to_string());

    let store = ctx.store();
    let table = ctx.session.table();
    let existed = store.table_exists(table).store_context("inspect")?;

    if !ctx.pipeline(&store).initialize(surface) {
        return Err(anyhow!(
            "Failed to initialize {}",
            ctx.config.database.display()
        ));
    }

    let state = if existed { "already present" } else { "created" };
    surface.message(
        Severity::Success,
        &format!("Table {table} {state} in {}", ctx.config.database.display()),
    );
    Ok(!existed)
}
