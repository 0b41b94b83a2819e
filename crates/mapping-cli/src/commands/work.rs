//! Work command: drain the compile task spool

use colored::Colorize;

use super::{finish, print_compiled};
use crate::context::Context;
use crate::error::Result;

/// Run every pending compile task. Failed tasks stay queued.
pub fn run_work(ctx: &Context) -> Result<()> {
    let queue = ctx.queue();
    let report = queue.drain(|task| {
        let document = task.run(&ctx.mapping)?;
        print_compiled(&task.tenant.id, task.mapping_type.value(), &document);
        Ok(())
    })?;

    for (id, error) in &report.failed {
        eprintln!("{} {}: {}", "FAILED".red().bold(), id.cyan(), error);
    }
    if report.completed.is_empty() && report.failed.is_empty() {
        println!("{} No queued tasks", "Note:".dimmed());
    }

    finish(report.failed.len())
}
