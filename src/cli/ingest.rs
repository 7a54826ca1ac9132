//! Inbox sweep and vault statistics commands

use anyhow::Result;

use super::output::Output;
use crate::storage::{IngestOptions, Vault};

pub fn sweep(output: &Output, vault: &Vault, opts: &IngestOptions) -> Result<()> {
    let report = vault.sweep_inbox(opts)?;

    if output.is_json() {
        output.data(&report);
        return Ok(());
    }

    for moved in &report.moved {
        println!("{} -> {}", moved.from.display(), moved.to.display());
    }
    for duplicate in &report.duplicates {
        output.verbose(&format!("duplicate dropped: {}", duplicate.display()));
    }
    for error in &report.errors {
        output.error(error);
    }

    let summary = format!(
        "{} moved, {} duplicate(s), {} left in inbox",
        report.moved.len(),
        report.duplicates.len(),
        report.skipped.len()
    );
    if opts.dry_run {
        output.success(&format!("Dry run: {}", summary));
    } else {
        output.success(&summary);
    }
    Ok(())
}

pub fn status(output: &Output, vault: &Vault) -> Result<()> {
    let stats = vault.stats();

    if output.is_json() {
        output.data(&stats);
    } else {
        println!("Vault: {}", vault.root().display());
        println!("{:<12} {}", "projects", stats.projects);
        println!("{:<12} {}", "categories", stats.categories);
        println!("{:<12} {}", "notes", stats.notes);
        println!("{:<12} {}", "inbox", stats.inbox_pending);
    }
    Ok(())
}
