//! Inbox watcher
//!
//! Watches `0_INBOX` with a debounced filesystem watcher and feeds each
//! settled file through the vault's ingest. Events go to a rotating log
//! under `9_ADMIN/logs` so a long-running watcher leaves a trail even when
//! detached from a terminal.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;

use super::output::Output;
use crate::storage::{IngestOptions, IngestOutcome, Vault};

/// Maximum log file size before rotation (1MB)
const MAX_LOG_SIZE: u64 = 1024 * 1024;

/// Number of rotated log files to keep
const LOG_ROTATION_COUNT: usize = 7;

pub fn run(output: &Output, vault: &Vault, debounce: Duration, opts: &IngestOptions) -> Result<()> {
    let inbox = vault.inbox();
    let log_path = vault.log_file();

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(debounce, tx)?;
    debouncer
        .watcher()
        .watch(&inbox, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch inbox: {}", inbox.display()))?;

    log_message(
        &log_path,
        &format!(
            "Watching {} (debounce: {}s, dry_run: {})",
            inbox.display(),
            debounce.as_secs(),
            opts.dry_run
        ),
    )?;
    output.success(&format!("Watching {}", inbox.display()));

    // Main event loop; runs until the watcher channel closes.
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                for event in events {
                    handle_event(output, vault, &log_path, &event.path, opts);
                }
            }
            Ok(Err(error)) => {
                log_message(&log_path, &format!("Watch error: {:?}", error))?;
            }
            Err(e) => {
                log_message(&log_path, &format!("Channel closed: {}", e))?;
                break;
            }
        }
    }

    Ok(())
}

fn handle_event(
    output: &Output,
    vault: &Vault,
    log_path: &Path,
    path: &Path,
    opts: &IngestOptions,
) {
    if !path.is_file() {
        return;
    }

    match vault.ingest(path, opts) {
        Ok(IngestOutcome::Moved(dest)) => {
            let line = format!("moved {} -> {}", path.display(), dest.display());
            let _ = log_message(log_path, &line);
            output.verbose(&line);
        }
        Ok(IngestOutcome::Duplicate(of)) => {
            let line = format!(
                "dropped duplicate {} (already at {})",
                path.display(),
                of.display()
            );
            let _ = log_message(log_path, &line);
            output.verbose(&line);
        }
        Ok(IngestOutcome::Skipped) => {
            output.verbose(&format!("left in inbox: {}", path.display()));
        }
        Err(e) => {
            let _ = log_message(
                log_path,
                &format!("ingest failed for {}: {:#}", path.display(), e),
            );
        }
    }
}

/// Appends a timestamped line to the watch log
fn log_message(log_path: &Path, message: &str) -> Result<()> {
    rotate_logs_if_needed(log_path)?;

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .context("Failed to open log file")?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{}] {}", timestamp, message)?;

    Ok(())
}

/// Rotates log files if the current log exceeds MAX_LOG_SIZE
fn rotate_logs_if_needed(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let metadata = fs::metadata(log_path)?;
    if metadata.len() < MAX_LOG_SIZE {
        return Ok(());
    }

    // Shift existing numbered logs up, discarding the oldest.
    for i in (1..LOG_ROTATION_COUNT).rev() {
        let old_path = log_path.with_extension(format!("log.{}", i));
        let new_path = log_path.with_extension(format!("log.{}", i + 1));
        if old_path.exists() {
            if i + 1 >= LOG_ROTATION_COUNT {
                fs::remove_file(&old_path)?;
            } else {
                fs::rename(&old_path, &new_path)?;
            }
        }
    }

    let rotated_path = log_path.with_extension("log.1");
    fs::rename(log_path, rotated_path)?;

    Ok(())
}
