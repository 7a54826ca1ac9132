//! Mask inspection commands
//!
//! `parse`, `validate` and `route` operate on the mask string alone; none
//! of them touches the vault tree.

use std::path::Path;

use anyhow::{anyhow, Result};

use super::output::Output;
use crate::domain::Mask;

/// Parses a command-line mask argument, failing the command when it does
/// not match the grammar.
fn parse_arg(raw: &str) -> Result<Mask> {
    Mask::parse(raw).ok_or_else(|| anyhow!("Not a valid mask: '{}'", raw))
}

fn dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn mask_fields(mask: &Mask) -> serde_json::Value {
    serde_json::json!({
        "entity": mask.entity,
        "areas": mask.areas,
        "status": mask.status.map(|s| s.code()),
        "access": mask.access.map(|a| a.code()),
        "format": mask.format.map(|f| f.code()),
        "references": mask.references,
        "anchor": mask.anchor,
        "anchor_type": mask.anchor_type().to_string(),
    })
}

pub fn parse(output: &Output, raw: &str) -> Result<()> {
    let mask = parse_arg(raw)?;

    if output.is_json() {
        output.data(&mask_fields(&mask));
    } else {
        println!("{:<12} {}", "entity", mask.entity);
        println!(
            "{:<12} {}",
            "areas",
            if mask.areas.is_empty() {
                "-".to_string()
            } else {
                mask.areas.join(", ")
            }
        );
        println!("{:<12} {}", "status", dash(mask.status.map(|s| s.code())));
        println!("{:<12} {}", "access", dash(mask.access.map(|a| a.code())));
        println!("{:<12} {}", "format", dash(mask.format.map(|f| f.code())));
        println!(
            "{:<12} {}",
            "references",
            if mask.references.is_empty() {
                "-".to_string()
            } else {
                mask.references.join(", ")
            }
        );
        println!("{:<12} {} ({})", "anchor", mask.anchor, mask.anchor_type());
    }
    Ok(())
}

pub fn validate(output: &Output, raw: &str) -> Result<()> {
    let mask = parse_arg(raw)?;
    let validation = mask.validate();

    if output.is_json() {
        output.data(&validation);
    } else if validation.valid {
        output.success("Valid mask");
    } else {
        for error in &validation.errors {
            output.error(error);
        }
    }

    if validation.valid {
        Ok(())
    } else {
        Err(anyhow!(
            "{} placement rule(s) violated",
            validation.errors.len()
        ))
    }
}

pub fn route(output: &Output, raw: &str, root: &Path) -> Result<()> {
    let mask = parse_arg(raw)?;
    let file_name = mask.file_name();
    let dir = mask.file_path(&root.to_string_lossy());

    if output.is_json() {
        output.data(&serde_json::json!({
            "file_name": file_name,
            "dir": dir,
            "anchor_type": mask.anchor_type().to_string(),
        }));
    } else {
        println!("{:<12} {}", "file name", file_name);
        println!("{:<12} {}", "directory", dir);
    }
    Ok(())
}
