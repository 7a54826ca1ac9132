//! Note creation command

use anyhow::{anyhow, Result};

use super::output::Output;
use crate::domain::Mask;
use crate::storage::Vault;

pub fn run(output: &Output, raw: &str, body: &str, vault: &Vault) -> Result<()> {
    let mask = Mask::parse(raw).ok_or_else(|| anyhow!("Not a valid mask: '{}'", raw))?;
    let path = vault.create_note(&mask, body)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path,
            "mask": mask.file_name(),
            "anchor_type": mask.anchor_type().to_string(),
        }));
    } else {
        output.success(&format!("Created note: {}", path.display()));
    }
    Ok(())
}
