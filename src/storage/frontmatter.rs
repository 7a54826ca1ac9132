//! Note frontmatter
//!
//! A routed note opens with a YAML frontmatter block whose `mask:` field is
//! the canonical mask string. The block is both human-readable metadata and
//! the persisted mask: re-routing reads it back in preference to the file
//! name, so renaming a note on disk does not lose its classification.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{Access, Format, Mask, Status};

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^---\n(.*?)\n---\n?").expect("frontmatter regex compiles"));

/// Frontmatter written into a routed note.
///
/// The mask fields are denormalized alongside the canonical string so the
/// block stays queryable by plain frontmatter tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteFrontmatter {
    pub created: DateTime<Utc>,

    pub mask: Mask,

    pub entity: String,

    pub areas: Vec<String>,

    pub anchor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,

    /// Knowledge-base marker, set for KB-area notes and the KB category.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub kb: bool,
}

impl NoteFrontmatter {
    /// Builds the frontmatter for a mask, stamped with the current time.
    pub fn for_mask(mask: &Mask) -> Self {
        Self {
            created: Utc::now(),
            mask: mask.clone(),
            entity: mask.entity.clone(),
            areas: mask.areas.clone(),
            anchor: mask.anchor.clone(),
            status: mask.status,
            access: mask.access,
            format: mask.format,
            references: mask.references.clone(),
            kb: mask.areas.iter().any(|a| a == "KB") || mask.anchor == "CAT-KB",
        }
    }

    /// Renders the delimited YAML block, trailing newline included.
    pub fn to_block(&self) -> anyhow::Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

/// Extracts the mask from a note's frontmatter, if it has one.
///
/// Returns `None` for notes without a frontmatter block, without a `mask:`
/// field, or whose mask string does not parse.
pub fn extract_mask(content: &str) -> Option<Mask> {
    #[derive(Deserialize)]
    struct MaskField {
        mask: Option<String>,
    }

    let caps = FRONTMATTER_RE.captures(content)?;
    let field: MaskField = serde_yaml::from_str(caps.get(1)?.as_str()).ok()?;
    Mask::parse(&field.mask?)
}

/// Replaces an existing frontmatter block with `block`, or prepends it.
pub fn with_frontmatter(content: &str, block: &str) -> String {
    if FRONTMATTER_RE.is_match(content) {
        FRONTMATTER_RE
            .replace(content, regex::NoExpand(block))
            .into_owned()
    } else if content.is_empty() {
        block.to_string()
    } else {
        format!("{}\n{}", block, content)
    }
}
