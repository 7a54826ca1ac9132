//! Anchor classification
//!
//! The anchor is the trailing `@`-token of a mask and decides where a note
//! lives: `PROJ-` anchors route into the projects tree, `CAT-` anchors into
//! the categories tree, anything else falls back to the inbox.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::mask::Mask;

/// Semantic class of a routing anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorType {
    Project,
    Category,
    Unknown,
}

impl AnchorType {
    /// Classifies an anchor by its prefix.
    ///
    /// No normalization or case folding: the grammar already guarantees
    /// uppercase input, and programmatic callers get exactly what they pass.
    pub fn classify(anchor: &str) -> AnchorType {
        if anchor.starts_with("PROJ-") {
            AnchorType::Project
        } else if anchor.starts_with("CAT-") {
            AnchorType::Category
        } else {
            AnchorType::Unknown
        }
    }
}

impl fmt::Display for AnchorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorType::Project => write!(f, "project"),
            AnchorType::Category => write!(f, "category"),
            AnchorType::Unknown => write!(f, "unknown"),
        }
    }
}

impl Mask {
    /// Returns the semantic class of this mask's anchor.
    pub fn anchor_type(&self) -> AnchorType {
        AnchorType::classify(&self.anchor)
    }
}
