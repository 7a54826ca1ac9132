//! Deterministic file naming and vault placement
//!
//! Naming and parsing must agree bit-for-bit: [`Mask::parse`] accepts
//! exactly the strings [`Mask::file_name`] produces for in-vocabulary
//! masks, which is what lets the mask serve as a file basename and a
//! frontmatter field at the same time.

use super::anchor::AnchorType;
use super::mask::Mask;

/// Inbox folder for notes without a routable anchor.
pub const INBOX_DIR: &str = "0_INBOX";

/// Folder holding one subtree per project anchor.
pub const PROJECTS_DIR: &str = "1_PROJECTS";

/// Folder holding one subtree per category anchor.
pub const CATEGORIES_DIR: &str = "2_CATEGORIES";

impl Mask {
    /// Canonical file basename for this mask.
    ///
    /// Field order is fixed: entity, areas in declaration order, status,
    /// access, format, then the reference list behind a single `+` and the
    /// anchor behind `@`. The `+` and `@` are themselves the separators;
    /// no dot precedes them.
    pub fn file_name(&self) -> String {
        let mut parts = vec![self.entity.clone()];
        parts.extend(self.areas.iter().cloned());

        if let Some(status) = self.status {
            parts.push(status.code().to_string());
        }
        if let Some(access) = self.access {
            parts.push(access.code().to_string());
        }
        if let Some(format) = self.format {
            parts.push(format.code().to_string());
        }

        let mut name = parts.join(".");
        if !self.references.is_empty() {
            name.push('+');
            name.push_str(&self.references.join(","));
        }
        name.push('@');
        name.push_str(&self.anchor);
        name
    }

    /// Storage directory for this mask, rooted at `root`.
    ///
    /// An anchor that is neither a project nor a category falls through to
    /// the inbox; that is the accepted default for unroutable notes, not an
    /// error. Callers that care should validate first.
    pub fn file_path(&self, root: &str) -> String {
        match self.anchor_type() {
            AnchorType::Project => {
                format!("{}/{}/{}/notes/", root, PROJECTS_DIR, self.anchor)
            }
            AnchorType::Category => {
                format!("{}/{}/{}/notes/", root, CATEGORIES_DIR, self.anchor)
            }
            AnchorType::Unknown => format!("{}/{}/", root, INBOX_DIR),
        }
    }
}
