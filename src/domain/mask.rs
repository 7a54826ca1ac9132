//! Mask parsing and validation
//!
//! A mask is the compact textual classification of a note:
//!
//! ```text
//! NOTE-PRJ.ENG.DEV.AC.INT+LAW-ISO17025@PROJ-HYDROPILOT
//! └──┬───┘ └─┬───┘ └┬┘ └┬┘ └────┬────┘ └──────┬──────┘
//!  entity   areas status access references   anchor
//! ```
//!
//! A single anchored expression captures the entity, up to six dot-separated
//! components, an optional `+`-prefixed reference list and the `@`-prefixed
//! anchor. Components are positional in the string but classified by
//! vocabulary membership afterwards, so their order carries no meaning
//! beyond area ordering. Tokens that match no vocabulary are dropped.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::vocab::{Access, Component, Format, Status};

/// Longest file name the router may produce.
pub const MAX_FILE_NAME_LEN: usize = 140;

/// Most areas a mask may carry.
pub const MAX_AREAS: usize = 5;

static MASK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([A-Z]+(?:-[A-Z]+)*)",
        r"(?:\.([A-Z]{2,4}))?",
        r"(?:\.([A-Z]{2,4}))?",
        r"(?:\.([A-Z]{2,4}))?",
        r"(?:\.([A-Z]{2,4}))?",
        r"(?:\.([A-Z]{2,4}))?",
        r"(?:\.([A-Z]{2,4}))?",
        r"(?:\+([A-Z0-9-]+(?:,[A-Z0-9-]+)*))?",
        r"@([A-Z]+(?:-[A-Z]+)*)$",
    ))
    .expect("mask grammar compiles")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("Not a valid mask: '{0}'")]
    Invalid(String),
}

/// A parsed mask.
///
/// Produced fresh by [`Mask::parse`], read by the router, then discarded;
/// nothing mutates one after construction. Serializes as its canonical
/// string form so it can sit directly in frontmatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mask {
    /// Document type, e.g. `NOTE` or `DEC-LOG`.
    pub entity: String,

    /// Knowledge areas in declaration order.
    pub areas: Vec<String>,

    /// Lifecycle status, if declared.
    pub status: Option<Status>,

    /// Access level, if declared.
    pub access: Option<Access>,

    /// Payload format, if declared.
    pub format: Option<Format>,

    /// Reference identifiers in declaration order.
    pub references: Vec<String>,

    /// Routing anchor deciding where the note lives.
    pub anchor: String,
}

impl Mask {
    /// Creates a minimal mask with just an entity and an anchor.
    pub fn new(entity: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            areas: Vec::new(),
            status: None,
            access: None,
            format: None,
            references: Vec::new(),
            anchor: anchor.into(),
        }
    }

    /// Parses a mask string.
    ///
    /// Returns `None` when the input does not match the grammar; never
    /// panics. Captured components outside every vocabulary are dropped.
    pub fn parse(raw: &str) -> Option<Mask> {
        let caps = MASK_RE.captures(raw)?;

        let entity = caps.get(1)?.as_str().to_string();
        let anchor = caps.get(9)?.as_str().to_string();

        let mut areas = Vec::new();
        let mut status = None;
        let mut access = None;
        let mut format = None;

        for group in 2..=7 {
            let Some(token) = caps.get(group) else {
                continue;
            };
            match Component::classify(token.as_str()) {
                Component::Area(code) => areas.push(code),
                Component::Status(s) => status = Some(s),
                Component::Access(a) => access = Some(a),
                Component::Format(f) => format = Some(f),
                Component::Unrecognized => {}
            }
        }

        let references = caps
            .get(8)
            .map(|m| m.as_str().split(',').map(str::to_string).collect())
            .unwrap_or_default();

        Some(Mask {
            entity,
            areas,
            status,
            access,
            format,
            references,
            anchor,
        })
    }

    /// Checks the mask against every placement rule.
    ///
    /// All rules run; `errors` lists every violation so a caller can show
    /// the complete defect list in one pass.
    pub fn validate(&self) -> Validation {
        let mut errors = Vec::new();

        if self.areas.len() > MAX_AREAS {
            errors.push("A mask may contain at most 5 areas".to_string());
        }

        let mut seen = HashSet::new();
        if !self.areas.iter().all(|area| seen.insert(area)) {
            errors.push("Areas in a mask must be unique".to_string());
        }

        if self.anchor.is_empty() {
            errors.push("A mask must contain an anchor (project or category)".to_string());
        }

        if self.file_name().len() > MAX_FILE_NAME_LEN {
            errors.push("The generated file name must not exceed 140 characters".to_string());
        }

        Validation {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

impl FromStr for Mask {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mask::parse(s).ok_or_else(|| MaskError::Invalid(s.to_string()))
    }
}

impl TryFrom<String> for Mask {
    type Error = MaskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mask> for String {
    fn from(mask: Mask) -> Self {
        mask.file_name()
    }
}

/// Outcome of [`Mask::validate`]: every violated rule, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_mask() {
        let mask = Mask::parse("NOTE-PRJ.ENG.DEV.AC.INT+LAW-ISO17025@PROJ-HYDROPILOT").unwrap();

        assert_eq!(mask.entity, "NOTE-PRJ");
        assert_eq!(mask.areas, vec!["ENG", "DEV"]);
        assert_eq!(mask.status, Some(Status::Active));
        assert_eq!(mask.access, Some(Access::Internal));
        assert_eq!(mask.format, None);
        assert_eq!(mask.references, vec!["LAW-ISO17025"]);
        assert_eq!(mask.anchor, "PROJ-HYDROPILOT");
    }

    #[test]
    fn parses_minimal_mask() {
        let mask = Mask::parse("NOTE@PROJ-HYDROPILOT").unwrap();

        assert_eq!(mask.entity, "NOTE");
        assert!(mask.areas.is_empty());
        assert_eq!(mask.status, None);
        assert_eq!(mask.access, None);
        assert_eq!(mask.format, None);
        assert!(mask.references.is_empty());
        assert_eq!(mask.anchor, "PROJ-HYDROPILOT");
    }

    #[test]
    fn parses_areas_only() {
        let mask = Mask::parse("NOTE.ENG.DEV@PROJ-HYDROPILOT").unwrap();
        assert_eq!(mask.areas, vec!["ENG", "DEV"]);
        assert_eq!(mask.status, None);
    }

    #[test]
    fn parses_format_component() {
        let mask = Mask::parse("NOTE.ENG.DEV.MD@PROJ-HYDROPILOT").unwrap();
        assert_eq!(mask.format, Some(Format::Markdown));
    }

    #[test]
    fn parses_multiple_references() {
        let mask = Mask::parse("NOTE.ENG.DEV+LAW-ISO17025,STD-EN123@PROJ-HYDROPILOT").unwrap();
        assert_eq!(mask.references, vec!["LAW-ISO17025", "STD-EN123"]);
    }

    #[test]
    fn returns_none_on_garbage() {
        assert_eq!(Mask::parse("not a mask at all"), None);
        assert_eq!(Mask::parse(""), None);
        assert_eq!(Mask::parse("INVALID-MASK"), None);
        assert_eq!(Mask::parse("lower@case"), None);
        assert_eq!(Mask::parse("NOTE@"), None);
        assert_eq!(Mask::parse("@PROJ-X"), None);
    }

    #[test]
    fn drops_unrecognized_components() {
        // QQ matches the component shape but no vocabulary.
        let mask = Mask::parse("NOTE.QQ.ENG@PROJ-X").unwrap();
        assert_eq!(mask.areas, vec!["ENG"]);
        assert_eq!(mask.status, None);
    }

    #[test]
    fn component_order_does_not_matter() {
        let a = Mask::parse("NOTE.ENG.AC@PROJ-X").unwrap();
        let b = Mask::parse("NOTE.AC.ENG@PROJ-X").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn validate_accepts_complete_mask() {
        let mask = Mask::parse("NOTE.ENG.DEV.AC.INT@PROJ-HYDROPILOT").unwrap();
        let validation = mask.validate();

        assert!(validation.valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn validate_rejects_six_areas() {
        let mut mask = Mask::new("NOTE", "PROJ-HYDROPILOT");
        mask.areas = ["ENG", "DEV", "MED", "ACC", "KB", "LLM"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let validation = mask.validate();
        assert!(!validation.valid);
        assert!(validation
            .errors
            .contains(&"A mask may contain at most 5 areas".to_string()));
    }

    #[test]
    fn validate_accepts_five_areas() {
        let mut mask = Mask::new("NOTE", "PROJ-HYDROPILOT");
        mask.areas = ["ENG", "DEV", "MED", "ACC", "KB"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert!(mask.validate().valid);
    }

    #[test]
    fn validate_rejects_duplicate_areas() {
        let mut mask = Mask::new("NOTE", "PROJ-HYDROPILOT");
        mask.areas = vec!["ENG".to_string(), "DEV".to_string(), "ENG".to_string()];

        let validation = mask.validate();
        assert!(!validation.valid);
        assert!(validation
            .errors
            .contains(&"Areas in a mask must be unique".to_string()));
    }

    #[test]
    fn validate_rejects_empty_anchor() {
        let mask = Mask::new("NOTE", "");

        let validation = mask.validate();
        assert!(!validation.valid);
        assert!(validation
            .errors
            .contains(&"A mask must contain an anchor (project or category)".to_string()));
    }

    #[test]
    fn validate_enforces_file_name_ceiling() {
        // entity(100) + '@' + anchor(39) = 140 exactly.
        let at_limit = Mask::new("A".repeat(100), format!("PROJ-{}", "X".repeat(34)));
        assert_eq!(at_limit.file_name().len(), 140);
        assert!(at_limit.validate().valid);

        let over_limit = Mask::new("A".repeat(101), format!("PROJ-{}", "X".repeat(34)));
        assert_eq!(over_limit.file_name().len(), 141);
        let validation = over_limit.validate();
        assert!(!validation.valid);
        assert!(validation
            .errors
            .contains(&"The generated file name must not exceed 140 characters".to_string()));
    }

    #[test]
    fn validate_reports_every_violation_at_once() {
        let mut mask = Mask::new("NOTE", "");
        mask.areas = ["ENG", "ENG", "DEV", "MED", "ACC", "KB"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let validation = mask.validate();
        assert_eq!(validation.errors.len(), 3);
    }

    #[test]
    fn validate_is_idempotent() {
        let mut mask = Mask::new("NOTE", "");
        mask.areas = vec!["ENG".to_string(), "ENG".to_string()];

        assert_eq!(mask.validate(), mask.validate());
    }

    #[test]
    fn from_str_reports_invalid_input() {
        let err = "garbage".parse::<Mask>().unwrap_err();
        assert_eq!(err, MaskError::Invalid("garbage".to_string()));
    }

    #[test]
    fn serde_round_trips_as_string() {
        let mask = Mask::parse("NOTE.ENG.AC@PROJ-X").unwrap();
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(json, "\"NOTE.ENG.AC@PROJ-X\"");

        let parsed: Mask = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mask);
    }
}
