//! maskvault - A local-first mask-driven note router
//!
//! Notes are classified by a compact mask string encoding an entity type,
//! knowledge areas, lifecycle status, access level, format, references and
//! a routing anchor, e.g. `NOTE-PRJ.ENG.DEV.AC.INT+LAW-ISO17025@PROJ-HYDROPILOT`.
//! The mask doubles as the note's file basename and its frontmatter `mask:`
//! field, and the router maps it deterministically onto a PARA-style vault
//! tree. The grammar and router are pure functions; the storage and CLI
//! layers move real files.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Access, AnchorType, Format, Mask, Status, Validation};
