//! Mask grammar and routing
//!
//! Contains the pure core: parsing, validation, anchor classification and
//! deterministic file naming/placement. No I/O, no shared mutable state;
//! every operation is a function of its arguments and safe to call from
//! any thread.

mod vocab;
mod mask;
mod anchor;
mod router;

pub use vocab::{is_area, Access, Component, Format, Status, AREAS};
pub use mask::{Mask, MaskError, Validation, MAX_AREAS, MAX_FILE_NAME_LEN};
pub use anchor::AnchorType;
pub use router::{CATEGORIES_DIR, INBOX_DIR, PROJECTS_DIR};
