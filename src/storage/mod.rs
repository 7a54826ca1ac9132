//! # Storage Layer
//!
//! Everything that touches the filesystem: the vault tree, note files and
//! configuration.
//!
//! ## Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Notes | Markdown + YAML frontmatter | routed per mask |
//! | Dedup index | JSON (blake3 hash → path) | `9_ADMIN/hash_index.json` |
//! | Config | TOML | `--config`, `{vault}/9_ADMIN/maskvault.toml`, user dir |
//! | Watch log | timestamped lines, rotated | `9_ADMIN/logs/maskvault.log` |
//!
//! ## Vault tree
//!
//! ```text
//! vault/
//! ├── 0_INBOX/          # unrouted drops, watched
//! ├── _ONGOING/
//! ├── 1_PROJECTS/{anchor}/notes/
//! ├── 2_CATEGORIES/{anchor}/notes/
//! ├── 3_RESOURCES/
//! └── 9_ADMIN/          # index, config, logs
//! ```
//!
//! All file moves are atomic (copy to temp + rename); a crash never leaves
//! a half-written note in a routed directory.

mod config;
mod frontmatter;
mod vault;

pub use config::{Config, ConfigError, VaultSection, WatchSection};
pub use frontmatter::{extract_mask, with_frontmatter, NoteFrontmatter};
pub use vault::{
    IngestOptions, IngestOutcome, MovedFile, Placement, SweepReport, Vault, VaultError, VaultStats,
};
