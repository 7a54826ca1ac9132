//! Vault store
//!
//! A vault is a PARA-style directory tree. The store plans placements from
//! masks, creates routed notes, and ingests loose files by moving them into
//! their planned directory. Moves go through a temp file in the destination
//! directory followed by a rename, so readers never observe a partial file.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Mask, CATEGORIES_DIR, INBOX_DIR, PROJECTS_DIR};

use super::frontmatter::{self, NoteFrontmatter};

/// Admin folder holding the dedup index, config and logs.
const ADMIN_DIR: &str = "9_ADMIN";

const ONGOING_DIR: &str = "_ONGOING";
const RESOURCES_DIR: &str = "3_RESOURCES";

/// Top-level folders `init` creates.
const SKELETON: &[&str] = &[
    INBOX_DIR,
    ONGOING_DIR,
    PROJECTS_DIR,
    CATEGORIES_DIR,
    RESOURCES_DIR,
    ADMIN_DIR,
];

/// Extensions whose frontmatter is consulted before the file name.
const NOTE_EXTENSIONS: &[&str] = &["md", "txt", "rst"];

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Not a vault: {0} (run 'maskvault init' first)")]
    NotAVault(PathBuf),

    #[error("Note already exists: {0}")]
    NoteExists(PathBuf),

    #[error("Invalid mask '{0}': {1}")]
    InvalidMask(String, String),
}

/// A planned note placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Canonical basename, extension excluded.
    pub file_name: String,

    /// Target directory.
    pub dir: PathBuf,
}

impl Placement {
    /// Full path of the markdown note this placement describes.
    pub fn note_path(&self) -> PathBuf {
        self.dir.join(format!("{}.md", self.file_name))
    }
}

/// Knobs for [`Vault::ingest`] and [`Vault::sweep_inbox`].
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Report moves without performing them.
    pub dry_run: bool,

    /// Drop files whose content hash is already indexed.
    pub dedup: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            dedup: true,
        }
    }
}

/// What happened to a single ingested file.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Routed (or would be routed, under dry-run) to the given path.
    Moved(PathBuf),

    /// Content already lives at the given path; the file was dropped.
    Duplicate(PathBuf),

    /// No routable mask, invalid mask, or destination occupied.
    Skipped,
}

/// Result of one inbox sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub moved: Vec<MovedFile>,
    pub duplicates: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Vault statistics for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct VaultStats {
    pub projects: usize,
    pub categories: usize,
    pub notes: usize,
    pub inbox_pending: usize,
}

/// An opened vault.
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Opens an existing vault.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let root = root.into();
        if !root.join(INBOX_DIR).is_dir() || !root.join(ADMIN_DIR).is_dir() {
            return Err(VaultError::NotAVault(root));
        }
        Ok(Self { root })
    }

    /// Creates the vault skeleton at `root` and opens it. Idempotent.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for folder in SKELETON {
            let path = root.join(folder);
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create folder: {}", path.display()))?;
        }
        let logs = root.join(ADMIN_DIR).join("logs");
        fs::create_dir_all(&logs)
            .with_context(|| format!("Failed to create folder: {}", logs.display()))?;

        Ok(Self { root })
    }

    /// Walks up from the current directory looking for a vault skeleton.
    pub fn find_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            if current.join(INBOX_DIR).is_dir() && current.join(ADMIN_DIR).is_dir() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the inbox directory.
    pub fn inbox(&self) -> PathBuf {
        self.root.join(INBOX_DIR)
    }

    /// Returns the watch log file path.
    pub fn log_file(&self) -> PathBuf {
        self.root.join(ADMIN_DIR).join("logs").join("maskvault.log")
    }

    fn hash_index_path(&self) -> PathBuf {
        self.root.join(ADMIN_DIR).join("hash_index.json")
    }

    /// Plans where a mask's note lives.
    pub fn plan(&self, mask: &Mask) -> Placement {
        Placement {
            file_name: mask.file_name(),
            dir: PathBuf::from(mask.file_path(&self.root.to_string_lossy())),
        }
    }

    /// Creates a routed note with generated frontmatter.
    ///
    /// Validates the mask first and refuses to overwrite an existing note.
    pub fn create_note(&self, mask: &Mask, body: &str) -> Result<PathBuf> {
        let validation = mask.validate();
        if !validation.valid {
            return Err(
                VaultError::InvalidMask(mask.file_name(), validation.errors.join("; ")).into(),
            );
        }

        let placement = self.plan(mask);
        let path = placement.note_path();
        if path.exists() {
            return Err(VaultError::NoteExists(path).into());
        }

        fs::create_dir_all(&placement.dir)
            .with_context(|| format!("Failed to create folder: {}", placement.dir.display()))?;

        let block = NoteFrontmatter::for_mask(mask).to_block()?;
        let content = if body.is_empty() {
            block
        } else {
            format!("{}\n{}", block, body)
        };

        fs::write(&path, content)
            .with_context(|| format!("Failed to write note: {}", path.display()))?;
        Ok(path)
    }

    /// Routes one loose file into the vault.
    ///
    /// Notes take their mask from frontmatter, falling back to the
    /// basename; other files are routed by basename alone. Files without a
    /// routable, valid mask stay put.
    pub fn ingest(&self, path: &Path, opts: &IngestOptions) -> Result<IngestOutcome> {
        if !path.is_file() {
            return Ok(IngestOutcome::Skipped);
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(IngestOutcome::Skipped);
        };
        if name.starts_with('.') {
            return Ok(IngestOutcome::Skipped);
        }

        let Some(mask) = self.mask_for(path) else {
            return Ok(IngestOutcome::Skipped);
        };
        if !mask.validate().valid {
            return Ok(IngestOutcome::Skipped);
        }

        let placement = self.plan(&mask);
        let dest = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => placement.dir.join(format!("{}.{}", placement.file_name, ext)),
            None => placement.dir.join(&placement.file_name),
        };

        if dest == path || dest.exists() {
            return Ok(IngestOutcome::Skipped);
        }

        if opts.dedup {
            let mut index = HashIndex::load(self.hash_index_path());
            let hash = HashIndex::hash_file(path)?;
            if let Some(existing) = index.existing_copy(&hash) {
                if !opts.dry_run {
                    let _ = fs::remove_file(path);
                }
                return Ok(IngestOutcome::Duplicate(existing));
            }
            if !opts.dry_run {
                self.move_file(path, &dest)?;
                index.record(hash, &dest);
                index.save()?;
            }
            return Ok(IngestOutcome::Moved(dest));
        }

        if !opts.dry_run {
            self.move_file(path, &dest)?;
        }
        Ok(IngestOutcome::Moved(dest))
    }

    /// Sweeps the inbox once, ingesting every file in name order.
    ///
    /// A failure on one file is recorded and the sweep continues.
    pub fn sweep_inbox(&self, opts: &IngestOptions) -> Result<SweepReport> {
        let inbox = self.inbox();
        let entries = fs::read_dir(&inbox)
            .with_context(|| format!("Failed to read inbox: {}", inbox.display()))?;

        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        let mut report = SweepReport::default();
        for path in paths {
            if !path.is_file() {
                continue;
            }
            match self.ingest(&path, opts) {
                Ok(IngestOutcome::Moved(dest)) => report.moved.push(MovedFile {
                    from: path,
                    to: dest,
                }),
                Ok(IngestOutcome::Duplicate(_)) => report.duplicates.push(path),
                Ok(IngestOutcome::Skipped) => report.skipped.push(path),
                Err(e) => report.errors.push(format!("{}: {:#}", path.display(), e)),
            }
        }
        Ok(report)
    }

    /// Collects vault statistics.
    pub fn stats(&self) -> VaultStats {
        VaultStats {
            projects: count_dirs(&self.root.join(PROJECTS_DIR)),
            categories: count_dirs(&self.root.join(CATEGORIES_DIR)),
            notes: count_notes(&self.root),
            inbox_pending: count_files(&self.inbox()),
        }
    }

    /// Resolves the mask governing a file: frontmatter for notes, basename
    /// otherwise and as the fallback.
    fn mask_for(&self, path: &Path) -> Option<Mask> {
        let is_note = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| NOTE_EXTENSIONS.contains(&ext));

        if is_note {
            if let Ok(content) = fs::read_to_string(path) {
                if let Some(mask) = frontmatter::extract_mask(&content) {
                    return Some(mask);
                }
            }
        }

        Mask::parse(path.file_stem()?.to_str()?)
    }

    fn move_file(&self, src: &Path, dest: &Path) -> Result<()> {
        let dir = dest.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create folder: {}", dir.display()))?;

        let tmp_name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("incoming");
        let tmp = dir.join(format!(".{}.tmp", tmp_name));

        fs::copy(src, &tmp).with_context(|| format!("Failed to copy: {}", src.display()))?;
        fs::rename(&tmp, dest)
            .with_context(|| format!("Failed to move into place: {}", dest.display()))?;
        let _ = fs::remove_file(src);
        Ok(())
    }
}

/// Content-hash index for duplicate detection.
///
/// Maps blake3 hex digests to the routed path that first carried the
/// content, stored as JSON under the admin folder so it survives restarts.
struct HashIndex {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl HashIndex {
    fn load(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write hash index: {}", self.path.display()))
    }

    fn hash_file(path: &Path) -> Result<String> {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let mut hasher = blake3::Hasher::new();
        io::copy(&mut file, &mut hasher)
            .with_context(|| format!("Failed to hash: {}", path.display()))?;
        Ok(hasher.finalize().to_hex().to_string())
    }

    /// Returns the indexed copy for `hash`, if it still exists on disk.
    fn existing_copy(&self, hash: &str) -> Option<PathBuf> {
        let path = PathBuf::from(self.entries.get(hash)?);
        path.exists().then_some(path)
    }

    fn record(&mut self, hash: String, path: &Path) {
        self.entries
            .insert(hash, path.to_string_lossy().into_owned());
    }
}

fn count_dirs(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.flatten().filter(|e| e.path().is_dir()).count())
        .unwrap_or(0)
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.flatten().filter(|e| e.path().is_file()).count())
        .unwrap_or(0)
}

fn count_notes(root: &Path) -> usize {
    let mut count = 0;
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            // Admin data is bookkeeping, not notes.
            if dir == root && name == ADMIN_DIR {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|e| e == "md") {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault() -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        let vault = Vault::init(dir.path()).unwrap();
        (dir, vault)
    }

    #[test]
    fn init_creates_skeleton() {
        let (dir, _vault) = vault();

        for folder in SKELETON {
            assert!(dir.path().join(folder).is_dir(), "missing {}", folder);
        }
        assert!(dir.path().join("9_ADMIN/logs").is_dir());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        Vault::init(dir.path()).unwrap();
        Vault::init(dir.path()).unwrap();
        assert!(Vault::open(dir.path()).is_ok());
    }

    #[test]
    fn open_rejects_non_vault() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Vault::open(dir.path()),
            Err(VaultError::NotAVault(_))
        ));
    }

    #[test]
    fn plan_places_project_note() {
        let (dir, vault) = vault();
        let mask = Mask::parse("NOTE.ENG@PROJ-HYDROPILOT").unwrap();

        let placement = vault.plan(&mask);
        assert_eq!(placement.file_name, "NOTE.ENG@PROJ-HYDROPILOT");
        assert_eq!(
            placement.dir,
            PathBuf::from(format!(
                "{}/1_PROJECTS/PROJ-HYDROPILOT/notes/",
                dir.path().display()
            ))
        );
    }

    #[test]
    fn create_note_writes_frontmatter() {
        let (_dir, vault) = vault();
        let mask = Mask::parse("NOTE.ENG.AC@PROJ-X").unwrap();

        let path = vault.create_note(&mask, "Body text.").unwrap();
        assert!(path.ends_with("1_PROJECTS/PROJ-X/notes/NOTE.ENG.AC@PROJ-X.md"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(frontmatter::extract_mask(&content), Some(mask));
        assert!(content.ends_with("Body text."));
    }

    #[test]
    fn create_note_refuses_overwrite() {
        let (_dir, vault) = vault();
        let mask = Mask::parse("NOTE@PROJ-X").unwrap();

        vault.create_note(&mask, "").unwrap();
        let err = vault.create_note(&mask, "").unwrap_err();
        assert!(err.downcast_ref::<VaultError>().is_some());
    }

    #[test]
    fn create_note_rejects_invalid_mask() {
        let (_dir, vault) = vault();
        let mut mask = Mask::new("NOTE", "PROJ-X");
        mask.areas = vec!["ENG".to_string(), "ENG".to_string()];

        let err = vault.create_note(&mask, "").unwrap_err();
        let vault_err = err.downcast_ref::<VaultError>().unwrap();
        assert!(matches!(vault_err, VaultError::InvalidMask(_, _)));
    }

    #[test]
    fn ingest_routes_mask_named_file() {
        let (_dir, vault) = vault();
        let dropped = vault.inbox().join("NOTE.ENG@PROJ-X.md");
        fs::write(&dropped, "freeform body").unwrap();

        let outcome = vault
            .ingest(&dropped, &IngestOptions::default())
            .unwrap();

        let IngestOutcome::Moved(dest) = outcome else {
            panic!("expected a move, got {:?}", outcome);
        };
        assert!(dest.ends_with("1_PROJECTS/PROJ-X/notes/NOTE.ENG@PROJ-X.md"));
        assert!(!dropped.exists());
        assert!(dest.is_file());
    }

    #[test]
    fn ingest_prefers_frontmatter_over_basename() {
        let (_dir, vault) = vault();
        let dropped = vault.inbox().join("scratch-name.md");
        fs::write(&dropped, "---\nmask: NOTE.DEV@CAT-KB\n---\nbody").unwrap();

        let outcome = vault
            .ingest(&dropped, &IngestOptions::default())
            .unwrap();

        let IngestOutcome::Moved(dest) = outcome else {
            panic!("expected a move, got {:?}", outcome);
        };
        assert!(dest.ends_with("2_CATEGORIES/CAT-KB/notes/NOTE.DEV@CAT-KB.md"));
    }

    #[test]
    fn ingest_leaves_unroutable_files() {
        let (_dir, vault) = vault();
        let dropped = vault.inbox().join("shopping list.md");
        fs::write(&dropped, "eggs, milk").unwrap();

        let outcome = vault
            .ingest(&dropped, &IngestOptions::default())
            .unwrap();

        assert_eq!(outcome, IngestOutcome::Skipped);
        assert!(dropped.exists());
    }

    #[test]
    fn ingest_drops_duplicate_content() {
        let (_dir, vault) = vault();
        let opts = IngestOptions::default();

        let first = vault.inbox().join("NOTE.ENG@PROJ-X.md");
        fs::write(&first, "same body").unwrap();
        vault.ingest(&first, &opts).unwrap();

        let second = vault.inbox().join("NOTE.DEV@PROJ-Y.md");
        fs::write(&second, "same body").unwrap();
        let outcome = vault.ingest(&second, &opts).unwrap();

        assert!(matches!(outcome, IngestOutcome::Duplicate(_)));
        assert!(!second.exists());
    }

    #[test]
    fn dry_run_reports_without_moving() {
        let (_dir, vault) = vault();
        let dropped = vault.inbox().join("NOTE.ENG@PROJ-X.md");
        fs::write(&dropped, "body").unwrap();

        let opts = IngestOptions {
            dry_run: true,
            ..IngestOptions::default()
        };
        let outcome = vault.ingest(&dropped, &opts).unwrap();

        assert!(matches!(outcome, IngestOutcome::Moved(_)));
        assert!(dropped.exists());
    }

    #[test]
    fn sweep_reports_each_outcome() {
        let (_dir, vault) = vault();
        fs::write(vault.inbox().join("NOTE.ENG@PROJ-X.md"), "routed").unwrap();
        fs::write(vault.inbox().join("untagged.md"), "stays").unwrap();

        let report = vault.sweep_inbox(&IngestOptions::default()).unwrap();
        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn stats_counts_tree_entries() {
        let (_dir, vault) = vault();
        vault
            .create_note(&Mask::parse("NOTE@PROJ-ONE").unwrap(), "")
            .unwrap();
        vault
            .create_note(&Mask::parse("NOTE@PROJ-TWO").unwrap(), "")
            .unwrap();
        vault
            .create_note(&Mask::parse("NOTE@CAT-KB").unwrap(), "")
            .unwrap();
        fs::write(vault.inbox().join("pending.md"), "").unwrap();

        let stats = vault.stats();
        assert_eq!(stats.projects, 2);
        assert_eq!(stats.categories, 1);
        assert_eq!(stats.notes, 4);
        assert_eq!(stats.inbox_pending, 1);
    }
}
