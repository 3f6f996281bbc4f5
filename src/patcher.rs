//! Literal, idempotent in-place patching of text files.
//!
//! A [`SubstitutionRule`] is applied to the whole content of a file with plain
//! substring matching (no regex, no anchoring). Writes go through a
//! [`TextStore`], which lets tests swap the filesystem for memory. The
//! filesystem store never leaves a half-written target behind: content lands
//! in a sibling temp file that is renamed over the original. Symlinks are
//! resolved first, and a target without write permission is refused even
//! when its directory would allow the rename.

use crate::error::{MaintError, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// A literal `(pattern, replacement)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubstitutionRule {
    pattern: String,
    replacement: String,
}

impl SubstitutionRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(MaintError::InvalidRule(
                "pattern must not be empty".to_string(),
            ));
        }
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }

    /// Construct from compile-time literals already known to be non-empty.
    pub(crate) fn from_literals(pattern: &'static str, replacement: &'static str) -> Self {
        debug_assert!(!pattern.is_empty());
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// True when applying the rule a second time could match again.
    pub fn reintroduces_pattern(&self) -> bool {
        self.replacement.contains(&self.pattern)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatchMode {
    #[default]
    Write,
    DryRun,
}

/// Outcome of a single [`patch`] invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatchResult {
    pub path: PathBuf,
    pub replacements: usize,
    /// Length in bytes of the content after substitution.
    pub content_len: usize,
    /// Whether the target was rewritten on disk.
    pub written: bool,
}

/// Whole-resource read/write access used by the patcher.
pub trait TextStore {
    fn read_text(&self, path: &Path) -> Result<String>;
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;
}

/// Filesystem-backed store with atomic replace-on-write.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsTextStore;

impl TextStore for FsTextStore {
    fn read_text(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "reading text resource");
        fs::read_to_string(path).map_err(|err| MaintError::io(path, err))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        // Renaming over a symlink would replace the link itself; patch what it points at.
        let target = fs::canonicalize(path).map_err(|err| MaintError::io(path, err))?;
        // A rename only needs directory access, so honour the file's own mode explicitly.
        OpenOptions::new()
            .write(true)
            .open(&target)
            .map_err(|err| MaintError::io(&target, err))?;

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|err| MaintError::io(dir, err))?;
        tmp.write_all(content.as_bytes())
            .map_err(|err| MaintError::io(tmp.path(), err))?;
        tmp.as_file()
            .sync_all()
            .map_err(|err| MaintError::io(tmp.path(), err))?;
        // Temp files are created 0600; keep the target's original mode.
        let meta = fs::metadata(&target).map_err(|err| MaintError::io(&target, err))?;
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|err| MaintError::io(&target, err))?;
        tmp.persist(&target)
            .map_err(|err| MaintError::io(&target, err.error))?;
        debug!(path = %target.display(), bytes = content.len(), "replaced text resource");
        Ok(())
    }
}

/// In-memory store keyed by path.
#[derive(Debug, Default)]
pub struct MemoryTextStore {
    files: RefCell<BTreeMap<PathBuf, String>>,
    writes: RefCell<usize>,
}

impl MemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), content.into());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    /// Number of successful `write_text` calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl TextStore for MemoryTextStore {
    fn read_text(&self, path: &Path) -> Result<String> {
        self.get(path).ok_or_else(|| MaintError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

/// Non-overlapping, left-to-right occurrence count.
pub fn count_occurrences(content: &str, pattern: &str) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    content.matches(pattern).count()
}

/// Apply `rule` to `content`, returning the new text and the replacement count.
pub fn apply_rule(content: &str, rule: &SubstitutionRule) -> (String, usize) {
    let count = count_occurrences(content, rule.pattern());
    if count == 0 {
        return (content.to_string(), 0);
    }
    (content.replace(rule.pattern(), rule.replacement()), count)
}

/// Patch the file at `path` on disk.
pub fn patch(path: &Path, rule: &SubstitutionRule) -> Result<PatchResult> {
    patch_with(&FsTextStore, path, rule, PatchMode::Write)
}

pub fn patch_with<S>(
    store: &S,
    path: &Path,
    rule: &SubstitutionRule,
    mode: PatchMode,
) -> Result<PatchResult>
where
    S: TextStore + ?Sized,
{
    let original = store.read_text(path)?;
    let (patched, replacements) = apply_rule(&original, rule);

    let written = match (mode, replacements) {
        (PatchMode::DryRun, _) => false,
        (PatchMode::Write, 0) => {
            debug!(path = %path.display(), pattern = rule.pattern(), "no occurrences; leaving file untouched");
            false
        }
        (PatchMode::Write, _) => {
            store.write_text(path, &patched)?;
            true
        }
    };

    if replacements > 0 && rule.reintroduces_pattern() {
        warn!(
            path = %path.display(),
            pattern = rule.pattern(),
            "replacement contains the pattern; patching again will match again"
        );
    }

    if written {
        info!(path = %path.display(), replacements, "patched text resource");
    }

    Ok(PatchResult {
        path: path.to_path_buf(),
        replacements,
        content_len: patched.len(),
        written,
    })
}
