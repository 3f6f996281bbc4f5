//! Per-operation configuration with hardcoded defaults and env overlays.
//!
//! Binaries start from `from_env()` and then apply their own flags, so the
//! precedence is flags > env > defaults.

use crate::env_non_empty;
use crate::error::Result;
use crate::introspect::ObjectKind;
use crate::patcher::SubstitutionRule;
use std::path::PathBuf;

pub const DEFAULT_PATCH_PATH: &str = "routes/metadata_api.py";
pub const DEFAULT_PATCH_PATTERN: &str = "<n>";
pub const DEFAULT_PATCH_REPLACEMENT: &str = "<name>";
pub const DEFAULT_STORE_PATH: &str = "instance/app.db";

pub const PATCH_PATH_ENV: &str = "MAINT_PATCH_PATH";
pub const PATCH_PATTERN_ENV: &str = "MAINT_PATCH_PATTERN";
pub const PATCH_REPLACEMENT_ENV: &str = "MAINT_PATCH_REPLACEMENT";
pub const STORE_PATH_ENV: &str = "MAINT_STORE_PATH";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchConfig {
    pub source_path: PathBuf,
    pub rule: SubstitutionRule,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_PATCH_PATH),
            rule: default_rule(),
        }
    }
}

impl PatchConfig {
    /// Overlay `MAINT_PATCH_*` variables on the defaults.
    ///
    /// An empty variable counts as unset, so `MAINT_PATCH_REPLACEMENT=` keeps
    /// the default replacement; an empty replacement needs an explicit flag.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_non_empty)
    }

    /// Build from an arbitrary variable lookup; unset names fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_path = lookup(PATCH_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATCH_PATH));
        let pattern = lookup(PATCH_PATTERN_ENV).unwrap_or_else(|| DEFAULT_PATCH_PATTERN.into());
        let replacement =
            lookup(PATCH_REPLACEMENT_ENV).unwrap_or_else(|| DEFAULT_PATCH_REPLACEMENT.into());
        Ok(Self {
            source_path,
            rule: SubstitutionRule::new(pattern, replacement)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntrospectConfig {
    pub store_location: PathBuf,
    pub kind: ObjectKind,
}

impl Default for IntrospectConfig {
    fn default() -> Self {
        Self {
            store_location: PathBuf::from(DEFAULT_STORE_PATH),
            kind: ObjectKind::Table,
        }
    }
}

impl IntrospectConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_non_empty)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(STORE_PATH_ENV) {
            config.store_location = PathBuf::from(path);
        }
        config
    }
}

fn default_rule() -> SubstitutionRule {
    SubstitutionRule::from_literals(DEFAULT_PATCH_PATTERN, DEFAULT_PATCH_REPLACEMENT)
}
