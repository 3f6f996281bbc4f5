//! Maintenance helpers behind the `patch-source` and `list-tables` binaries.
//!
//! [`patcher`] rewrites a text file with a literal substitution rule and
//! [`introspect`] lists schema objects in a SQLite store. Both are one-shot,
//! blocking operations that acquire and release their own resources.

pub mod config;
pub mod error;
pub mod introspect;
pub mod logging;
pub mod patcher;

pub use config::{IntrospectConfig, PatchConfig};
pub use error::{MaintError, Result};
pub use introspect::{
    ObjectKind, SchemaCatalog, catalog_names, list_objects, list_tables, with_connection,
};
pub use patcher::{
    FsTextStore, MemoryTextStore, PatchMode, PatchResult, SubstitutionRule, TextStore, apply_rule,
    count_occurrences, patch, patch_with,
};

use std::env;

/// Read an environment variable, treating unset and empty the same.
pub fn env_non_empty(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
