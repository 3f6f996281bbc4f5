#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn patch_source_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_patch-source"))
}

pub fn list_tables_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_list-tables"))
}

// Runs the command, failing with captured stdout/stderr when it exits non-zero.
pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
    if !output.status.success() {
        bail!(
            "command {:?} failed with {:?}\nstdout:\n{}\nstderr:\n{}",
            cmd.get_program(),
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

// Creates a SQLite file at `dir/name` and runs `ddl` against it.
pub fn create_store(dir: &Path, name: &str, ddl: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let conn = Connection::open(&path).with_context(|| format!("creating {}", path.display()))?;
    // Setting user_version forces SQLite to write a header even without DDL.
    conn.execute_batch("PRAGMA user_version = 1;")
        .with_context(|| format!("initialising {}", path.display()))?;
    if !ddl.is_empty() {
        conn.execute_batch(ddl)
            .with_context(|| format!("seeding {}", path.display()))?;
    }
    drop(conn);
    Ok(path)
}

// Root (or CAP_DAC_OVERRIDE) ignores file modes; permission tests skip themselves then.
#[cfg(unix)]
pub fn permissions_are_enforced(dir: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let marker = dir.join(".mode-check");
    fs::write(&marker, "")?;
    fs::set_permissions(&marker, fs::Permissions::from_mode(0o444))?;
    let writable = fs::OpenOptions::new().write(true).open(&marker).is_ok();
    fs::set_permissions(&marker, fs::Permissions::from_mode(0o644))?;
    fs::remove_file(&marker)?;
    Ok(!writable)
}

pub const ROUTE_FIXTURE: &str = r#"from flask import Blueprint

metadata_api_bp = Blueprint('metadata_api', __name__)

@metadata_api_bp.route('/providers/<n>', methods=['GET'])
def get_provider(name):
    return {}
"#;
