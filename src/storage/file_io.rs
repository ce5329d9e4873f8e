//! JSON files that are replaced whole
//!
//! A reader never observes a half-written ledger: data goes to a staging
//! file beside the target, is synced, and is renamed over it.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{LedgerError, LedgerResult};

fn io_error(action: &str, path: &Path, err: io::Error) -> LedgerError {
    LedgerError::Io(format!("cannot {} {}: {}", action, path.display(), err))
}

/// Read a JSON document, or `None` when the file is absent
pub fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> LedgerResult<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("open", path, e)),
    };

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| LedgerError::Json(format!("{} is not valid: {}", path.display(), e)))
}

/// Read a JSON document, falling back to `T::default()` for a missing file
pub fn read_json<T, P>(path: P) -> LedgerResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    Ok(read_json_if_exists(path.as_ref())?.unwrap_or_default())
}

/// Staging file in the target's directory, unique per process
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

fn write_staged<T: Serialize>(staging: &Path, data: &T) -> LedgerResult<()> {
    let file = File::create(staging).map_err(|e| io_error("create", staging, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| io_error("write", staging, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| io_error("sync", staging, e))
}

/// Replace `path` with the pretty-printed JSON of `data`
///
/// Missing parent directories are created. On failure the previous file
/// is left as it was and the staging file is removed.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> LedgerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| io_error("create directory", dir, e))?;
    }

    let staging = staging_path(path);
    let result = write_staged(&staging, data).and_then(|_| {
        fs::rename(&staging, path).map_err(|e| io_error("replace", path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}
