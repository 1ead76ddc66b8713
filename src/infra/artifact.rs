// ============================================================
// Layer 6 — Versioned Artifact I/O
// ============================================================
// Low-level helpers shared by every saved model:
//
//   write_atomic  → write to "<name>.tmp" beside the target,
//                   fsync, then rename over the target. A crash
//                   or error never leaves a half-written model
//                   under the real name.
//
//   read_checked  → read the file and check its "format" and
//                   "version" header fields before anyone tries
//                   to decode the body.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::error::{CoreError, Result};

/// Header fields every artifact carries at its top level.
#[derive(Debug, Deserialize)]
struct ArtifactHeader {
    #[serde(default)]
    format: Option<String>,

    #[serde(default)]
    version: Option<u32>,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Publish `bytes` at `path` all-or-nothing.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path(path);

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = written {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&tmp);
        return Err(CoreError::Io(e));
    }
    Ok(())
}

/// Read an artifact and verify it is `format` at exactly `version`.
pub fn read_checked(path: &Path, format: &str, version: u32) -> Result<Vec<u8>> {
    let bytes = fs::read(path)?;
    let header: ArtifactHeader = serde_json::from_slice(&bytes)?;

    match (header.format.as_deref(), header.version) {
        (Some(f), Some(v)) if f == format && v == version => Ok(bytes),
        (f, v) => Err(CoreError::UnsupportedFormat {
            format:  f.unwrap_or("<missing>").to_string(),
            version: v.unwrap_or(0),
        }),
    }
}
