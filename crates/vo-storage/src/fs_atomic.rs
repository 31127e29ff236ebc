//! Atomic file writes: write to a sibling temp file, then rename into
//! place, so a crash or concurrent reader never observes a half-written
//! project document.

use std::path::Path;

use tokio::fs;

use crate::error::StorageResult;

/// Write `contents` to `path` atomically. The temp file is created in the
/// same directory as `path` so the final rename is same-filesystem (and
/// therefore atomic on POSIX); if the rename still crosses devices (EXDEV,
/// e.g. a bind-mounted project directory) we fall back to copy-then-remove.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> StorageResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).await?;

    let tmp_name = format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("project"),
        std::process::id()
    );
    let tmp_path = dir.join(tmp_name);

    fs::write(&tmp_path, contents).await?;

    match fs::rename(&tmp_path, path).await {
        Ok(()) => Ok(()),
        Err(err) if err.raw_os_error() == Some(18) => {
            // EXDEV: temp file and destination live on different filesystems.
            fs::copy(&tmp_path, path).await?;
            fs::remove_file(&tmp_path).await?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp_path).await;
            Err(err.into())
        }
    }
}
