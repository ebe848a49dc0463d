//! File output — writing a verified transfer to the storage directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use courier_core::ReassemblyBuffer;

/// Write each segment's bytes in index order to `dir/filename`.
/// The filename was validated at parse time to be a bare path component.
pub fn write_segments(dir: &Path, filename: &str, buffer: &ReassemblyBuffer) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create storage directory {}", dir.display()))?;

    let path = dir.join(filename);
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for payload in buffer.segments() {
        file.write_all(payload)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(path)
}
