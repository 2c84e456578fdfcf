// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::csv::{Delim, write_row};
use crate::error::{Error, Result};

/// Write headers (if any) and rows to `path`, creating parent directories.
/// Returns the final path written to.
pub fn write_rows(
    path: &Path,
    headers: Option<&[String]>,
    rows: &[Vec<String>],
    delim: Delim,
) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    let sep = delim.sep();
    if let Some(h) = headers {
        write_row(&mut out, h, sep).map_err(|e| Error::io(path, e))?;
    }
    for row in rows {
        write_row(&mut out, row, sep).map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))?;
    Ok(path.to_path_buf())
}

/// `-o` may name a file or a directory (existing, or with a trailing slash).
pub fn resolve_single_out_path(user_o: Option<&Path>, default_filename: &str) -> Result<PathBuf> {
    let Some(p) = user_o else { return Ok(PathBuf::from(default_filename)) };
    if looks_like_dir_hint(p) || p.is_dir() {
        ensure_directory(p)?;
        Ok(p.join(default_filename))
    } else {
        Ok(p.to_path_buf())
    }
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::invalid(format!("path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
