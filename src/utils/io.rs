// src/utils/io.rs
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const STORAGE_FILE_NAME: &str = "passwords.json";

/// Default File Store location: `passwords.json` in the per-user data directory.
pub fn default_storage_file() -> PathBuf {
    match directories::ProjectDirs::from("com", "passgen", "passgen") {
        Some(proj_dirs) => proj_dirs.data_dir().join(STORAGE_FILE_NAME),
        None => {
            log::warn!("Could not determine data directory, using ./{}", STORAGE_FILE_NAME);
            PathBuf::from(STORAGE_FILE_NAME)
        }
    }
}

/// Make `path` absolute without requiring it to exist. A leading `~` is the home directory.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(base) = directories::BaseDirs::new() {
            return Ok(base.home_dir().join(rest));
        }
    }
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Write the whole file next to its destination, then rename it into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
