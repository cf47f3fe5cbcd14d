use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// @module: File and directory utilities

/// Name of the scoped temporary-output directory
pub const MP_DIR_NAME: &str = ".mp";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @creates: Parent directory of a file path if needed
    pub fn ensure_parent<P: AsRef<Path>>(path: P) -> Result<()> {
        match path.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Self::ensure_dir(parent),
            _ => Ok(()),
        }
    }

    // @returns: `<root>/.mp`, created if missing
    pub fn mp_dir<P: AsRef<Path>>(root: P) -> Result<PathBuf> {
        let dir = root.as_ref().join(MP_DIR_NAME);
        Self::ensure_dir(&dir)?;
        Ok(dir)
    }

    // @generates: Random file name inside `dir` with the given extension
    pub fn unique_path<P: AsRef<Path>>(dir: P, extension: &str) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        dir.as_ref().join(format!("{}.{}", Uuid::new_v4(), extension))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, UTF-8
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::ensure_parent(&path)?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
