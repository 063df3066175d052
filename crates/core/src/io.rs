//! Output file handling.

use std::{
    fs::{create_dir_all, write},
    path::{Component, Path, PathBuf},
};

use crate::{
    config::STYLESHEET_EXTENSION,
    error::{Error, Result},
};

/// A file produced by a run.
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `data`, replacing any previous content.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data).map_err(|source| Error::Filesystem { path: self.path.clone(), source })
    }

    /// Create parent directory if it doesn't exist.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_dir(parent)?;
        }
        Ok(())
    }
}

/// Create `dir` and its parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    create_dir_all(dir).map_err(|source| Error::Filesystem { path: dir.to_path_buf(), source })
}

/// Where the rewritten stylesheet goes: `path`, with `.css` added when it has
/// no extension.
pub fn stylesheet_destination(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(STYLESHEET_EXTENSION)
    }
}

/// Reference written into the stylesheet for `filename` stored in `out_dir`.
///
/// The directory is rendered with `/` separators and without `.` components,
/// then `prefix` is put in front as-is.
pub fn local_reference(prefix: &str, out_dir: &Path, filename: &str) -> String {
    let mut reference = prefix.to_string();
    for component in out_dir.components() {
        match component {
            Component::CurDir => {}
            Component::RootDir => {
                if !reference.ends_with('/') {
                    reference.push('/');
                }
            }
            other => {
                reference.push_str(&other.as_os_str().to_string_lossy());
                reference.push('/');
            }
        }
    }
    reference.push_str(filename);
    reference
}

/// `filename` with its extension replaced by `extension`.
pub fn sibling_name(filename: &str, extension: &str) -> String {
    Path::new(filename).with_extension(extension).to_string_lossy().into_owned()
}
