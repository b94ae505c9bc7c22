// ABOUTME: Path checks shared by the problem loader, the CLI and the PPTX writer
// ABOUTME: Distinguishes missing paths from paths of the wrong kind and prepares output locations

use crate::errors::{Result, SlideError};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathKind {
    File,
    Directory,
}

impl PathKind {
    fn matches(self, path: &Path) -> bool {
        match self {
            PathKind::File => path.is_file(),
            PathKind::Directory => path.is_dir(),
        }
    }

    fn noun(self) -> &'static str {
        match self {
            PathKind::File => "file",
            PathKind::Directory => "directory",
        }
    }
}

fn require(path: &Path, kind: PathKind) -> Result<()> {
    if !path.exists() {
        return Err(SlideError::PathNotFoundError(path.to_path_buf()));
    }
    if !kind.matches(path) {
        return Err(SlideError::ValidationError(format!(
            "{} is not a {}",
            path.display(),
            kind.noun()
        )));
    }
    Ok(())
}

/// The problem file must exist and be a regular file.
pub fn require_file(path: &Path) -> Result<()> {
    require(path, PathKind::File)
}

/// A picture base directory must exist and be a directory.
pub fn require_directory(path: &Path) -> Result<()> {
    require(path, PathKind::Directory)
}

/// Make `output` writable as a file: create missing parent directories and refuse a path
/// that already names a directory. A bare file name needs nothing.
pub fn prepare_output_path(output: &Path) -> Result<()> {
    if output.is_dir() {
        return Err(SlideError::ValidationError(format!(
            "output {} is a directory",
            output.display()
        )));
    }

    let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return require(parent, PathKind::Directory);
    }
    fs::create_dir_all(parent).map_err(SlideError::FileReadError)
}
