use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid project directory: {0}")]
    InvalidProjectDir(String),
    #[error("File {path} is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Build output and dependency checkouts never hold project sources.
const SKIPPED_DIRS: &[&str] = &["_build", "deps", "node_modules"];

/// Read a source file, refusing anything larger than `max_bytes`
pub fn read_source(
    relative_path: &RelativePath,
    project_root: &Path,
    max_bytes: u64,
) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(project_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }

    let size = fs::metadata(&absolute_path)?.len();
    if size > max_bytes {
        return Err(IoError::TooLarge {
            path: absolute_path,
            size,
            limit: max_bytes,
        });
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Scan for source files with any of `extensions`, relative to `project_root`
pub fn scan_source_files(
    project_root: &Path,
    extensions: &[String],
) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_project_dir(project_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(project_root, extensions, &mut files)?;

    let mut relative: Vec<RelativePathBuf> = files
        .iter()
        .filter_map(|path| {
            let stripped = path.strip_prefix(project_root).ok()?;
            RelativePathBuf::from_path(stripped).ok()
        })
        .collect();
    relative.sort();
    log::debug!(
        "found {} source files under {}",
        relative.len(),
        project_root.display()
    );
    Ok(relative)
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

fn scan_directory_recursive(
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            if !is_skipped_dir(&path) {
                scan_directory_recursive(&path, extensions, files)?;
            }
        } else if let Some(ext) = path.extension().and_then(|ext| ext.to_str())
            && extensions.iter().any(|wanted| wanted == ext)
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_project_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidProjectDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
