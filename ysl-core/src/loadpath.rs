//! Search-path resolution for library documents.
//!
//! The only environment-facing contract in this subsystem: `YSLPATH`
//! names the search root; when unset, the input document's directory
//! is the default. A synthetic in-memory source has no directory, so
//! with the variable also unset there is nothing to fall back to and
//! resolution fails.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::CoreError;

pub const LOAD_PATH_ENV: &str = "YSLPATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDocument {
    pub path: PathBuf,
    pub contents: String,
}

/// Resolve the search path: `YSLPATH` wins, then the directory of the
/// input document when one exists on disk.
pub fn resolve_load_path(input: Option<&Path>) -> Result<PathBuf, CoreError> {
    let configured = env::var(LOAD_PATH_ENV).ok();
    resolve_with(configured.as_deref(), input)
}

/// Resolution against a given variable value, split out so the
/// fallback chain is testable without touching the process
/// environment.
fn resolve_with(configured: Option<&str>, input: Option<&Path>) -> Result<PathBuf, CoreError> {
    match configured {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => match input {
            Some(document) => Ok(document
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))),
            None => Err(CoreError::MissingLoadPath),
        },
    }
}

/// Enumerate `.ysl` library documents under the search root, relative
/// paths, sorted for determinism.
pub fn list_documents(root: impl AsRef<Path>) -> Result<Vec<LibraryDocument>, std::io::Error> {
    let root = root.as_ref();
    let mut documents = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "ysl") {
            let contents = fs::read_to_string(path)?;
            let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            documents.push(LibraryDocument {
                path: relative,
                contents,
            });
        }
    }
    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}
