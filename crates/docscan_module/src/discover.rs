//! Source file discovery.

use crate::error::ModuleError;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Whether `path` names a `.js` file.
pub fn has_js_extension(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("js"))
}

fn is_excluded_name(name: &OsStr, exclude: &[String]) -> bool {
    exclude.iter().any(|excluded| name == OsStr::new(excluded))
}

fn has_excluded_component(path: &Path, exclude: &[String]) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => is_excluded_name(name, exclude),
        _ => false,
    })
}

/// Collect the `.js` files named by `paths`.
///
/// Files are taken as given when they end in `.js` and ignored otherwise.
/// Directories are walked recursively, entries sorted by name. Any path with
/// a component listed in `exclude` is skipped, along with everything below
/// it. The result keeps the order of `paths`.
pub fn discover_source_files<P: AsRef<Path>>(
    paths: &[P],
    exclude: &[String],
) -> Result<Vec<PathBuf>, ModuleError> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if has_excluded_component(path, exclude) {
            tracing::debug!(path = %path.display(), "excluded");
            continue;
        }
        let metadata = std::fs::metadata(path).map_err(|source| ModuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            let walker = WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| {
                    entry.depth() == 0 || !is_excluded_name(entry.file_name(), exclude)
                });
            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_file() && has_js_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if has_js_extension(path) {
            files.push(path.to_path_buf());
        } else {
            tracing::debug!(path = %path.display(), "not a .js file, ignored");
        }
    }
    tracing::debug!(count = files.len(), "discovered source files");
    Ok(files)
}
