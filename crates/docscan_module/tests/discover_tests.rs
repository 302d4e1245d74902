//! Source discovery against a temporary directory tree.

use docscan_module::{discover_source_files, ModuleError};
use std::fs;
use std::path::{Path, PathBuf};

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "var x;").unwrap();
}

fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|file| {
            file.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "dojo/main.js");
    touch(root, "dojo/string.js");
    touch(root, "dojo/date/locale.js");
    touch(root, "dojo/tests/string.js");
    touch(root, "dojo/README.md");
    touch(root, "dijit/Button.js");
    dir
}

#[test]
fn test_directories_are_walked_in_sorted_order() {
    let dir = tree();
    let files = discover_source_files(&[dir.path()], &[]).unwrap();
    assert_eq!(
        relative(dir.path(), &files),
        vec![
            "dijit/Button.js",
            "dojo/date/locale.js",
            "dojo/main.js",
            "dojo/string.js",
            "dojo/tests/string.js",
        ]
    );
}

#[test]
fn test_excluded_segments_are_skipped() {
    let dir = tree();
    let exclude = vec!["tests".to_string(), "dijit".to_string()];
    let files = discover_source_files(&[dir.path()], &exclude).unwrap();
    assert_eq!(
        relative(dir.path(), &files),
        vec!["dojo/date/locale.js", "dojo/main.js", "dojo/string.js"]
    );
}

#[test]
fn test_files_are_taken_as_given() {
    let dir = tree();
    let root = dir.path();
    let paths = vec![
        root.join("dojo/string.js"),
        root.join("dojo/README.md"),
        root.join("dijit"),
    ];
    let files = discover_source_files(&paths, &[]).unwrap();
    assert_eq!(
        relative(root, &files),
        vec!["dojo/string.js", "dijit/Button.js"]
    );
}

#[test]
fn test_explicit_excluded_path() {
    let dir = tree();
    let paths = vec![dir.path().join("dojo/tests/string.js")];
    let files = discover_source_files(&paths, &["tests".to_string()]).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = discover_source_files(&[missing.as_path()], &[]).unwrap_err();
    assert!(matches!(err, ModuleError::Io { .. }));
    assert_eq!(err.to_diagnostic().code, 3001);
}
