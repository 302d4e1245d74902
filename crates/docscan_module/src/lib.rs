//! docscan_module: Module ids and source discovery.
//!
//! Maps source file paths to module ids through the configured module map,
//! and finds the `.js` files under the paths given on the command line.

mod discover;
mod error;
mod path;

pub use discover::{discover_source_files, has_js_extension};
pub use error::ModuleError;
pub use path::{
    ensure_trailing_directory_separator, module_id_from_path, normalize_slashes,
    resolve_relative_id, ModuleId,
};
