//! Path normalization and module ids.

use docscan_options::DocscanConfig;
use std::fmt;

/// A module id such as `dojo/string`, derived from a file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The top-level module name.
    pub fn package(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// The dotted form used by `dojo.provide`, e.g. `dojo.foo.bar`.
    pub fn to_dotted(&self) -> String {
        self.0.replace('/', ".")
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert backslashes to forward slashes and collapse repeated slashes.
pub fn normalize_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Ensure a path ends with a directory separator.
pub fn ensure_trailing_directory_separator(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Resolve `.` and `..` segments of a `/`-separated id.
///
/// `.` segments are dropped. `..` removes the previous segment, except at
/// the start or right after another kept `..`, where it is kept.
pub fn resolve_relative_id(path: &str) -> String {
    let mut result: Vec<&str> = Vec::new();
    let mut last_segment: Option<&str> = None;
    for segment in path.split('/') {
        if segment == ".." && !result.is_empty() && last_segment != Some("..") {
            result.pop();
        } else if segment != "." {
            result.push(segment);
            last_segment = Some(segment);
        }
    }
    result.join("/")
}

/// The module id of the file at `path`.
///
/// The first `moduleMap` entry whose `baseUrl + directory` is a prefix of
/// the normalized path names the module; the rest of the path, without a
/// leading `/` and the `.js` suffix, is appended to it. A file named `main`
/// directly in the mapped directory is the module itself. Paths outside every
/// mapped directory have no module id.
pub fn module_id_from_path(path: &str, config: &DocscanConfig) -> Option<ModuleId> {
    let resolved = resolve_relative_id(&normalize_slashes(path));

    for (module, directory) in &config.module_map {
        let prefix =
            ensure_trailing_directory_separator(&format!("{}{}", config.base_url, directory));
        let Some(rest) = resolved.strip_prefix(prefix.as_str()) else {
            continue;
        };
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let rest = rest.strip_suffix(".js").unwrap_or(rest);
        let id = if rest == "main" {
            ModuleId::new(module.as_str())
        } else {
            ModuleId::new(format!("{}/{}", module, rest))
        };
        tracing::trace!(path, module = %id, "resolved module id");
        return Some(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dojo_config() -> DocscanConfig {
        let mut config = DocscanConfig {
            base_url: "/mnt/devel/web/dojo-trunk/".to_string(),
            ..Default::default()
        };
        for module in ["dojo", "dijit", "dojox"] {
            config
                .module_map
                .insert(module.to_string(), module.to_string());
        }
        config
    }

    #[test]
    fn test_resolve_relative_id() {
        assert_eq!(resolve_relative_id("a/./b"), "a/b");
        assert_eq!(resolve_relative_id("a/b/../c"), "a/c");
        assert_eq!(resolve_relative_id("a/b/../../c"), "c");
        assert_eq!(resolve_relative_id("../a"), "../a");
        assert_eq!(resolve_relative_id("../../a"), "../../a");
        assert_eq!(resolve_relative_id("./a/../b"), "b");
        assert_eq!(resolve_relative_id("/root/./x.js"), "/root/x.js");
    }

    #[test]
    fn test_normalize_slashes() {
        assert_eq!(normalize_slashes("a\\b\\c.js"), "a/b/c.js");
        assert_eq!(normalize_slashes("/a//b///c"), "/a/b/c");
    }

    #[test]
    fn test_module_id_from_path() {
        let config = dojo_config();
        let id = module_id_from_path("/mnt/devel/web/dojo-trunk/dojo/string.js", &config).unwrap();
        assert_eq!(id.as_str(), "dojo/string");
        assert_eq!(id.package(), "dojo");

        let nested =
            module_id_from_path("/mnt/devel/web/dojo-trunk/dijit/form/Button.js", &config).unwrap();
        assert_eq!(nested.as_str(), "dijit/form/Button");
        assert_eq!(nested.to_dotted(), "dijit.form.Button");
    }

    #[test]
    fn test_main_file_is_the_module() {
        let config = dojo_config();
        let id = module_id_from_path("/mnt/devel/web/dojo-trunk/dojox/main.js", &config).unwrap();
        assert_eq!(id.as_str(), "dojox");
    }

    #[test]
    fn test_relative_segments_are_resolved_first() {
        let config = dojo_config();
        let id = module_id_from_path(
            "/mnt/devel/web/dojo-trunk/dijit/../dojo/./date/locale.js",
            &config,
        )
        .unwrap();
        assert_eq!(id.as_str(), "dojo/date/locale");
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let mut config = DocscanConfig {
            base_url: "/src/".to_string(),
            ..Default::default()
        };
        config.module_map.insert("lib".to_string(), "lib".to_string());
        config.module_map.insert("inner".to_string(), "lib/inner".to_string());
        let id = module_id_from_path("/src/lib/inner/x.js", &config).unwrap();
        assert_eq!(id.as_str(), "lib/inner/x");
    }

    #[test]
    fn test_mapping_to_another_directory() {
        let mut config = DocscanConfig {
            base_url: "/src/".to_string(),
            ..Default::default()
        };
        config.module_map.insert("app".to_string(), "js/application".to_string());
        let id = module_id_from_path("/src/js/application/views/List.js", &config).unwrap();
        assert_eq!(id.as_str(), "app/views/List");
    }

    #[test]
    fn test_unmapped_path() {
        let config = dojo_config();
        assert!(module_id_from_path("/elsewhere/x.js", &config).is_none());
        assert!(module_id_from_path("/mnt/devel/web/dojo-trunk/dojo", &config).is_none());
        assert!(module_id_from_path("x.js", &DocscanConfig::default()).is_none());
    }
}
