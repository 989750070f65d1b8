//! Hierarchical directory configuration.
//!
//! Each content folder may carry a global config file at its root and a
//! directory config file in any directory (the root included). Both are JSON.
//!
//! # Resolution
//!
//! The effective config for a path is the global config merged with every
//! directory config from the root down to the path's deepest ancestor that
//! has one:
//!
//! ```text
//! global ← "" ← "guide" ← "guide/advanced"
//! ```
//!
//! # Merge Rules
//!
//! - `order`: concatenated (parent entries first)
//! - `directoryLabels`: key-merged (child wins)
//! - any other key: child wins
//!
//! Configs for the same directory found in several content folders are
//! merged with the same rules, in folder order.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::source::to_relative_string;

/// Per-directory configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsmithConfig {
    /// Preferred child ordering by name.
    #[serde(default)]
    pub order: Vec<String>,
    /// Display labels by child name.
    #[serde(default)]
    pub directory_labels: HashMap<String, String>,
    /// Any other keys, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DocsmithConfig {
    /// Merge `child` over `self`.
    #[must_use]
    pub fn merge(&self, child: &Self) -> Self {
        let mut order = self.order.clone();
        order.extend(child.order.iter().cloned());

        let mut directory_labels = self.directory_labels.clone();
        for (key, value) in &child.directory_labels {
            directory_labels.insert(key.clone(), value.clone());
        }

        let mut extra = self.extra.clone();
        for (key, value) in &child.extra {
            extra.insert(key.clone(), value.clone());
        }

        Self {
            order,
            directory_labels,
            extra,
        }
    }

    /// Label configured for a child name.
    pub fn label_for(&self, name: &str) -> Option<&str> {
        self.directory_labels.get(name).map(String::as_str)
    }

    /// Position of a name in `order` (first occurrence).
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|entry| entry == name)
    }
}

/// Config filenames looked up in content folders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigFileNames {
    /// Global config at a content folder root.
    pub global: String,
    /// Directory config in any directory.
    pub directory: String,
}

impl Default for ConfigFileNames {
    fn default() -> Self {
        Self {
            global: "docs.config.json".to_owned(),
            directory: "_directory.config.json".to_owned(),
        }
    }
}

impl ConfigFileNames {
    /// Whether a filename is one of the config files.
    pub fn is_config_file(&self, file_name: &str) -> bool {
        file_name == self.global || file_name == self.directory
    }
}

/// Loaded configs for every directory across all content folders.
///
/// Built in one pass by [`ConfigResolver::load`]; immutable afterwards.
#[derive(Clone, Debug, Default)]
pub struct ConfigResolver {
    global: DocsmithConfig,
    directories: BTreeMap<String, DocsmithConfig>,
}

impl ConfigResolver {
    /// Read global and directory configs from every content folder.
    ///
    /// Missing folders and missing or unparsable files contribute an empty
    /// config.
    pub fn load(folders: &[PathBuf], names: &ConfigFileNames) -> Self {
        let mut global = DocsmithConfig::default();
        let mut directories = BTreeMap::new();

        for folder in folders {
            if let Some(config) = read_config(&folder.join(&names.global)) {
                global = global.merge(&config);
            }
            collect_directory_configs(folder, folder, &names.directory, &mut directories);
        }

        tracing::debug!(
            directories = directories.len(),
            "Loaded directory configs"
        );

        Self {
            global,
            directories,
        }
    }

    /// Global config alone.
    pub fn global(&self) -> &DocsmithConfig {
        &self.global
    }

    /// Directory's own config (not merged with ancestors).
    pub fn directory(&self, dir: &str) -> Option<&DocsmithConfig> {
        self.directories.get(dir)
    }

    /// Effective config for a relative path (`""` is the folder root).
    ///
    /// Works for both directory and file paths: a file resolves to its
    /// directory's effective config.
    pub fn resolve(&self, path: &str) -> DocsmithConfig {
        build_ancestor_chain(path)
            .iter()
            .filter_map(|ancestor| self.directories.get(ancestor))
            .fold(self.global.clone(), |acc, config| acc.merge(config))
    }
}

fn collect_directory_configs(
    root: &Path,
    dir: &Path,
    file_name: &str,
    out: &mut BTreeMap<String, DocsmithConfig>,
) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    if let Some(config) = read_config(&dir.join(file_name)) {
        let key = dir
            .strip_prefix(root)
            .ok()
            .and_then(to_relative_string)
            .unwrap_or_default();
        let merged = match out.remove(&key) {
            Some(existing) => existing.merge(&config),
            None => config,
        };
        out.insert(key, merged);
    }

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            collect_directory_configs(root, &entry.path(), file_name, out);
        }
    }
}

fn read_config(path: &Path) -> Option<DocsmithConfig> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
            None
        }
    }
}

/// Build ancestor chain for a relative path.
///
/// Returns ancestors from root to the path itself.
/// E.g., `"a/b/c"` → `["", "a", "a/b", "a/b/c"]`
fn build_ancestor_chain(path: &str) -> Vec<String> {
    let mut ancestors = vec![String::new()];
    let mut current = String::new();

    for part in path.split('/').filter(|p| !p.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(part);
        ancestors.push(current.clone());
    }

    ancestors
}
