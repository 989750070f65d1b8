//! Configuration management for Docsmith.
//!
//! Parses `docsmith.toml` project files with serde and provides
//! auto-discovery of the file in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! This is the *project* configuration (where content lives, where snapshots
//! go). Per-directory ordering and labels are JSON files inside the content
//! folders and are resolved by `docsmith-core`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content folders (relative to the current directory).
    pub folders: Option<Vec<PathBuf>>,
    /// Override snapshot output directory.
    pub out_dir: Option<PathBuf>,
    /// Override snapshot formats.
    pub formats: Option<Vec<OutputFormat>>,
    /// Override body render mode.
    pub render: Option<RenderMode>,
    /// Override watch debounce interval.
    pub debounce_ms: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docsmith.toml";

/// Default global config filename inside each content folder.
const DEFAULT_GLOBAL_CONFIG: &str = "docs.config.json";

/// Default per-directory config filename.
const DEFAULT_DIRECTORY_CONFIG: &str = "_directory.config.json";

/// How document bodies are turned into `content`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Render Markdown to HTML.
    #[default]
    Html,
    /// Keep the Markdown/MDX body as-is for the front-end to compile.
    Raw,
}

impl FromStr for RenderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "raw" => Ok(Self::Raw),
            other => Err(ConfigError::Validation(format!(
                "unknown render mode `{other}` (expected html or raw)"
            ))),
        }
    }
}

/// Snapshot output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `docsmith-data.json`.
    Json,
    /// ES module (`index.js`).
    Esm,
    /// CommonJS module (`index.cjs`).
    Cjs,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "esm" => Ok(Self::Esm),
            "cjs" => Ok(Self::Cjs),
            other => Err(ConfigError::Validation(format!(
                "unknown output format `{other}` (expected json, esm or cjs)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Esm => "esm",
            Self::Cjs => "cjs",
        })
    }
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Watch configuration.
    pub watch: WatchConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    folders: Option<Vec<String>>,
    extensions: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    global_config: Option<String>,
    directory_config: Option<String>,
    render: Option<RenderMode>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug)]
pub struct ContentConfig {
    /// Content folders to scan.
    pub folders: Vec<PathBuf>,
    /// Recognized source extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Folder-relative glob patterns excluded from discovery.
    pub exclude: Vec<String>,
    /// Global config filename at each content folder root.
    pub global_config: String,
    /// Per-directory config filename.
    pub directory_config: String,
    /// Body render mode.
    pub render: RenderMode,
}

impl ContentConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            folders: vec![base.join("docs")],
            extensions: vec!["md".to_owned(), "mdx".to_owned()],
            exclude: Vec::new(),
            global_config: DEFAULT_GLOBAL_CONFIG.to_owned(),
            directory_config: DEFAULT_DIRECTORY_CONFIG.to_owned(),
            render: RenderMode::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    formats: Option<Vec<OutputFormat>>,
}

/// Resolved output configuration.
#[derive(Debug)]
pub struct OutputConfig {
    /// Directory snapshots are written to.
    pub dir: PathBuf,
    /// Formats to write.
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".docsmith"),
            formats: vec![OutputFormat::Json],
        }
    }
}

/// Watch configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce interval for filesystem events, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docsmith.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(folders) = &settings.folders {
            self.content_resolved.folders.clone_from(folders);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.output_resolved.dir.clone_from(out_dir);
        }
        if let Some(formats) = &settings.formats {
            self.output_resolved.formats.clone_from(formats);
        }
        if let Some(render) = settings.render {
            self.content_resolved.render = render;
        }
        if let Some(debounce_ms) = settings.debounce_ms {
            self.watch.debounce_ms = debounce_ms;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            output: OutputConfigRaw::default(),
            watch: WatchConfig::default(),
            content_resolved: ContentConfig::with_base(base),
            output_resolved: OutputConfig {
                dir: base.join(".docsmith"),
                formats: vec![OutputFormat::Json],
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content()?;
        self.validate_output()?;

        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "watch.debounce_ms must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;

        if content.folders.is_empty() {
            return Err(ConfigError::Validation(
                "content.folders must list at least one folder".to_owned(),
            ));
        }
        if content.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "content.extensions must list at least one extension".to_owned(),
            ));
        }
        if let Some(ext) = content
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.'))
        {
            return Err(ConfigError::Validation(format!(
                "content.extensions entry `{ext}` must be non-empty and have no leading dot"
            )));
        }
        for pattern in &content.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                ConfigError::Validation(format!("content.exclude pattern `{pattern}`: {e}"))
            })?;
        }
        require_non_empty(&content.global_config, "content.global_config")?;
        require_non_empty(&content.directory_config, "content.directory_config")?;

        Ok(())
    }

    fn validate_output(&self) -> Result<(), ConfigError> {
        if self.output_resolved.formats.is_empty() {
            return Err(ConfigError::Validation(
                "output.formats must list at least one format".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = ContentConfig::with_base(config_dir);
        let raw = std::mem::take(&mut self.content);

        self.content_resolved = ContentConfig {
            folders: raw
                .folders
                .map_or(defaults.folders, |f| {
                    f.iter().map(|d| config_dir.join(d)).collect()
                }),
            extensions: raw.extensions.unwrap_or(defaults.extensions),
            exclude: raw.exclude.unwrap_or_default(),
            global_config: raw.global_config.unwrap_or(defaults.global_config),
            directory_config: raw.directory_config.unwrap_or(defaults.directory_config),
            render: raw.render.unwrap_or_default(),
        };

        self.output_resolved = OutputConfig {
            dir: config_dir.join(self.output.dir.as_deref().unwrap_or(".docsmith")),
            formats: self
                .output
                .formats
                .clone()
                .unwrap_or_else(|| vec![OutputFormat::Json]),
        };
    }
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
