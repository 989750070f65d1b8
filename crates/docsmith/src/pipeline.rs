//! Wiring from project configuration to the content pipeline.

use std::path::PathBuf;

use docsmith_config::{Config, OutputFormat, RenderMode};
use docsmith_core::snapshot::{self, SnapshotFormat};
use docsmith_core::{
    ConfigFileNames, DocsData, Docsmith, DocsmithError, DocsmithOptions, HtmlProcessor,
    RawProcessor,
};

pub(crate) fn options_from_config(config: &Config) -> DocsmithOptions {
    let content = &config.content_resolved;
    DocsmithOptions {
        folders: content.folders.clone(),
        extensions: content.extensions.clone(),
        exclude: content.exclude.clone(),
        config_files: ConfigFileNames {
            global: content.global_config.clone(),
            directory: content.directory_config.clone(),
        },
    }
}

/// Build an uninitialized pipeline for `config`.
pub(crate) fn build_pipeline(config: &Config) -> Result<Docsmith, DocsmithError> {
    let builder = Docsmith::builder().options(options_from_config(config));
    let builder = match config.content_resolved.render {
        RenderMode::Html => builder.processor(HtmlProcessor::new()),
        RenderMode::Raw => builder.processor(RawProcessor),
    };
    builder.build()
}

pub(crate) fn snapshot_formats(formats: &[OutputFormat]) -> Vec<SnapshotFormat> {
    formats
        .iter()
        .map(|format| match format {
            OutputFormat::Json => SnapshotFormat::Json,
            OutputFormat::Esm => SnapshotFormat::Esm,
            OutputFormat::Cjs => SnapshotFormat::Cjs,
        })
        .collect()
}

/// Write `data` in every configured format.
pub(crate) fn publish(data: &DocsData, config: &Config) -> Result<Vec<PathBuf>, DocsmithError> {
    snapshot::write(
        data,
        &config.output_resolved.dir,
        &snapshot_formats(&config.output_resolved.formats),
    )
}

/// Root directory content folders are resolved against.
///
/// Canonical so paths reported by the watcher share its prefix.
pub(crate) fn root_dir() -> std::io::Result<PathBuf> {
    std::env::current_dir()?.canonicalize()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use docsmith_config::CliSettings;
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("content")).unwrap();
        temp_dir
    }

    fn load(dir: &Path, toml: &str) -> Config {
        let path = dir.join("docsmith.toml");
        fs::write(&path, toml).unwrap();
        Config::load(Some(&path), None).unwrap()
    }

    #[test]
    fn test_options_from_config() {
        let temp_dir = create_test_dir();
        let config = load(
            temp_dir.path(),
            r#"
[content]
folders = ["content"]
extensions = ["md"]
exclude = ["drafts/**"]
directory_config = "_dir.json"
"#,
        );

        let options = options_from_config(&config);

        assert_eq!(options.folders, vec![temp_dir.path().join("content")]);
        assert_eq!(options.extensions, vec!["md"]);
        assert_eq!(options.exclude, vec!["drafts/**"]);
        assert_eq!(options.config_files.global, "docs.config.json");
        assert_eq!(options.config_files.directory, "_dir.json");
    }

    #[test]
    fn test_snapshot_formats_preserve_order() {
        assert_eq!(
            snapshot_formats(&[OutputFormat::Cjs, OutputFormat::Json]),
            vec![SnapshotFormat::Cjs, SnapshotFormat::Json]
        );
    }

    #[test]
    fn test_build_pipeline_renders_html_by_default() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("content/a.md"), "# Title\n\n*hi*").unwrap();
        let config = load(temp_dir.path(), "[content]\nfolders = [\"content\"]\n");

        let mut docsmith = build_pipeline(&config).unwrap();
        docsmith.initialize(temp_dir.path()).unwrap();

        let doc = docsmith.get_doc("a").unwrap();
        assert!(doc.content.contains("<em>hi</em>"));
    }

    #[test]
    fn test_build_pipeline_raw_keeps_body() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("content/a.md"), "*hi*").unwrap();
        let config = load(
            temp_dir.path(),
            "[content]\nfolders = [\"content\"]\nrender = \"raw\"\n",
        );

        let mut docsmith = build_pipeline(&config).unwrap();
        docsmith.initialize(temp_dir.path()).unwrap();

        assert_eq!(docsmith.get_doc("a").unwrap().content, "*hi*");
    }

    #[test]
    fn test_publish_writes_configured_formats() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("content/a.md"), "text").unwrap();
        let path = temp_dir.path().join("docsmith.toml");
        fs::write(&path, "[content]\nfolders = [\"content\"]\n").unwrap();
        let settings = CliSettings {
            formats: Some(vec![OutputFormat::Json, OutputFormat::Esm]),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        let mut docsmith = build_pipeline(&config).unwrap();
        docsmith.initialize(temp_dir.path()).unwrap();
        let written = publish(&docsmith.get_docs_data().unwrap(), &config).unwrap();

        let out = temp_dir.path().join(".docsmith");
        assert_eq!(written, vec![out.join("docsmith-data.json"), out.join("index.js")]);
    }
}
