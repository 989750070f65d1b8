//! `docsmith build` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use docsmith_config::{CliSettings, Config, OutputFormat, RenderMode};

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline::{build_pipeline, publish, root_dir};

/// Options shared by every command that runs the pipeline.
#[derive(Args)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover docsmith.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content folder to scan; repeat for several (overrides config).
    #[arg(short, long = "folder")]
    folders: Vec<PathBuf>,

    /// Snapshot output directory (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Snapshot format: json, esm or cjs; repeat for several (overrides config).
    #[arg(long = "format")]
    formats: Vec<OutputFormat>,

    /// Body render mode: html or raw (overrides config).
    #[arg(long)]
    render: Option<RenderMode>,

    /// Enable verbose output (per-file logs and timings).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ContentArgs {
    /// Load configuration with these arguments applied on top.
    pub(crate) fn load_config(&self, debounce_ms: Option<u64>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            folders: (!self.folders.is_empty()).then(|| self.folders.clone()),
            out_dir: self.out_dir.clone(),
            formats: (!self.formats.is_empty()).then(|| self.formats.clone()),
            render: self.render,
            debounce_ms,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub common: ContentArgs,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the pipeline fails to
    /// initialize, or a snapshot file cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let start = Instant::now();

        let config = self.common.load_config(None)?;
        let root = root_dir()?;

        let mut docsmith = build_pipeline(&config)?;
        docsmith.initialize(&root)?;
        let data = docsmith.get_docs_data()?;
        let written = publish(&data, &config)?;

        output.success(&format!(
            "Built {} documents in {:.0}ms",
            data.docs.len(),
            start.elapsed().as_secs_f64() * 1000.0
        ));
        output.paths(&root, written.iter().map(PathBuf::as_path));

        Ok(())
    }
}
