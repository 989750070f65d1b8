//! `docsmith watch` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use docsmith_core::{ConfigFileNames, Extensions};
use docsmith_watch::{ContentWatcher, Dispatcher, WatchFilter};

use super::build::ContentArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::pipeline::{build_pipeline, publish, root_dir};

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    pub common: ContentArgs,

    /// Debounce interval for filesystem events in milliseconds (overrides config).
    #[arg(long)]
    debounce_ms: Option<u64>,
}

impl WatchArgs {
    /// Execute the watch command.
    ///
    /// Runs until Ctrl-C. Failed updates are logged and the previous
    /// snapshot stays on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the initial build fails,
    /// or no content folder can be watched.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.common.load_config(self.debounce_ms)?;
        let root = root_dir()?;

        let mut docsmith = build_pipeline(&config)?;
        docsmith.initialize(&root)?;
        publish(&docsmith.get_docs_data()?, &config)?;

        let folders = docsmith.content_folders(&root);
        let filter = WatchFilter::new(
            folders.clone(),
            Extensions::new(&config.content_resolved.extensions),
            ConfigFileNames {
                global: config.content_resolved.global_config.clone(),
                directory: config.content_resolved.directory_config.clone(),
            },
        );
        let (receiver, handle) = ContentWatcher::new(filter)
            .with_debounce(Duration::from_millis(config.watch.debounce_ms))
            .start()?;

        output.title("Watching for changes (press Ctrl-C to stop)");
        output.paths(&root, folders.iter().map(PathBuf::as_path));
        output.info("Snapshot directory:");
        output.paths(&root, [config.output_resolved.dir.as_path()]);

        let mut dispatcher = Dispatcher::new(docsmith, root);
        let mut worker = tokio::task::spawn_blocking(move || {
            dispatcher.run(&receiver, |data| match publish(data, &config) {
                Ok(_) => tracing::info!(documents = data.docs.len(), "Snapshot updated"),
                Err(e) => tracing::error!(error = %e, "Failed to write snapshot"),
            });
        });

        let interrupted = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                true
            }
            result = &mut worker => {
                result.map_err(|e| CliError::Task(e.to_string()))?;
                false
            }
        };

        if interrupted {
            output.info("Stopping watcher");
            // Closing the watcher ends the dispatcher loop.
            handle.stop();
            worker.await.map_err(|e| CliError::Task(e.to_string()))?;
        }

        Ok(())
    }
}
