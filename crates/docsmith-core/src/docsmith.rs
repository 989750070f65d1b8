//! Pipeline orchestration.
//!
//! [`Docsmith`] owns the plugin pipeline, the Markdown processor and the
//! published state (config resolver plus document store). Full
//! initialization builds new state on the side and swaps it in only when
//! every step succeeded, so a failed run leaves the previous snapshot
//! readable.

use std::path::{Path, PathBuf};
use std::time::Instant;

use glob::Pattern;

use crate::config::{ConfigFileNames, ConfigResolver};
use crate::document::{DocsData, Document};
use crate::error::DocsmithError;
use crate::navigation;
use crate::parser::DocumentParser;
use crate::plugin::{InitContext, Plugin, PluginPipeline};
use crate::processor::{HtmlProcessor, MarkdownProcessor};
use crate::scanner::{Scanner, compile_patterns, is_skipped, scan_all};
use crate::source::{Extensions, to_relative_string};
use crate::store::ContentStore;
use crate::tree::{TreeBuilder, TreeItem};

/// Pipeline options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocsmithOptions {
    /// Content folders, relative to the root directory (or absolute).
    pub folders: Vec<PathBuf>,
    /// Recognized source extensions.
    pub extensions: Vec<String>,
    /// Glob patterns (relative to each folder) excluded from discovery.
    pub exclude: Vec<String>,
    /// Config filenames.
    pub config_files: ConfigFileNames,
}

impl Default for DocsmithOptions {
    fn default() -> Self {
        Self {
            folders: vec![PathBuf::from("docs")],
            extensions: vec!["md".to_owned(), "mdx".to_owned()],
            exclude: Vec::new(),
            config_files: ConfigFileNames::default(),
        }
    }
}

/// Builder for [`Docsmith`].
pub struct DocsmithBuilder {
    options: DocsmithOptions,
    pipeline: PluginPipeline,
    processor: Box<dyn MarkdownProcessor>,
}

impl DocsmithBuilder {
    #[must_use]
    pub fn options(mut self, options: DocsmithOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a plugin. Plugins run in registration order.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.pipeline.push(Box::new(plugin));
        self
    }

    /// Replace the Markdown processor (default: [`HtmlProcessor`]).
    #[must_use]
    pub fn processor(mut self, processor: impl MarkdownProcessor + 'static) -> Self {
        self.processor = Box::new(processor);
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`DocsmithError::Pattern`] if an exclude pattern is invalid.
    pub fn build(self) -> Result<Docsmith, DocsmithError> {
        let exclude = compile_patterns(&self.options.exclude)
            .map_err(|(pattern, source)| DocsmithError::Pattern { pattern, source })?;
        Ok(Docsmith {
            extensions: Extensions::new(&self.options.extensions),
            exclude,
            options: self.options,
            pipeline: self.pipeline,
            processor: self.processor,
            resolver: ConfigResolver::default(),
            store: ContentStore::new(),
            initialized: false,
        })
    }
}

/// The content pipeline.
pub struct Docsmith {
    options: DocsmithOptions,
    extensions: Extensions,
    exclude: Vec<Pattern>,
    pipeline: PluginPipeline,
    processor: Box<dyn MarkdownProcessor>,
    resolver: ConfigResolver,
    store: ContentStore,
    initialized: bool,
}

impl Docsmith {
    pub fn builder() -> DocsmithBuilder {
        DocsmithBuilder {
            options: DocsmithOptions::default(),
            pipeline: PluginPipeline::new(),
            processor: Box::new(HtmlProcessor::new()),
        }
    }

    pub fn options(&self) -> &DocsmithOptions {
        &self.options
    }

    /// Whether a full initialization has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Content folders resolved against `root_dir`.
    pub fn content_folders(&self, root_dir: &Path) -> Vec<PathBuf> {
        self.options
            .folders
            .iter()
            .map(|folder| root_dir.join(folder))
            .collect()
    }

    /// Rebuild all state from disk.
    ///
    /// Runs `beforeInitialize` hooks, loads directory configs, parses every
    /// discovered file, builds the tree and links navigation. Unreadable
    /// files and duplicate slugs are skipped with a warning; any other error
    /// aborts and keeps the previous state.
    pub fn initialize(&mut self, root_dir: &Path) -> Result<(), DocsmithError> {
        let start = Instant::now();
        let ctx = InitContext {
            root_dir,
            options: &self.options,
        };
        self.pipeline.before_initialize(&ctx)?;

        let folders = self.content_folders(root_dir);
        let resolver = ConfigResolver::load(&folders, &self.options.config_files);

        let scanner = Scanner::new(&self.extensions, &self.exclude);
        let sources = scan_all(&scanner, &folders);

        let parser = DocumentParser::new(&self.pipeline, self.processor.as_ref(), &self.extensions);
        let mut store = ContentStore::new();
        let mut skipped = 0usize;

        for source in sources {
            if let Some(existing) = store.get(&source.rel_path) {
                tracing::warn!(
                    path = %source.path.display(),
                    slug = %existing.slug,
                    "Skipping file shadowed by an earlier content folder"
                );
                skipped += 1;
                continue;
            }
            let doc = match parser.parse(&source.folder, &source.path) {
                Ok(doc) => doc,
                Err(e) if e.is_file_io() => {
                    tracing::warn!(path = %source.rel_path, error = %e, "Skipping unreadable file");
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            if let Err(e) = store.insert(source.rel_path, doc) {
                tracing::warn!(error = %e, "Skipping document");
                skipped += 1;
            }
        }

        let tree = self.build_tree(&resolver, &store)?;
        navigation::link(&tree, &mut store);

        tracing::info!(
            documents = store.len(),
            skipped,
            folders = folders.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Content initialized"
        );

        self.resolver = resolver;
        self.store = store;
        self.initialized = true;
        Ok(())
    }

    /// Re-parse one file and replace its stored document.
    ///
    /// `file_path` may be absolute or relative to `root_dir`. The tree and
    /// navigation are not rebuilt; call [`Docsmith::get_docs_data`].
    ///
    /// Files that [`Docsmith::initialize`] would not load are rejected
    /// without touching the store: hidden or excluded paths
    /// ([`DocsmithError::Excluded`]) and paths also present in an earlier
    /// content folder ([`DocsmithError::Shadowed`]).
    pub fn process_file(&mut self, root_dir: &Path, file_path: &Path) -> Result<(), DocsmithError> {
        let abs_path = root_dir.join(file_path);
        let folders = self.content_folders(root_dir);
        let index = folders
            .iter()
            .position(|folder| abs_path.starts_with(folder))
            .ok_or_else(|| DocsmithError::OutsideContent(abs_path.clone()))?;
        let folder = &folders[index];

        let key = abs_path
            .strip_prefix(folder)
            .ok()
            .and_then(to_relative_string)
            .ok_or_else(|| DocsmithError::OutsideContent(abs_path.clone()))?;

        if is_skipped(&self.exclude, &key) {
            return Err(DocsmithError::Excluded(key));
        }
        if let Some(earlier) = folders[..index]
            .iter()
            .find(|earlier| earlier.join(&key).is_file())
        {
            return Err(DocsmithError::Shadowed {
                path: key,
                folder: earlier.clone(),
            });
        }

        let parser = DocumentParser::new(&self.pipeline, self.processor.as_ref(), &self.extensions);
        let doc = parser.parse(folder, &abs_path)?;

        tracing::debug!(path = %key, slug = %doc.slug, "Processed file");
        self.store.insert(key, doc)?;
        Ok(())
    }

    /// Build the tree from the current store, run `transformTree` hooks,
    /// relink navigation and return the snapshot.
    pub fn get_docs_data(&mut self) -> Result<DocsData, DocsmithError> {
        let tree = self.build_tree(&self.resolver, &self.store)?;
        navigation::link(&tree, &mut self.store);
        Ok(DocsData {
            docs: self.store.iter().cloned().collect(),
            tree,
        })
    }

    /// Documents in path order.
    pub fn docs(&self) -> impl Iterator<Item = &Document> {
        self.store.iter()
    }

    pub fn get_doc(&self, slug: &str) -> Option<&Document> {
        self.store.get_by_slug(slug)
    }

    /// Document by its relative source path.
    pub fn get_doc_by_path(&self, path: &str) -> Option<&Document> {
        self.store.get(path)
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Whether a path names one of the config files.
    pub fn is_config_file(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.options.config_files.is_config_file(&name.to_string_lossy()))
    }

    /// Whether a path has a recognized source extension.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.extensions.matches(&name.to_string_lossy()))
    }

    fn build_tree(
        &self,
        resolver: &ConfigResolver,
        store: &ContentStore,
    ) -> Result<Vec<TreeItem>, DocsmithError> {
        let tree = TreeBuilder::new(resolver, &self.extensions).build(store.iter());
        self.pipeline.transform_tree(tree)
    }
}
