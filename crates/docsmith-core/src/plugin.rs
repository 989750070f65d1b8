//! Plugin hooks.
//!
//! A [`Plugin`] may hook into five stages. Every hook has an identity
//! default, so a plugin implements only the stages it cares about. The
//! [`PluginPipeline`] chains each stage across plugins in registration
//! order: the output of one plugin is the input of the next.
//!
//! | Stage               | Input                      | Runs                         |
//! |---------------------|----------------------------|------------------------------|
//! | `beforeInitialize`  | [`InitContext`]            | once per full initialization |
//! | `beforeParse`       | raw file text              | per file                     |
//! | `afterParse`        | body without front-matter  | per file                     |
//! | `transformDoc`      | finished [`Document`]      | per file                     |
//! | `transformTree`     | navigation forest          | per tree build               |

use std::fmt;
use std::path::Path;

use crate::docsmith::DocsmithOptions;
use crate::document::Document;
use crate::error::DocsmithError;
use crate::tree::TreeItem;

/// Result type returned by plugin hooks.
pub type HookResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Hook stage, used to attribute plugin failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeInitialize,
    BeforeParse,
    AfterParse,
    TransformDoc,
    TransformTree,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BeforeInitialize => "beforeInitialize",
            Self::BeforeParse => "beforeParse",
            Self::AfterParse => "afterParse",
            Self::TransformDoc => "transformDoc",
            Self::TransformTree => "transformTree",
        })
    }
}

/// Context passed to [`Plugin::before_initialize`].
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    /// Project root passed to initialization.
    pub root_dir: &'a Path,
    /// Active pipeline options.
    pub options: &'a DocsmithOptions,
}

/// A named bundle of optional hooks.
pub trait Plugin: Send + Sync {
    /// Plugin name, used in logs and errors.
    fn name(&self) -> &str;

    /// Called once before a full initialization scans any file.
    fn before_initialize(&mut self, _ctx: &InitContext<'_>) -> HookResult<()> {
        Ok(())
    }

    /// Rewrite raw file text before front-matter is split off.
    fn before_parse(&self, raw: String) -> HookResult<String> {
        Ok(raw)
    }

    /// Rewrite the body after front-matter is split off.
    fn after_parse(&self, body: String) -> HookResult<String> {
        Ok(body)
    }

    /// Rewrite a finished document.
    fn transform_doc(&self, doc: Document) -> HookResult<Document> {
        Ok(doc)
    }

    /// Rewrite the navigation tree.
    fn transform_tree(&self, tree: Vec<TreeItem>) -> HookResult<Vec<TreeItem>> {
        Ok(tree)
    }
}

/// Ordered list of plugins.
#[derive(Default)]
pub struct PluginPipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin. Plugins run in the order they are added.
    pub fn push(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered plugin names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name())
    }

    pub fn before_initialize(&mut self, ctx: &InitContext<'_>) -> Result<(), DocsmithError> {
        for plugin in &mut self.plugins {
            plugin
                .before_initialize(ctx)
                .map_err(|e| hook_error(plugin.as_ref(), HookStage::BeforeInitialize, e))?;
        }
        Ok(())
    }

    pub fn before_parse(&self, raw: String) -> Result<String, DocsmithError> {
        self.plugins.iter().try_fold(raw, |acc, plugin| {
            plugin
                .before_parse(acc)
                .map_err(|e| hook_error(plugin.as_ref(), HookStage::BeforeParse, e))
        })
    }

    pub fn after_parse(&self, body: String) -> Result<String, DocsmithError> {
        self.plugins.iter().try_fold(body, |acc, plugin| {
            plugin
                .after_parse(acc)
                .map_err(|e| hook_error(plugin.as_ref(), HookStage::AfterParse, e))
        })
    }

    pub fn transform_doc(&self, doc: Document) -> Result<Document, DocsmithError> {
        self.plugins.iter().try_fold(doc, |acc, plugin| {
            plugin
                .transform_doc(acc)
                .map_err(|e| hook_error(plugin.as_ref(), HookStage::TransformDoc, e))
        })
    }

    pub fn transform_tree(&self, tree: Vec<TreeItem>) -> Result<Vec<TreeItem>, DocsmithError> {
        self.plugins.iter().try_fold(tree, |acc, plugin| {
            plugin
                .transform_tree(acc)
                .map_err(|e| hook_error(plugin.as_ref(), HookStage::TransformTree, e))
        })
    }
}

impl fmt::Debug for PluginPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn hook_error(
    plugin: &dyn Plugin,
    stage: HookStage,
    source: Box<dyn std::error::Error + Send + Sync>,
) -> DocsmithError {
    tracing::warn!(plugin = plugin.name(), %stage, error = %source, "Plugin hook failed");
    DocsmithError::Plugin {
        plugin: plugin.name().to_owned(),
        stage,
        source,
    }
}

type InitHook = Box<dyn FnMut(&InitContext<'_>) -> HookResult<()> + Send + Sync>;
type TextHook = Box<dyn Fn(String) -> HookResult<String> + Send + Sync>;
type DocHook = Box<dyn Fn(Document) -> HookResult<Document> + Send + Sync>;
type TreeHook = Box<dyn Fn(Vec<TreeItem>) -> HookResult<Vec<TreeItem>> + Send + Sync>;

/// Plugin assembled from closures.
///
/// ```
/// use docsmith_core::{HookBundle, Plugin};
///
/// let plugin = HookBundle::new("shout").before_parse(|raw| Ok(raw.to_uppercase()));
/// assert_eq!(Plugin::before_parse(&plugin, "hi".to_owned()).unwrap(), "HI");
/// ```
pub struct HookBundle {
    name: String,
    before_initialize: Option<InitHook>,
    before_parse: Option<TextHook>,
    after_parse: Option<TextHook>,
    transform_doc: Option<DocHook>,
    transform_tree: Option<TreeHook>,
}

impl HookBundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_initialize: None,
            before_parse: None,
            after_parse: None,
            transform_doc: None,
            transform_tree: None,
        }
    }

    #[must_use]
    pub fn before_initialize(
        mut self,
        hook: impl FnMut(&InitContext<'_>) -> HookResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.before_initialize = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn before_parse(
        mut self,
        hook: impl Fn(String) -> HookResult<String> + Send + Sync + 'static,
    ) -> Self {
        self.before_parse = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn after_parse(
        mut self,
        hook: impl Fn(String) -> HookResult<String> + Send + Sync + 'static,
    ) -> Self {
        self.after_parse = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn transform_doc(
        mut self,
        hook: impl Fn(Document) -> HookResult<Document> + Send + Sync + 'static,
    ) -> Self {
        self.transform_doc = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn transform_tree(
        mut self,
        hook: impl Fn(Vec<TreeItem>) -> HookResult<Vec<TreeItem>> + Send + Sync + 'static,
    ) -> Self {
        self.transform_tree = Some(Box::new(hook));
        self
    }
}

impl Plugin for HookBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_initialize(&mut self, ctx: &InitContext<'_>) -> HookResult<()> {
        match self.before_initialize.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }

    fn before_parse(&self, raw: String) -> HookResult<String> {
        match &self.before_parse {
            Some(hook) => hook(raw),
            None => Ok(raw),
        }
    }

    fn after_parse(&self, body: String) -> HookResult<String> {
        match &self.after_parse {
            Some(hook) => hook(body),
            None => Ok(body),
        }
    }

    fn transform_doc(&self, doc: Document) -> HookResult<Document> {
        match &self.transform_doc {
            Some(hook) => hook(doc),
            None => Ok(doc),
        }
    }

    fn transform_tree(&self, tree: Vec<TreeItem>) -> HookResult<Vec<TreeItem>> {
        match &self.transform_tree {
            Some(hook) => hook(tree),
            None => Ok(tree),
        }
    }
}
