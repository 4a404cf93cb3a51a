//! One render, start to finish.
//!
//! [`Renderer`] runs the whole pipeline for a single call: resolve options,
//! collect links, build and classify the graph, emit the document. Nothing
//! is cached between calls, so one renderer can serve many calls, each with
//! its own options.

use chrono::{DateTime, Local};
use tracing::{debug, instrument};

use crate::emit::{Emitter, wrap_directive};
use crate::error::{DepGraphError, Result};
use crate::graph::DepGraph;
use crate::options::{OptionMap, Options};
use crate::store::{LinkStore, TicketStore};

/// Default prefix for ticket URLs.
pub const DEFAULT_BASE_URL: &str = "/ticket/";

/// Everything a host passes for one macro invocation.
#[derive(Debug, Clone, Default)]
pub struct MacroCall<'a> {
    /// Lowest-precedence overrides, e.g. from a config file.
    pub defaults: Option<&'a OptionMap>,
    /// Free-form macro text such as `milestone=1.0, debug=1`.
    pub content: Option<&'a str>,
    /// Pre-parsed named arguments; these win over `content`.
    pub args: Option<&'a OptionMap>,
}

/// Renders ticket dependency graphs from a store.
#[derive(Debug)]
pub struct Renderer<S> {
    store: S,
    base_url: String,
}

impl<S> Renderer<S>
where
    S: TicketStore + LinkStore,
{
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the graph and emit the bare Graphviz text.
    ///
    /// # Errors
    ///
    /// Returns [`DepGraphError::Lookup`] for a link to a missing ticket and
    /// [`DepGraphError::Render`] for store or emission failures.
    #[instrument(skip_all, fields(graph = %options.graph_name))]
    pub fn render(&self, options: &Options) -> Result<String> {
        let links = self
            .store
            .all_links()
            .map_err(|err| DepGraphError::Render(err.context("collect blocking links")))?;
        debug!(links = links.len(), "collected links");

        let graph = DepGraph::build(&links, &self.store, &options.milestone)?;
        Emitter::new(options, &self.base_url).document(&graph)
    }

    /// Render and wrap the result in the wiki processor block, adding the
    /// raw copy when `options.debug` is set.
    ///
    /// # Errors
    ///
    /// See [`Renderer::render`].
    pub fn expand(&self, options: &Options) -> Result<String> {
        let dot = self.render(options)?;
        Ok(wrap_directive(&dot, options.debug))
    }

    /// Resolve the call's options at `now` and expand.
    ///
    /// # Errors
    ///
    /// Returns [`DepGraphError::Configuration`] for bad option values, or
    /// anything [`Renderer::render`] returns.
    pub fn try_expand_macro(&self, call: &MacroCall<'_>, now: &DateTime<Local>) -> Result<String> {
        let options = Options::resolve_call(call.defaults, call.content, call.args, now)?;
        self.expand(&options)
    }

    /// Macro entry point: the expanded document, or the failure text.
    ///
    /// A failed render never returns partial graph text, and is left to the
    /// caller to log.
    #[must_use]
    pub fn expand_macro(&self, call: &MacroCall<'_>) -> String {
        self.try_expand_macro(call, &Local::now())
            .unwrap_or_else(|err| err.failure_text())
    }
}
