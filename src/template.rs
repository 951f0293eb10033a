//! A template on the local filesystem, ready to be executed.
//!
//! A template root holds a context file (see [`crate::constants::CONTEXT_FILES`])
//! and a [`crate::constants::TEMPLATE_DIR`] directory. Only the latter is
//! walked when the template is executed.

use crate::binding::{bind, Mode};
use crate::constants::TEMPLATE_DIR;
use crate::context::{load_context, ContextTree};
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::processor::{Processor, RenderEvent};
use crate::prompt::{NoPrompter, Prompter};
use crate::renderer::TemplateRenderer;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct Template {
    path: PathBuf,
    context: ContextTree,
    metadata: Metadata,
    mode: Mode,
}

impl Template {
    /// Loads the template rooted at `path`.
    ///
    /// # Errors
    /// * `Error::PathError` if the root cannot be resolved
    /// * `Error::ContextError` if the context file is malformed
    pub fn get<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let root = std::fs::canonicalize(path).map_err(|e| Error::path("open", path, e))?;
        let context = load_context(&root)?;
        let metadata = Metadata::for_template(&root)?;
        debug!("Loaded template '{}' with {} context entries", metadata.tag, context.len());

        Ok(Self { path: root.join(TEMPLATE_DIR), context, metadata, mode: Mode::Interactive })
    }

    /// Makes [`Template::execute`] take every default without asking.
    pub fn use_default_values(&mut self) {
        self.mode = Mode::DefaultsOnly;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn info(&self) -> &Metadata {
        &self.metadata
    }

    pub fn context(&self) -> &ContextTree {
        &self.context
    }

    /// Directory holding the files that get rendered.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the template into `target`.
    ///
    /// `FileRendered` events are only forwarded to `observer` in interactive
    /// mode. Files written before a failure are left in place.
    pub fn execute<P: AsRef<Path>>(
        &self,
        target: P,
        prompter: Arc<dyn Prompter>,
        renderer: &dyn TemplateRenderer,
        observer: &mut dyn FnMut(RenderEvent),
    ) -> Result<()> {
        self.ensure_template_dir()?;
        let bindings = bind(&self.context, self.mode, prompter);
        let processor = Processor::new(renderer, &self.path, target.as_ref(), &bindings);

        let quiet = self.mode == Mode::DefaultsOnly;
        processor.run(&mut |event| {
            if quiet && matches!(event, RenderEvent::FileRendered(_)) {
                return;
            }
            observer(event)
        })
    }

    /// Checks that the template renders with its defaults.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of template entries checked
    pub fn validate(&self, renderer: &dyn TemplateRenderer) -> Result<usize> {
        self.ensure_template_dir()?;
        let bindings = bind(&self.context, Mode::DefaultsOnly, Arc::new(NoPrompter));
        Processor::new(renderer, &self.path, &self.path, &bindings).dry_run()
    }

    fn ensure_template_dir(&self) -> Result<()> {
        if !self.path.is_dir() {
            return Err(Error::TemplateError(format!(
                "template directory '{}' does not exist",
                self.path.display()
            )));
        }
        Ok(())
    }
}
