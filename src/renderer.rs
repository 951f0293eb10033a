//! Template renderer for Stencil.
//! Wraps a MiniJinja environment configured for scaffolding: strict undefined
//! variables, trailing newlines kept, and the helper library registered.
use crate::error::Result;
use crate::helpers;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use std::io::Write;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `name` - Name reported in error messages
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, name: &str, template: &str, context: &Value) -> Result<String>;

    /// Renders a template string straight into `out`.
    fn render_to(&self, name: &str, template: &str, context: &Value, out: &mut dyn Write) -> Result<()>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new renderer with the helper library registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        // Generated files are source code, not HTML.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        helpers::register(&mut env);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not parse or fails
    ///   while rendering
    fn render(&self, name: &str, template: &str, context: &Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), template.to_string())?;

        let tmpl = env.get_template(name)?;
        Ok(tmpl.render(context)?)
    }

    fn render_to(&self, name: &str, template: &str, context: &Value, out: &mut dyn Write) -> Result<()> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), template.to_string())?;

        let tmpl = env.get_template(name)?;
        tmpl.render_to_write(context, out)?;
        Ok(())
    }
}
