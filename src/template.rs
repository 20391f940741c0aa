//! String templates for platform labels and location strings.
//!
//! Templates use Jinja syntax (`{{helperText}}`, `{{eventTypeString}} {{eventStation}}`).
//! Rendering is a pure function of the template text and a JSON context, so the
//! engine can be swapped out in tests.

use crate::error::AppError;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::Value;

/// Renders a template string against a context mapping.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `template` with the fields of `context`.
    ///
    /// Fails with [`AppError::TemplateRender`] on syntax errors and on
    /// references to fields the context does not define.
    fn render(&self, template: &str, context: &Value) -> Result<String, AppError>;
}

/// [`TemplateRenderer`] backed by minijinja with strict undefined handling
pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, AppError> {
        self.env
            .render_str(template, context)
            .map_err(|e| AppError::template_render(template, e.to_string()))
    }
}
