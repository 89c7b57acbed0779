//! Prompt templates kept as data.
//!
//! A [`PromptTemplate`] is a named template source plus a substitution map.
//! Rendering is pure: the same template and variables always produce the
//! same prompt text.

use minijinja::{Environment, UndefinedBehavior};
use std::collections::BTreeMap;
use thiserror::Error;

/// Substitution map used to render a template
pub type TemplateVars = BTreeMap<&'static str, String>;

#[derive(Error, Debug)]
#[error("Failed to render prompt template '{name}': {source}")]
pub struct TemplateError {
    pub name: &'static str,
    #[source]
    pub source: minijinja::Error,
}

/// A named prompt template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub source: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Render the template. Every variable the template references must be
    /// present in `vars`.
    pub fn render(&self, vars: &TemplateVars) -> Result<String, TemplateError> {
        let wrap = |source| TemplateError {
            name: self.name,
            source,
        };

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(self.name, self.source).map_err(wrap)?;
        let template = env.get_template(self.name).map_err(wrap)?;
        template.render(vars).map_err(wrap)
    }
}
