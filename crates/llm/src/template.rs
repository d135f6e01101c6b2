//! Prompt template rendering.
//!
//! Templates are plain text with `{{ name }}` placeholders, looked up by name
//! on the agent and rendered against a variable map.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use agent_relay_core::{CoreError, CoreResult};

/// Renders a template string with a variable mapping.
pub trait TemplateRender: Send + Sync {
    fn render(&self, template: &str, variables: &HashMap<String, Value>) -> CoreResult<String>;
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}").expect("valid placeholder pattern")
    })
}

/// `{{ name }}` substitution renderer.
///
/// Lenient by default: unknown placeholders render as empty text. In strict
/// mode the first unknown placeholder is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer {
    strict: bool,
}

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl TemplateRender for PlaceholderRenderer {
    fn render(&self, template: &str, variables: &HashMap<String, Value>) -> CoreResult<String> {
        let pattern = placeholder_pattern();

        if self.strict {
            if let Some(missing) = pattern
                .captures_iter(template)
                .map(|c| c[1].to_string())
                .find(|name| !variables.contains_key(name))
            {
                return Err(CoreError::template(format!(
                    "unfilled placeholder {{{{{}}}}}",
                    missing
                )));
            }
        }

        let rendered = pattern.replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
            None => {
                tracing::debug!("[PlaceholderRenderer] no value for '{}'", &caps[1]);
                String::new()
            }
        });

        Ok(rendered.into_owned())
    }
}
