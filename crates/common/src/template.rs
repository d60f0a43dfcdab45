//! Prompt templates with `{placeholder}` substitution.
//!
//! Templates are validated when parsed, so a malformed goal or task
//! description fails at crew construction instead of mid-pipeline. Rendering
//! errors on any placeholder without a binding, because an unresolved `{topic}` can
//! never reach an LLM call. Literal braces are written `{{` and `}}`.

use crate::error::{PostforgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    raw: String,
    placeholders: Vec<String>,
}

impl Template {
    /// Parse a template, extracting and validating its placeholders.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let mut placeholders = Vec::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        continue;
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                            Some(c) => {
                                return Err(PostforgeError::Template(format!(
                                    "Invalid character '{c}' in placeholder"
                                )));
                            }
                            None => {
                                return Err(PostforgeError::Template(
                                    "Unclosed '{' in template".to_string(),
                                ));
                            }
                        }
                    }
                    if name.is_empty() {
                        return Err(PostforgeError::Template(
                            "Empty placeholder in template".to_string(),
                        ));
                    }
                    if !placeholders.contains(&name) {
                        placeholders.push(name);
                    }
                }
                '}' => {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                    } else {
                        return Err(PostforgeError::Template(
                            "Unmatched '}' in template".to_string(),
                        ));
                    }
                }
                _ => {}
            }
        }

        Ok(Self { raw, placeholders })
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Render the template, substituting every placeholder from `vars`.
    pub fn render(&self, vars: &HashMap<String, String>) -> Result<String> {
        let mut out = String::with_capacity(self.raw.len());
        let mut chars = self.raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        out.push('{');
                        continue;
                    }
                    let mut name = String::new();
                    for c in chars.by_ref() {
                        if c == '}' {
                            break;
                        }
                        name.push(c);
                    }
                    let value = vars.get(&name).ok_or_else(|| {
                        PostforgeError::Template(format!("Unresolved placeholder '{{{name}}}'"))
                    })?;
                    out.push_str(value);
                }
                '}' => {
                    // Parse guarantees this is an escaped '}}'
                    chars.next();
                    out.push('}');
                }
                _ => out.push(c),
            }
        }

        Ok(out)
    }
}

impl TryFrom<String> for Template {
    type Error = PostforgeError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(raw)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.raw
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
