use std::collections::BTreeSet;
use tracing::warn;

use crate::config::Config;
use crate::error::{InjectError, Result};

/// Turns resolved dependencies into script markup and splices it into the
/// document in place of the placeholder.
#[derive(Debug, Clone)]
pub struct TagRenderer {
    cdn_base: String,
    placeholder: String,
}

impl TagRenderer {
    pub fn new(cdn_base: &str, placeholder: &str) -> Self {
        Self {
            cdn_base: cdn_base.trim_end_matches('/').to_string(),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.cdn_base, &config.placeholder)
    }

    pub fn base_tag(&self) -> String {
        format!(r#"<script async src="{}/v0.js"></script>"#, self.cdn_base)
    }

    pub fn element_tag(&self, element: &str) -> String {
        format!(
            r#"<script async custom-element="{element}" src="{}/v0/{element}-latest.js"></script>"#,
            self.cdn_base
        )
    }

    /// Replaces the placeholder with the base tag followed by one canonical
    /// tag per identifier.
    pub fn inject_elements(&self, raw: &str, elements: &BTreeSet<String>) -> Result<String> {
        self.ensure_placeholder(raw)?;
        let block = std::iter::once(self.base_tag())
            .chain(elements.iter().map(|e| self.element_tag(e)))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(raw.replacen(&self.placeholder, &block, 1))
    }

    /// Splits the document at the placeholder and rebuilds it as
    /// head, base tag, the literal `tags`, tail, one per line.
    pub fn inject_tags(&self, raw: &str, tags: &BTreeSet<String>) -> Result<String> {
        self.ensure_placeholder(raw)?;
        let (head, tail) = raw
            .split_once(self.placeholder.as_str())
            .ok_or_else(|| self.not_found())?;

        let mut parts = vec![head.to_string(), self.base_tag()];
        parts.extend(tags.iter().cloned());
        parts.push(tail.to_string());
        Ok(parts.join("\n"))
    }

    pub(crate) fn ensure_placeholder(&self, raw: &str) -> Result<()> {
        match raw.matches(self.placeholder.as_str()).count() {
            0 => Err(self.not_found()),
            1 => Ok(()),
            n => {
                warn!(
                    "Placeholder {} appears {} times; only the first is replaced",
                    self.placeholder, n
                );
                Ok(())
            }
        }
    }

    fn not_found(&self) -> InjectError {
        InjectError::PlaceholderNotFound {
            placeholder: self.placeholder.clone(),
        }
    }
}

impl Default for TagRenderer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
