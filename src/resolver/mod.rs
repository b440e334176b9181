//! Works out which AMP extension scripts a document needs and injects them.

pub mod detectors;
pub mod discovery;
pub mod scrape;

use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

pub use crate::config::Strategy;
use crate::cache::ScriptUrlCache;
use crate::config::{Config, Rules};
use crate::docs::DocumentationSource;
use crate::dom::{DomQuery, HtmlDocument};
use crate::error::Result;
use crate::render::TagRenderer;
use crate::validator::Validator;

/// Resolves and injects custom-element scripts for one document at a time.
///
/// A single resolver is shared by every document in a build, so the cache
/// handed to it is shared too. The validator and documentation source are
/// only used by [`Strategy::Scrape`].
pub struct Resolver<V, D> {
    strategy: Strategy,
    rules: Rules,
    renderer: TagRenderer,
    validator: V,
    docs: D,
    cache: ScriptUrlCache,
    timeout: Duration,
}

impl<V: Validator, D: DocumentationSource> Resolver<V, D> {
    pub fn new(config: &Config, validator: V, docs: D, cache: ScriptUrlCache) -> Self {
        Self {
            strategy: config.strategy,
            rules: config.rules(),
            renderer: TagRenderer::from_config(config),
            validator,
            docs,
            cache,
            timeout: config.scrape.timeout(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn cache(&self) -> &ScriptUrlCache {
        &self.cache
    }

    /// Returns `raw` with the placeholder replaced by the base runtime tag and
    /// every required extension script.
    /// Fails before any validation or fetching when the placeholder is absent.
    pub async fn process(&self, raw: &str) -> Result<String> {
        self.renderer.ensure_placeholder(raw)?;
        match self.strategy {
            Strategy::Static => {
                let elements = self.required_elements(raw);
                debug!("Required elements: {:?}", elements);
                self.renderer.inject_elements(raw, &elements)
            }
            Strategy::Scrape => {
                let tags = scrape::missing_script_tags(
                    raw,
                    &self.validator,
                    &self.docs,
                    &self.cache,
                    self.timeout,
                )
                .await?;
                debug!("Missing script tags: {:?}", tags);
                self.renderer.inject_tags(raw, &tags)
            }
        }
    }

    /// Static discovery: element names plus attribute-implied dependencies.
    pub fn required_elements(&self, raw: &str) -> BTreeSet<String> {
        required_elements(&HtmlDocument::parse(raw), &self.rules)
    }
}

pub fn required_elements<Q: DomQuery>(doc: &Q, rules: &Rules) -> BTreeSet<String> {
    let mut elements = discovery::elements_from_tag_names(doc, rules);
    elements.extend(detectors::implicit_elements(doc).into_iter().map(String::from));
    elements
}
