use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::ScriptUrlCache;
use crate::docs::DocumentationSource;
use crate::error::{InjectError, Result};
use crate::extractor::extract_script_tags;
use crate::models::ValidationStatus;
use crate::validator::Validator;

/// Validates `raw` and returns the literal script tags for every extension
/// the validator reports missing.
pub async fn missing_script_tags<V, D>(
    raw: &str,
    validator: &V,
    docs: &D,
    cache: &ScriptUrlCache,
    timeout: Duration,
) -> Result<BTreeSet<String>>
where
    V: Validator,
    D: DocumentationSource,
{
    let result = validator.validate(raw).await?;
    if result.passed() {
        debug!("Document passes validation, no extensions missing");
        return Ok(BTreeSet::new());
    }
    if result.status != ValidationStatus::Fail {
        return Err(InjectError::Validator(format!(
            "validator returned status {:?}",
            result.status
        )));
    }

    let mut tags = BTreeSet::new();
    for diagnostic in result.missing_extensions() {
        let element = diagnostic.element().ok_or_else(|| {
            InjectError::Validator(format!(
                "missing-extension diagnostic without an element name: {}",
                diagnostic.message
            ))
        })?;
        tags.extend(script_tags_for(element, &diagnostic.spec_url, docs, cache, timeout).await?);
    }
    Ok(tags)
}

/// Script tags for one element, from the cache or its documentation page.
///
/// A page that yields no tags is an error and leaves the cache untouched.
pub async fn script_tags_for<D: DocumentationSource>(
    element: &str,
    url: &str,
    docs: &D,
    cache: &ScriptUrlCache,
    timeout: Duration,
) -> Result<BTreeSet<String>> {
    if let Some(tags) = cache.get(element) {
        debug!("Cache hit for {}", element);
        return Ok(tags);
    }
    debug!("Cache miss for {}, looking up {}", element, url);

    let page = tokio::time::timeout(timeout, docs.fetch(url))
        .await
        .map_err(|_| InjectError::Lookup {
            element: element.to_string(),
            url: url.to_string(),
            reason: format!("timed out after {}s", timeout.as_secs()),
        })??;

    let tags = extract_script_tags(&page);
    if tags.is_empty() {
        return Err(InjectError::Lookup {
            element: element.to_string(),
            url: url.to_string(),
            reason: "no script tags found in code samples (documentation format changed?)"
                .to_string(),
        });
    }

    info!("Resolved {} script tag(s) for {}", tags.len(), element);
    cache.insert(element, tags.clone());
    Ok(tags)
}
