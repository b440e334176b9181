#![allow(dead_code)]

use amp_inject::models::{ValidationError, ValidationResult, ValidationStatus};
use amp_inject::{Config, DocumentationSource, InjectError, Resolver, Result, ScriptUrlCache, Strategy, Validator};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const CDN: &str = "https://cdn.ampproject.org";

pub fn base_tag() -> String {
    format!(r#"<script async src="{CDN}/v0.js"></script>"#)
}

pub fn element_tag(id: &str) -> String {
    format!(r#"<script async custom-element="{id}" src="{CDN}/v0/{id}-latest.js"></script>"#)
}

pub fn page(body: &str) -> String {
    format!(
        "<!doctype html>\n<html amp>\n<head>\n<meta charset=\"utf-8\">\n${{ampjs}}\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Returns the same report for every document and counts calls.
#[derive(Clone)]
pub struct StubValidator {
    pub result: ValidationResult,
    pub calls: Arc<AtomicUsize>,
}

impl StubValidator {
    pub fn passing() -> Self {
        Self::with(ValidationStatus::Pass, Vec::new())
    }

    pub fn missing(elements: &[(&str, &str)]) -> Self {
        let errors = elements
            .iter()
            .map(|(element, url)| ValidationError {
                severity: "ERROR".into(),
                message: format!("The tag '{element}' requires including the '{element}' extension JavaScript."),
                spec_url: url.to_string(),
                category: "MANDATORY_AMP_TAG_MISSING_OR_INCORRECT".into(),
                code: "MISSING_REQUIRED_EXTENSION".into(),
                params: vec![element.to_string(), element.to_string()],
                ..Default::default()
            })
            .collect();
        Self::with(ValidationStatus::Fail, errors)
    }

    pub fn with(status: ValidationStatus, errors: Vec<ValidationError>) -> Self {
        Self {
            result: ValidationResult { status, errors },
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Validator for StubValidator {
    async fn validate(&self, _html: &str) -> Result<ValidationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Serves canned pages by URL and counts fetches.
#[derive(Clone, Default)]
pub struct StubDocs {
    pub pages: Arc<HashMap<String, String>>,
    pub fetches: Arc<AtomicUsize>,
    pub delay: Option<Duration>,
}

impl StubDocs {
    pub fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: Arc::new(pages.iter().map(|(u, p)| (u.to_string(), p.clone())).collect()),
            ..Default::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DocumentationSource for StubDocs {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.pages.get(url).cloned().ok_or_else(|| InjectError::Fetch {
            url: url.to_string(),
            reason: "HTTP error: 404 Not Found".into(),
        })
    }
}

/// A documentation page whose code samples show the given script tags.
pub fn doc_page(tags: &[&str]) -> String {
    let samples: String = tags
        .iter()
        .map(|t| format!("<pre><code>{}</code></pre>\n", t.replace('<', "&lt;").replace('>', "&gt;")))
        .collect();
    format!("<html><body><main>{samples}</main></body></html>")
}

pub fn resolver(
    strategy: Strategy,
    validator: StubValidator,
    docs: StubDocs,
    cache: ScriptUrlCache,
) -> Resolver<StubValidator, StubDocs> {
    let config = Config {
        strategy,
        ..Config::default()
    };
    Resolver::new(&config, validator, docs, cache)
}

pub fn static_resolver() -> Resolver<StubValidator, StubDocs> {
    resolver(
        Strategy::Static,
        StubValidator::passing(),
        StubDocs::default(),
        ScriptUrlCache::new(),
    )
}
