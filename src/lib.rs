//! Injects the AMP runtime and required custom-element `<script>` tags into
//! AMP HTML documents.
//!
//! Two strategies are available. [`Strategy::Static`] inspects the document's
//! element names and attributes. [`Strategy::Scrape`] runs the AMP validator
//! and copies the script tags it asks for from each component's
//! documentation page, caching them for the rest of the run.

pub mod cache;
pub mod config;
pub mod constants;
pub mod docs;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod validator;

pub use cache::ScriptUrlCache;
pub use config::{Config, Rules, Strategy};
pub use docs::{DocumentationSource, HttpDocs};
pub use error::{InjectError, Result};
pub use resolver::Resolver;
pub use validator::{CommandValidator, Validator};
