use lazy_static::lazy_static;
use regex::Regex;

/// Marker in source HTML replaced by the runtime and custom-element scripts.
pub const PLACEHOLDER: &str = "${ampjs}";

pub const CDN_BASE: &str = "https://cdn.ampproject.org";

/// Only tags carrying this prefix can need a custom-element script.
pub const ELEMENT_PREFIX: &str = "amp-";

/// Elements handled by the base runtime, so no script tag is emitted for them.
pub const DEFAULT_EXCLUDED: &[&str] = &["amp-img", "amp-pixel", "amp-layout", "amp-web-push-widget"];

/// Elements whose script is published under a different name.
/// `<amp-state>` is served by the amp-bind script, for example.
pub const DEFAULT_REMAP: &[(&str, &str)] = &[("amp-state", "amp-bind")];

pub const DEFAULT_SRC_DIR: &str = "src/html/pages";
pub const DEFAULT_DEST_DIR: &str = "dist";
pub const DEFAULT_ASSETS_DIR: &str = "src/img";
pub const DEFAULT_ASSETS_DEST: &str = "img";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_VALIDATOR: &str = "amphtml-validator";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const CONFIG_FILE_NAME: &str = "amp-inject.toml";

// Validator diagnostic that means a required extension script is absent.
pub const MISSING_EXTENSION_CATEGORY: &str = "MANDATORY_AMP_TAG_MISSING_OR_INCORRECT";
pub const MISSING_EXTENSION_CODE: &str = "MISSING_REQUIRED_EXTENSION";

pub const STATE_BINDING_ELEMENT: &str = "amp-bind";
pub const ACCESS_ELEMENT: &str = "amp-access";
pub const ANALYTICS_ELEMENT: &str = "amp-analytics";
pub const LATERPAY_ELEMENT: &str = "amp-access-laterpay";
pub const ACCESS_ATTRIBUTE: &str = "amp-access";
pub const ACCESS_SCRIPT_ID: &str = "amp-access";
pub const LATERPAY_DIALOG_ID: &str = "amp-access-laterpay-dialog";

lazy_static! {
    /// `AMP.setState(...)` / `AMP.pushState(...)` inside an `on` attribute.
    pub static ref STATE_CALL: Regex = Regex::new(r"AMP\.(setState|pushState)").unwrap();

    /// A complete custom-element script tag as published in code samples.
    pub static ref SCRIPT_TAG: Regex =
        Regex::new(r#"<script async custom-element="[^"]+" src="[^"]+"></script>"#).unwrap();
}
