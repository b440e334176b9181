use std::collections::BTreeSet;

use crate::constants::SCRIPT_TAG;
use crate::dom::HtmlDocument;

/// Collects every literal custom-element `<script>` tag shown in the
/// `<code>` samples of a documentation page.
///
/// Copying the tags verbatim keeps the injected markup identical to the
/// published guidance, including components that need more than one script.
/// An empty result means the page layout no longer matches.
pub fn extract_script_tags(html: &str) -> BTreeSet<String> {
    let document = HtmlDocument::parse(html);

    document
        .text_of("code")
        .iter()
        .flat_map(|sample| {
            SCRIPT_TAG
                .find_iter(sample)
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
