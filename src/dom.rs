//! Minimal DOM query surface used by the resolver.
//!
//! The resolver only needs to find elements by tag or by attribute and read
//! attribute values, so it depends on [`DomQuery`] rather than on a parser.
//! [`HtmlDocument`] provides the implementation over `scraper`.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

pub trait DomElement {
    /// Lower-case tag name.
    fn tag_name(&self) -> &str;
    fn get_attribute(&self, name: &str) -> Option<&str>;
}

pub trait DomQuery {
    type Element<'a>: DomElement
    where
        Self: 'a;

    /// `"*"` returns every element in document order.
    fn find_elements_by_tag(&self, tag: &str) -> Vec<Self::Element<'_>>;
    fn find_elements_with_attribute(&self, name: &str) -> Vec<Self::Element<'_>>;
    /// Elements whose `name` attribute equals `value` exactly.
    fn find_elements_with_attribute_value(&self, name: &str, value: &str)
    -> Vec<Self::Element<'_>>;
    fn serialize(&self) -> String;
}

impl DomElement for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                warn!("Ignoring unusable selector '{}': {:?}", css, e);
                Vec::new()
            }
        }
    }

    /// Text content of every element matching `tag`.
    pub fn text_of(&self, tag: &str) -> Vec<String> {
        self.find_elements_by_tag(tag)
            .into_iter()
            .map(|el| el.text().collect::<String>())
            .collect()
    }
}

impl DomQuery for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn find_elements_by_tag(&self, tag: &str) -> Vec<ElementRef<'_>> {
        self.select(tag)
    }

    fn find_elements_with_attribute(&self, name: &str) -> Vec<ElementRef<'_>> {
        self.select(&format!("[{}]", name))
    }

    fn find_elements_with_attribute_value(&self, name: &str, value: &str) -> Vec<ElementRef<'_>> {
        let value = value.replace('\\', "\\\\").replace('"', "\\\"");
        self.select(&format!("[{}=\"{}\"]", name, value))
    }

    fn serialize(&self) -> String {
        self.html.html()
    }
}
