//! Dependencies implied by attributes rather than by element names.
//!
//! Some components can be driven purely from attribute syntax (an `on`
//! handler calling `AMP.setState`, an `amp-access` expression) without
//! their element ever appearing in the markup.

use crate::constants::{
    ACCESS_ATTRIBUTE, ACCESS_ELEMENT, ACCESS_SCRIPT_ID, ANALYTICS_ELEMENT, LATERPAY_DIALOG_ID,
    LATERPAY_ELEMENT, STATE_BINDING_ELEMENT, STATE_CALL,
};
use crate::dom::{DomElement, DomQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detector {
    /// `on="tap:AMP.setState(...)"` needs amp-bind even without `<amp-state>`.
    StateBinding,
    /// Access control also pulls in analytics.
    AccessControl,
    /// The LaterPay dialog needs the LaterPay access variant.
    PaywallVariant,
}

impl Detector {
    pub const ALL: [Detector; 3] = [
        Detector::StateBinding,
        Detector::AccessControl,
        Detector::PaywallVariant,
    ];

    pub fn required(&self) -> &'static [&'static str] {
        match self {
            Detector::StateBinding => &[STATE_BINDING_ELEMENT],
            Detector::AccessControl => &[ACCESS_ELEMENT, ANALYTICS_ELEMENT],
            Detector::PaywallVariant => &[LATERPAY_ELEMENT],
        }
    }

    pub fn matches<D: DomQuery>(&self, doc: &D) -> bool {
        match self {
            Detector::StateBinding => doc
                .find_elements_with_attribute("on")
                .iter()
                .filter_map(|el| el.get_attribute("on"))
                .any(|handler| STATE_CALL.is_match(handler)),
            Detector::AccessControl => {
                !doc.find_elements_with_attribute(ACCESS_ATTRIBUTE).is_empty()
                    || doc
                        .find_elements_with_attribute_value("id", ACCESS_SCRIPT_ID)
                        .iter()
                        .any(|el| el.tag_name() == "script")
            }
            Detector::PaywallVariant => !doc
                .find_elements_with_attribute_value("id", LATERPAY_DIALOG_ID)
                .is_empty(),
        }
    }
}

/// Union of the dependencies of every detector that fires on `doc`.
pub fn implicit_elements<D: DomQuery>(doc: &D) -> Vec<&'static str> {
    Detector::ALL
        .into_iter()
        .filter(|d| d.matches(doc))
        .flat_map(|d| d.required().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;

    fn fired(html: &str) -> Vec<Detector> {
        let doc = HtmlDocument::parse(html);
        Detector::ALL.into_iter().filter(|d| d.matches(&doc)).collect()
    }

    #[test]
    fn set_state_in_on_attribute() {
        assert_eq!(
            fired(r#"<button on="tap:AMP.setState({open: true})">x</button>"#),
            vec![Detector::StateBinding]
        );
        assert_eq!(
            fired(r#"<button on="tap:AMP.pushState({n: 1})">x</button>"#),
            vec![Detector::StateBinding]
        );
    }

    #[test]
    fn other_on_handlers_do_not_fire() {
        assert!(fired(r#"<button on="tap:sidebar.toggle">x</button>"#).is_empty());
    }

    #[test]
    fn access_attribute_or_script() {
        assert_eq!(fired(r#"<div amp-access="subscriber">x</div>"#), vec![Detector::AccessControl]);
        assert_eq!(
            fired(r#"<script id="amp-access" type="application/json">{}</script>"#),
            vec![Detector::AccessControl]
        );
        assert!(fired(r#"<script id="other" type="application/json">{}</script>"#).is_empty());
    }

    #[test]
    fn laterpay_dialog() {
        assert_eq!(
            fired(r#"<div id="amp-access-laterpay-dialog"></div>"#),
            vec![Detector::PaywallVariant]
        );
    }

    #[test]
    fn access_id_on_other_elements_is_not_the_config_script() {
        assert!(fired(r#"<div id="amp-access">x</div>"#).is_empty());
    }

    #[test]
    fn laterpay_needs_the_exact_id() {
        assert!(fired(r#"<div id="amp-access-laterpay-dialog-extra"></div>"#).is_empty());
    }

    #[test]
    fn detectors_are_additive() {
        let doc = HtmlDocument::parse(
            r#"<div amp-access="x"></div>
               <div id="amp-access-laterpay-dialog"></div>
               <a on="tap:AMP.setState({})">y</a>"#,
        );
        let mut found = implicit_elements(&doc);
        found.sort();
        assert_eq!(
            found,
            vec!["amp-access", "amp-access-laterpay", "amp-analytics", "amp-bind"]
        );
    }
}
