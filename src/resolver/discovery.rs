use std::collections::BTreeSet;

use crate::config::Rules;
use crate::dom::{DomElement, DomQuery};

/// Identifiers implied by the tag names present in `doc`, after exclusion
/// and remapping.
pub fn elements_from_tag_names<D: DomQuery>(doc: &D, rules: &Rules) -> BTreeSet<String> {
    doc.find_elements_by_tag("*")
        .iter()
        .filter_map(|el| rules.canonical(el.tag_name()))
        .collect()
}
