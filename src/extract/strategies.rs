//! Concrete field extraction strategies
//!
//! Each strategy locates one kind of datum in an item page. A strategy that
//! cannot find or parse its target returns `FieldValue::Absent`; it never
//! panics and never fails the listing.

use crate::extract::{Extractor, FieldValue};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Parameter list items on an item page.
const PARAM_ITEM_SELECTOR: &str = "ul.params-paramsList-_awNW > li";

/// The key span inside one parameter list item.
const PARAM_KEY_SELECTOR: &str = "span.styles-module-noAccent-l9CMS";

/// The address text node.
const ADDRESS_SELECTOR: &str = "span.style-item-address__string-wt61A";

/// The price element carrying a machine-readable value.
const PRICE_SELECTOR: &str = r#"span[itemprop="price"]"#;

/// Joins an element's text fragments with single spaces.
///
/// Each fragment is trimmed and empty fragments are dropped, so markup
/// nesting does not leak extra whitespace into the value.
fn joined_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The document's entire text content, markup stripped.
fn document_text(doc: &Html) -> String {
    doc.root_element().text().collect()
}

/// Keyed list-item lookup.
///
/// Scans the labeled parameter list for the entry whose key text contains
/// the keyword and returns the entry's remaining text with the keyword and
/// surrounding separator characters stripped.
///
/// Used for room count, area, repair, bathroom, terrace, house type, view,
/// parking, year built, elevator and the "extra" building attributes.
pub struct KeyedParam {
    keyword: String,
}

impl KeyedParam {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }
}

impl Extractor for KeyedParam {
    fn extract(&self, doc: &Html) -> FieldValue {
        let item_selector = match Selector::parse(PARAM_ITEM_SELECTOR) {
            Ok(s) => s,
            Err(_) => return FieldValue::Absent,
        };
        let key_selector = match Selector::parse(PARAM_KEY_SELECTOR) {
            Ok(s) => s,
            Err(_) => return FieldValue::Absent,
        };

        for item in doc.select(&item_selector) {
            let key_matches = item
                .select(&key_selector)
                .next()
                .map(|key| key.text().collect::<String>().contains(&self.keyword))
                .unwrap_or(false);

            if key_matches {
                let value = joined_text(item)
                    .replace(&self.keyword, "")
                    .trim_matches(|c| c == ' ' || c == ':')
                    .to_string();
                return FieldValue::Present(value);
            }
        }

        FieldValue::Absent
    }
}

/// Physical address lookup.
///
/// Reads the designated address node and normalizes embedded line breaks
/// to a single `|` delimiter.
pub struct Address;

impl Extractor for Address {
    fn extract(&self, doc: &Html) -> FieldValue {
        let selector = match Selector::parse(ADDRESS_SELECTOR) {
            Ok(s) => s,
            Err(_) => return FieldValue::Absent,
        };

        match doc.select(&selector).next() {
            Some(node) => {
                let text = node.text().collect::<String>();
                FieldValue::Present(text.trim().replace('\n', "|"))
            }
            None => FieldValue::Absent,
        }
    }
}

/// Price lookup.
///
/// Reads the machine-readable `content` attribute of the price element,
/// not its display text.
pub struct Price;

impl Extractor for Price {
    fn extract(&self, doc: &Html) -> FieldValue {
        let selector = match Selector::parse(PRICE_SELECTOR) {
            Ok(s) => s,
            Err(_) => return FieldValue::Absent,
        };

        doc.select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|content| FieldValue::Present(content.to_string()))
            .unwrap_or(FieldValue::Absent)
    }
}

/// Apartment-floor half of the floor-pair lookup.
///
/// The page carries a free-text fragment of the form
/// `"<apartment_floor>/<total_floors> <suffix>"`; this strategy returns the
/// numerator digits.
pub struct ApartmentFloor;

impl Extractor for ApartmentFloor {
    fn extract(&self, doc: &Html) -> FieldValue {
        let re = match Regex::new(r"(\d+)/") {
            Ok(r) => r,
            Err(_) => return FieldValue::Absent,
        };

        let text = document_text(doc);
        re.captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| FieldValue::Present(m.as_str().to_string()))
            .unwrap_or(FieldValue::Absent)
    }
}

/// Total-floors half of the floor-pair lookup.
///
/// Returns the denominator of the floor fraction, up to the next
/// whitespace. A fragment with nothing after the denominator is treated as
/// malformed and yields absent.
pub struct TotalFloors;

impl Extractor for TotalFloors {
    fn extract(&self, doc: &Html) -> FieldValue {
        let re = match Regex::new(r"\d+/(\S+)\s") {
            Ok(r) => r,
            Err(_) => return FieldValue::Absent,
        };

        let text = document_text(doc);
        re.captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| FieldValue::Present(m.as_str().to_string()))
            .unwrap_or(FieldValue::Absent)
    }
}

/// No-op strategy for unrecognized field identifiers.
pub struct Fallback;

impl Extractor for Fallback {
    fn extract(&self, _doc: &Html) -> FieldValue {
        FieldValue::Absent
    }
}
