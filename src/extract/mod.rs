//! Field extraction module
//!
//! This module turns a parsed item document into field values. Each field
//! identifier maps to one extraction strategy; the registry performs that
//! mapping and supplies a fallback for identifiers it does not know, so an
//! unrecognized field can never abort a run.

mod strategies;

pub use strategies::{Address, ApartmentFloor, Fallback, KeyedParam, Price, TotalFloors};

use scraper::Html;
use std::collections::HashMap;

/// The extracted value of one field: present text or absent.
///
/// Absent is a normal outcome (missing node, malformed fragment, unknown
/// identifier), never an error. It serializes as an empty output cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    Absent,
}

impl FieldValue {
    /// The cell text written to the output sink.
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Present(s) => s,
            FieldValue::Absent => "",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => FieldValue::Present(s),
            None => FieldValue::Absent,
        }
    }
}

/// One field extraction strategy.
///
/// Strategies differ only in how they locate and normalize text within the
/// document; all share this contract. Extraction is a pure function of the
/// document content and must not perform I/O.
pub trait Extractor: Send + Sync {
    fn extract(&self, doc: &Html) -> FieldValue;
}

/// Maps field identifiers to extraction strategies.
///
/// Built once at startup from the known vocabulary. Resolution always
/// returns a usable extractor: unknown identifiers get the fallback
/// strategy (deterministically absent) and a diagnostic, never an error.
pub struct ExtractorRegistry {
    strategies: HashMap<&'static str, Box<dyn Extractor>>,
    fallback: Fallback,
}

impl ExtractorRegistry {
    /// Builds the registry over the known field vocabulary.
    pub fn new() -> Self {
        let mut strategies: HashMap<&'static str, Box<dyn Extractor>> = HashMap::new();

        strategies.insert("physical address", Box::new(Address));
        strategies.insert("price", Box::new(Price));
        strategies.insert("apartment floor", Box::new(ApartmentFloor));
        strategies.insert("number of floors", Box::new(TotalFloors));
        strategies.insert(
            "number of rooms",
            Box::new(KeyedParam::new("Количество комнат")),
        );
        strategies.insert(
            "area of apartment",
            Box::new(KeyedParam::new("Общая площадь")),
        );
        strategies.insert("repair", Box::new(KeyedParam::new("Ремонт")));
        strategies.insert("bathroom", Box::new(KeyedParam::new("Санузел")));
        strategies.insert(
            "view from the windows",
            Box::new(KeyedParam::new("Окна")),
        );
        strategies.insert(
            "terrace",
            Box::new(KeyedParam::new("Балкон или лоджия")),
        );
        strategies.insert(
            "year of construction",
            Box::new(KeyedParam::new("Год постройки")),
        );
        strategies.insert(
            "elevator",
            Box::new(KeyedParam::new("Пассажирский лифт")),
        );
        strategies.insert("extra", Box::new(KeyedParam::new("В доме")));
        strategies.insert("type of house", Box::new(KeyedParam::new("Тип дома")));
        strategies.insert("parking", Box::new(KeyedParam::new("Парковка")));

        Self {
            strategies,
            fallback: Fallback,
        }
    }

    /// Resolves a field identifier to its strategy.
    ///
    /// Unknown identifiers resolve to the fallback and log a diagnostic;
    /// no error is ever signaled to the caller.
    pub fn resolve(&self, field: &str) -> &dyn Extractor {
        match self.strategies.get(field) {
            Some(strategy) => strategy.as_ref(),
            None => {
                tracing::warn!(field, "No extractor registered for field, value will be absent");
                &self.fallback
            }
        }
    }

    /// Whether the identifier belongs to the known vocabulary.
    pub fn is_known(&self, field: &str) -> bool {
        self.strategies.contains_key(field)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
