//! Advanced search queries and results.
//!
//! A [`SearchQuery`] is an ordered set of named criteria serialized under
//! `<search>`. Each criterion is one of three shapes:
//!
//! ```xml
//! <search>
//!   <order-id><starts-with>inv-</starts-with></order-id>
//!   <amount><min>10.00</min><max>20.00</max></amount>
//!   <status type="array"><item>settled</item><item>settling</item></status>
//! </search>
//! ```

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::pagination;
use crate::xml::{ItemList, XmlRoot};

/// Free-text criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_not: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
}

/// Inclusive range criterion over amounts or timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

impl RangeField {
    pub fn is(&mut self, value: impl fmt::Display) -> &mut Self {
        self.is = Some(value.to_string());
        self
    }

    pub fn min(&mut self, value: impl fmt::Display) -> &mut Self {
        self.min = Some(value.to_string());
        self
    }

    pub fn max(&mut self, value: impl fmt::Display) -> &mut Self {
        self.max = Some(value.to_string());
        self
    }
}

/// Membership criterion: matches records whose field is any of `items`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiField {
    pub items: Vec<String>,
}

#[derive(Serialize)]
struct MultiFieldXml<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    item: &'a [String],
}

impl Serialize for MultiField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MultiFieldXml {
            kind: "array",
            item: &self.items,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchField {
    Text(TextField),
    Range(RangeField),
    Multi(MultiField),
}

impl Serialize for SearchField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchField::Text(field) => field.serialize(serializer),
            SearchField::Range(field) => field.serialize(serializer),
            SearchField::Multi(field) => field.serialize(serializer),
        }
    }
}

/// Ordered collection of named search criteria.
///
/// Field names are the gateway's kebab-case names (`order-id`,
/// `created-at`, `ids`, ...). Adding a field under an existing name replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    fields: Vec<(String, SearchField)>,
}

macro_rules! field_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        /// Add (or replace) a criterion under `name` and return it for editing.
        pub fn $name(&mut self, name: &str) -> &mut $ty {
            let index = self.slot(name, SearchField::$variant(<$ty>::default()));
            match &mut self.fields[index].1 {
                SearchField::$variant(field) => field,
                _ => unreachable!("slot stores the requested variant"),
            }
        }
    };
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    field_accessor!(add_text_field, Text, TextField);
    field_accessor!(add_range_field, Range, RangeField);
    field_accessor!(add_multi_field, Multi, MultiField);

    /// Criteria in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &SearchField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this query restricted to the given record IDs.
    pub(crate) fn restricted_to(&self, ids: &[String]) -> Self {
        let mut query = self.clone();
        query.add_multi_field("ids").items = ids.to_vec();
        query
    }

    /// Index of a fresh field named `name`, replacing any existing one in place.
    fn slot(&mut self, name: &str, field: SearchField) -> usize {
        match self.fields.iter().position(|(existing, _)| existing == name) {
            Some(index) => {
                self.fields[index].1 = field;
                index
            }
            None => {
                self.fields.push((name.to_string(), field));
                self.fields.len() - 1
            }
        }
    }
}

impl Serialize for SearchQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

impl XmlRoot for SearchQuery {
    const ROOT: &'static str = "search";
}

/// Full ID list of a search, fetched once and sliced into pages.
///
/// Decoded from:
///
/// ```xml
/// <search-results>
///   <page-size type="integer">50</page-size>
///   <ids type="array"><item>a1</item><item>b2</item></ids>
/// </search-results>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "SearchResultXml")]
pub struct SearchResult {
    pub page_size: usize,
    pub ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SearchResultXml {
    #[serde(default)]
    page_size: usize,
    #[serde(default)]
    ids: ItemList,
}

impl From<SearchResultXml> for SearchResult {
    fn from(xml: SearchResultXml) -> Self {
        Self {
            page_size: xml.page_size,
            ids: xml.ids.item,
        }
    }
}

impl SearchResult {
    pub fn total_items(&self) -> usize {
        self.ids.len()
    }

    /// Number of pages the ID list spans.
    pub fn page_count(&self) -> usize {
        pagination::page_count(self.page_size, self.ids.len())
    }

    /// IDs on the 1-based `page`, or `None` once past the end.
    pub fn page_ids(&self, page: usize) -> Option<&[String]> {
        pagination::page_bounds(page, self.page_size, self.ids.len()).map(|range| &self.ids[range])
    }
}

/// One fetched page of search results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// 1-based page number
    pub current_page_number: usize,

    pub page_size: usize,

    /// Total matches across all pages
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Whether no further page follows this one.
    pub fn is_last(&self) -> bool {
        pagination::page_bounds(
            self.current_page_number.saturating_add(1),
            self.page_size,
            self.total_items,
        )
        .is_none()
    }
}
