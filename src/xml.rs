//! XML wire-format helpers.
//!
//! Braintree speaks kebab-case XML. Request types name their root element via
//! [`XmlRoot`]; response types decode through `quick_xml::de`, with
//! [`optional`] normalizing nil and empty elements to `None`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::Result;

/// A request body with a fixed root element.
pub trait XmlRoot: Serialize {
    const ROOT: &'static str;
}

/// Serialize a request body under its root element.
pub fn to_xml<T: XmlRoot>(value: &T) -> Result<String> {
    Ok(quick_xml::se::to_string_with_root(T::ROOT, value)?)
}

/// Deserialize a response document, ignoring the root element's name.
pub fn from_xml<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T> {
    Ok(quick_xml::de::from_str(body)?)
}

/// Decode `<x>value</x>` into `Some(value)`, and `<x nil="true"/>`, `<x/>` or
/// a missing element into `None`.
///
/// Use with `#[serde(default, deserialize_with = "crate::xml::optional")]`.
pub fn optional<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// `<ids type="array"><item>a</item><item>b</item></ids>`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ItemList {
    #[serde(default)]
    pub item: Vec<String>,
}
