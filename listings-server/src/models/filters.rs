//! Filter set for property queries
//!
//! Only `year`, `city` and `state` are recognized. Any other key in a filter
//! document or query string is dropped during deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar filter value, bound as a positional SQL parameter.
///
/// Values are never validated against the column type: a non-numeric year or
/// a numeric city is bound as-is and simply matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FilterValue {
    /// Interpret a raw query-string value, keeping integers numeric.
    pub fn from_text(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(raw.to_owned()))
    }

    /// Empty text means "no constraint".
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Optional constraints applied to the property query.
///
/// `null` in a filter document counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub year: Option<FilterValue>,
    #[serde(default)]
    pub city: Option<FilterValue>,
    #[serde(default)]
    pub state: Option<FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: impl Into<FilterValue>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<FilterValue>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<FilterValue>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Year constraint, if present and non-empty.
    pub fn year(&self) -> Option<&FilterValue> {
        non_empty(&self.year)
    }

    /// City constraint, if present and non-empty.
    pub fn city(&self) -> Option<&FilterValue> {
        non_empty(&self.city)
    }

    /// State constraint, if present and non-empty.
    pub fn state(&self) -> Option<&FilterValue> {
        non_empty(&self.state)
    }

    /// True when no recognized key carries a constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.year().is_none() && self.city().is_none() && self.state().is_none()
    }
}

fn non_empty(value: &Option<FilterValue>) -> Option<&FilterValue> {
    value.as_ref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_document_with_numeric_year() {
        let filters: FilterSet =
            serde_json::from_str(r#"{"year": 2020, "city": "bogota", "state": "pre_venta"}"#)
                .unwrap();

        assert_eq!(filters.year(), Some(&FilterValue::Int(2020)));
        assert_eq!(filters.city(), Some(&FilterValue::from("bogota")));
        assert_eq!(filters.state(), Some(&FilterValue::from("pre_venta")));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let filters: FilterSet =
            serde_json::from_str(r#"{"city": "medellin", "rooms": 3, "garage": true}"#).unwrap();

        assert_eq!(filters, FilterSet::new().with_city("medellin"));
    }

    #[test]
    fn empty_and_null_values_are_unconstrained() {
        let filters: FilterSet =
            serde_json::from_str(r#"{"year": null, "city": null, "state": ""}"#).unwrap();

        assert!(filters.is_unconstrained());
        assert!(FilterSet::new().is_unconstrained());
    }

    #[test]
    fn any_scalar_type_is_accepted_for_every_key() {
        let filters: FilterSet =
            serde_json::from_str(r#"{"year": true, "city": 2020, "state": 1.5}"#).unwrap();

        assert_eq!(filters.year(), Some(&FilterValue::Bool(true)));
        assert_eq!(filters.city(), Some(&FilterValue::Int(2020)));
        assert_eq!(filters.state(), Some(&FilterValue::Float(1.5)));
    }

    #[test]
    fn non_numeric_year_passes_through_as_text() {
        let filters: FilterSet = serde_json::from_str(r#"{"year": "invalid"}"#).unwrap();
        assert_eq!(filters.year(), Some(&FilterValue::Text("invalid".into())));

        assert_eq!(FilterValue::from_text("2021"), FilterValue::Int(2021));
        assert_eq!(
            FilterValue::from_text("twenty"),
            FilterValue::Text("twenty".into())
        );
    }
}
