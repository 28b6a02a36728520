use std::collections::BTreeSet;

use crate::palette::spectral;

pub const DEFAULT_UNKNOWN_COLOR: &str = "#cccccc";

/// Categorical color scale.
///
/// The domain is the distinct present categories in descending order and
/// the range is the Spectral scheme of the same size. Absent categories are
/// never part of the domain and map to the `unknown` color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalScale {
    domain: Vec<String>,
    range: Vec<String>,
    unknown: String,
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self {
            domain: Vec::new(),
            range: Vec::new(),
            unknown: DEFAULT_UNKNOWN_COLOR.to_string(),
        }
    }
}

impl OrdinalScale {
    pub fn from_categories<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();
        let domain: Vec<String> = distinct.into_iter().rev().map(str::to_string).collect();
        let range = spectral(domain.len())
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            domain,
            range,
            ..Self::default()
        }
    }

    pub fn with_unknown(mut self, color: impl Into<String>) -> Self {
        self.unknown = color.into();
        self
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> &[String] {
        &self.range
    }

    pub fn unknown(&self) -> &str {
        &self.unknown
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    pub fn color(&self, category: Option<&str>) -> &str {
        category
            .and_then(|c| self.domain.iter().position(|d| d == c))
            .and_then(|i| self.range.get(i % self.range.len().max(1)))
            .map_or(self.unknown.as_str(), String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_UNKNOWN_COLOR, OrdinalScale};
    use pretty_assertions::assert_eq;

    #[test]
    fn domain_is_distinct_and_descending() {
        let scale = OrdinalScale::from_categories([Some("B"), Some("A"), Some("C"), Some("A")]);
        assert_eq!(scale.domain(), &["C", "B", "A"]);
        assert_eq!(scale.range(), &["#fc8d59", "#ffffbf", "#99d594"]);
        assert_eq!(scale.color(Some("C")), "#fc8d59");
        assert_eq!(scale.color(Some("A")), "#99d594");
    }

    #[test]
    fn absent_categories_use_fallback() {
        let scale = OrdinalScale::from_categories([Some("x"), None, Some("y")]);
        assert_eq!(scale.domain(), &["y", "x"]);
        assert_eq!(scale.color(None), DEFAULT_UNKNOWN_COLOR);
        assert_eq!(scale.color(Some("z")), DEFAULT_UNKNOWN_COLOR);

        let scale = scale.with_unknown("#000");
        assert_eq!(scale.color(None), "#000");
    }

    #[test]
    fn empty_input_gives_empty_scale() {
        let scale = OrdinalScale::from_categories(std::iter::empty());
        assert!(scale.is_empty());
        assert!(scale.range().is_empty());
        assert_eq!(scale.color(Some("a")), DEFAULT_UNKNOWN_COLOR);
    }
}
