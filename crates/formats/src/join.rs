use std::collections::HashMap;

use tracing::{debug, warn};

use crate::feature::{FeatureCollection, Row};

/// Outcome of a left join of attribute rows onto features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub matched: usize,
    /// Ids of features that found no row, in feature order.
    pub unmatched: Vec<Option<String>>,
}

impl JoinReport {
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Merges each row into the feature whose id equals `row[key]`.
///
/// Every feature is kept. When several rows share a key the later one
/// wins. Rows without the key column are skipped.
pub fn join_rows(collection: &mut FeatureCollection, rows: &[Row], key: &str) -> JoinReport {
    let mut by_key: HashMap<&str, &Row> = HashMap::with_capacity(rows.len());
    for row in rows {
        if let Some(value) = row.get(key) {
            by_key.insert(value.as_str(), row);
        }
    }

    let mut report = JoinReport::default();
    for feature in &mut collection.features {
        match feature.id.as_deref().and_then(|id| by_key.get(id)) {
            Some(row) => {
                feature.properties.merge(row);
                report.matched += 1;
            }
            None => report.unmatched.push(feature.id.clone()),
        }
    }

    if report.unmatched.is_empty() {
        debug!(matched = report.matched, "joined attribute rows");
    } else {
        warn!(
            matched = report.matched,
            unmatched = report.unmatched.len(),
            "some features have no attribute row"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{JoinReport, join_rows};
    use crate::feature::{Feature, FeatureCollection, Properties, Row};
    use crate::geometry::{GeoPoint, Geometry};
    use pretty_assertions::assert_eq;

    fn feature(id: &str) -> Feature {
        Feature {
            id: Some(id.to_string()),
            geometry: Some(Geometry::Point(GeoPoint::new(0.0, 0.0))),
            properties: Properties::new(),
        }
    }

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn left_join_keeps_unmatched_features() {
        let mut countries = FeatureCollection {
            features: vec![feature("004"), feature("008")],
        };
        let rows = vec![row(&[("iso_n3", "004"), ("economy", "Developing")])];

        let report = join_rows(&mut countries, &rows, "iso_n3");
        assert_eq!(
            report,
            JoinReport {
                matched: 1,
                unmatched: vec![Some("008".to_string())],
            }
        );
        assert_eq!(countries.features[0].property("economy"), Some("Developing"));
        assert_eq!(countries.features[1].property("economy"), None);
        assert!(countries.features[1].geometry.is_some());
    }

    #[test]
    fn later_duplicate_row_wins() {
        let mut countries = FeatureCollection {
            features: vec![feature("004")],
        };
        let rows = vec![
            row(&[("iso_n3", "004"), ("economy", "first")]),
            row(&[("iso_n3", "004"), ("economy", "second")]),
        ];

        join_rows(&mut countries, &rows, "iso_n3");
        assert_eq!(countries.features[0].property("economy"), Some("second"));
    }

    #[test]
    fn row_fields_override_topology_properties() {
        let mut f = feature("004");
        f.properties.insert("name", "Old name");
        f.properties.insert("continent", "Asia");
        let mut countries = FeatureCollection { features: vec![f] };
        let rows = vec![row(&[("iso_n3", "004"), ("name", "Afghanistan")])];

        let report = join_rows(&mut countries, &rows, "iso_n3");
        assert!(report.is_complete());
        let props = &countries.features[0].properties;
        assert_eq!(props.get("name"), Some("Afghanistan"));
        assert_eq!(props.get("continent"), Some("Asia"));
        assert_eq!(props.get("iso_n3"), Some("004"));
    }

    #[test]
    fn features_without_ids_never_match() {
        let mut f = feature("x");
        f.id = None;
        let mut countries = FeatureCollection { features: vec![f] };
        let rows = vec![row(&[("iso_n3", "")])];

        let report = join_rows(&mut countries, &rows, "iso_n3");
        assert_eq!(report.unmatched, vec![None]);
    }
}
