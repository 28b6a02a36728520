//! Fetching and joining the two map inputs.
//!
//! The attribute table and the topology are fetched concurrently and both
//! must arrive: one failure fails the whole load and nothing is joined.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use formats::{
    FeatureCollection, JoinReport, Topology, TopologyError, TsvError, join_rows, parse_rows,
};
use tracing::info;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
pub enum LoadError {
    Io {
        location: String,
        source: std::io::Error,
    },
    Http {
        location: String,
        source: reqwest::Error,
    },
    Status {
        location: String,
        status: u16,
    },
    Tsv(TsvError),
    Topology(TopologyError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { location, source } => write!(f, "failed to read {location}: {source}"),
            LoadError::Http { location, source } => {
                write!(f, "request to {location} failed: {source}")
            }
            LoadError::Status { location, status } => {
                write!(f, "{location} answered with HTTP {status}")
            }
            LoadError::Tsv(e) => write!(f, "attribute table: {e}"),
            LoadError::Topology(e) => write!(f, "topology: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Http { source, .. } => Some(source),
            LoadError::Status { .. } => None,
            LoadError::Tsv(e) => Some(e),
            LoadError::Topology(e) => Some(e),
        }
    }
}

/// A text document that can be fetched once per load.
///
/// Returns boxed futures so sources stay object safe.
pub trait DataSource: Send + Sync {
    fn location(&self) -> &str;

    fn fetch(&self) -> BoxFuture<'_, Result<String, LoadError>>;
}

pub struct FileSource {
    path: PathBuf,
    location: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

impl DataSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, LoadError>> {
        Box::pin(async move {
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| LoadError::Io {
                    location: self.location.clone(),
                    source,
                })
        })
    }
}

pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl DataSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, LoadError>> {
        Box::pin(async move {
            let http = |source: reqwest::Error| LoadError::Http {
                location: self.url.clone(),
                source,
            };
            let resp = self.client.get(&self.url).send().await.map_err(http)?;
            if !resp.status().is_success() {
                return Err(LoadError::Status {
                    location: self.url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            resp.text().await.map_err(http)
        })
    }
}

/// Picks an HTTP source for `http://` and `https://` locations and a file
/// source for everything else.
pub fn source_for(location: &str, client: &reqwest::Client) -> Box<dyn DataSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location, client.clone()))
    } else {
        Box::new(FileSource::new(location))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCountries {
    pub countries: FeatureCollection,
    pub report: JoinReport,
}

/// Fetches both inputs, decodes `object` from the topology and left-joins
/// the attribute rows onto it by `key`.
pub async fn load_countries(
    attributes: &dyn DataSource,
    topology: &dyn DataSource,
    object: &str,
    key: &str,
) -> Result<LoadedCountries, LoadError> {
    let (tsv, topo) = tokio::try_join!(attributes.fetch(), topology.fetch())?;

    let rows = parse_rows(&tsv).map_err(LoadError::Tsv)?;
    let mut countries = Topology::from_json_str(&topo)
        .and_then(|t| t.feature(object))
        .map_err(LoadError::Topology)?;
    let report = join_rows(&mut countries, &rows, key);

    info!(
        attributes = attributes.location(),
        topology = topology.location(),
        features = countries.len(),
        rows = rows.len(),
        matched = report.matched,
        "loaded map data"
    );
    Ok(LoadedCountries { countries, report })
}

#[cfg(test)]
mod tests {
    use super::{DataSource, FileSource, LoadError, load_countries, source_for};
    use std::fs;
    use std::path::PathBuf;

    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "arcs": [[[60, 30], [70, 30], [70, 38], [60, 30]], [[19, 40], [21, 40], [21, 42], [19, 40]]],
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "id": "004", "arcs": [[0]]},
            {"type": "Polygon", "id": "008", "arcs": [[1]]}
        ]}}
    }"#;

    const TSV: &str = "iso_n3\tname\teconomy\n004\tAfghanistan\tDeveloping\n";

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("atlas_viewer_loader_{label}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[tokio::test]
    async fn loads_and_joins_from_files() {
        let dir = temp_dir("ok");
        fs::write(dir.join("50m.tsv"), TSV).expect("write tsv");
        fs::write(dir.join("50m.json"), TOPOLOGY).expect("write topology");

        let loaded = load_countries(
            &FileSource::new(dir.join("50m.tsv")),
            &FileSource::new(dir.join("50m.json")),
            "countries",
            "iso_n3",
        )
        .await
        .expect("load");

        let features = &loaded.countries.features;
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].property("economy"), Some("Developing"));
        assert_eq!(features[0].property("name"), Some("Afghanistan"));
        assert_eq!(features[1].property("economy"), None);
        assert!(features[1].geometry.is_some());
        assert_eq!(loaded.report.matched, 1);
    }

    #[tokio::test]
    async fn one_missing_input_fails_the_load() {
        let dir = temp_dir("missing");
        fs::write(dir.join("50m.json"), TOPOLOGY).expect("write topology");

        let err = load_countries(
            &FileSource::new(dir.join("50m.tsv")),
            &FileSource::new(dir.join("50m.json")),
            "countries",
            "iso_n3",
        )
        .await
        .expect_err("missing tsv");
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn unknown_object_is_a_topology_error() {
        let dir = temp_dir("object");
        fs::write(dir.join("50m.tsv"), TSV).expect("write tsv");
        fs::write(dir.join("50m.json"), TOPOLOGY).expect("write topology");

        let err = load_countries(
            &FileSource::new(dir.join("50m.tsv")),
            &FileSource::new(dir.join("50m.json")),
            "land",
            "iso_n3",
        )
        .await
        .expect_err("no such object");
        assert!(matches!(err, LoadError::Topology(_)));
    }

    #[test]
    fn picks_source_by_scheme() {
        let client = reqwest::Client::new();
        let remote = source_for("https://unpkg.com/world-atlas@1.1.4/world/50m.tsv", &client);
        assert_eq!(remote.location(), "https://unpkg.com/world-atlas@1.1.4/world/50m.tsv");
        let local = source_for("data/50m.tsv", &client);
        assert_eq!(local.location(), "data/50m.tsv");
    }
}
