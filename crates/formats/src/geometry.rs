use foundation::bounds::Aabb2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Geographic geometry in lon/lat degrees. Rings are closed (first point
/// repeated last) as produced by TopoJSON decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl Geometry {
    pub fn points(&self) -> Box<dyn Iterator<Item = &GeoPoint> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(p)),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => Box::new(ps.iter()),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                Box::new(lines.iter().flatten())
            }
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten().flatten()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points().next().is_none()
    }

    /// Lon/lat bounds; empty geometries give `Aabb2::empty()`.
    pub fn bounds(&self) -> Aabb2 {
        let mut b = Aabb2::empty();
        for p in self.points() {
            b.extend(p.lon_deg, p.lat_deg);
        }
        b
    }
}
