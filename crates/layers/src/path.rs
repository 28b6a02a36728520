//! SVG path data for geographic geometries.

use std::fmt::Write;

use formats::{GeoPoint, Geometry};
use foundation::math::{Projection, Vec2};

/// Radius of the circle drawn for point geometries, in pixels.
pub const POINT_RADIUS: f64 = 4.5;

#[derive(Debug, Clone, PartialEq)]
pub struct GeoPath<P> {
    projection: P,
}

impl<P: Projection> GeoPath<P> {
    pub fn new(projection: P) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut P {
        &mut self.projection
    }

    /// Path data for `geometry`, or `None` when it draws nothing.
    pub fn path(&self, geometry: &Geometry) -> Option<String> {
        let mut d = String::new();
        match geometry {
            Geometry::Point(p) => self.point(&mut d, p),
            Geometry::MultiPoint(points) => points.iter().for_each(|p| self.point(&mut d, p)),
            Geometry::LineString(line) => self.line(&mut d, line, false),
            Geometry::MultiLineString(lines) => {
                lines.iter().for_each(|l| self.line(&mut d, l, false))
            }
            Geometry::Polygon(rings) => rings.iter().for_each(|r| self.line(&mut d, r, true)),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .for_each(|r| self.line(&mut d, r, true)),
        }
        (!d.is_empty()).then_some(d)
    }

    /// Outline of the whole globe: the antimeridian traced down one side
    /// and back up the other.
    pub fn sphere(&self) -> String {
        let mut outline: Vec<GeoPoint> = (-90..=90)
            .map(|lat| GeoPoint::new(-180.0, f64::from(lat)))
            .collect();
        outline.extend((-90..=90).rev().map(|lat| GeoPoint::new(180.0, f64::from(lat))));
        outline.push(outline[0]);

        let mut d = String::new();
        self.line(&mut d, &outline, true);
        d
    }

    fn project(&self, p: &GeoPoint) -> Vec2 {
        self.projection.project(p.lon_deg, p.lat_deg)
    }

    fn point(&self, d: &mut String, p: &GeoPoint) {
        let Vec2 { x, y } = self.project(p);
        let r = fmt_num(POINT_RADIUS);
        let dia = fmt_num(2.0 * POINT_RADIUS);
        let _ = write!(
            d,
            "M{},{}m0,{r}a{r},{r} 0 1,1 0,-{dia}a{r},{r} 0 1,1 0,{dia}z",
            fmt_num(x),
            fmt_num(y)
        );
    }

    /// Rings carry a closing point equal to the first; it is replaced by `Z`.
    fn line(&self, d: &mut String, points: &[GeoPoint], closed: bool) {
        let points = match points {
            [rest @ .., last] if closed && rest.first() == Some(last) => rest,
            all => all,
        };
        for (i, p) in points.iter().enumerate() {
            let Vec2 { x, y } = self.project(p);
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", fmt_num(x), fmt_num(y));
        }
        if closed && !points.is_empty() {
            d.push('Z');
        }
    }
}

/// Three decimals with trailing zeros trimmed.
pub fn fmt_num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
