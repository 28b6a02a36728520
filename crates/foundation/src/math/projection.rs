//! Cartographic projections from lon/lat degrees to screen space.
//!
//! Screen space has y growing downward, matching SVG.

use crate::bounds::Aabb2;
use crate::math::vec::Vec2;

pub const NATURAL_EARTH1_SCALE: f64 = 175.295;
pub const DEFAULT_TRANSLATE: [f64; 2] = [480.0, 250.0];

pub trait Projection {
    fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2;
}

/// Natural Earth I pseudo-cylindrical projection (Šavrič et al.).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NaturalEarth1 {
    pub scale: f64,
    pub translate: [f64; 2],
}

impl Default for NaturalEarth1 {
    fn default() -> Self {
        Self {
            scale: NATURAL_EARTH1_SCALE,
            translate: DEFAULT_TRANSLATE,
        }
    }
}

/// Unscaled projection of radians; y points north.
pub fn natural_earth1_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

impl NaturalEarth1 {
    pub fn new(scale: f64, translate: [f64; 2]) -> Self {
        Self { scale, translate }
    }

    /// Adjusts scale and translate so the projected `points` fill the
    /// `width` x `height` viewport, centered along the slack axis.
    ///
    /// Leaves the projection untouched when the points have no extent.
    pub fn fit_size(
        &mut self,
        width: f64,
        height: f64,
        points: impl IntoIterator<Item = (f64, f64)>,
    ) {
        let unit = NaturalEarth1::new(1.0, [0.0, 0.0]);
        let mut b = Aabb2::empty();
        for (lon, lat) in points {
            let p = unit.project(lon, lat);
            b.extend(p.x, p.y);
        }
        if b.is_empty() || b.width() <= 0.0 || b.height() <= 0.0 {
            return;
        }

        let k = (width / b.width()).min(height / b.height());
        self.scale = k;
        self.translate = [
            (width - k * (b.max[0] + b.min[0])) / 2.0,
            (height - k * (b.max[1] + b.min[1])) / 2.0,
        ];
    }
}

impl Projection for NaturalEarth1 {
    fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        let (x, y) = natural_earth1_raw(lon_deg.to_radians(), lat_deg.to_radians());
        Vec2::new(
            self.translate[0] + x * self.scale,
            self.translate[1] - y * self.scale,
        )
    }
}
