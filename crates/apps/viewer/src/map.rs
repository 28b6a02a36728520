//! The assembled choropleth: a zoomable map group holding the sphere and
//! the country paths, and a fixed legend group beside it.

use formats::FeatureCollection;
use foundation::math::NaturalEarth1;
use layers::{ColorLegend, CountriesLayer, GeoPath, OrdinalScale};
use runtime::{ZoomController, ZoomEvent};
use scene::svg::to_svg_string;
use scene::{ElementKind, Join, NodeId, SceneError, SceneTree, ZoomTransform};
use tracing::info;

use crate::config::ViewerConfig;

pub const SPHERE_CLASS: &str = "sphere";

const COUNTRIES_LAYER_ID: u64 = 1;
const LEGEND_LAYER_ID: u64 = 2;

/// Joins produced by one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub countries: Join,
    pub legend: Join,
}

#[derive(Debug)]
pub struct ChoroplethMap {
    tree: SceneTree,
    svg: NodeId,
    map_group: NodeId,
    legend_group: NodeId,
    sphere: NodeId,
    path: GeoPath<NaturalEarth1>,
    countries: CountriesLayer,
    legend: ColorLegend,
    zoom: ZoomController,
    scale: OrdinalScale,
    width: f64,
    height: f64,
    fit_to_viewport: bool,
}

impl ChoroplethMap {
    /// Builds the static skeleton: `<svg>`, the map group with its sphere
    /// outline, and the translated legend group.
    pub fn new(config: &ViewerConfig) -> Result<Self, SceneError> {
        let mut tree = SceneTree::new();
        let path = GeoPath::new(NaturalEarth1::default());

        let svg = tree.create(ElementKind::Svg);
        tree.element(svg)
            .attr("width", config.width)
            .attr("height", config.height);

        let map_group = tree.append_new(svg, ElementKind::Group)?;
        let legend_group = tree.append_new(svg, ElementKind::Group)?;
        let [lx, ly] = config.legend.offset;
        tree.element(legend_group)
            .attr("transform", format!("translate({lx},{ly})"));

        let sphere = tree.append_new(map_group, ElementKind::Path)?;
        tree.element(sphere)
            .class(SPHERE_CLASS)
            .attr("d", path.sphere());

        Ok(Self {
            tree,
            svg,
            map_group,
            legend_group,
            sphere,
            path,
            countries: CountriesLayer::new(COUNTRIES_LAYER_ID, config.countries()),
            legend: ColorLegend::new(LEGEND_LAYER_ID, config.legend.style()),
            zoom: ZoomController::new(map_group),
            scale: OrdinalScale::default(),
            width: config.width,
            height: config.height,
            fit_to_viewport: config.fit_to_viewport,
        })
    }

    /// Rebuilds the color scale from `collection` and reconciles the legend
    /// and the country paths against it.
    pub fn render(&mut self, collection: &FeatureCollection) -> Result<RenderSummary, SceneError> {
        if self.fit_to_viewport {
            self.fit(collection);
        }

        self.scale = OrdinalScale::from_categories(
            collection
                .features
                .iter()
                .map(|f| self.countries.category(f)),
        );

        let legend = self
            .legend
            .render(&mut self.tree, self.legend_group, &self.scale)?;
        let countries = self.countries.render(
            &mut self.tree,
            self.map_group,
            &collection.features,
            &self.path,
            &self.scale,
        )?;

        info!(
            features = collection.len(),
            categories = self.scale.domain().len(),
            entered = countries.entered(),
            updated = countries.updated(),
            exited = countries.exited(),
            "rendered choropleth"
        );
        Ok(RenderSummary { countries, legend })
    }

    pub fn handle_zoom(&mut self, event: &ZoomEvent) -> Result<(), SceneError> {
        self.zoom.handle(&mut self.tree, event)
    }

    pub fn reset_zoom(&mut self) -> Result<(), SceneError> {
        self.zoom.reset(&mut self.tree)
    }

    pub fn to_svg(&self) -> Result<String, SceneError> {
        to_svg_string(&self.tree, self.svg)
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.svg
    }

    pub fn map_group(&self) -> NodeId {
        self.map_group
    }

    pub fn legend_group(&self) -> NodeId {
        self.legend_group
    }

    pub fn sphere(&self) -> NodeId {
        self.sphere
    }

    pub fn scale(&self) -> &OrdinalScale {
        &self.scale
    }

    pub fn transform(&self) -> ZoomTransform {
        self.zoom.transform()
    }

    fn fit(&mut self, collection: &FeatureCollection) {
        let points = collection
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .flat_map(|g| g.points())
            .map(|p| (p.lon_deg, p.lat_deg));
        self.path
            .projection_mut()
            .fit_size(self.width, self.height, points);
        self.tree
            .element(self.sphere)
            .attr("d", self.path.sphere());
    }
}
