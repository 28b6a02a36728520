use formats::Feature;
use foundation::math::Projection;
use scene::{
    ElementKind, Join, NodeId, SceneError, SceneTree, Selector, reconcile, reconcile_one,
};

use crate::layer::{Layer, LayerId};
use crate::path::GeoPath;
use crate::symbology::OrdinalScale;

pub const COUNTRY_CLASS: &str = "country";
pub const MISSING_VALUE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountriesConfig {
    /// Property holding the category that drives the fill.
    pub category_field: String,
    /// Property shown before the category in the tooltip.
    pub name_field: String,
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            category_field: "economy".to_string(),
            name_field: "name".to_string(),
        }
    }
}

/// One `<path class="country">` per feature, filled by category, with a
/// `<title>` tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct CountriesLayer {
    id: LayerId,
    pub config: CountriesConfig,
}

impl CountriesLayer {
    pub fn new(id: u64, config: CountriesConfig) -> Self {
        Self {
            id: LayerId(id),
            config,
        }
    }

    pub fn category<'a>(&self, feature: &'a Feature) -> Option<&'a str> {
        feature.property(&self.config.category_field)
    }

    pub fn tooltip(&self, feature: &Feature) -> String {
        let name = feature
            .property(&self.config.name_field)
            .unwrap_or(MISSING_VALUE);
        let category = self.category(feature).unwrap_or(MISSING_VALUE);
        format!("{name}: {category}")
    }

    pub fn render<P: Projection>(
        &self,
        tree: &mut SceneTree,
        container: NodeId,
        features: &[Feature],
        path: &GeoPath<P>,
        scale: &OrdinalScale,
    ) -> Result<Join, SceneError> {
        reconcile(
            tree,
            container,
            &self.selector(),
            features,
            |tree, _, _| {
                let node = tree.create(ElementKind::Path);
                tree.element(node).class(COUNTRY_CLASS);
                node
            },
            |tree, node, feature, _| {
                let el = tree.element(node);
                let el = match feature.geometry.as_ref().and_then(|g| path.path(g)) {
                    Some(d) => el.attr("d", d),
                    None => el.remove_attr("d"),
                };
                el.attr("fill", scale.color(self.category(feature)));

                let tooltip = self.tooltip(feature);
                reconcile_one(
                    tree,
                    node,
                    &Selector::kind(ElementKind::Title),
                    &tooltip,
                    |tree, _, _| tree.create(ElementKind::Title),
                    |tree, title, text, _| {
                        tree.element(title).text(text);
                        Ok(())
                    },
                )?;
                Ok(())
            },
        )
    }
}

impl Layer for CountriesLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn selector(&self) -> Selector {
        Selector::kind(ElementKind::Path).with_class(COUNTRY_CLASS)
    }
}
