use scene::{
    ElementKind, Join, NodeId, SceneError, SceneTree, Selector, reconcile, reconcile_one,
};

use crate::layer::{Layer, LayerId};
use crate::path::fmt_num;
use crate::symbology::OrdinalScale;

pub const TICK_CLASS: &str = "tick";

#[derive(Debug, Clone, PartialEq)]
pub struct LegendStyle {
    pub circle_radius: f64,
    /// Vertical distance between consecutive ticks.
    pub spacing: f64,
    pub text_offset: f64,
    pub backdrop_width: f64,
    pub backdrop_fill: String,
    pub backdrop_opacity: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            circle_radius: 10.0,
            spacing: 25.0,
            text_offset: 15.0,
            backdrop_width: 220.0,
            backdrop_fill: "white".to_string(),
            backdrop_opacity: 0.8,
        }
    }
}

/// Swatch legend: a rounded backdrop plus one tick per scale category.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLegend {
    id: LayerId,
    pub style: LegendStyle,
}

impl ColorLegend {
    pub fn new(id: u64, style: LegendStyle) -> Self {
        Self {
            id: LayerId(id),
            style,
        }
    }

    /// Renders the backdrop and ticks into `container`. Returns the tick join.
    pub fn render(
        &self,
        tree: &mut SceneTree,
        container: NodeId,
        scale: &OrdinalScale,
    ) -> Result<Join, SceneError> {
        let style = &self.style;
        let inset = fmt_num(-style.circle_radius * 2.0);
        let height = style.spacing * scale.domain().len() as f64 + 10.0;

        reconcile_one(
            tree,
            container,
            &Selector::kind(ElementKind::Rect),
            &height,
            |tree, _, _| tree.create(ElementKind::Rect),
            |tree, rect, height, _| {
                tree.element(rect)
                    .attr("x", &inset)
                    .attr("y", &inset)
                    .attr("rx", fmt_num(style.circle_radius * 2.0))
                    .attr("width", fmt_num(style.backdrop_width))
                    .attr("height", fmt_num(*height))
                    .attr("fill", &style.backdrop_fill)
                    .attr("opacity", fmt_num(style.backdrop_opacity));
                Ok(())
            },
        )?;

        reconcile(
            tree,
            container,
            &self.selector(),
            scale.domain(),
            |tree, _, _| {
                let tick = tree.create(ElementKind::Group);
                tree.element(tick).class(TICK_CLASS);
                tick
            },
            |tree, tick, category, i| {
                tree.element(tick).attr(
                    "transform",
                    format!("translate(0, {})", fmt_num(i as f64 * style.spacing)),
                );

                reconcile_one(
                    tree,
                    tick,
                    &Selector::kind(ElementKind::Circle),
                    category,
                    |tree, _, _| tree.create(ElementKind::Circle),
                    |tree, circle, category, _| {
                        tree.element(circle)
                            .attr("r", fmt_num(style.circle_radius))
                            .attr("fill", scale.color(Some(category.as_str())));
                        Ok(())
                    },
                )?;
                reconcile_one(
                    tree,
                    tick,
                    &Selector::kind(ElementKind::Text),
                    category,
                    |tree, _, _| tree.create(ElementKind::Text),
                    |tree, text, category, _| {
                        tree.element(text)
                            .text(category)
                            .attr("dy", "0.32em")
                            .attr("x", fmt_num(style.text_offset));
                        Ok(())
                    },
                )?;
                Ok(())
            },
        )
    }
}

impl Layer for ColorLegend {
    fn id(&self) -> LayerId {
        self.id
    }

    fn selector(&self) -> Selector {
        Selector::kind(ElementKind::Group).with_class(TICK_CLASS)
    }
}
