//! Pan/zoom interaction: turns zoom events into the transform of one
//! target group.
//!
//! Gesture recognition happens upstream; each event already carries the
//! full transform to show, so handling never accumulates deltas.

use std::fmt;

use scene::{NodeId, SceneError, SceneTree, ZoomTransform};
use tracing::{debug, trace};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ZoomEventKind {
    Start,
    Zoom,
    End,
}

impl fmt::Display for ZoomEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ZoomEventKind::Start => "start",
            ZoomEventKind::Zoom => "zoom",
            ZoomEventKind::End => "end",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomEvent {
    pub kind: ZoomEventKind,
    pub transform: ZoomTransform,
}

impl ZoomEvent {
    pub fn zoom(transform: ZoomTransform) -> Self {
        Self {
            kind: ZoomEventKind::Zoom,
            transform,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomController {
    target: NodeId,
    transform: ZoomTransform,
    scale_extent: [f64; 2],
    events_handled: u64,
}

impl ZoomController {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            transform: ZoomTransform::IDENTITY,
            scale_extent: [0.0, f64::INFINITY],
            events_handled: 0,
        }
    }

    /// Limits the zoom factor to `[min, max]`.
    pub fn with_scale_extent(mut self, min: f64, max: f64) -> Self {
        self.scale_extent = [min.min(max), max.max(min)];
        self
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }

    /// Replaces the current transform with the event's and writes it to
    /// the target group.
    pub fn handle(&mut self, tree: &mut SceneTree, event: &ZoomEvent) -> Result<(), SceneError> {
        let [min, max] = self.scale_extent;
        let t = event.transform;
        let transform = ZoomTransform::new(t.x, t.y, t.k.clamp(min, max));
        self.events_handled += 1;
        trace!(kind = %event.kind, %transform, "zoom event");
        self.apply(tree, transform)
    }

    pub fn reset(&mut self, tree: &mut SceneTree) -> Result<(), SceneError> {
        debug!(target_node = %self.target, "zoom reset");
        self.apply(tree, ZoomTransform::IDENTITY)
    }

    fn apply(&mut self, tree: &mut SceneTree, transform: ZoomTransform) -> Result<(), SceneError> {
        if !tree.contains(self.target) {
            return Err(SceneError::MissingNode(self.target));
        }
        self.transform = transform;
        tree.element(self.target).attr("transform", transform);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ZoomController, ZoomEvent, ZoomEventKind};
    use scene::{ElementKind, SceneError, SceneTree, ZoomTransform};

    fn transform_attr(tree: &SceneTree, controller: &ZoomController) -> Option<String> {
        tree.node(controller.target())?
            .attr("transform")
            .map(str::to_string)
    }

    #[test]
    fn later_event_overwrites_earlier() {
        let mut tree = SceneTree::new();
        let g = tree.create(ElementKind::Group);
        let mut zoom = ZoomController::new(g);

        let t1 = ZoomTransform::new(10.0, 20.0, 2.0);
        let t2 = ZoomTransform::new(-5.0, 0.0, 0.5);
        zoom.handle(&mut tree, &ZoomEvent::zoom(t1)).expect("t1");
        zoom.handle(&mut tree, &ZoomEvent::zoom(t2)).expect("t2");

        assert_eq!(zoom.transform(), t2);
        assert_eq!(
            transform_attr(&tree, &zoom).as_deref(),
            Some("translate(-5,0) scale(0.5)")
        );
        assert_eq!(zoom.events_handled(), 2);
    }

    #[test]
    fn every_event_kind_carries_the_transform() {
        let mut tree = SceneTree::new();
        let g = tree.create(ElementKind::Group);
        let mut zoom = ZoomController::new(g);
        let t = ZoomTransform::new(1.0, 1.0, 1.0);

        for kind in [ZoomEventKind::Start, ZoomEventKind::Zoom, ZoomEventKind::End] {
            zoom.handle(&mut tree, &ZoomEvent { kind, transform: t })
                .expect("handle");
            assert_eq!(zoom.transform(), t);
        }
    }

    #[test]
    fn scale_extent_clamps_k() {
        let mut tree = SceneTree::new();
        let g = tree.create(ElementKind::Group);
        let mut zoom = ZoomController::new(g).with_scale_extent(1.0, 8.0);

        zoom.handle(&mut tree, &ZoomEvent::zoom(ZoomTransform::new(0.0, 0.0, 20.0)))
            .expect("zoom in");
        assert_eq!(zoom.transform().k, 8.0);
        zoom.handle(&mut tree, &ZoomEvent::zoom(ZoomTransform::new(0.0, 0.0, 0.1)))
            .expect("zoom out");
        assert_eq!(zoom.transform().k, 1.0);
    }

    #[test]
    fn reset_restores_identity() {
        let mut tree = SceneTree::new();
        let g = tree.create(ElementKind::Group);
        let mut zoom = ZoomController::new(g);
        zoom.handle(&mut tree, &ZoomEvent::zoom(ZoomTransform::new(3.0, 4.0, 2.0)))
            .expect("zoom");

        zoom.reset(&mut tree).expect("reset");
        assert!(zoom.transform().is_identity());
        assert_eq!(
            transform_attr(&tree, &zoom).as_deref(),
            Some("translate(0,0) scale(1)")
        );
    }

    #[test]
    fn missing_target_is_reported() {
        let mut tree = SceneTree::new();
        let g = tree.create(ElementKind::Group);
        tree.remove(g).expect("remove");
        let mut zoom = ZoomController::new(g);

        let err = zoom
            .handle(&mut tree, &ZoomEvent::zoom(ZoomTransform::IDENTITY))
            .expect_err("stale target");
        assert_eq!(err, SceneError::MissingNode(g));
        assert!(zoom.transform().is_identity());
    }
}
