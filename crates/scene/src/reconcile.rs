//! Positional enter/update/exit join between a container's children and a
//! data sequence.
//!
//! The Nth matching child binds to the Nth datum. Children beyond the new
//! length exit, data beyond the old length enters, and every bound node
//! (entered or reused) goes through the same applier, so a node's final
//! state never depends on whether it was created in this pass.

use std::ops::Range;
use std::slice;

use tracing::debug;

use crate::node::{NodeId, Selector};
use crate::tree::{SceneError, SceneTree};

/// Partition of one reconcile pass into disjoint index ranges.
///
/// `updating` and `entering` index the new sequence and together cover it
/// exactly once; `exiting` indexes the old matched children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSet {
    pub updating: Range<usize>,
    pub entering: Range<usize>,
    pub exiting: Range<usize>,
}

impl BindingSet {
    pub fn compute(existing: usize, incoming: usize) -> Self {
        let overlap = existing.min(incoming);
        Self {
            updating: 0..overlap,
            entering: overlap..incoming,
            exiting: overlap..existing,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Patch {
    Update { index: usize, node: NodeId },
    Create { index: usize },
    Remove { index: usize, node: NodeId },
}

/// Plans the patch list for binding `existing` children to `incoming` data
/// items: updates first, then creations, then removals, each in index order.
pub fn plan(existing: &[NodeId], incoming: usize) -> Vec<Patch> {
    let bindings = BindingSet::compute(existing.len(), incoming);
    let mut patches = Vec::with_capacity(incoming.max(existing.len()));
    patches.extend(
        bindings
            .updating
            .map(|index| Patch::Update { index, node: existing[index] }),
    );
    patches.extend(bindings.entering.map(|index| Patch::Create { index }));
    patches.extend(
        bindings
            .exiting
            .map(|index| Patch::Remove { index, node: existing[index] }),
    );
    patches
}

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Bound nodes; `nodes[i]` is bound to `data[i]`.
    pub nodes: Vec<NodeId>,
    pub patches: Vec<Patch>,
}

impl Join {
    pub fn entered(&self) -> usize {
        self.count(|p| matches!(p, Patch::Create { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|p| matches!(p, Patch::Update { .. }))
    }

    pub fn exited(&self) -> usize {
        self.count(|p| matches!(p, Patch::Remove { .. }))
    }

    /// True when the pass created and removed nothing.
    pub fn is_stable(&self) -> bool {
        self.entered() == 0 && self.exited() == 0
    }

    fn count(&self, pred: impl Fn(&Patch) -> bool) -> usize {
        self.patches.iter().filter(|p| pred(p)).count()
    }
}

/// Binds the children of `container` matched by `selector` to `data`.
///
/// `factory` builds a detached node for an entering datum; reconcile appends
/// it to `container`. `apply` writes the node's attributes (and may run
/// nested reconciles under it) and is called for every bound node.
///
/// Runs to completion synchronously. The data items are only borrowed.
pub fn reconcile<T, F, A>(
    tree: &mut SceneTree,
    container: NodeId,
    selector: &Selector,
    data: &[T],
    mut factory: F,
    mut apply: A,
) -> Result<Join, SceneError>
where
    F: FnMut(&mut SceneTree, &T, usize) -> NodeId,
    A: FnMut(&mut SceneTree, NodeId, &T, usize) -> Result<(), SceneError>,
{
    if !tree.contains(container) {
        return Err(SceneError::MissingNode(container));
    }

    let existing = tree.select(container, selector);
    let patches = plan(&existing, data.len());
    let mut nodes = Vec::with_capacity(data.len());

    for patch in &patches {
        match *patch {
            Patch::Update { index, node } => {
                tree.bind(node, index);
                apply(tree, node, &data[index], index)?;
                nodes.push(node);
            }
            Patch::Create { index } => {
                let node = factory(tree, &data[index], index);
                tree.append(container, node)?;
                tree.bind(node, index);
                apply(tree, node, &data[index], index)?;
                nodes.push(node);
            }
            Patch::Remove { node, .. } => tree.remove(node)?,
        }
    }

    let join = Join { nodes, patches };
    debug!(
        container = %container,
        entered = join.entered(),
        updated = join.updated(),
        exited = join.exited(),
        "reconciled"
    );
    Ok(join)
}

/// Reconciles a single datum, for nested children and static backdrops.
pub fn reconcile_one<T, F, A>(
    tree: &mut SceneTree,
    container: NodeId,
    selector: &Selector,
    datum: &T,
    factory: F,
    apply: A,
) -> Result<NodeId, SceneError>
where
    F: FnMut(&mut SceneTree, &T, usize) -> NodeId,
    A: FnMut(&mut SceneTree, NodeId, &T, usize) -> Result<(), SceneError>,
{
    let join = reconcile(tree, container, selector, slice::from_ref(datum), factory, apply)?;
    join.nodes
        .first()
        .copied()
        .ok_or(SceneError::MissingNode(container))
}
