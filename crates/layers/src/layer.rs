use scene::Selector;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// A renderer that owns the children of its container matched by
/// `selector`, and nothing else there.
pub trait Layer {
    fn id(&self) -> LayerId;

    fn selector(&self) -> Selector;
}
