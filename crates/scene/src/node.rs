use std::collections::BTreeMap;
use std::fmt;

use foundation::handles::Handle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Handle);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Svg,
    Group,
    Path,
    Rect,
    Circle,
    Text,
    Title,
}

impl ElementKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Svg => "svg",
            ElementKind::Group => "g",
            ElementKind::Path => "path",
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Text => "text",
            ElementKind::Title => "title",
        }
    }
}

/// One retained visual element.
///
/// `bound_index` is the position of the data item the node was last
/// reconciled against; nodes created outside a join stay unbound.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub(crate) kind: ElementKind,
    pub(crate) class: Option<String>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) text: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) bound_index: Option<usize>,
}

impl SceneNode {
    pub(crate) fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            class: None,
            attributes: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            bound_index: None,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class
            .as_deref()
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn bound_index(&self) -> Option<usize> {
        self.bound_index
    }
}

/// Filter over a container's direct children, the analogue of a
/// `tag.class` CSS selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    kind: Option<ElementKind>,
    class: Option<String>,
}

impl Selector {
    pub fn kind(kind: ElementKind) -> Self {
        Self {
            kind: Some(kind),
            class: None,
        }
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self {
            kind: None,
            class: Some(class.into()),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn matches(&self, node: &SceneNode) -> bool {
        if let Some(kind) = self.kind {
            if node.kind != kind {
                return false;
            }
        }
        match &self.class {
            Some(class) => node.has_class(class),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementKind, SceneNode, Selector};

    #[test]
    fn selector_matches_kind_and_class() {
        let mut node = SceneNode::new(ElementKind::Group);
        node.class = Some("tick major".to_string());

        assert!(Selector::kind(ElementKind::Group).matches(&node));
        assert!(Selector::class("tick").matches(&node));
        assert!(Selector::class("major").matches(&node));
        assert!(!Selector::class("tic").matches(&node));
        assert!(!Selector::kind(ElementKind::Path).matches(&node));
        assert!(
            Selector::kind(ElementKind::Group)
                .with_class("tick")
                .matches(&node)
        );
    }

    #[test]
    fn tags_follow_svg_names() {
        assert_eq!(ElementKind::Group.tag(), "g");
        assert_eq!(ElementKind::Title.tag(), "title");
    }
}
