use super::handle::Handle;

/// A tree node: a 2-node, a 3-node, or the transient hole that stands in
/// for a missing subtree while a removal rebalances the tree.
///
/// Children are handles into the node arena; a node either has its full
/// complement of children or none at all (a terminal node). Every non-root
/// node records the handle of the node that holds it; parent links are used
/// only for upward successor/predecessor walks, never for restructuring.
pub(crate) enum Node<T> {
    Two(TwoNode<T>),
    Three(ThreeNode<T>),
    Hole(HoleNode),
}

/// One key, up to two children. Keys in `left` < `value` < keys in `right`.
pub(crate) struct TwoNode<T> {
    pub(crate) parent: Option<Handle>,
    pub(crate) value: T,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

/// Two ordered keys, up to three children.
/// Keys in `left` < `left_value` < keys in `middle` < `right_value` < keys in `right`.
pub(crate) struct ThreeNode<T> {
    pub(crate) parent: Option<Handle>,
    pub(crate) left_value: T,
    pub(crate) right_value: T,
    pub(crate) left: Option<Handle>,
    pub(crate) middle: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

/// A hole holds no key and at most one child. It marks a subtree that is
/// one level shorter than its siblings and exists only between the moment a
/// removal empties a 2-node and the moment the upward rebalancing loop
/// resolves it.
pub(crate) struct HoleNode {
    pub(crate) parent: Option<Handle>,
    pub(crate) child: Option<Handle>,
}

impl<T> Node<T> {
    /// Returns true if this is a 2-node.
    pub(crate) fn is_two(&self) -> bool {
        matches!(self, Node::Two(_))
    }

    /// Returns true if this is a 3-node.
    pub(crate) fn is_three(&self) -> bool {
        matches!(self, Node::Three(_))
    }

    /// Returns true if this is a hole.
    pub(crate) fn is_hole(&self) -> bool {
        matches!(self, Node::Hole(_))
    }

    /// Returns true if this node has no children.
    pub(crate) fn is_terminal(&self) -> bool {
        match self {
            Node::Two(two) => two.left.is_none(),
            Node::Three(three) => three.left.is_none(),
            Node::Hole(hole) => hole.child.is_none(),
        }
    }

    pub(crate) fn parent(&self) -> Option<Handle> {
        match self {
            Node::Two(two) => two.parent,
            Node::Three(three) => three.parent,
            Node::Hole(hole) => hole.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        match self {
            Node::Two(two) => two.parent = parent,
            Node::Three(three) => three.parent = parent,
            Node::Hole(hole) => hole.parent = parent,
        }
    }

    /// Returns the 2-node mutably, panicking if this is not a 2-node.
    pub(crate) fn as_two_mut(&mut self) -> &mut TwoNode<T> {
        match self {
            Node::Two(two) => two,
            _ => panic!("expected 2-node"),
        }
    }

    /// Returns the 3-node mutably, panicking if this is not a 3-node.
    pub(crate) fn as_three_mut(&mut self) -> &mut ThreeNode<T> {
        match self {
            Node::Three(three) => three,
            _ => panic!("expected 3-node"),
        }
    }

    /// Returns the hole, panicking if this is not a hole.
    pub(crate) fn as_hole(&self) -> &HoleNode {
        match self {
            Node::Hole(hole) => hole,
            _ => panic!("expected hole"),
        }
    }
}
