use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{HoleNode, Node, ThreeNode, TwoNode};

/// The core 2-3 tree implementation backing `TwoThreeSet`.
///
/// Nodes live in an [`Arena`] and refer to each other through [`Handle`]s.
/// Every structural rewrite replaces a node in place under its own handle,
/// so links held by the rest of the tree stay valid throughout; in
/// particular the root handle survives both root promotion and root
/// collapse. Parent handles are maintained for successor/predecessor walks
/// only and are never written through during restructuring.
pub(crate) struct RawTwoThreeSet<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of keys in the tree.
    len: usize,
}

/// Outcome of one recursive insertion step.
enum Insertion {
    /// The subtree absorbed the key without growing.
    Done,
    /// The key was already present; nothing changed.
    Duplicate,
    /// The node split: its slot now holds the promoted middle key with the
    /// two halves as children, one level taller than its siblings. The
    /// caller must absorb the promotion or split in turn.
    Promoted,
}

/// Which branch of a 3-node a value belongs to.
#[derive(Clone, Copy)]
enum Branch {
    Left,
    Middle,
    Right,
}

/// Which boundary key to extract from a terminal node.
#[derive(Clone, Copy)]
enum LeafKey {
    Smallest,
    Largest,
}

/// Which key of an interior node a relocated key replaces.
#[derive(Clone, Copy)]
enum KeySlot {
    /// The single key of a 2-node.
    Only,
    /// The smaller key of a 3-node.
    Left,
    /// The larger key of a 3-node.
    Right,
}

impl<T> RawTwoThreeSet<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the handle of the root node, if any.
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    /// Drops every node and resets the tree to empty.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Re-points a child's parent link at its new holder.
    fn adopt(&mut self, child: Option<Handle>, parent: Handle) {
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(Some(parent));
        }
    }

    fn left_child(&self, handle: Handle) -> Option<Handle> {
        match self.nodes.get(handle) {
            Node::Two(two) => two.left,
            Node::Three(three) => three.left,
            Node::Hole(_) => panic!("hole node outside of a removal"),
        }
    }

    fn right_child(&self, handle: Handle) -> Option<Handle> {
        match self.nodes.get(handle) {
            Node::Two(two) => two.right,
            Node::Three(three) => three.right,
            Node::Hole(_) => panic!("hole node outside of a removal"),
        }
    }

    /// Walks to the node with no left child inside `handle`'s subtree.
    pub(crate) fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(child) = self.left_child(handle) {
            handle = child;
        }
        handle
    }

    /// Walks to the node with no right child inside `handle`'s subtree.
    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(child) = self.right_child(handle) {
            handle = child;
        }
        handle
    }
}

impl<T: Ord> RawTwoThreeSet<T> {
    /// Returns the handle of the node holding `value`, if present.
    fn find<Q>(&self, value: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        loop {
            current = match self.nodes.get(current) {
                Node::Two(two) => match value.cmp(two.value.borrow()) {
                    Ordering::Equal => return Some(current),
                    Ordering::Less => two.left?,
                    Ordering::Greater => two.right?,
                },
                Node::Three(three) => {
                    match (value.cmp(three.left_value.borrow()), value.cmp(three.right_value.borrow())) {
                        (Ordering::Equal, _) | (_, Ordering::Equal) => return Some(current),
                        (Ordering::Less, _) => three.left?,
                        (_, Ordering::Less) => three.middle?,
                        _ => three.right?,
                    }
                }
                Node::Hole(_) => panic!("hole node outside of a removal"),
            };
        }
    }

    /// Returns true if the tree contains `value`.
    pub(crate) fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(value).is_some()
    }

    /// Returns the smallest key in the tree.
    pub(crate) fn first(&self) -> Option<&T> {
        let mut current = self.root?;
        loop {
            match self.nodes.get(current) {
                Node::Two(two) => match two.left {
                    Some(child) => current = child,
                    None => return Some(&two.value),
                },
                Node::Three(three) => match three.left {
                    Some(child) => current = child,
                    None => return Some(&three.left_value),
                },
                Node::Hole(_) => panic!("hole node outside of a removal"),
            }
        }
    }

    /// Returns the largest key in the tree.
    pub(crate) fn last(&self) -> Option<&T> {
        let mut current = self.root?;
        loop {
            match self.nodes.get(current) {
                Node::Two(two) => match two.right {
                    Some(child) => current = child,
                    None => return Some(&two.value),
                },
                Node::Three(three) => match three.right {
                    Some(child) => current = child,
                    None => return Some(&three.right_value),
                },
                Node::Hole(_) => panic!("hole node outside of a removal"),
            }
        }
    }

    /// Returns the node holding the key immediately after `value`, where
    /// `value` is a key of the node at `handle`.
    ///
    /// From an interior node the successor is the leftmost node of the
    /// subtree to the key's right; from a terminal node the walk climbs
    /// while the current node is its parent's right child and answers with
    /// the first ancestor entered through any other edge.
    pub(crate) fn successor<Q>(&self, handle: Handle, value: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.get(handle);
        if node.is_terminal() {
            let mut child = handle;
            let mut parent = node.parent();
            while let Some(above) = parent {
                if self.right_child(above) == Some(child) {
                    child = above;
                    parent = self.nodes.get(above).parent();
                } else {
                    break;
                }
            }
            parent
        } else {
            let subtree = match node {
                Node::Two(two) => two.right,
                Node::Three(three) if three.left_value.borrow() == value => three.middle,
                Node::Three(three) => three.right,
                Node::Hole(_) => panic!("hole node outside of a removal"),
            };
            Some(self.leftmost(subtree.expect("interior node missing a child")))
        }
    }

    /// Returns the node holding the key immediately before `value`, where
    /// `value` is a key of the node at `handle`.
    ///
    /// The mirror image of [`successor`](Self::successor): from a terminal
    /// node the walk climbs while the current node is its parent's left
    /// child.
    fn predecessor<Q>(&self, handle: Handle, value: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.get(handle);
        if node.is_terminal() {
            let mut child = handle;
            let mut parent = node.parent();
            while let Some(above) = parent {
                if self.left_child(above) == Some(child) {
                    child = above;
                    parent = self.nodes.get(above).parent();
                } else {
                    break;
                }
            }
            parent
        } else {
            let subtree = match node {
                Node::Two(two) => two.left,
                Node::Three(three) if three.right_value.borrow() == value => three.middle,
                Node::Three(three) => three.left,
                Node::Hole(_) => panic!("hole node outside of a removal"),
            };
            Some(self.rightmost(subtree.expect("interior node missing a child")))
        }
    }

    /// Inserts a key into the tree. Returns false if it was already present.
    pub(crate) fn insert(&mut self, value: T) -> bool {
        let Some(root) = self.root else {
            let root = self.nodes.alloc(Node::Two(TwoNode {
                parent: None,
                value,
                left: None,
                right: None,
            }));
            self.root = Some(root);
            self.len = 1;
            return true;
        };
        match self.insert_at(root, value) {
            Insertion::Duplicate => false,
            // A promoted root already sits in the root's own slot; the tree
            // grew one level for every leaf at once.
            Insertion::Done | Insertion::Promoted => {
                self.len += 1;
                true
            }
        }
    }

    /// Recursive implementation of [`insert`](Self::insert).
    fn insert_at(&mut self, handle: Handle, value: T) -> Insertion {
        // Decide on a step with a short immutable borrow, then restructure.
        enum Step {
            Duplicate,
            GrowLeaf,
            SplitLeaf(Branch),
            DescendTwo { child: Handle, went_left: bool },
            DescendThree { child: Handle, branch: Branch },
        }

        let step = match self.nodes.get(handle) {
            Node::Two(two) => match value.cmp(&two.value) {
                Ordering::Equal => Step::Duplicate,
                Ordering::Less => match two.left {
                    None => Step::GrowLeaf,
                    Some(child) => Step::DescendTwo { child, went_left: true },
                },
                Ordering::Greater => match two.right {
                    None => Step::GrowLeaf,
                    Some(child) => Step::DescendTwo { child, went_left: false },
                },
            },
            Node::Three(three) => {
                if value == three.left_value || value == three.right_value {
                    Step::Duplicate
                } else {
                    let branch = if value < three.left_value {
                        Branch::Left
                    } else if value < three.right_value {
                        Branch::Middle
                    } else {
                        Branch::Right
                    };
                    let child = match branch {
                        Branch::Left => three.left,
                        Branch::Middle => three.middle,
                        Branch::Right => three.right,
                    };
                    match child {
                        None => Step::SplitLeaf(branch),
                        Some(child) => Step::DescendThree { child, branch },
                    }
                }
            }
            Node::Hole(_) => panic!("hole node outside of a removal"),
        };

        match step {
            Step::Duplicate => Insertion::Duplicate,
            Step::GrowLeaf => {
                self.grow_leaf(handle, value);
                Insertion::Done
            }
            Step::SplitLeaf(branch) => {
                self.split_leaf(handle, value, branch);
                Insertion::Promoted
            }
            Step::DescendTwo { child, went_left } => match self.insert_at(child, value) {
                Insertion::Promoted => {
                    self.absorb_promotion(handle, child, went_left);
                    Insertion::Done
                }
                outcome => outcome,
            },
            Step::DescendThree { child, branch } => match self.insert_at(child, value) {
                Insertion::Promoted => {
                    self.split_around_promotion(handle, branch);
                    Insertion::Promoted
                }
                outcome => outcome,
            },
        }
    }

    /// Reifies a leaf 2-node into a 3-node holding both keys, in place.
    fn grow_leaf(&mut self, handle: Handle, value: T) {
        let Node::Two(TwoNode { parent, value: resident, .. }) = self.nodes.lift(handle) else {
            panic!("expected 2-node leaf")
        };
        let (left_value, right_value) = if value < resident {
            (value, resident)
        } else {
            (resident, value)
        };
        self.nodes.put(
            handle,
            Node::Three(ThreeNode {
                parent,
                left_value,
                right_value,
                left: None,
                middle: None,
                right: None,
            }),
        );
    }

    /// Splits an overflowing leaf 3-node into three 2-nodes: the slot keeps
    /// the promoted middle key, with fresh `min` and `max` leaves below it.
    fn split_leaf(&mut self, handle: Handle, value: T, branch: Branch) {
        let Node::Three(ThreeNode { parent, left_value, right_value, .. }) = self.nodes.lift(handle) else {
            panic!("expected 3-node leaf")
        };
        let (min, mid, max) = match branch {
            Branch::Left => (value, left_value, right_value),
            Branch::Middle => (left_value, value, right_value),
            Branch::Right => (left_value, right_value, value),
        };
        let min_handle = self.nodes.alloc(Node::Two(TwoNode {
            parent: Some(handle),
            value: min,
            left: None,
            right: None,
        }));
        let max_handle = self.nodes.alloc(Node::Two(TwoNode {
            parent: Some(handle),
            value: max,
            left: None,
            right: None,
        }));
        self.nodes.put(
            handle,
            Node::Two(TwoNode {
                parent,
                value: mid,
                left: Some(min_handle),
                right: Some(max_handle),
            }),
        );
    }

    /// Fuses a promoted child into a 2-node, producing a 3-node in place.
    /// The promoted node's slot is freed; its children move up beside the
    /// untouched sibling child. A 2-node absorbing one key never overflows,
    /// so nothing propagates further.
    fn absorb_promotion(&mut self, handle: Handle, child: Handle, went_left: bool) {
        let Node::Two(TwoNode { value: promoted, left: promoted_left, right: promoted_right, .. }) =
            self.nodes.take(child)
        else {
            panic!("expected a promoted 2-node")
        };
        let Node::Two(TwoNode { parent, value, left, right }) = self.nodes.lift(handle) else {
            panic!("expected 2-node")
        };
        let fused = if went_left {
            ThreeNode {
                parent,
                left_value: promoted,
                right_value: value,
                left: promoted_left,
                middle: promoted_right,
                right,
            }
        } else {
            ThreeNode {
                parent,
                left_value: value,
                right_value: promoted,
                left,
                middle: promoted_left,
                right: promoted_right,
            }
        };
        self.nodes.put(handle, Node::Three(fused));
        self.adopt(promoted_left, handle);
        self.adopt(promoted_right, handle);
    }

    /// Splits an interior 3-node around the key promoted out of `branch`.
    /// The six candidate children (this node's untouched ones plus the
    /// promoted node's two) are distributed over the fresh `min` and `max`
    /// nodes; the slot keeps the middle key and the split propagates.
    fn split_around_promotion(&mut self, handle: Handle, branch: Branch) {
        let Node::Three(ThreeNode { parent, left_value, right_value, left, middle, right }) =
            self.nodes.lift(handle)
        else {
            panic!("expected 3-node")
        };
        let promoted_handle = match branch {
            Branch::Left => left,
            Branch::Middle => middle,
            Branch::Right => right,
        }
        .expect("interior 3-node missing a child");
        let Node::Two(TwoNode { value: promoted, left: promoted_left, right: promoted_right, .. }) =
            self.nodes.take(promoted_handle)
        else {
            panic!("expected a promoted 2-node")
        };

        let (min, min_children, mid, max, max_children) = match branch {
            Branch::Left => (promoted, (promoted_left, promoted_right), left_value, right_value, (middle, right)),
            Branch::Middle => (left_value, (left, promoted_left), promoted, right_value, (promoted_right, right)),
            Branch::Right => (left_value, (left, middle), right_value, promoted, (promoted_left, promoted_right)),
        };

        let min_handle = self.nodes.alloc(Node::Two(TwoNode {
            parent: Some(handle),
            value: min,
            left: min_children.0,
            right: min_children.1,
        }));
        let max_handle = self.nodes.alloc(Node::Two(TwoNode {
            parent: Some(handle),
            value: max,
            left: max_children.0,
            right: max_children.1,
        }));
        self.adopt(min_children.0, min_handle);
        self.adopt(min_children.1, min_handle);
        self.adopt(max_children.0, max_handle);
        self.adopt(max_children.1, max_handle);
        self.nodes.put(
            handle,
            Node::Two(TwoNode {
                parent,
                value: mid,
                left: Some(min_handle),
                right: Some(max_handle),
            }),
        );
    }

    /// Removes a key from the tree. Returns false if it was absent.
    pub(crate) fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(found) = self.find(value) else {
            return false;
        };

        let (terminal, key, relocation) = self.relocate(found, value);
        let (extracted, hole) = self.detach(terminal, key);
        if let Some((node, slot)) = relocation {
            // The adjacent key takes the removed key's place in the interior
            // node; the removed key itself is dropped here.
            self.replace_key(node, slot, extracted);
        }
        if let Some(hole) = hole {
            self.plug(hole);
        }
        self.len -= 1;
        true
    }

    /// Removes and returns the smallest key.
    pub(crate) fn pop_first(&mut self) -> Option<T> {
        let leaf = self.leftmost(self.root?);
        let (value, hole) = self.detach(leaf, LeafKey::Smallest);
        if let Some(hole) = hole {
            self.plug(hole);
        }
        self.len -= 1;
        Some(value)
    }

    /// Removes and returns the largest key.
    pub(crate) fn pop_last(&mut self) -> Option<T> {
        let leaf = self.rightmost(self.root?);
        let (value, hole) = self.detach(leaf, LeafKey::Largest);
        if let Some(hole) = hole {
            self.plug(hole);
        }
        self.len -= 1;
        Some(value)
    }

    /// Redirects the removal of an interior key to a terminal node.
    ///
    /// The single key of a 2-node and the smaller key of a 3-node are
    /// replaced by the in-order successor's key; the larger key of a 3-node
    /// by the in-order predecessor's. Returns the terminal node to shrink,
    /// which of its boundary keys to extract, and the interior key slot the
    /// extracted key must fill.
    fn relocate<Q>(&self, found: Handle, value: &Q) -> (Handle, LeafKey, Option<(Handle, KeySlot)>)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.nodes.get(found) {
            node if node.is_terminal() => {
                let key = match node {
                    Node::Three(three) if three.left_value.borrow() == value => LeafKey::Smallest,
                    Node::Three(_) => LeafKey::Largest,
                    Node::Two(_) => LeafKey::Smallest,
                    Node::Hole(_) => panic!("hole node outside of a removal"),
                };
                (found, key, None)
            }
            Node::Two(_) => {
                let successor = self.successor(found, value).expect("interior key has an in-order successor");
                (successor, LeafKey::Smallest, Some((found, KeySlot::Only)))
            }
            Node::Three(three) => {
                if three.left_value.borrow() == value {
                    let successor = self.successor(found, value).expect("interior key has an in-order successor");
                    (successor, LeafKey::Smallest, Some((found, KeySlot::Left)))
                } else {
                    let predecessor =
                        self.predecessor(found, value).expect("interior key has an in-order predecessor");
                    (predecessor, LeafKey::Largest, Some((found, KeySlot::Right)))
                }
            }
            Node::Hole(_) => panic!("hole node outside of a removal"),
        }
    }

    /// Extracts one boundary key from a terminal node.
    ///
    /// A 3-node demotes in place to a 2-node and the tree stays balanced.
    /// A 2-node leaves a hole in its slot (or, for a root leaf, empties the
    /// tree); the returned hole handle must be resolved by [`plug`].
    ///
    /// [`plug`]: Self::plug
    fn detach(&mut self, terminal: Handle, key: LeafKey) -> (T, Option<Handle>) {
        debug_assert!(self.nodes.get(terminal).is_terminal());
        if self.nodes.get(terminal).is_three() {
            let Node::Three(ThreeNode { parent, left_value, right_value, .. }) = self.nodes.lift(terminal) else {
                unreachable!()
            };
            let (extracted, kept) = match key {
                LeafKey::Smallest => (left_value, right_value),
                LeafKey::Largest => (right_value, left_value),
            };
            self.nodes.put(
                terminal,
                Node::Two(TwoNode {
                    parent,
                    value: kept,
                    left: None,
                    right: None,
                }),
            );
            (extracted, None)
        } else if self.nodes.get(terminal).parent().is_none() {
            // Removing the last key: the root leaf goes away entirely.
            let Node::Two(TwoNode { value, .. }) = self.nodes.take(terminal) else {
                panic!("expected 2-node leaf")
            };
            self.root = None;
            (value, None)
        } else {
            let Node::Two(TwoNode { parent, value, .. }) = self.nodes.lift(terminal) else {
                panic!("expected 2-node leaf")
            };
            self.nodes.put(terminal, Node::Hole(HoleNode { parent, child: None }));
            (value, Some(terminal))
        }
    }

    /// Writes a relocated key into an interior node, dropping the key that
    /// occupied the slot.
    fn replace_key(&mut self, handle: Handle, slot: KeySlot, value: T) {
        match (self.nodes.get_mut(handle), slot) {
            (Node::Two(two), KeySlot::Only) => two.value = value,
            (Node::Three(three), KeySlot::Left) => three.left_value = value,
            (Node::Three(three), KeySlot::Right) => three.right_value = value,
            _ => panic!("key slot does not match node shape"),
        }
    }

    /// Resolves a hole by walking it up the tree.
    ///
    /// Each round looks at the hole's parent and siblings: a 2-node parent
    /// merges with a 2-node sibling (pushing the hole one level up) or
    /// borrows from a 3-node sibling; a 3-node parent always resolves the
    /// hole locally, either by demoting itself to a 2-node or by rotating a
    /// key out of a 3-node sibling. Only the merge case loops.
    fn plug(&mut self, mut hole: Handle) {
        loop {
            let (parent, hole_child) = {
                let hole_node = self.nodes.get(hole).as_hole();
                (hole_node.parent.expect("a hole never rests at the root"), hole_node.child)
            };

            match self.nodes.get(parent) {
                Node::Two(two) => {
                    let (sibling, hole_on_left) = if two.left == Some(hole) {
                        (two.right.expect("interior 2-node missing a child"), true)
                    } else {
                        (two.left.expect("interior 2-node missing a child"), false)
                    };

                    if self.nodes.get(sibling).is_two() {
                        match self.merge_under_two_parent(hole, parent, sibling, hole_on_left, hole_child) {
                            Some(next) => hole = next,
                            None => return,
                        }
                    } else {
                        self.borrow_under_two_parent(hole, parent, sibling, hole_on_left, hole_child);
                        return;
                    }
                }
                Node::Three(_) => {
                    self.resolve_under_three_parent(hole, parent, hole_child);
                    return;
                }
                Node::Hole(_) => panic!("hole node outside of a removal"),
            }
        }
    }

    /// Hole with a 2-node parent and 2-node sibling: the parent's key and
    /// the sibling's key merge into one 3-node over the three surviving
    /// children. The merged node takes the hole's slot; the parent's slot
    /// becomes the next hole up, or the new root when the parent had no
    /// parent (the only way tree height decreases). Returns the propagated
    /// hole, if any.
    fn merge_under_two_parent(
        &mut self,
        hole: Handle,
        parent: Handle,
        sibling: Handle,
        hole_on_left: bool,
        hole_child: Option<Handle>,
    ) -> Option<Handle> {
        debug_assert!(self.nodes.get(hole).is_hole());
        let Node::Two(TwoNode { parent: grandparent, value: parent_value, .. }) = self.nodes.lift(parent) else {
            unreachable!()
        };
        let Node::Two(TwoNode { value: sibling_value, left: sibling_left, right: sibling_right, .. }) =
            self.nodes.take(sibling)
        else {
            panic!("expected 2-node sibling")
        };

        let merged = if hole_on_left {
            ThreeNode {
                parent: Some(parent),
                left_value: parent_value,
                right_value: sibling_value,
                left: hole_child,
                middle: sibling_left,
                right: sibling_right,
            }
        } else {
            ThreeNode {
                parent: Some(parent),
                left_value: sibling_value,
                right_value: parent_value,
                left: sibling_left,
                middle: sibling_right,
                right: hole_child,
            }
        };

        if grandparent.is_none() {
            // Root collapse: the merged node takes the root's slot and
            // every leaf rises one level together.
            self.nodes.put(parent, Node::Three(ThreeNode { parent: None, ..merged }));
            self.adopt(hole_child, parent);
            self.adopt(sibling_left, parent);
            self.adopt(sibling_right, parent);
            self.nodes.free(hole);
            return None;
        }

        self.nodes.put(
            parent,
            Node::Hole(HoleNode {
                parent: grandparent,
                child: Some(hole),
            }),
        );
        *self.nodes.get_mut(hole) = Node::Three(merged);
        self.adopt(sibling_left, hole);
        self.adopt(sibling_right, hole);
        Some(parent)
    }

    /// Hole with a 2-node parent and 3-node sibling: one sibling key
    /// rotates through the parent into the hole's side, leaving two
    /// balanced 2-nodes. Resolves the hole.
    fn borrow_under_two_parent(
        &mut self,
        hole: Handle,
        parent: Handle,
        sibling: Handle,
        hole_on_left: bool,
        hole_child: Option<Handle>,
    ) {
        let Node::Three(ThreeNode {
            left_value: sibling_left_value,
            right_value: sibling_right_value,
            left: sibling_left,
            middle: sibling_middle,
            right: sibling_right,
            ..
        }) = self.nodes.lift(sibling)
        else {
            panic!("expected 3-node sibling")
        };

        if hole_on_left {
            let parent_two = self.nodes.get_mut(parent).as_two_mut();
            let parent_value = core::mem::replace(&mut parent_two.value, sibling_left_value);
            *self.nodes.get_mut(hole) = Node::Two(TwoNode {
                parent: Some(parent),
                value: parent_value,
                left: hole_child,
                right: sibling_left,
            });
            self.nodes.put(
                sibling,
                Node::Two(TwoNode {
                    parent: Some(parent),
                    value: sibling_right_value,
                    left: sibling_middle,
                    right: sibling_right,
                }),
            );
            self.adopt(sibling_left, hole);
        } else {
            let parent_two = self.nodes.get_mut(parent).as_two_mut();
            let parent_value = core::mem::replace(&mut parent_two.value, sibling_right_value);
            *self.nodes.get_mut(hole) = Node::Two(TwoNode {
                parent: Some(parent),
                value: parent_value,
                left: sibling_right,
                right: hole_child,
            });
            self.nodes.put(
                sibling,
                Node::Two(TwoNode {
                    parent: Some(parent),
                    value: sibling_left_value,
                    left: sibling_left,
                    right: sibling_middle,
                }),
            );
            self.adopt(sibling_right, hole);
        }
    }

    /// Hole with a 3-node parent: always resolved locally.
    ///
    /// With a 2-node sibling next to the hole the parent demotes to a
    /// 2-node and the hole fuses into a reshaped 3-node sibling; with only
    /// 3-node siblings a key rotates over and the parent keeps both keys.
    /// A middle hole prefers its left sibling, so borrowing from the right
    /// only ever happens for an outer hole.
    fn resolve_under_three_parent(&mut self, hole: Handle, parent: Handle, hole_child: Option<Handle>) {
        let (parent_left, parent_middle, parent_right) = match self.nodes.get(parent) {
            Node::Three(three) => (
                three.left.expect("interior 3-node missing a child"),
                three.middle.expect("interior 3-node missing a child"),
                three.right.expect("interior 3-node missing a child"),
            ),
            _ => panic!("expected 3-node"),
        };

        if parent_left == hole {
            if self.nodes.get(parent_middle).is_two() {
                // Demote: parent's left key and the middle sibling fuse
                // into a 3-node in the hole's slot.
                let Node::Three(ThreeNode { parent: grandparent, left_value, right_value, right, .. }) =
                    self.nodes.lift(parent)
                else {
                    unreachable!()
                };
                let Node::Two(TwoNode { value: middle_value, left: m_left, right: m_right, .. }) =
                    self.nodes.take(parent_middle)
                else {
                    panic!("expected 2-node sibling")
                };
                *self.nodes.get_mut(hole) = Node::Three(ThreeNode {
                    parent: Some(parent),
                    left_value,
                    right_value: middle_value,
                    left: hole_child,
                    middle: m_left,
                    right: m_right,
                });
                self.adopt(m_left, hole);
                self.adopt(m_right, hole);
                self.nodes.put(
                    parent,
                    Node::Two(TwoNode {
                        parent: grandparent,
                        value: right_value,
                        left: Some(hole),
                        right,
                    }),
                );
            } else {
                // Borrow: the middle sibling's smallest key rotates through
                // the parent's left key into the hole.
                let Node::Three(ThreeNode {
                    left_value: m_left_value,
                    right_value: m_right_value,
                    left: m_left,
                    middle: m_middle,
                    right: m_right,
                    ..
                }) = self.nodes.lift(parent_middle)
                else {
                    unreachable!()
                };
                let parent_three = self.nodes.get_mut(parent).as_three_mut();
                let parent_left_value = core::mem::replace(&mut parent_three.left_value, m_left_value);
                *self.nodes.get_mut(hole) = Node::Two(TwoNode {
                    parent: Some(parent),
                    value: parent_left_value,
                    left: hole_child,
                    right: m_left,
                });
                self.nodes.put(
                    parent_middle,
                    Node::Two(TwoNode {
                        parent: Some(parent),
                        value: m_right_value,
                        left: m_middle,
                        right: m_right,
                    }),
                );
                self.adopt(m_left, hole);
            }
        } else if parent_right == hole {
            if self.nodes.get(parent_middle).is_two() {
                let Node::Three(ThreeNode { parent: grandparent, left_value, right_value, left, .. }) =
                    self.nodes.lift(parent)
                else {
                    unreachable!()
                };
                let Node::Two(TwoNode { value: middle_value, left: m_left, right: m_right, .. }) =
                    self.nodes.take(parent_middle)
                else {
                    panic!("expected 2-node sibling")
                };
                *self.nodes.get_mut(hole) = Node::Three(ThreeNode {
                    parent: Some(parent),
                    left_value: middle_value,
                    right_value,
                    left: m_left,
                    middle: m_right,
                    right: hole_child,
                });
                self.adopt(m_left, hole);
                self.adopt(m_right, hole);
                self.nodes.put(
                    parent,
                    Node::Two(TwoNode {
                        parent: grandparent,
                        value: left_value,
                        left,
                        right: Some(hole),
                    }),
                );
            } else {
                let Node::Three(ThreeNode {
                    left_value: m_left_value,
                    right_value: m_right_value,
                    left: m_left,
                    middle: m_middle,
                    right: m_right,
                    ..
                }) = self.nodes.lift(parent_middle)
                else {
                    unreachable!()
                };
                let parent_three = self.nodes.get_mut(parent).as_three_mut();
                let parent_right_value = core::mem::replace(&mut parent_three.right_value, m_right_value);
                *self.nodes.get_mut(hole) = Node::Two(TwoNode {
                    parent: Some(parent),
                    value: parent_right_value,
                    left: m_right,
                    right: hole_child,
                });
                self.nodes.put(
                    parent_middle,
                    Node::Two(TwoNode {
                        parent: Some(parent),
                        value: m_left_value,
                        left: m_left,
                        right: m_middle,
                    }),
                );
                self.adopt(m_right, hole);
            }
        } else {
            debug_assert_eq!(parent_middle, hole);
            if self.nodes.get(parent_left).is_two() {
                // Demote leftward: the left sibling, the parent's left key
                // and the hole fuse under the parent's right key.
                let Node::Three(ThreeNode { parent: grandparent, left_value, right_value, right, .. }) =
                    self.nodes.lift(parent)
                else {
                    unreachable!()
                };
                let Node::Two(TwoNode { value: left_value_sib, left: l_left, right: l_right, .. }) =
                    self.nodes.take(parent_left)
                else {
                    panic!("expected 2-node sibling")
                };
                *self.nodes.get_mut(hole) = Node::Three(ThreeNode {
                    parent: Some(parent),
                    left_value: left_value_sib,
                    right_value: left_value,
                    left: l_left,
                    middle: l_right,
                    right: hole_child,
                });
                self.adopt(l_left, hole);
                self.adopt(l_right, hole);
                self.nodes.put(
                    parent,
                    Node::Two(TwoNode {
                        parent: grandparent,
                        value: right_value,
                        left: Some(hole),
                        right,
                    }),
                );
            } else if self.nodes.get(parent_right).is_two() {
                // Demote rightward.
                let Node::Three(ThreeNode { parent: grandparent, left_value, right_value, left, .. }) =
                    self.nodes.lift(parent)
                else {
                    unreachable!()
                };
                let Node::Two(TwoNode { value: right_value_sib, left: r_left, right: r_right, .. }) =
                    self.nodes.take(parent_right)
                else {
                    panic!("expected 2-node sibling")
                };
                *self.nodes.get_mut(hole) = Node::Three(ThreeNode {
                    parent: Some(parent),
                    left_value: right_value,
                    right_value: right_value_sib,
                    left: hole_child,
                    middle: r_left,
                    right: r_right,
                });
                self.adopt(r_left, hole);
                self.adopt(r_right, hole);
                self.nodes.put(
                    parent,
                    Node::Two(TwoNode {
                        parent: grandparent,
                        value: left_value,
                        left,
                        right: Some(hole),
                    }),
                );
            } else {
                // Borrow from the 3-node left sibling; the parent stays a
                // 3-node.
                let Node::Three(ThreeNode {
                    left_value: l_left_value,
                    right_value: l_right_value,
                    left: l_left,
                    middle: l_middle,
                    right: l_right,
                    ..
                }) = self.nodes.lift(parent_left)
                else {
                    unreachable!()
                };
                let parent_three = self.nodes.get_mut(parent).as_three_mut();
                let parent_left_value = core::mem::replace(&mut parent_three.left_value, l_right_value);
                *self.nodes.get_mut(hole) = Node::Two(TwoNode {
                    parent: Some(parent),
                    value: parent_left_value,
                    left: l_right,
                    right: hole_child,
                });
                self.nodes.put(
                    parent_left,
                    Node::Two(TwoNode {
                        parent: Some(parent),
                        value: l_left_value,
                        left: l_left,
                        right: l_middle,
                    }),
                );
                self.adopt(l_right, hole);
            }
        }
    }
}
