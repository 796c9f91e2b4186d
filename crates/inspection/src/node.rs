//! Generic guarded tree traversal.
//!
//! A [`Node`] knows how to produce its children, whether it sits on a cycle
//! (guarded) and whether it is worth expanding at all. [`NodeInspector`]
//! turns any root node into a lazy depth-first iterator that honours both
//! decisions.

/// A node of a lazily explored tree.
pub trait Node: Sized {
    /// What each node carries.
    type Item;

    /// Derives this node's children. Called at most once per yielded node.
    fn children(&self) -> Vec<Self>;

    /// The node's payload.
    fn get(&self) -> &Self::Item;

    /// Returns `true` if this node must not be expanded because it would
    /// repeat one of its own ancestors.
    fn is_guarded(&self) -> bool;

    /// Returns `true` if this node's children are worth exploring.
    fn should_inspect(&self) -> bool;
}

/// Lazy pre-order, depth-first iterator over a [`Node`] tree.
///
/// Guarded nodes are yielded but never expanded; nodes that decline
/// inspection are yielded as leaves. Children are yielded in the order
/// [`Node::children`] returns them.
#[derive(Debug)]
pub struct NodeInspector<N> {
    stack: Vec<N>,
}

impl<N: Node> NodeInspector<N> {
    /// Starts a traversal at `root`.
    pub fn new(root: N) -> Self {
        Self { stack: vec![root] }
    }
}

impl<N: Node> Iterator for NodeInspector<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.stack.pop()?;
        if !node.is_guarded() && node.should_inspect() {
            self.stack.extend(node.children().into_iter().rev());
        }
        Some(node)
    }
}
