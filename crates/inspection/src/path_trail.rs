//! Append-only record of how a value was reached from a root.

use std::fmt;

/// One step of a [`PathTrail`]: the accessor traversed, the list position
/// (if the accessor is multi-valued) and the value reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrailStep<T> {
    accessor: String,
    index: Option<usize>,
    value: T,
}

impl<T> TrailStep<T> {
    /// Accessor (attribute) name.
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    /// List position, if any.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Value reached by this step.
    pub fn value(&self) -> &T {
        &self.value
    }

    fn segment(&self) -> String {
        match self.index {
            Some(i) => format!("{}({})", self.accessor, i),
            None => self.accessor.clone(),
        }
    }
}

/// A non-empty, immutable sequence of [`TrailStep`]s, root first.
///
/// Appending never touches the parent: [`PathTrail::append`] copies the
/// parent's steps into a new trail, so a trail and every prefix it was built
/// from can be shared freely. Copying is linear in depth, which is bounded by
/// schema nesting rather than data volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTrail<T> {
    steps: Vec<TrailStep<T>>,
}

impl<T: Clone> PathTrail<T> {
    /// Creates a one-step trail.
    pub fn root(accessor: impl Into<String>, value: T) -> Self {
        Self {
            steps: vec![TrailStep {
                accessor: accessor.into(),
                index: None,
                value,
            }],
        }
    }

    /// Returns a new trail extending this one with an unindexed step.
    pub fn append(&self, accessor: impl Into<String>, value: T) -> Self {
        self.extend(accessor.into(), None, value)
    }

    /// Returns a new trail extending this one with a step into position
    /// `index` of a list accessor.
    pub fn append_indexed(&self, accessor: impl Into<String>, index: usize, value: T) -> Self {
        self.extend(accessor.into(), Some(index), value)
    }

    fn extend(&self, accessor: String, index: Option<usize>, value: T) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(TrailStep {
            accessor,
            index,
            value,
        });
        Self { steps }
    }

    /// Returns this trail without its last step, or `None` for a root trail.
    pub fn parent(&self) -> Option<Self> {
        if self.steps.len() < 2 {
            return None;
        }
        Some(Self {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }
}

impl<T> PathTrail<T> {
    /// Rendered segments, root first.
    pub fn segments(&self) -> Vec<String> {
        self.steps.iter().map(TrailStep::segment).collect()
    }

    /// All segments dot-joined, e.g. `Trade.tradeLot(0).party`.
    pub fn full_path(&self) -> String {
        self.segments().join(".")
    }

    /// All segments except the root, dot-joined, e.g. `tradeLot(0).party`.
    pub fn relative_path(&self) -> String {
        self.segments()[1..].join(".")
    }

    /// Values along the trail, root first.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.steps.iter().map(|s| &s.value)
    }

    /// Value reached by the last step.
    pub fn value(&self) -> &T {
        &self.last().value
    }

    /// The last step.
    pub fn last(&self) -> &TrailStep<T> {
        &self.steps[self.steps.len() - 1]
    }

    /// Steps, root first.
    pub fn steps(&self) -> &[TrailStep<T>] {
        &self.steps
    }

    /// Number of steps (at least one).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; a trail has at least its root step.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if `prefix` is this trail or one of its ancestors.
    pub fn starts_with(&self, prefix: &PathTrail<T>) -> bool
    where
        T: PartialEq,
    {
        self.steps.starts_with(&prefix.steps)
    }
}

impl<T> fmt::Display for PathTrail<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_full_and_relative_paths() {
        let trail = PathTrail::root("Trade", 0)
            .append_indexed("tradeLot", 1, 1)
            .append("priceQuantity", 2);

        assert_eq!(trail.full_path(), "Trade.tradeLot(1).priceQuantity");
        assert_eq!(trail.relative_path(), "tradeLot(1).priceQuantity");
        assert_eq!(PathTrail::root("Trade", 0).relative_path(), "");
    }

    #[test]
    fn append_leaves_parent_untouched() {
        let parent = PathTrail::root("A", "a".to_string());
        let mut value = "b".to_string();
        let child = parent.append("b", value.clone());
        value.push('!');

        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.value(), "b");
        assert!(child.starts_with(&parent));
        assert_eq!(child.parent(), Some(parent));
    }

    #[test]
    fn values_are_root_first() {
        let trail = PathTrail::root("A", 'a').append("b", 'b').append("c", 'c');
        assert_eq!(trail.values().copied().collect::<String>(), "abc");
        assert_eq!(*trail.value(), 'c');
        assert_eq!(trail.last().accessor(), "c");
    }

    #[test]
    fn equality_is_structural() {
        let a = PathTrail::root("A", 1).append_indexed("b", 0, 2);
        let b = PathTrail::root("A", 1).append_indexed("b", 0, 2);
        let c = PathTrail::root("A", 1).append("b", 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
