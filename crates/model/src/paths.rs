//! Structural addresses into the model object tree.
//!
//! A [`ModelPath`] names the chain of attributes (and list positions) used to
//! reach a value from the root object, e.g. `Trade.tradeLot(0).priceQuantity`.
//! Mapping delegates declare the model path they target; the engine compares
//! it against the path of every node it visits.
//!
//! A [`SynonymPath`] is the address of the same value in the external
//! representation the mapping reads from. The engine never interprets it; it
//! is handed back to the delegate verbatim.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PathParseError;

// ---------------------------------------------------------------------------
// Model paths
// ---------------------------------------------------------------------------

/// One segment of a [`ModelPath`]: an attribute name and, for elements of a
/// multi-valued attribute, the element's position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathElement {
    name: String,
    index: Option<usize>,
}

impl PathElement {
    /// Creates an unindexed element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    /// Creates an element addressing position `index` of a list attribute.
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }

    /// Attribute name of this segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List position of this segment, if any.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}({})", self.name, i),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A non-empty, immutable address into the model object tree.
///
/// Equality is structural (names and indices). Ordering is lexicographic on
/// the rendered form returned by [`ModelPath::build_path`].
///
/// Serialised as its rendered string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelPath {
    elements: Vec<PathElement>,
}

impl ModelPath {
    /// Creates a single-segment path, typically the simple name of the root type.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            elements: vec![PathElement::new(name)],
        }
    }

    /// Returns a new path with `name` appended.
    pub fn new_sub_path(&self, name: impl Into<String>) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::new(name));
        Self { elements }
    }

    /// Returns a new path whose last segment carries `index`.
    ///
    /// Used when descending into the elements of a list attribute: the list is
    /// reported at `a.b`, its elements at `a.b(0)`, `a.b(1)`, ...
    pub fn with_index(&self, index: usize) -> Self {
        let mut elements = self.elements.clone();
        let last = elements.len() - 1;
        elements[last].index = Some(index);
        Self { elements }
    }

    /// Returns the path one level up, or `None` for a single-segment path.
    pub fn parent(&self) -> Option<Self> {
        if self.elements.len() < 2 {
            return None;
        }
        Some(Self {
            elements: self.elements[..self.elements.len() - 1].to_vec(),
        })
    }

    /// Returns this path with every list index removed.
    pub fn to_indexless(&self) -> Self {
        Self {
            elements: self
                .elements
                .iter()
                .map(|e| PathElement::new(e.name.clone()))
                .collect(),
        }
    }

    /// Returns `true` if any segment carries a list index.
    pub fn is_indexed(&self) -> bool {
        self.elements.iter().any(|e| e.index.is_some())
    }

    /// The path's segments, root first.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false`; a model path has at least its root segment.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Renders the path as dot-separated segments, indices as `(i)`.
    pub fn build_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl PartialOrd for ModelPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModelPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.build_path().cmp(&other.build_path())
    }
}

impl FromStr for ModelPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }
        let elements = s
            .split('.')
            .map(|segment| parse_element(s, segment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { elements })
    }
}

fn parse_element(path: &str, segment: &str) -> Result<PathElement, PathParseError> {
    let invalid = |reason: &str| PathParseError::InvalidSegment {
        path: path.to_string(),
        segment: segment.to_string(),
        reason: reason.to_string(),
    };

    match segment.find('(') {
        None if segment.is_empty() => Err(invalid("empty segment")),
        None if segment.contains(')') => Err(invalid("unbalanced index")),
        None => Ok(PathElement::new(segment)),
        Some(0) => Err(invalid("missing attribute name")),
        Some(open) => {
            let digits = segment[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| invalid("unbalanced index"))?;
            let index = digits
                .parse::<usize>()
                .map_err(|_| invalid("index is not a non-negative integer"))?;
            Ok(PathElement::indexed(&segment[..open], index))
        }
    }
}

impl TryFrom<String> for ModelPath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelPath> for String {
    fn from(path: ModelPath) -> Self {
        path.build_path()
    }
}

// ---------------------------------------------------------------------------
// Synonym paths
// ---------------------------------------------------------------------------

/// Address of a value in the external representation a mapping reads from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SynonymPath(Vec<String>);

impl SynonymPath {
    /// Creates a synonym path from its element names.
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(elements.into_iter().map(Into::into).collect())
    }

    /// Element names, outermost first.
    pub fn elements(&self) -> &[String] {
        &self.0
    }

    /// Last element name, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for SynonymPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> ModelPath {
        s.parse().expect("valid path")
    }

    #[test]
    fn sub_paths_and_indices_render_in_order() {
        let p = ModelPath::root("Trade")
            .new_sub_path("tradeLot")
            .with_index(2)
            .new_sub_path("priceQuantity");
        assert_eq!(p.build_path(), "Trade.tradeLot(2).priceQuantity");
        assert!(p.is_indexed());
    }

    #[test]
    fn parse_round_trips_rendered_form() {
        let p = path("Trade.tradeLot(0).priceQuantity(12).quantity");
        assert_eq!(p.to_string(), "Trade.tradeLot(0).priceQuantity(12).quantity");
        assert_eq!(p.elements()[1].index(), Some(0));
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn parent_drops_last_segment() {
        assert_eq!(path("Trade.party.name").parent(), Some(path("Trade.party")));
        assert_eq!(ModelPath::root("Trade").parent(), None);
    }

    #[test]
    fn indexless_ignores_list_positions() {
        let p = path("Trade.tradeLot(3).priceQuantity(1)");
        assert_eq!(p.to_indexless(), path("Trade.tradeLot.priceQuantity"));
        assert!(!p.to_indexless().is_indexed());
    }

    #[test]
    fn ordering_is_lexicographic_on_rendered_form() {
        let mut paths = vec![path("Trade.party"), path("Trade.account"), path("Trade")];
        paths.sort();
        assert_eq!(paths, vec![path("Trade"), path("Trade.account"), path("Trade.party")]);
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert_eq!("".parse::<ModelPath>(), Err(PathParseError::Empty));
        for bad in ["Trade..party", "Trade.party(", "Trade.party(x)", "Trade.(1)", "Trade.party)"] {
            assert!(bad.parse::<ModelPath>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn synonym_path_renders_dot_joined() {
        let s = SynonymPath::new(["trade", "party"]);
        assert_eq!(s.to_string(), "trade.party");
        assert_eq!(s.last(), Some("party"));
    }
}
