//! Newtype identifiers for the mapping domain.
//!
//! Type names, attribute names and delegate names are all strings under the
//! hood; wrapping each in its own newtype keeps a [`TypeName`] from being
//! passed where an [`AttributeName`] is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Simple name of a model type (e.g. `"Trade"`, `"FieldWithMetaString"`).
    ///
    /// The root segment of every [`crate::ModelPath`] is the simple name of the
    /// root type being walked.
    TypeName
}

string_id! {
    /// Name of an attribute declared on a model type (e.g. `"party"`).
    AttributeName
}

// ---------------------------------------------------------------------------

/// Identifies a single mapping run.
///
/// Generated fresh for every engine run and attached to the run's tracing
/// span so all delegate activity from one run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingRunId(Uuid);

impl MappingRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`MappingRunId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for MappingRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_are_rejected() {
        assert!(TypeName::new("").is_none());
        assert!(AttributeName::new(String::new()).is_none());
    }

    #[test]
    fn names_display_as_their_value() {
        let name = TypeName::new("Trade").expect("non-empty");
        assert_eq!(name.as_str(), "Trade");
        assert_eq!(name.to_string(), "Trade");
    }

    #[test]
    fn random_run_ids_differ() {
        assert_ne!(MappingRunId::new_random(), MappingRunId::new_random());
    }
}
