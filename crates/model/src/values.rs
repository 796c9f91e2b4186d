//! Basic (scalar) values and type descriptors.
//!
//! The mapping engine does not know the concrete model; it only needs to know
//! for each visited node whether the declared type is a plain data type, a
//! scalar, or one of the two metadata containers (`FieldWithMeta`,
//! `ReferenceWithMeta`) that get special path-matching treatment.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::TypeName;

// ---------------------------------------------------------------------------
// Basic types
// ---------------------------------------------------------------------------

/// The scalar types a model attribute can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicType {
    /// UTF-8 text.
    Text,
    /// `true` / `false`.
    Boolean,
    /// Calendar date without time zone.
    Date,
    /// Signed integer.
    Integer,
    /// Decimal number.
    Decimal,
    /// Time of day without time zone.
    Time,
    /// Enumeration member, held by name.
    Enumeration,
}

impl BasicType {
    /// Returns `true` for the primitive kinds whose metadata wrappers are
    /// matched at the wrapper rather than at the wrapped value: text,
    /// boolean, date, integer and decimal.
    pub fn is_wrappable_primitive(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Boolean | Self::Date | Self::Integer | Self::Decimal
        )
    }
}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BasicValue {
    /// UTF-8 text.
    Text(String),
    /// Boolean flag.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Signed integer.
    Integer(i64),
    /// Decimal number.
    Decimal(f64),
    /// Time of day.
    Time(NaiveTime),
    /// Enumeration member name.
    Enumeration(String),
}

impl BasicValue {
    /// The [`BasicType`] of this value.
    pub fn basic_type(&self) -> BasicType {
        match self {
            Self::Text(_) => BasicType::Text,
            Self::Boolean(_) => BasicType::Boolean,
            Self::Date(_) => BasicType::Date,
            Self::Integer(_) => BasicType::Integer,
            Self::Decimal(_) => BasicType::Decimal,
            Self::Time(_) => BasicType::Time,
            Self::Enumeration(_) => BasicType::Enumeration,
        }
    }

    /// Returns the text content for `Text` and `Enumeration` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Enumeration(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for BasicValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(v) | Self::Enumeration(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Type descriptors
// ---------------------------------------------------------------------------

/// Structural category of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A scalar type.
    Basic(BasicType),
    /// A composite data type with its own attributes.
    Data,
    /// A thin container holding one value plus provenance metadata.
    FieldWithMeta,
    /// A container holding a reference (global key or address) to a value.
    ReferenceWithMeta,
}

impl TypeKind {
    /// Returns `true` for kinds that carry nested attributes.
    pub fn is_composite(self) -> bool {
        !matches!(self, Self::Basic(_))
    }

    /// Returns `true` for the two metadata container kinds.
    pub fn is_meta_container(self) -> bool {
        matches!(self, Self::FieldWithMeta | Self::ReferenceWithMeta)
    }
}

/// A declared type: its simple name and structural kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Simple type name.
    pub name: TypeName,
    /// Structural kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Creates a descriptor.
    pub fn new(name: TypeName, kind: TypeKind) -> Self {
        Self { name, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_fixed_primitive_set_is_wrappable() {
        let wrappable: Vec<_> = [
            BasicType::Text,
            BasicType::Boolean,
            BasicType::Date,
            BasicType::Integer,
            BasicType::Decimal,
            BasicType::Time,
            BasicType::Enumeration,
        ]
        .into_iter()
        .filter(|t| t.is_wrappable_primitive())
        .collect();
        assert_eq!(wrappable.len(), 5);
        assert!(!BasicType::Enumeration.is_wrappable_primitive());
    }

    #[test]
    fn values_report_their_type() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        assert_eq!(BasicValue::Date(date).basic_type(), BasicType::Date);
        assert_eq!(BasicValue::Decimal(1.5).basic_type(), BasicType::Decimal);
        assert_eq!(BasicValue::Text("x".into()).as_str(), Some("x"));
        assert_eq!(BasicValue::Integer(3).as_str(), None);
    }

    #[test]
    fn meta_containers_are_composite() {
        assert!(TypeKind::FieldWithMeta.is_composite());
        assert!(TypeKind::ReferenceWithMeta.is_meta_container());
        assert!(!TypeKind::Data.is_meta_container());
        assert!(!TypeKind::Basic(BasicType::Text).is_composite());
    }
}
