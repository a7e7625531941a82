//! Type classification.
//!
//! Maps a [`TypeInfo`] onto the semantic category that selects a synthesis
//! and comparison strategy. Classification is total and never fails: any
//! shape not otherwise recognized is [`Category::Unsupported`].

use crate::reflect::{FloatKind, IntKind, Shape, StructInfo, TypeInfo, TypeRef};
use crate::value::Value;
use std::any::TypeId;
use std::fmt;

/// Semantic category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Boolean,
    NumericInteger,
    NumericFractional,
    Text,
    Character,
    DateTime,
    UniqueIdentifier,
    Enumeration,
    OptionalValue,
    Sequence,
    FixedArray,
    ComplexObject,
    Unsupported,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Boolean => "boolean",
            Category::NumericInteger => "integer",
            Category::NumericFractional => "fractional",
            Category::Text => "text",
            Category::Character => "character",
            Category::DateTime => "date/time",
            Category::UniqueIdentifier => "unique identifier",
            Category::Enumeration => "enumeration",
            Category::OptionalValue => "optional",
            Category::Sequence => "sequence",
            Category::FixedArray => "fixed array",
            Category::ComplexObject => "complex object",
            Category::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Classification result: a category plus whatever its handler needs.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Boolean,
    NumericInteger(IntKind),
    NumericFractional(FloatKind),
    Text,
    Character,
    DateTime,
    UniqueIdentifier,
    Enumeration(&'static [&'static str]),
    OptionalValue { underlying: TypeRef },
    Sequence { element: TypeRef },
    FixedArray { element: TypeRef, len: Option<usize> },
    ComplexObject {
        id: TypeId,
        name: &'static str,
        schema: StructInfo,
    },
    Unsupported { name: &'static str },
}

impl TypeDescriptor {
    pub fn category(&self) -> Category {
        match self {
            TypeDescriptor::Boolean => Category::Boolean,
            TypeDescriptor::NumericInteger(_) => Category::NumericInteger,
            TypeDescriptor::NumericFractional(_) => Category::NumericFractional,
            TypeDescriptor::Text => Category::Text,
            TypeDescriptor::Character => Category::Character,
            TypeDescriptor::DateTime => Category::DateTime,
            TypeDescriptor::UniqueIdentifier => Category::UniqueIdentifier,
            TypeDescriptor::Enumeration(_) => Category::Enumeration,
            TypeDescriptor::OptionalValue { .. } => Category::OptionalValue,
            TypeDescriptor::Sequence { .. } => Category::Sequence,
            TypeDescriptor::FixedArray { .. } => Category::FixedArray,
            TypeDescriptor::ComplexObject { .. } => Category::ComplexObject,
            TypeDescriptor::Unsupported { .. } => Category::Unsupported,
        }
    }

    /// Contained type of a sequence or array.
    pub fn element_type(&self) -> Option<TypeInfo> {
        match self {
            TypeDescriptor::Sequence { element } | TypeDescriptor::FixedArray { element, .. } => {
                Some(element())
            }
            _ => None,
        }
    }

    /// Wrapped type of an optional value.
    pub fn underlying_type(&self) -> Option<TypeInfo> {
        match self {
            TypeDescriptor::OptionalValue { underlying } => Some(underlying()),
            _ => None,
        }
    }
}

/// Classify a type from its schema alone.
pub fn classify(info: &TypeInfo) -> TypeDescriptor {
    match &info.shape {
        Shape::List(element) => TypeDescriptor::Sequence { element: *element },
        Shape::Array { element, len } => TypeDescriptor::FixedArray {
            element: *element,
            len: *len,
        },
        Shape::Bool => TypeDescriptor::Boolean,
        Shape::Enum(variants) => TypeDescriptor::Enumeration(*variants),
        Shape::Int(kind) => TypeDescriptor::NumericInteger(*kind),
        Shape::Float(kind) => TypeDescriptor::NumericFractional(*kind),
        Shape::Str => TypeDescriptor::Text,
        Shape::Char => TypeDescriptor::Character,
        Shape::DateTime => TypeDescriptor::DateTime,
        Shape::Uuid => TypeDescriptor::UniqueIdentifier,
        Shape::Option(underlying) => TypeDescriptor::OptionalValue {
            underlying: *underlying,
        },
        Shape::Struct(schema) => TypeDescriptor::ComplexObject {
            id: info.id,
            name: info.name,
            schema: schema.clone(),
        },
        Shape::Opaque => {
            tracing::debug!(type_name = info.name, "no strategy for type, treating as unsupported");
            TypeDescriptor::Unsupported { name: info.name }
        }
    }
}

/// Classify a type given the value it currently holds.
///
/// An optional whose value is already present is classified as the type it
/// wraps, so it stays present.
pub fn classify_with(info: &TypeInfo, existing: Option<&Value>) -> TypeDescriptor {
    match (&info.shape, existing) {
        (Shape::Option(underlying), Some(value)) if !value.is_absent() => {
            classify_with(&underlying(), Some(value))
        }
        _ => classify(info),
    }
}
