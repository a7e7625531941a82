//! Error types for fixture synthesis and comparison.

use thiserror::Error;

/// Main error type for fixture operations.
///
/// Most of the engine recovers from these internally; they only surface
/// from the fallible entry points such as [`crate::shallow_copy`] and
/// [`crate::Reflect::construct`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixtureError {
    /// A type could not be instantiated.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// A value tree could not be turned back into a typed value.
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    /// Two operands did not have compatible shapes.
    #[error("Shape mismatch at `{path}`: {reason}")]
    ShapeMismatch { path: String, reason: String },
}

/// Result type for fixture operations.
pub type Result<T> = std::result::Result<T, FixtureError>;

/// A type has no usable parameterless construction path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The type opted out of construction.
    #[error("`{type_name}` has no parameterless constructor")]
    NoConstructor { type_name: &'static str },

    /// The type has no values at all (e.g. an enum without variants).
    #[error("`{type_name}` is uninhabited")]
    Uninhabited { type_name: &'static str },

    /// A member of the type could not be constructed.
    #[error("member `{member}` of `{type_name}` could not be constructed: {source}")]
    Member {
        type_name: &'static str,
        member: &'static str,
        #[source]
        source: Box<ConstructionError>,
    },

    /// A user-supplied constructor failed.
    #[error("constructor for `{type_name}` failed: {reason}")]
    Failed {
        type_name: &'static str,
        reason: String,
    },
}

/// A [`crate::Value`] did not have the shape a typed value expected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The value was of the wrong kind.
    #[error("expected {expected} for `{type_name}`, found {found}")]
    UnexpectedValue {
        type_name: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A required member was not present on the object.
    #[error("`{type_name}` is missing member `{member}`")]
    MissingMember {
        type_name: &'static str,
        member: String,
    },

    /// An enumeration value named a variant that does not exist.
    #[error("`{type_name}` has no variant `{variant}`")]
    UnknownVariant {
        type_name: &'static str,
        variant: String,
    },

    /// A numeric value did not fit the target type.
    #[error("{value} is out of range for `{type_name}`")]
    OutOfRange { type_name: &'static str, value: String },

    /// A fixed-length array received the wrong number of elements.
    #[error("`{type_name}` needs {expected} elements, found {found}")]
    Length {
        type_name: &'static str,
        expected: usize,
        found: usize,
    },
}

impl ReflectError {
    /// Build an [`ReflectError::UnexpectedValue`] for `value`.
    pub fn unexpected(type_name: &'static str, expected: &'static str, value: &crate::Value) -> Self {
        ReflectError::UnexpectedValue {
            type_name,
            expected,
            found: value.kind(),
        }
    }
}
