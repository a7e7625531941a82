//! Type schemas and the [`Reflect`] trait.
//!
//! Rust has no runtime reflection, so each type describes itself through a
//! [`TypeInfo`]: its name, identity and [`Shape`]. Struct schemas list their
//! members and carry a type-erased constructor. `#[derive(Reflect)]` writes
//! all of this for user types; this module covers the standard ones.

use crate::error::{ConstructionError, ReflectError};
use crate::value::{Object, Opaque, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::any::TypeId;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Lazily resolved schema. Function pointers keep self-referencing types finite.
pub type TypeRef = fn() -> TypeInfo;

/// The schema of a single type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
    pub shape: Shape,
}

impl TypeInfo {
    /// Schema for `T` with the given shape.
    pub fn of<T: ?Sized + 'static>(shape: Shape) -> Self {
        TypeInfo {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
            shape,
        }
    }
}

/// Structural form of a type, as declared by its [`Reflect`] impl.
#[derive(Debug, Clone)]
pub enum Shape {
    Bool,
    Int(IntKind),
    Float(FloatKind),
    /// Owned text.
    Str,
    Char,
    /// Any calendar date or timestamp.
    DateTime,
    Uuid,
    /// A fieldless enum and its variant names in declaration order.
    Enum(&'static [&'static str]),
    Option(TypeRef),
    /// Growable sequence (`Vec`, `VecDeque`).
    List(TypeRef),
    /// Array; `len` is `Some` when the type fixes it (`[T; N]`).
    Array { element: TypeRef, len: Option<usize> },
    Struct(StructInfo),
    /// Carried as-is, never synthesized.
    Opaque,
}

/// Integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntKind {
    /// Largest non-negative value of the width.
    pub fn max(self) -> u64 {
        match self {
            IntKind::I8 => i8::MAX as u64,
            IntKind::I16 => i16::MAX as u64,
            IntKind::I32 => i32::MAX as u64,
            IntKind::I64 => i64::MAX as u64,
            IntKind::Isize => isize::MAX as u64,
            IntKind::U8 => u8::MAX as u64,
            IntKind::U16 => u16::MAX as u64,
            IntKind::U32 => u32::MAX as u64,
            IntKind::U64 => u64::MAX,
            IntKind::Usize => usize::MAX as u64,
        }
    }
}

/// Floating point widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

/// Schema of a struct-like type.
#[derive(Debug, Clone)]
pub struct StructInfo {
    pub members: Vec<MemberInfo>,
    /// Builds a default instance, as a value.
    pub construct: fn() -> Result<Value, ConstructionError>,
}

impl StructInfo {
    pub fn writable_members(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|member| member.writable)
    }
}

/// One member of a struct schema.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub name: &'static str,
    pub ty: TypeRef,
    /// Read-only members are left alone by population and shallow copies.
    pub writable: bool,
}

/// A type the engine can describe, construct, and convert to and from [`Value`].
///
/// Usually derived:
///
/// ```rust,ignore
/// use fixture::Reflect;
///
/// #[derive(Reflect, Debug)]
/// struct Pet {
///     name: String,
///     #[fixture(readonly)]
///     id: u32,
/// }
/// ```
pub trait Reflect: Sized + 'static {
    /// The schema of this type.
    fn type_info() -> TypeInfo;

    /// Convert to a dynamic value.
    fn to_value(&self) -> Value;

    /// Rebuild from a dynamic value.
    fn from_value(value: Value) -> Result<Self, ReflectError>;

    /// The parameterless construction path.
    fn construct() -> Result<Self, ConstructionError>;
}

/// Type-erased form of [`Reflect::construct`], stored in [`StructInfo`].
pub fn construct_value<T: Reflect>() -> Result<Value, ConstructionError> {
    T::construct().map(|value| value.to_value())
}

/// Unwrap an object value for `type_name`.
pub fn expect_object(value: Value, type_name: &'static str) -> Result<Object, ReflectError> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(ReflectError::unexpected(type_name, "object", &other)),
    }
}

impl Object {
    /// Remove member `name` and convert it to `T`.
    pub fn take_as<T: Reflect>(&mut self, name: &str) -> Result<T, ReflectError> {
        match self.take(name) {
            Some(value) => T::from_value(value),
            None => Err(ReflectError::MissingMember {
                type_name: self.type_name,
                member: name.to_string(),
            }),
        }
    }
}

macro_rules! impl_int {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::of::<$ty>(Shape::Int(IntKind::$kind))
                }

                fn to_value(&self) -> Value {
                    Value::Int(*self as i128)
                }

                fn from_value(value: Value) -> Result<Self, ReflectError> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| ReflectError::OutOfRange {
                            type_name: stringify!($ty),
                            value: i.to_string(),
                        }),
                        other => Err(ReflectError::unexpected(stringify!($ty), "integer", &other)),
                    }
                }

                fn construct() -> Result<Self, ConstructionError> {
                    Ok(0)
                }
            }
        )*
    };
}

impl_int!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

macro_rules! impl_float {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::of::<$ty>(Shape::Float(FloatKind::$kind))
                }

                fn to_value(&self) -> Value {
                    Value::Float(*self as f64)
                }

                fn from_value(value: Value) -> Result<Self, ReflectError> {
                    match value {
                        Value::Float(x) => Ok(x as $ty),
                        other => Err(ReflectError::unexpected(stringify!($ty), "float", &other)),
                    }
                }

                fn construct() -> Result<Self, ConstructionError> {
                    Ok(0.0)
                }
            }
        )*
    };
}

impl_float!(f32 => F32, f64 => F64);

/// Implements [`Reflect`] for a type whose value maps onto one [`Value`] variant.
macro_rules! impl_scalar {
    ($ty:ty, $shape:expr, $variant:ident, $expected:literal, $default:expr) => {
        impl Reflect for $ty {
            fn type_info() -> TypeInfo {
                TypeInfo::of::<$ty>($shape)
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, ReflectError> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(ReflectError::unexpected(stringify!($ty), $expected, &other)),
                }
            }

            fn construct() -> Result<Self, ConstructionError> {
                Ok($default)
            }
        }
    };
}

impl_scalar!(bool, Shape::Bool, Bool, "bool", false);
impl_scalar!(char, Shape::Char, Char, "char", '\0');
impl_scalar!(String, Shape::Str, Text, "text", String::new());
impl_scalar!(NaiveDateTime, Shape::DateTime, DateTime, "date/time", NaiveDateTime::default());
impl_scalar!(Uuid, Shape::Uuid, Uuid, "uuid", Uuid::nil());

impl Reflect for NaiveDate {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<NaiveDate>(Shape::DateTime)
    }

    fn to_value(&self) -> Value {
        Value::DateTime(self.and_time(NaiveTime::MIN))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::DateTime(dt) => Ok(dt.date()),
            other => Err(ReflectError::unexpected("NaiveDate", "date/time", &other)),
        }
    }

    fn construct() -> Result<Self, ConstructionError> {
        Ok(NaiveDate::default())
    }
}

impl Reflect for DateTime<Utc> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<DateTime<Utc>>(Shape::DateTime)
    }

    fn to_value(&self) -> Value {
        Value::DateTime(self.naive_utc())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::DateTime(dt) => Ok(dt.and_utc()),
            other => Err(ReflectError::unexpected("DateTime<Utc>", "date/time", &other)),
        }
    }

    fn construct() -> Result<Self, ConstructionError> {
        Ok(DateTime::<Utc>::default())
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Option<T>>(Shape::Option(T::type_info))
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Absent,
        }
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Absent => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn construct() -> Result<Self, ConstructionError> {
        Ok(None)
    }
}

// Boxes are transparent: a `Box<T>` has the schema of `T`.
impl<T: Reflect> Reflect for Box<T> {
    fn type_info() -> TypeInfo {
        T::type_info()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        T::from_value(value).map(Box::new)
    }

    fn construct() -> Result<Self, ConstructionError> {
        T::construct().map(Box::new)
    }
}

fn elements_of(value: Value, type_name: &'static str) -> Result<Vec<Value>, ReflectError> {
    match value {
        Value::Seq(items) | Value::Array(items) => Ok(items),
        other => Err(ReflectError::unexpected(type_name, "sequence", &other)),
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Vec<T>>(Shape::List(T::type_info))
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Reflect::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        elements_of(value, "Vec")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    fn construct() -> Result<Self, ConstructionError> {
        Ok(Vec::new())
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<VecDeque<T>>(Shape::List(T::type_info))
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Reflect::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        elements_of(value, "VecDeque")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    fn construct() -> Result<Self, ConstructionError> {
        Ok(VecDeque::new())
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Box<[T]>>(Shape::Array {
            element: T::type_info,
            len: None,
        })
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(Reflect::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        elements_of(value, "Box<[T]>")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    fn construct() -> Result<Self, ConstructionError> {
        Ok(Vec::new().into_boxed_slice())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<[T; N]>(Shape::Array {
            element: T::type_info,
            len: Some(N),
        })
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(Reflect::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        let items = elements_of(value, std::any::type_name::<Self>())?;
        if items.len() != N {
            return Err(ReflectError::Length {
                type_name: std::any::type_name::<Self>(),
                expected: N,
                found: items.len(),
            });
        }
        let typed = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        typed.try_into().map_err(|rest: Vec<T>| ReflectError::Length {
            type_name: std::any::type_name::<Self>(),
            expected: N,
            found: rest.len(),
        })
    }

    fn construct() -> Result<Self, ConstructionError> {
        let items = (0..N)
            .map(|_| T::construct())
            .collect::<Result<Vec<T>, _>>()?;
        items.try_into().map_err(|_| ConstructionError::Failed {
            type_name: std::any::type_name::<Self>(),
            reason: "element count mismatch".to_string(),
        })
    }
}

/// Implements [`Reflect`] for types the engine carries without looking inside.
///
/// The type must be `Clone + Debug + Default + Send + Sync`.
#[macro_export]
macro_rules! impl_opaque {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn type_info() -> $crate::TypeInfo {
                    $crate::TypeInfo::of::<$ty>($crate::Shape::Opaque)
                }

                fn to_value(&self) -> $crate::Value {
                    $crate::Value::Opaque($crate::Opaque::new(self))
                }

                fn from_value(value: $crate::Value) -> ::std::result::Result<Self, $crate::ReflectError> {
                    match &value {
                        $crate::Value::Opaque(opaque) => opaque.downcast::<$ty>().ok_or_else(|| {
                            $crate::ReflectError::unexpected(stringify!($ty), stringify!($ty), &value)
                        }),
                        other => Err($crate::ReflectError::unexpected(stringify!($ty), "opaque", other)),
                    }
                }

                fn construct() -> ::std::result::Result<Self, $crate::ConstructionError> {
                    Ok(<$ty as ::std::default::Default>::default())
                }
            }
        )*
    };
}

impl_opaque!(Duration, PathBuf);
