//! Dynamic value trees.
//!
//! Every [`crate::Reflect`] type converts to and from a [`Value`]. The
//! synthesizer builds values from a type schema and the comparator walks two
//! values side by side, which lets it match members of unrelated types by
//! name.

use chrono::NaiveDateTime;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A type-erased value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value: `None`, or a member that could not be produced.
    Absent,
    Bool(bool),
    Int(i128),
    Float(f64),
    Text(String),
    Char(char),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    /// A fieldless enum, by variant name.
    Enum(String),
    /// A growable sequence such as `Vec<T>`.
    Seq(Vec<Value>),
    /// A fixed array such as `[T; N]` or `Box<[T]>`.
    Array(Vec<Value>),
    Object(Object),
    /// A value the engine does not look inside.
    Opaque(Opaque),
}

impl Value {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Char(_) => "char",
            Value::DateTime(_) => "date/time",
            Value::Uuid(_) => "uuid",
            Value::Enum(_) => "enum",
            Value::Seq(_) => "sequence",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Opaque(_) => "opaque",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Elements of a sequence or array.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "absent"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Uuid(id) => write!(f, "{id}"),
            Value::Enum(variant) => write!(f, "{variant}"),
            Value::Seq(items) | Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(object) => write!(f, "{object}"),
            Value::Opaque(opaque) => write!(f, "{}", opaque.repr),
        }
    }
}

/// A named member of an [`Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub value: Value,
}

impl Member {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Member {
            name: name.into(),
            value,
        }
    }
}

/// A struct-like value: a type name and its members in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub type_name: &'static str,
    pub members: Vec<Member>,
}

impl Object {
    pub fn new(type_name: &'static str) -> Self {
        Object {
            type_name,
            members: Vec::new(),
        }
    }

    /// Append a member.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.push(Member::new(name, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|member| member.name == name)
            .map(|member| &member.value)
    }

    /// Replace the value of an existing member. Returns false if there is no such member.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.members.iter_mut().find(|member| member.name == name) {
            Some(member) => {
                member.value = value;
                true
            }
            None => false,
        }
    }

    /// Remove a member and return its value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.members.iter().position(|member| member.name == name)?;
        Some(self.members.remove(index).value)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", short_name(self.type_name))?;
        if self.members.is_empty() {
            return Ok(());
        }
        write!(f, " {{ ")?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", member.name, member.value)?;
        }
        write!(f, " }}")
    }
}

/// A value carried through the engine untouched.
///
/// Equality is by type name and `Debug` rendering.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    repr: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T>(value: &T) -> Self
    where
        T: Any + Clone + fmt::Debug + Send + Sync,
    {
        Opaque {
            type_name: std::any::type_name::<T>(),
            repr: format!("{value:?}"),
            inner: Arc::new(value.clone()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recover the carried value.
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        self.inner.downcast_ref::<T>().cloned()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.repr == other.repr
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.repr)
    }
}

/// `a::b::Person` -> `Person`.
pub(crate) fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_members() {
        let mut object = Object::new("app::Pet")
            .with("name", Value::Text("REX".into()))
            .with("age", Value::Int(3));

        assert_eq!(object.get("age"), Some(&Value::Int(3)));
        assert!(object.set("age", Value::Int(4)));
        assert!(!object.set("owner", Value::Absent));
        assert_eq!(object.take("name"), Some(Value::Text("REX".into())));
        assert_eq!(object.len(), 1);
    }

    #[test]
    fn test_display() {
        let object = Object::new("app::Pet")
            .with("name", Value::Text("REX".into()))
            .with("tags", Value::Seq(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(object.to_string(), "Pet { name: \"REX\", tags: [1, 2] }");
    }

    #[test]
    fn test_opaque_roundtrip() {
        let duration = std::time::Duration::from_secs(5);
        let opaque = Opaque::new(&duration);
        assert_eq!(opaque.downcast::<std::time::Duration>(), Some(duration));
        assert_eq!(opaque.downcast::<String>(), None);
        assert_eq!(opaque, Opaque::new(&duration));
    }
}
