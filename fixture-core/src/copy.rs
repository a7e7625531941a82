//! Member-wise copies.

use crate::error::{FixtureError, Result};
use crate::reflect::{Reflect, Shape};

/// Construct a new `T` and copy each top-level writable member of `source`
/// into it.
///
/// This is deliberately *shallow*: every writable member is copied as one
/// unit, without looking inside it, and read-only members keep the value the
/// constructor gave them. It is not a deep copy and does not rebuild nested
/// objects member by member, so read-only members of nested objects are
/// copied along with their parent.
///
/// Types that are not struct-like are copied whole.
pub fn shallow_copy<T: Reflect>(source: &T) -> Result<T> {
    let info = T::type_info();
    let Shape::Struct(schema) = &info.shape else {
        return Ok(T::from_value(source.to_value())?);
    };

    let source_value = source.to_value();
    let mut target_value = T::construct()?.to_value();
    let (Some(from), Some(to)) = (source_value.as_object(), target_value.as_object_mut()) else {
        return Err(FixtureError::ShapeMismatch {
            path: info.name.to_string(),
            reason: "struct schema did not produce an object".to_string(),
        });
    };

    for member in schema.writable_members() {
        if let Some(value) = from.get(member.name) {
            to.set(member.name, value.clone());
        }
    }

    Ok(T::from_value(target_value)?)
}
