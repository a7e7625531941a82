//! Value synthesis.
//!
//! A [`Synthesizer`] turns a [`TypeDescriptor`] into a dummy [`Value`]. It
//! owns nothing: it borrows the fixture's random source for the duration of
//! one top-level call and tracks which struct types are mid-population.

use crate::classify::{classify_with, TypeDescriptor};
use crate::random::{random_date, random_text, RandomSource};
use crate::reflect::{FloatKind, TypeInfo};
use crate::value::Value;
use chrono::NaiveDate;
use std::any::TypeId;

/// Number of elements in every synthesized sequence.
pub const COLLECTION_LEN: usize = 3;

/// Exclusive upper bound of synthesized integers.
pub const INTEGER_BOUND: u64 = 1000;

/// Produces dummy values for classified types.
pub struct Synthesizer<'a, R: RandomSource + ?Sized> {
    pub(crate) random: &'a mut R,
    pub(crate) today: NaiveDate,
    /// Struct types currently being populated, outermost first.
    pub(crate) in_progress: Vec<TypeId>,
}

impl<'a, R: RandomSource + ?Sized> Synthesizer<'a, R> {
    pub fn new(random: &'a mut R, today: NaiveDate) -> Self {
        Synthesizer {
            random,
            today,
            in_progress: Vec::new(),
        }
    }

    /// Classify `info` against its current value and synthesize a replacement.
    pub fn synthesize_type(&mut self, info: &TypeInfo, existing: Option<&Value>) -> Option<Value> {
        let descriptor = classify_with(info, existing);
        self.synthesize(&descriptor)
    }

    /// Synthesize a value for `descriptor`.
    ///
    /// `None` means no value could be produced: the type is unsupported,
    /// could not be constructed, or is already being populated further up.
    /// Callers keep whatever value they already had.
    pub fn synthesize(&mut self, descriptor: &TypeDescriptor) -> Option<Value> {
        match descriptor {
            TypeDescriptor::Boolean => Some(Value::Bool(self.random.next_bool())),
            TypeDescriptor::NumericInteger(kind) => {
                let bound = INTEGER_BOUND.min(kind.max().saturating_add(1));
                Some(Value::Int((self.random.next_int(bound) % bound) as i128))
            }
            TypeDescriptor::NumericFractional(kind) => {
                let whole = self.random.next_int(INTEGER_BOUND) % INTEGER_BOUND;
                let value = whole as f64 + self.random.next_float().clamp(0.0, 1.0);
                Some(Value::Float(match kind {
                    // Rounding must not reach the bound
                    FloatKind::F32 => (value as f32).min(999.999_94) as f64,
                    FloatKind::F64 => value.min(999.999_999_999_9),
                }))
            }
            TypeDescriptor::Text => Some(Value::Text(random_text(&mut *self.random))),
            TypeDescriptor::Character => random_text(&mut *self.random).chars().next().map(Value::Char),
            TypeDescriptor::DateTime => Some(Value::DateTime(random_date(&mut *self.random, self.today))),
            TypeDescriptor::UniqueIdentifier => Some(Value::Uuid(self.random_uuid())),
            TypeDescriptor::Enumeration(variants) => {
                if variants.is_empty() {
                    return None;
                }
                let index = self.random.next_int(variants.len() as u64) as usize % variants.len();
                Some(Value::Enum(variants[index].to_string()))
            }
            TypeDescriptor::OptionalValue { underlying } => {
                if self.random.next_bool() {
                    Some(self.synthesize_type(&underlying(), None).unwrap_or(Value::Absent))
                } else {
                    Some(Value::Absent)
                }
            }
            TypeDescriptor::Sequence { element } => self
                .synthesize_elements(&element(), COLLECTION_LEN)
                .map(Value::Seq),
            TypeDescriptor::FixedArray { element, len } => self
                .synthesize_elements(&element(), len.unwrap_or(COLLECTION_LEN))
                .map(Value::Array),
            TypeDescriptor::ComplexObject { id, name, schema } => {
                self.populate_object(*id, *name, schema)
            }
            TypeDescriptor::Unsupported { .. } => None,
        }
    }

    /// `count` elements of `element`, or `None` if any of them cannot be produced.
    fn synthesize_elements(&mut self, element: &TypeInfo, count: usize) -> Option<Vec<Value>> {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            match self.synthesize_type(element, None) {
                Some(item) => items.push(item),
                None => {
                    tracing::debug!(
                        element = element.name,
                        "element could not be synthesized, leaving container unset"
                    );
                    return None;
                }
            }
        }
        Some(items)
    }

    fn random_uuid(&mut self) -> uuid::Uuid {
        let mut bytes = [0u8; 16];
        for byte in bytes.iter_mut() {
            *byte = self.random.next_int(256) as u8;
        }
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
