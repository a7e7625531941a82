//! Object population.
//!
//! [`Fixture`] is the entry point: it owns the random source and fills
//! freshly constructed or existing instances with dummy values.

use crate::classify::{classify, TypeDescriptor};
use crate::data::Config;
use crate::random::{RandomSource, SplitMix};
use crate::reflect::{Reflect, StructInfo, TypeInfo};
use crate::synth::Synthesizer;
use crate::value::Value;
use std::any::TypeId;
use std::marker::PhantomData;

impl<R: RandomSource + ?Sized> Synthesizer<'_, R> {
    /// Construct an instance of a struct type and fill its writable members.
    ///
    /// Yields `None` when construction fails or when the type is already being
    /// populated further up, which stops self-referencing types from recursing
    /// forever.
    pub(crate) fn populate_object(
        &mut self,
        id: TypeId,
        name: &'static str,
        schema: &StructInfo,
    ) -> Option<Value> {
        if self.in_progress.contains(&id) {
            tracing::debug!(type_name = name, "type already being populated, leaving it absent");
            return None;
        }

        let mut value = match (schema.construct)() {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(type_name = name, error = %err, "could not construct, leaving it absent");
                return None;
            }
        };

        self.in_progress.push(id);
        self.fill_members(schema, &mut value);
        self.in_progress.pop();
        Some(value)
    }

    /// Synthesize every writable member of `value` in place.
    ///
    /// Members whose synthesis yields nothing keep their current value.
    pub(crate) fn fill_members(&mut self, schema: &StructInfo, value: &mut Value) {
        let Some(object) = value.as_object_mut() else {
            return;
        };

        for member in schema.writable_members() {
            let info = (member.ty)();
            let synthesized = self.synthesize_type(&info, object.get(member.name));
            match synthesized {
                Some(new_value) => {
                    tracing::trace!(member = member.name, kind = new_value.kind(), "populated member");
                    object.set(member.name, new_value);
                }
                None => tracing::trace!(member = member.name, "member left unchanged"),
            }
        }
    }
}

/// Synthesizes dummy instances from type schemas.
///
/// A fixture holds the single random source used for every value it
/// produces. Seed it for reproducible data:
///
/// ```rust,ignore
/// let mut fixture = Fixture::seeded(42);
/// let person: Person = fixture.populate().expect("Person is constructible");
/// ```
///
/// A fixture is not synchronized; share it across threads only behind
/// your own lock.
#[derive(Debug, Clone)]
pub struct Fixture<R = SplitMix> {
    random: R,
    config: Config,
}

impl Fixture<SplitMix> {
    /// A fixture with a random seed.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A fixture replaying the data of `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_config(Config::default().with_seed(seed))
    }

    pub fn with_config(config: Config) -> Self {
        let random = SplitMix::new(config.initial_seed());
        Fixture { random, config }
    }
}

impl Default for Fixture<SplitMix> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Fixture<R> {
    /// A fixture drawing from a caller-supplied source.
    pub fn with_source(random: R, config: Config) -> Self {
        Fixture { random, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Synthesize a value for an arbitrary schema.
    pub fn synthesize(&mut self, info: &TypeInfo) -> Option<Value> {
        let today = self.config.today();
        Synthesizer::new(&mut self.random, today).synthesize_type(info, None)
    }

    /// Construct a new `T` and fill it with dummy values.
    ///
    /// Returns `None` when `T` cannot be constructed. Unsupported types come
    /// back as their constructed default.
    pub fn populate<T: Reflect>(&mut self) -> Option<T> {
        let info = T::type_info();
        match self.synthesize(&info) {
            Some(value) => match T::from_value(value) {
                Ok(populated) => Some(populated),
                Err(err) => {
                    tracing::warn!(type_name = info.name, error = %err, "synthesized value did not fit its type");
                    None
                }
            },
            None => T::construct().ok(),
        }
    }

    /// Fill the writable members of an existing instance.
    ///
    /// Read-only members keep their values, as do members that cannot be
    /// synthesized. Optional members that already hold a value stay present.
    pub fn populate_into<T: Reflect>(&mut self, existing: T) -> T {
        let info = T::type_info();
        let today = self.config.today();
        let mut synth = Synthesizer::new(&mut self.random, today);
        let mut value = existing.to_value();

        match classify(&info) {
            TypeDescriptor::ComplexObject { id, schema, .. } => {
                synth.in_progress.push(id);
                synth.fill_members(&schema, &mut value);
            }
            _ => {
                if let Some(new_value) = synth.synthesize_type(&info, Some(&value)) {
                    value = new_value;
                }
            }
        }

        match T::from_value(value) {
            Ok(populated) => populated,
            Err(err) => {
                tracing::warn!(type_name = info.name, error = %err, "populated value did not fit its type, keeping original");
                existing
            }
        }
    }

    /// Lazily populate `count` independent instances of `T`.
    pub fn populate_many<T: Reflect>(&mut self, count: usize) -> PopulateMany<'_, T, R> {
        PopulateMany {
            fixture: self,
            remaining: count,
            _marker: PhantomData,
        }
    }
}

/// Iterator returned by [`Fixture::populate_many`].
///
/// Each instance is synthesized only when the iterator is advanced.
pub struct PopulateMany<'a, T, R> {
    fixture: &'a mut Fixture<R>,
    remaining: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflect, R: RandomSource> Iterator for PopulateMany<'_, T, R> {
    type Item = Option<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.fixture.populate::<T>())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Reflect, R: RandomSource> ExactSizeIterator for PopulateMany<'_, T, R> {}
