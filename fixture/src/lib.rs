//! Type-directed dummy data and structural comparison for tests.
//!
//! This is the main entry point for fixture. Derive [`Reflect`] for your
//! types, then populate them with dummy values or compare them member by
//! member:
//!
//! ```rust
//! use fixture::{compare, Fixture, Reflect};
//!
//! #[derive(Reflect, Debug, Clone)]
//! struct Pet {
//!     name: String,
//! }
//!
//! #[derive(Reflect, Debug, Clone)]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     pets: Vec<Pet>,
//! }
//!
//! let mut fixture = Fixture::seeded(7);
//! let person: Person = fixture.populate().expect("Person is constructible");
//! assert_eq!(person.pets.len(), 3);
//! assert!(compare(&person, &person.clone()).is_equal());
//! ```

pub use fixture_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use fixture_derive::*;
