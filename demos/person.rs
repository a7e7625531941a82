//! Populating and comparing a small domain model.
//!
//! Run with `RUST_LOG=fixture_core=debug` to see what the engine skips.

use fixture::chrono::NaiveDate;
use fixture::uuid::Uuid;
use fixture::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
enum Species {
    Cat,
    Dog,
    Parrot,
}

#[derive(Reflect, Debug, Clone, PartialEq)]
struct Pet {
    name: String,
    species: Species,
}

#[derive(Reflect, Debug, Clone, PartialEq)]
struct Person {
    #[fixture(readonly)]
    id: Uuid,
    name: String,
    age: i32,
    born: NaiveDate,
    nickname: Option<String>,
    pets: Vec<Pet>,
}

/// What an API might send back for a `Person`.
#[derive(Reflect, Debug, Clone, PartialEq)]
struct PersonResponse {
    name: String,
    age: i32,
    pets: Vec<Pet>,
    etag: String,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    println!("=== Fixture Demonstration ===\n");

    example_populate();
    example_compare();
    example_shallow_copy();
}

/// Example 1: fill a person with dummy data
fn example_populate() {
    println!("1. Populating a Person");

    let mut fixture = Fixture::seeded(2024);
    let person: Person = fixture.populate().expect("Person is constructible");
    println!("   {person:#?}\n");

    let names: Vec<String> = fixture
        .populate_many::<Pet>(3)
        .flatten()
        .map(|pet| pet.name)
        .collect();
    println!("   three more pets: {names:?}\n");
}

/// Example 2: compare a model against a response shape
fn example_compare() {
    println!("2. Comparing a Person with an API response");

    let mut fixture = Fixture::seeded(7);
    let person: Person = fixture.populate().expect("Person is constructible");
    let response = PersonResponse {
        name: person.name.clone(),
        age: person.age,
        pets: person.pets.clone(),
        etag: "W/\"1\"".to_string(),
    };

    println!("   person vs response: {}", compare(&person, &response));
    println!("   response vs person: {}\n", compare(&response, &person));
}

/// Example 3: shallow copies leave read-only members alone
fn example_shallow_copy() {
    println!("3. Shallow copy");

    let mut fixture = Fixture::seeded(99);
    let original = fixture.populate_into(Person {
        id: Uuid::from_u128(0x1234),
        name: String::new(),
        age: 0,
        born: NaiveDate::default(),
        nickname: None,
        pets: Vec::new(),
    });

    match shallow_copy(&original) {
        Ok(copy) => {
            println!("   original id: {}", original.id);
            println!("   copied id:   {}", copy.id);
            println!("   {}", compare(&original, &copy));
        }
        Err(err) => println!("   copy failed: {err}"),
    }
}
