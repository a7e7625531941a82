#![cfg(feature = "derive")]

use fixture::*;

#[derive(Reflect, Debug, Clone, PartialEq)]
struct Pet {
    name: String,
}

#[derive(Reflect, Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: i32,
    pets: Vec<Pet>,
}

/// Same data as `Person` plus members of its own.
#[derive(Reflect, Debug, Clone, PartialEq)]
struct PersonRecord {
    name: String,
    age: i32,
    pets: Vec<Pet>,
    email: String,
    archived: bool,
}

/// A data transfer shape that spells one member differently.
#[derive(Reflect, Debug, Clone, PartialEq)]
struct PersonDto {
    #[fixture(rename = "full_name")]
    name: String,
    age: i32,
    pets: Vec<Pet>,
}

#[derive(Reflect, Debug, Clone, PartialEq)]
struct Profile {
    nickname: Option<String>,
    tags: [String; 2],
}

#[derive(Reflect, Debug, Clone, PartialEq)]
struct Ledger {
    #[fixture(readonly)]
    number: u32,
    owner: Person,
    balance: f64,
}

fn person() -> Person {
    Person {
        name: "ANA".to_string(),
        age: 40,
        pets: vec![
            Pet {
                name: "REX".to_string(),
            },
            Pet {
                name: "TOM".to_string(),
            },
        ],
    }
}

fn record_of(person: &Person) -> PersonRecord {
    PersonRecord {
        name: person.name.clone(),
        age: person.age,
        pets: person.pets.clone(),
        email: "ana@example.org".to_string(),
        archived: false,
    }
}

#[test]
fn test_populated_instance_equals_itself() {
    let mut fixture = Fixture::seeded(31);
    for person in fixture.populate_many::<Person>(10) {
        let person = person.unwrap();
        let result = compare(&person, &person.clone());
        assert!(result.is_equal(), "{result}");
        assert!(result.divergences().is_empty());
    }
}

#[test]
fn test_superset_second_operand_is_equal() {
    let person = person();
    let result = compare(&person, &record_of(&person));
    assert!(result.is_equal());
    assert!(result.divergences().is_empty());
}

#[test]
fn test_missing_member_is_reported() {
    let person = person();
    let result = compare(&record_of(&person), &person);
    assert!(result.is_equal());

    let paths: Vec<&str> = result.divergences().iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, ["email", "archived"]);
    assert_eq!(result.divergences()[0].value, Value::Text("ana@example.org".into()));
}

#[test]
fn test_renamed_member_does_not_match() {
    let person = person();
    let dto = PersonDto {
        name: person.name.clone(),
        age: person.age,
        pets: person.pets.clone(),
    };
    let (equal, divergences) = compare(&dto, &person).into_parts();
    assert!(equal);
    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0].path, "full_name");
}

#[test]
fn test_differences_fail() {
    let a = person();

    let mut older = a.clone();
    older.age += 1;
    assert!(!compare(&a, &older).is_equal());

    let mut renamed_pet = a.clone();
    renamed_pet.pets[1].name = "JIM".to_string();
    assert!(!compare(&a, &renamed_pet).is_equal());

    let mut fewer_pets = a.clone();
    fewer_pets.pets.pop();
    assert!(!compare(&a, &fewer_pets).is_equal());
    assert!(!compare(&fewer_pets, &a).is_equal());
}

#[test]
fn test_absent_members() {
    let none = Profile {
        nickname: None,
        tags: ["A".to_string(), "B".to_string()],
    };
    let some = Profile {
        nickname: Some("ace".to_string()),
        ..none.clone()
    };
    assert!(compare(&none, &none.clone()).is_equal());
    assert!(!compare(&none, &some).is_equal());
    assert!(!compare(&some, &none).is_equal());
}

#[test]
fn test_report_lists_unmatched_members() {
    let person = person();
    let report = compare(&record_of(&person), &person).to_string();
    assert!(report.starts_with("✓"));
    assert!(report.contains("email = \"ana@example.org\""));
    assert!(report.contains("archived = false"));
}

#[test]
fn test_shallow_copy_copies_writable_members() {
    let mut fixture = Fixture::seeded(32);
    let source = fixture.populate_into(Ledger {
        number: 77,
        owner: person(),
        balance: 0.0,
    });

    let copy = shallow_copy(&source).unwrap();
    assert_eq!(copy.number, 0);
    assert_eq!(copy.owner, source.owner);
    assert_eq!(copy.balance, source.balance);

    let result = compare(&source, &copy);
    assert!(!result.is_equal());
}

#[test]
fn test_shallow_copy_of_plain_values() {
    let pets = vec![Pet {
        name: "REX".to_string(),
    }];
    assert_eq!(shallow_copy(&pets), Ok(pets));
    assert_eq!(shallow_copy(&5u8), Ok(5));
}

#[derive(Reflect, Debug, Clone)]
struct Reading {
    label: String,
    value: f64,
    taken: fixture::chrono::NaiveDateTime,
}

#[test]
fn test_reading_with_nan_equals_itself() {
    let taken = fixture::chrono::NaiveDate::from_ymd_opt(2010, 5, 1)
        .unwrap()
        .and_hms_milli_opt(8, 0, 0, 0)
        .unwrap();
    let reading = Reading {
        label: "A".to_string(),
        value: f64::NAN,
        taken,
    };
    let result = compare(&reading, &reading);
    assert!(result.is_equal());
    assert!(result.divergences().is_empty());
}

#[test]
fn test_readings_differing_in_milliseconds_are_equal() {
    let day = fixture::chrono::NaiveDate::from_ymd_opt(2010, 5, 1).unwrap();
    let first = Reading {
        label: "A".to_string(),
        value: 2.5,
        taken: day.and_hms_milli_opt(8, 0, 0, 0).unwrap(),
    };
    let second = Reading {
        taken: day.and_hms_milli_opt(8, 0, 0, 123).unwrap(),
        ..first.clone()
    };
    assert!(compare(&first, &second).is_equal());

    let next_second = Reading {
        taken: day.and_hms_milli_opt(8, 0, 1, 0).unwrap(),
        ..first.clone()
    };
    assert!(!compare(&first, &next_second).is_equal());
}
