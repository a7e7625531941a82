//! Structural comparison.
//!
//! Two values are compared by walking the first one: members are matched by
//! name, sequences element by element. Members of the first operand with no
//! counterpart in the second are recorded as divergences rather than failing
//! the comparison.

use crate::reflect::Reflect;
use crate::value::{Object, Value};
use chrono::NaiveDateTime;
use std::fmt;

/// A member of the first operand that could not be matched in the second.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    /// Member name, or a dotted path (`owner.pets[1].name`) when nested.
    pub path: String,
    /// The value found on the first operand.
    pub value: Value,
}

/// Outcome of [`compare`].
///
/// `equal` is authoritative. `divergences` is diagnostic and may be
/// non-empty even when `equal` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub equal: bool,
    pub divergences: Vec<Divergence>,
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    pub fn divergences(&self) -> &[Divergence] {
        &self.divergences
    }

    pub fn into_parts(self) -> (bool, Vec<Divergence>) {
        (self.equal, self.divergences)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.equal {
            write!(f, "✓ structurally equal")?;
        } else {
            write!(f, "✗ structurally different")?;
        }
        if !self.divergences.is_empty() {
            writeln!(f)?;
            write!(f, "  unmatched members:")?;
            for divergence in &self.divergences {
                writeln!(f)?;
                write!(f, "    │ {} = {}", divergence.path, divergence.value)?;
            }
        }
        Ok(())
    }
}

/// Compare two reflected values of possibly different types.
pub fn compare<A: Reflect, B: Reflect>(first: &A, second: &B) -> Comparison {
    compare_values(&first.to_value(), &second.to_value())
}

/// Compare two value trees.
pub fn compare_values(first: &Value, second: &Value) -> Comparison {
    let mut divergences = Vec::new();
    let equal = compare_node(first, second, "", &mut divergences);
    Comparison { equal, divergences }
}

fn compare_node(first: &Value, second: &Value, path: &str, out: &mut Vec<Divergence>) -> bool {
    match first {
        Value::Absent => second.is_absent(),
        Value::Text(text) => second.as_text() == Some(text.as_str()),
        Value::Seq(items) | Value::Array(items) => compare_elements(items, second, path, out),
        Value::Object(object) => compare_members(object, second, path, out),
        Value::DateTime(stamp) => match second {
            Value::DateTime(other) => render_to_second(stamp) == render_to_second(other),
            _ => false,
        },
        // NaN equals itself so that every value compares equal to itself
        Value::Float(x) => match second {
            Value::Float(y) => x == y || (x.is_nan() && y.is_nan()),
            _ => false,
        },
        _ => first == second,
    }
}

/// Canonical rendering of a timestamp at whole-second precision.
fn render_to_second(stamp: &NaiveDateTime) -> String {
    stamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn compare_elements(items: &[Value], second: &Value, path: &str, out: &mut Vec<Divergence>) -> bool {
    let Some(others) = second.elements() else {
        tracing::debug!(path, found = second.kind(), "expected a sequence");
        return false;
    };

    for (index, (item, other)) in items.iter().zip(others).enumerate() {
        if !compare_node(item, other, &format!("{path}[{index}]"), out) {
            return false;
        }
    }

    if items.len() != others.len() {
        tracing::debug!(path, first = items.len(), second = others.len(), "sequence lengths differ");
        return false;
    }
    true
}

fn compare_members(object: &Object, second: &Value, path: &str, out: &mut Vec<Divergence>) -> bool {
    let Value::Object(other) = second else {
        tracing::debug!(path, found = second.kind(), "expected an object");
        return false;
    };

    if object.is_empty() {
        return object == other;
    }

    for member in &object.members {
        let member_path = if path.is_empty() {
            member.name.clone()
        } else {
            format!("{path}.{}", member.name)
        };

        let Some(theirs) = other.get(&member.name) else {
            out.push(Divergence {
                path: member_path,
                value: member.value.clone(),
            });
            continue;
        };

        if !compare_node(&member.value, theirs, &member_path, out) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(name: &str) -> Value {
        Value::Object(Object::new("Pet").with("name", Value::Text(name.into())))
    }

    fn person(name: &str, pets: Vec<Value>) -> Value {
        Value::Object(
            Object::new("Person")
                .with("name", Value::Text(name.into()))
                .with("age", Value::Int(30))
                .with("pets", Value::Seq(pets)),
        )
    }

    #[test]
    fn test_identical_values_are_equal() {
        let a = person("ANA", vec![pet("REX"), pet("TOM")]);
        let result = compare_values(&a, &a.clone());
        assert_eq!(result, Comparison { equal: true, divergences: vec![] });
    }

    #[test]
    fn test_absent_and_text() {
        assert!(compare_values(&Value::Absent, &Value::Absent).equal);
        assert!(!compare_values(&Value::Absent, &Value::Int(1)).equal);
        assert!(compare_values(&Value::Text("a".into()), &Value::Text("a".into())).equal);
        assert!(!compare_values(&Value::Text("a".into()), &Value::Absent).equal);
    }

    #[test]
    fn test_missing_member_is_recorded_not_failed() {
        let a = Value::Object(
            Object::new("A")
                .with("id", Value::Int(1))
                .with("note", Value::Text("x".into())),
        );
        let b = Value::Object(Object::new("B").with("id", Value::Int(1)));
        let result = compare_values(&a, &b);
        assert!(result.equal);
        assert_eq!(
            result.divergences,
            vec![Divergence {
                path: "note".to_string(),
                value: Value::Text("x".into())
            }]
        );
    }

    #[test]
    fn test_superset_second_operand() {
        let a = Value::Object(Object::new("A").with("id", Value::Int(1)));
        let b = Value::Object(
            Object::new("B")
                .with("id", Value::Int(1))
                .with("extra", Value::Bool(true)),
        );
        let result = compare_values(&a, &b);
        assert!(result.equal);
        assert!(result.divergences.is_empty());
    }

    #[test]
    fn test_one_sided_absence_fails() {
        let a = Value::Object(Object::new("A").with("nick", Value::Absent));
        let b = Value::Object(Object::new("A").with("nick", Value::Text("z".into())));
        assert!(!compare_values(&a, &b).equal);
        assert!(!compare_values(&b, &a).equal);
        assert!(compare_values(&a, &a).equal);
    }

    #[test]
    fn test_sequence_length_mismatch_fails() {
        let long = person("ANA", vec![pet("REX"), pet("TOM")]);
        let short = person("ANA", vec![pet("REX")]);
        assert!(!compare_values(&long, &short).equal);
        assert!(!compare_values(&short, &long).equal);
    }

    #[test]
    fn test_nested_divergences_keep_paths() {
        let a = Value::Object(Object::new("Owner").with(
            "pets",
            Value::Seq(vec![Value::Object(
                Object::new("Pet")
                    .with("name", Value::Text("REX".into()))
                    .with("chip", Value::Int(5)),
            )]),
        ));
        let b = Value::Object(Object::new("Owner").with("pets", Value::Seq(vec![pet("REX")])));
        let result = compare_values(&a, &b);
        assert!(result.equal);
        assert_eq!(result.divergences.len(), 1);
        assert_eq!(result.divergences[0].path, "pets[0].chip");
    }

    #[test]
    fn test_failure_short_circuits_but_keeps_divergences() {
        let a = Value::Seq(vec![
            Value::Object(
                Object::new("Pet")
                    .with("name", Value::Text("REX".into()))
                    .with("chip", Value::Int(5)),
            ),
            pet("TOM"),
            Value::Object(Object::new("Pet").with("chip", Value::Int(9))),
        ]);
        let b = Value::Seq(vec![pet("REX"), pet("JIM"), pet("LEO")]);
        let result = compare_values(&a, &b);
        assert!(!result.equal);
        // The third element is never reached
        assert_eq!(result.divergences.len(), 1);
        assert_eq!(result.divergences[0].path, "[0].chip");
    }

    #[test]
    fn test_dates_compare_by_rendering() {
        let date = chrono::NaiveDate::from_ymd_opt(2010, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let a = Value::Object(Object::new("E").with("at", Value::DateTime(date)));
        let b = Value::Object(Object::new("E").with("at", Value::DateTime(date)));
        assert!(compare_values(&a, &b).equal);
        let c = Value::Object(Object::new("E").with("at", Value::Text(date.to_string())));
        assert!(!compare_values(&a, &c).equal);
    }

    #[test]
    fn test_dates_ignore_sub_second_differences() {
        let day = chrono::NaiveDate::from_ymd_opt(2010, 5, 1).unwrap();
        let whole = day.and_hms_milli_opt(8, 0, 0, 0).unwrap();
        let fractional = day.and_hms_milli_opt(8, 0, 0, 123).unwrap();
        let later = day.and_hms_milli_opt(8, 0, 1, 0).unwrap();

        let a = Value::Object(Object::new("E").with("at", Value::DateTime(whole)));
        let b = Value::Object(Object::new("E").with("at", Value::DateTime(fractional)));
        let c = Value::Object(Object::new("E").with("at", Value::DateTime(later)));
        assert!(compare_values(&a, &b).equal);
        assert!(compare_values(&b, &a).equal);
        assert!(!compare_values(&a, &c).equal);
    }

    #[test]
    fn test_nan_equals_itself() {
        let reading = Value::Object(
            Object::new("Reading")
                .with("label", Value::Text("A".into()))
                .with("value", Value::Float(f64::NAN)),
        );
        let result = compare_values(&reading, &reading.clone());
        assert!(result.equal);
        assert!(result.divergences.is_empty());

        let finite = Value::Object(
            Object::new("Reading")
                .with("label", Value::Text("A".into()))
                .with("value", Value::Float(1.5)),
        );
        assert!(!compare_values(&reading, &finite).equal);
        assert!(!compare_values(&finite, &reading).equal);
        assert!(!compare_values(&Value::Float(1.0), &Value::Int(1)).equal);
    }

    #[test]
    fn test_object_against_non_object_fails() {
        assert!(!compare_values(&pet("REX"), &Value::Text("REX".into())).equal);
        assert!(!compare_values(&pet("REX"), &Value::Absent).equal);
    }

    #[test]
    fn test_empty_objects_use_direct_equality() {
        let unit = Value::Object(Object::new("Marker"));
        assert!(compare_values(&unit, &unit.clone()).equal);
        assert!(!compare_values(&unit, &Value::Object(Object::new("Other"))).equal);
    }

    #[test]
    fn test_display_lists_divergences() {
        let a = Value::Object(Object::new("A").with("note", Value::Text("x".into())));
        let b = Value::Object(Object::new("B").with("id", Value::Int(1)));
        let report = compare_values(&a, &b).to_string();
        assert!(report.contains("structurally equal"));
        assert!(report.contains("note = \"x\""));
    }
}
