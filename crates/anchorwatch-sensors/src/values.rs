//! Comparisons over JSON telemetry values.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use anchorwatch_core::models::Tolerance;
use serde_json::Value;

/// Canonical string form of a scalar or compound value, used for set
/// membership.
pub fn canonical(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten a grant listing into a set.
///
/// Arrays become their canonical elements; objects of arrays become
/// `principal/grant` pairs. Anything else is not a grant listing.
pub fn grant_set(value: &Value) -> Option<BTreeSet<String>> {
    match value {
        Value::Array(items) => Some(items.iter().map(canonical).collect()),
        Value::Object(map) => {
            let mut out = BTreeSet::new();
            for (principal, grants) in map {
                let Value::Array(items) = grants else {
                    return None;
                };
                out.extend(items.iter().map(|g| format!("{principal}/{}", canonical(g))));
            }
            Some(out)
        }
        _ => None,
    }
}

/// Order two levels: numbers numerically, strings by dot-separated segments
/// (numeric where both segments parse). `None` when incomparable.
pub fn compare_levels(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(compare_dotted(x, y)),
        _ => None,
    }
}

fn compare_dotted(a: &str, b: &str) -> Ordering {
    let mut left = a.split(['.', '-']);
    let mut right = b.split(['.', '-']);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Whether `observed` falls inside the tolerance envelope around `intent`.
pub fn within_tolerance(tolerance: &Tolerance, intent: &Value, observed: &Value) -> bool {
    if intent == observed {
        return true;
    }
    match tolerance {
        Tolerance::Exact => false,
        Tolerance::Ignore => true,
        Tolerance::OneOf { values } => values.contains(observed),
        Tolerance::Range { min, max } => observed
            .as_f64()
            .is_some_and(|v| v >= *min && v <= *max),
        Tolerance::AtLeast => matches!(
            compare_levels(observed, intent),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Tolerance::Subset => match (grant_set(intent), grant_set(observed)) {
            (Some(allowed), Some(seen)) => seen.is_subset(&allowed),
            _ => false,
        },
    }
}
