//! Field comparators for drift detection.
//!
//! All helpers treat an absent desired value as "don't care": an operator
//! who never set a field can't drift on it. An absent observed value against
//! a set desired value is always a mismatch, which also covers providers
//! that return partially-populated sub-structures.

/// Case-insensitive comparison for free-form text fields.
#[must_use]
pub fn str_eq_ci(desired: Option<&str>, observed: Option<&str>) -> bool {
    match desired {
        None => true,
        Some(want) => observed.is_some_and(|have| want.to_lowercase() == have.to_lowercase()),
    }
}

/// Case-insensitive comparison for a required text field.
#[must_use]
pub fn req_str_eq_ci(desired: &str, observed: Option<&str>) -> bool {
    observed.is_some_and(|have| desired.to_lowercase() == have.to_lowercase())
}

/// Exact comparison for numeric and boolean fields.
#[must_use]
pub fn opt_eq<T: PartialEq>(desired: Option<&T>, observed: Option<&T>) -> bool {
    match desired {
        None => true,
        Some(want) => observed == Some(want),
    }
}
