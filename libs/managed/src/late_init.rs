//! Late initialization: merging provider-assigned defaults into desired
//! state.
//!
//! Providers default fields the user never specified. Copying those defaults
//! into the unset desired fields once keeps the comparator from reporting
//! them as drift forever. The rules:
//!
//! - Only an unset desired field is ever written.
//! - An empty observed value is never copied in.
//! - Applying a helper twice yields no further change.

/// Fills an unset optional field from the observed value.
pub fn late_init<T: Clone>(desired: &mut Option<T>, observed: Option<&T>) {
    if desired.is_none() {
        if let Some(value) = observed {
            *desired = Some(value.clone());
        }
    }
}

/// Fills an unset string field; the empty string counts as unset on the
/// desired side and as absent on the observed side.
pub fn late_init_string(desired: &mut Option<String>, observed: Option<&str>) {
    let unset = desired.as_deref().is_none_or(str::is_empty);
    if unset {
        if let Some(value) = observed.filter(|v| !v.is_empty()) {
            *desired = Some(value.to_string());
        }
    }
}

/// Fills an unset integer field from the observed value.
pub fn late_init_i64(desired: &mut Option<i64>, observed: Option<i64>) {
    if desired.is_none() {
        if let Some(value) = observed {
            *desired = Some(value);
        }
    }
}

/// Fills an unset boolean field from the observed value.
pub fn late_init_bool(desired: &mut Option<bool>, observed: Option<bool>) {
    if desired.is_none() {
        if let Some(value) = observed {
            *desired = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fills_unset_string() {
        let mut desired = None;
        late_init_string(&mut desired, Some("serial-123"));
        assert_eq!(desired.as_deref(), Some("serial-123"));
    }

    #[test]
    fn test_empty_desired_string_counts_as_unset() {
        let mut desired = Some(String::new());
        late_init_string(&mut desired, Some("serial-123"));
        assert_eq!(desired.as_deref(), Some("serial-123"));
    }

    #[test]
    fn test_empty_observed_string_is_not_copied() {
        let mut desired = None;
        late_init_string(&mut desired, Some(""));
        assert_eq!(desired, None);
    }

    #[test]
    fn test_never_overwrites_set_string() {
        let mut desired = Some("user-set".to_string());
        late_init_string(&mut desired, Some("provider-default"));
        assert_eq!(desired.as_deref(), Some("user-set"));
    }

    #[test]
    fn test_fills_unset_i64() {
        let mut desired = None;
        late_init_i64(&mut desired, Some(30));
        assert_eq!(desired, Some(30));
    }

    proptest! {
        #[test]
        fn prop_string_never_overwrites(
            set in "[a-z]{1,8}",
            observed in proptest::option::of("[a-z]{0,8}"),
        ) {
            let mut desired = Some(set.clone());
            late_init_string(&mut desired, observed.as_deref());
            prop_assert_eq!(desired.as_deref(), Some(set.as_str()));
        }

        #[test]
        fn prop_string_idempotent(
            desired in proptest::option::of("[a-z]{0,8}"),
            observed in proptest::option::of("[a-z]{0,8}"),
        ) {
            let mut once = desired.clone();
            late_init_string(&mut once, observed.as_deref());
            let mut twice = once.clone();
            late_init_string(&mut twice, observed.as_deref());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_generic_idempotent(
            desired in proptest::option::of(any::<i64>()),
            observed in proptest::option::of(any::<i64>()),
        ) {
            let mut once = desired;
            late_init(&mut once, observed.as_ref());
            let mut twice = once;
            late_init(&mut twice, observed.as_ref());
            prop_assert_eq!(once, twice);
        }
    }
}
