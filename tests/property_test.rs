//! Property-based tests for registration validation invariants.
//!
//! Uses randomly generated forms to verify that validation accepts exactly
//! the complete submissions, and that accepted values pass through
//! unchanged.

use proptest::prelude::*;
use rosterd_core::{
    models::{NewUser, RegistrationForm},
    CoreError,
};

/// Creates property test configuration based on environment.
///
/// `PROPTEST_CASES` overrides the number of cases; CI gets a smaller
/// default to keep runs fast.
fn proptest_config() -> ProptestConfig {
    let is_ci = std::env::var("CI").unwrap_or_default() == "true";
    let default_cases = if is_ci { 64 } else { 256 };

    let cases =
        std::env::var("PROPTEST_CASES").ok().and_then(|s| s.parse().ok()).unwrap_or(default_cases);

    ProptestConfig::with_cases(cases)
}

/// Strategy producing a field that is absent, empty, or a short value.
fn field_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(String::new())),
        4 => "[a-zA-Z0-9 @._-]{1,24}".prop_map(Some),
    ]
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.is_empty())
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Validation accepts a form exactly when all five fields are present
    /// and non-empty, and accepted values are carried verbatim.
    #[test]
    fn validation_accepts_exactly_complete_forms(
        name in field_strategy(),
        age in field_strategy(),
        gender in field_strategy(),
        course in field_strategy(),
        email in field_strategy(),
    ) {
        let form = RegistrationForm {
            inputname: name.clone(),
            inputage: age.clone(),
            inputgender: gender.clone(),
            inputcourse: course.clone(),
            inputemail: email.clone(),
        };

        let all_present = is_present(&name)
            && is_present(&age)
            && is_present(&gender)
            && is_present(&course)
            && is_present(&email);

        match NewUser::from_form(form) {
            Ok(user) => {
                prop_assert!(all_present, "incomplete form was accepted");
                prop_assert_eq!(Some(user.name), name);
                prop_assert_eq!(Some(user.age), age);
                prop_assert_eq!(Some(user.gender), gender);
                prop_assert_eq!(Some(user.course), course);
                prop_assert_eq!(Some(user.email), email);
            },
            Err(e) => {
                prop_assert!(!all_present, "complete form was rejected: {e}");
                prop_assert!(matches!(e, CoreError::MissingFields));
            },
        }
    }

    /// Nonzero numeric ages on the wire normalize to their decimal text
    /// form and pass presence validation; a numeric zero is falsy and
    /// rejected.
    #[test]
    fn numeric_age_is_normalized_to_text(age in prop_oneof![Just(0i64), any::<i64>()]) {
        let json = serde_json::json!({
            "inputname": "a",
            "inputage": age,
            "inputgender": "b",
            "inputcourse": "c",
            "inputemail": "d"
        });

        let form: RegistrationForm = serde_json::from_value(json).unwrap();

        if age == 0 {
            prop_assert_eq!(form.inputage.as_deref(), None);
            prop_assert!(NewUser::from_form(form).is_err());
        } else {
            let expected = age.to_string();
            prop_assert_eq!(form.inputage.as_deref(), Some(expected.as_str()));
            prop_assert!(NewUser::from_form(form).is_ok());
        }
    }
}
