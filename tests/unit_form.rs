use homeroom_core::form::{FieldSpec, FormState};

fn is_email(value: &str) -> bool {
    value.contains('@') && !value.starts_with('@') && !value.ends_with('@')
}

#[test]
fn test_required_empty_field_fails_form() {
    let form = FormState::new([("email", FieldSpec::required())]);
    assert!(!form.form_ok());
}

#[test]
fn test_required_filled_field_passes_form() {
    let mut form = FormState::new([("email", FieldSpec::required().with_validator(is_email))]);
    form.set("email", "a@b.com");
    assert!(form.form_ok());
}

#[test]
fn test_form_ok_iff_no_required_field_is_empty() {
    // Every combination of two fields' requiredness and emptiness.
    for a_required in [false, true] {
        for b_required in [false, true] {
            for a_value in ["", "filled"] {
                for b_value in ["", "filled"] {
                    let a_spec = if a_required {
                        FieldSpec::required()
                    } else {
                        FieldSpec::optional()
                    };
                    let b_spec = if b_required {
                        FieldSpec::required()
                    } else {
                        FieldSpec::optional()
                    };
                    let mut form = FormState::new([("a", a_spec), ("b", b_spec)]);
                    form.set("a", a_value);
                    form.set("b", b_value);

                    let some_required_empty = (a_required && a_value.is_empty())
                        || (b_required && b_value.is_empty());
                    assert_eq!(
                        form.form_ok(),
                        !some_required_empty,
                        "a_required={} b_required={} a={:?} b={:?}",
                        a_required,
                        b_required,
                        a_value,
                        b_value
                    );
                }
            }
        }
    }
}

#[test]
fn test_empty_value_is_valid_but_not_strictly_valid_when_required() {
    let form = FormState::new([("email", FieldSpec::required().with_validator(is_email))]);
    // Plain validity never fires on empty values.
    assert!(form.validity("email"));
    // Strict validity enforces the required flag.
    assert!(!form.strict_validity("email"));
}

#[test]
fn test_failing_validator_on_non_empty_value_fails_both_checks() {
    let mut form = FormState::new([("email", FieldSpec::optional().with_validator(is_email))]);
    form.set("email", "not-an-email");
    assert!(!form.validity("email"));
    assert!(!form.strict_validity("email"));
    assert!(!form.form_ok());
}

#[test]
fn test_optional_field_with_validator_passes_when_empty() {
    let form = FormState::new([("email", FieldSpec::optional().with_validator(is_email))]);
    assert!(form.validity("email"));
    assert!(form.strict_validity("email"));
    assert!(form.form_ok());
}

#[test]
fn test_setters_transition_to_touched() {
    let mut form = FormState::new([("note", FieldSpec::optional())]);
    assert!(!form.touched());
    form.set("note", "hello");
    assert!(form.touched());
}

#[test]
fn test_reset_restores_values_without_clearing_touched() {
    let mut form = FormState::new([
        ("note", FieldSpec::optional().with_default("default note")),
        ("email", FieldSpec::required()),
    ]);
    form.set("note", "edited");
    form.set("email", "a@b.com");
    assert!(form.form_ok());

    form.reset();
    assert_eq!(form.text("note"), Some("default note"));
    assert_eq!(form.text("email"), Some(""));
    assert!(!form.form_ok());
    // Resetting restores values by equality with the initial state, but
    // the form remembers it was interacted with.
    assert!(form.touched());
}

#[test]
fn test_mixed_validity_reports_the_failing_keys() {
    let mut form = FormState::new([
        ("email", FieldSpec::required().with_validator(is_email)),
        ("name", FieldSpec::required()),
        ("note", FieldSpec::optional()),
    ]);
    form.set("email", "broken");
    assert_eq!(form.invalid_keys(), vec!["email", "name"]);

    form.set("email", "a@b.com");
    form.set("name", "Somchai");
    assert!(form.form_ok());
    assert!(form.invalid_keys().is_empty());
}
