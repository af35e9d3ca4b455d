use proptest::prelude::*;
use roi_core::{is_valid_email, InputField, SimulationInputs};

fn unusable() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        Just(Some(f64::INFINITY)),
        Just(Some(f64::NEG_INFINITY)),
        (1e-9f64..1e12).prop_map(|v| Some(-v)),
    ]
}

fn usable() -> impl Strategy<Value = f64> {
    0f64..1e12
}

proptest! {
    #[test]
    fn prop_any_unusable_required_field_blocks_simulation(
        field_idx in 0usize..3,
        bad in unusable(),
        a in usable(),
        b in usable(),
        c in usable(),
    ) {
        let mut inputs = SimulationInputs::with_required(a, b, c);
        inputs.set(InputField::REQUIRED[field_idx], bad);

        prop_assert!(!inputs.can_simulate());
        prop_assert!(inputs.to_request().is_err());
    }

    #[test]
    fn prop_usable_required_fields_always_eligible(
        a in usable(),
        b in usable(),
        c in usable(),
        optional in prop::option::of(-1e6f64..1e6),
    ) {
        let mut inputs = SimulationInputs::with_required(a, b, c);
        inputs.implementation_cost = optional;

        prop_assert!(inputs.can_simulate());
        let request = inputs.to_request().unwrap();
        prop_assert_eq!(request.implementation_cost.is_some(), optional.is_some_and(|v| v >= 0.0));
    }

    #[test]
    fn prop_non_numeric_text_leaves_form_unchanged(
        text in "[a-zA-Z_#$]{1,12}",
        a in usable(),
    ) {
        prop_assume!(!matches!(
            text.to_ascii_lowercase().as_str(),
            "inf" | "infinity"
        ));
        let mut inputs = SimulationInputs::with_required(a, a, a);
        let before = inputs;

        prop_assert!(inputs.set_from_text(InputField::AutoCost, &text).is_err());
        prop_assert_eq!(inputs, before);
    }

    #[test]
    fn prop_emails_without_at_are_rejected(text in "[a-z0-9.]{0,20}") {
        prop_assert!(!is_valid_email(&text));
    }

    #[test]
    fn prop_simple_emails_are_accepted(
        local in "[a-z0-9._+-]{1,10}",
        domain in "[a-z0-9]{1,10}",
        tld in "[a-z]{1,6}",
    ) {
        let email = format!("{local}@{domain}.{tld}");
        prop_assert!(is_valid_email(&email));
    }
}

#[test]
fn stored_payload_round_trips_through_the_wire_request() {
    let inputs = SimulationInputs::with_required(5000.0, 1500.0, 2000.0).with_implementation_cost(10000.0);
    let stored = serde_json::to_string(&inputs.to_request().unwrap()).unwrap();
    assert_eq!(SimulationInputs::from_stored_json(&stored), inputs);
}
