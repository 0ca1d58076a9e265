//! Integration tests for validation runs: end-to-end synchronous runs,
//! asynchronous runs with custom validators, fail-fast and timeouts, group
//! filtering, locales, and lifecycle signals.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use validators_rs_core::error::ValidatorsError;
use validators_rs_forms::controls::{Element, MemoryForm};
use validators_rs_forms::custom::CustomValidatorResult;
use validators_rs_forms::Validators;
use validators_rs_signals::{ControlValidated, ValidationEnd};

// ── Helpers ─────────────────────────────────────────────────────────

fn end_counter(engine: &Validators) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    engine.signals().end.connect(
        "count",
        Arc::new(move |_: &ValidationEnd| {
            c.fetch_add(1, Ordering::SeqCst);
        }),
    );
    count
}

fn validated_controls(engine: &Validators) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    engine.signals().control_validated.connect(
        "collect",
        Arc::new(move |cv: &ControlValidated| {
            s.lock()
                .unwrap()
                .push(cv.control.clone().unwrap_or_else(|| "-".to_string()));
        }),
    );
    seen
}

fn custom(function: &str, control: &str) -> Vec<(String, String)> {
    let mut attrs = vec![
        ("data-validate".to_string(), "custom".to_string()),
        ("data-function".to_string(), function.to_string()),
    ];
    if !control.is_empty() {
        attrs.push(("data-control".to_string(), control.to_string()));
    }
    attrs
}

fn midnight(year: i32, month: u32, day: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// ═════════════════════════════════════════════════════════════════════
// 1. Synchronous runs
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_required_and_int_range_end_to_end() {
    let form = MemoryForm::new()
        .with_control("name", Element::text(""))
        .with_control("age", Element::text("30"))
        .with_validator([
            ("data-validate", "required"),
            ("data-control", "name"),
            ("data-message", "Name is required"),
        ])
        .with_validator([
            ("data-validate", "int"),
            ("data-control", "age"),
            ("data-message", "Age out of range"),
            ("data-operator", "range"),
            ("data-comparevalue", "18"),
            ("data-comparemaxvalue", "120"),
        ]);

    let engine = Validators::new();
    assert!(!engine.validate(&form, None).unwrap());

    let outcome = engine.validate_outcome(&form, None).unwrap();
    assert!(!outcome.status);
    assert_eq!(outcome.messages, vec!["Name is required"]);
}

#[test]
fn test_validate_is_idempotent() {
    let form = MemoryForm::new()
        .with_control("email", Element::text("not-an-email"))
        .with_control("qty", Element::text("abc"))
        .with_validator([
            ("data-validate", "email"),
            ("data-control", "email"),
            ("data-message", "Invalid email"),
        ])
        .with_validator([
            ("data-validate", "int"),
            ("data-control", "qty"),
            ("data-message", "Quantity must be a number"),
        ]);

    let engine = Validators::new();
    let first = engine.validate_outcome(&form, None).unwrap();
    let second = engine.validate_outcome(&form, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.messages, vec!["Invalid email", "Quantity must be a number"]);
}

#[test]
fn test_all_passing_form() {
    let form = MemoryForm::from_json(
        r#"{
            "controls": [
                { "id": "email", "tag": "input", "type": "email", "value": "ada@example.com" },
                { "id": "start", "tag": "input", "value": "2024-01-01" },
                { "id": "end", "tag": "input", "value": "01/31/2024" },
                { "id": "terms", "tag": "input", "type": "checkbox", "value": "yes", "checked": true },
                { "id": "colors", "tag": "select", "options": [
                    { "value": "red", "selected": true },
                    { "value": "blue", "selected": true }
                ] }
            ],
            "validators": [
                { "data-validate": "email", "data-control": "email", "data-message": "Invalid email" },
                { "data-validate": "date", "data-control": "end", "data-message": "End before start",
                  "data-operator": "greaterthan", "data-comparecontrol": "start" },
                { "data-validate": "required", "data-control": "terms", "data-message": "Accept the terms" },
                { "data-validate": "regexp", "data-control": "colors", "data-message": "Pick colors",
                  "data-pattern": "^[a-z]+(,[a-z]+)*$" }
            ]
        }"#,
    )
    .unwrap();

    let engine = Validators::new();
    let outcome = engine.validate_outcome(&form, None).unwrap();
    assert!(outcome.status, "unexpected failures: {:?}", outcome.messages);
}

#[test]
fn test_form_mutation_between_runs() {
    let mut form = MemoryForm::new()
        .with_control("terms", Element::checkbox("yes", false))
        .with_validator([
            ("data-validate", "required"),
            ("data-control", "terms"),
            ("data-message", "Accept the terms"),
        ]);

    let engine = Validators::new();
    assert!(!engine.validate(&form, None).unwrap());
    form.set_value("terms", "yes");
    assert!(engine.validate(&form, None).unwrap());
}

#[test]
fn test_sync_custom_validator_in_run() {
    let form = MemoryForm::new()
        .with_control("username", Element::text("admin"))
        .with_validator(custom("available", "username"));

    let mut engine = Validators::new();
    engine
        .custom_validators_mut()
        .register_fn("available", |value: Option<&str>, result: &mut CustomValidatorResult| {
            if value == Some("admin") {
                result.invalidate("Username is taken");
            }
        });

    let outcome = engine.validate_outcome(&form, None).unwrap();
    assert_eq!(outcome.messages, vec!["Username is taken"]);
}

#[test]
fn test_sync_run_rejects_async_validator() {
    let form = MemoryForm::new().with_validator(custom("remote", ""));
    let mut engine = Validators::new();
    engine
        .custom_validators_mut()
        .register_async_fn("remote", |_: Option<String>| async { Ok(CustomValidatorResult::valid()) });

    let ends = end_counter(&engine);
    assert!(matches!(
        engine.validate(&form, None),
        Err(ValidatorsError::AsyncValidatorInSyncRun(_))
    ));
    assert_eq!(ends.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unregistered_validator() {
    let form = MemoryForm::new().with_validator(custom("missing", ""));
    let engine = Validators::new();
    let err = engine.validate(&form, None).unwrap_err();
    assert!(matches!(err, ValidatorsError::UnregisteredValidator(ref name) if name == "missing"));
    assert!(err.is_configuration_error());
}

// ═════════════════════════════════════════════════════════════════════
// 2. Groups and enabled flag
// ═════════════════════════════════════════════════════════════════════

fn grouped_form() -> MemoryForm {
    MemoryForm::new()
        .with_control("street", Element::text(""))
        .with_control("card", Element::text(""))
        .with_control("note", Element::textarea(""))
        .with_validator([
            ("data-validate", "required"),
            ("data-control", "street"),
            ("data-message", "Street is required"),
            ("data-validationgroup", "shipping"),
        ])
        .with_validator([
            ("data-validate", "required"),
            ("data-control", "card"),
            ("data-message", "Card is required"),
            ("data-validationgroup", "billing,payment"),
        ])
        .with_validator([
            ("data-validate", "required"),
            ("data-control", "note"),
            ("data-message", "Note is required"),
            ("data-enabled", "false"),
        ])
}

#[test]
fn test_group_filtering() {
    let engine = Validators::new();
    let form = grouped_form();

    let all = engine.validate_outcome(&form, None).unwrap();
    assert_eq!(all.messages, vec!["Street is required", "Card is required"]);

    let shipping = engine.validate_outcome(&form, Some("shipping")).unwrap();
    assert_eq!(shipping.messages, vec!["Street is required"]);

    let payment = engine.validate_outcome(&form, Some("payment")).unwrap();
    assert_eq!(payment.messages, vec!["Card is required"]);

    let none = engine.validate_outcome(&form, Some("newsletter")).unwrap();
    assert!(none.status);
    assert!(none.messages.is_empty());
}

#[test]
fn test_filtered_rules_do_not_signal() {
    let engine = Validators::new();
    let seen = validated_controls(&engine);
    engine.validate(&grouped_form(), Some("billing")).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["card"]);
}

// ═════════════════════════════════════════════════════════════════════
// 3. Asynchronous runs
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_async_run_waits_for_all_validators() {
    let form = MemoryForm::new()
        .with_control("email", Element::text("ada@"))
        .with_control("vat", Element::text("FR123"))
        .with_validator([
            ("data-validate", "email"),
            ("data-control", "email"),
            ("data-message", "Invalid email"),
        ])
        .with_validator(custom("slow", "vat"))
        .with_validator(custom("fast", ""));

    let slow_settled = Arc::new(AtomicBool::new(false));
    let mut engine = Validators::new();
    let flag = slow_settled.clone();
    engine.custom_validators_mut().register_async_fn("slow", move |value: Option<String>| {
        let flag = flag.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            assert_eq!(value.as_deref(), Some("FR123"));
            Ok(CustomValidatorResult::invalid("VAT number rejected"))
        }
    });
    engine
        .custom_validators_mut()
        .register_async_fn("fast", |_: Option<String>| async {
            Ok(CustomValidatorResult::invalid("Fast check failed"))
        });

    let settled_at_end = Arc::new(AtomicBool::new(false));
    let (flag, at_end) = (slow_settled.clone(), settled_at_end.clone());
    engine.signals().end.connect(
        "check",
        Arc::new(move |_: &ValidationEnd| at_end.store(flag.load(Ordering::SeqCst), Ordering::SeqCst)),
    );
    let seen = validated_controls(&engine);

    let outcome = engine.validate_async_outcome(&form, None).await.unwrap();

    assert!(!outcome.status);
    assert_eq!(
        outcome.messages,
        vec!["Invalid email", "VAT number rejected", "Fast check failed"]
    );
    assert!(settled_at_end.load(Ordering::SeqCst));
    // The fast validator completes before the slow one.
    assert_eq!(*seen.lock().unwrap(), vec!["email", "-", "vat"]);
}

#[tokio::test]
async fn test_async_run_passes() {
    let form = MemoryForm::new()
        .with_control("code", Element::text("42"))
        .with_validator(custom("remote_ok", "code"))
        .with_validator([
            ("data-validate", "int"),
            ("data-control", "code"),
            ("data-message", "Code must be a number"),
        ]);

    let mut engine = Validators::new();
    engine
        .custom_validators_mut()
        .register_async_fn("remote_ok", |_: Option<String>| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(CustomValidatorResult::valid())
        });

    let ends = end_counter(&engine);
    assert!(engine.validate_async(&form, None).await.unwrap());
    assert_eq!(ends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_async_rejection_fails_fast() {
    let form = MemoryForm::new()
        .with_validator(custom("stalled", ""))
        .with_validator(custom("broken", ""));

    let stalled_finished = Arc::new(AtomicBool::new(false));
    let mut engine = Validators::new();
    let flag = stalled_finished.clone();
    engine.custom_validators_mut().register_async_fn("stalled", move |_: Option<String>| {
        let flag = flag.clone();
        async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(CustomValidatorResult::valid())
        }
    });
    engine
        .custom_validators_mut()
        .register_async_fn("broken", |_: Option<String>| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err("service unavailable".to_string())
        });
    let ends = end_counter(&engine);

    let result = tokio::time::timeout(Duration::from_secs(5), engine.validate_async(&form, None))
        .await
        .expect("run should not wait for the stalled validator");

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ValidatorsError::CustomRejected { ref name, ref reason }
            if name == "broken" && reason == "service unavailable"
    ));
    assert!(!err.is_configuration_error());
    assert_eq!(ends.load(Ordering::SeqCst), 0);
    assert!(!stalled_finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_async_timeout() {
    let form = MemoryForm::new().with_validator(custom("stalled", ""));
    let mut engine = Validators::new();
    engine.set_async_timeout(Some(Duration::from_millis(20)));
    engine
        .custom_validators_mut()
        .register_async_fn("stalled", |_: Option<String>| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(CustomValidatorResult::valid())
        });

    let err = engine.validate_async(&form, None).await.unwrap_err();
    assert!(matches!(
        err,
        ValidatorsError::CustomTimeout { ref name, millis: 20 } if name == "stalled"
    ));
}

#[tokio::test]
async fn test_async_run_configuration_error() {
    let form = MemoryForm::new()
        .with_validator(custom("ok", ""))
        .with_validator([("data-validate", "email"), ("data-control", "email")]);
    let mut engine = Validators::new();
    engine
        .custom_validators_mut()
        .register_async_fn("ok", |_: Option<String>| async { Ok(CustomValidatorResult::valid()) });

    let err = engine.validate_async(&form, None).await.unwrap_err();
    assert!(matches!(
        err,
        ValidatorsError::MissingAttribute { attribute: "message", .. }
    ));
}

// ═════════════════════════════════════════════════════════════════════
// 4. Locales and dates
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_date_leap_years() {
    let engine = Validators::new();
    assert_eq!(engine.parse_date("2024-02-29"), Some(midnight(2024, 2, 29)));
    assert_eq!(engine.parse_date("2023-02-29"), None);
    assert_eq!(engine.parse_date("2000-02-29"), Some(midnight(2000, 2, 29)));
    // The simplified rule accepts 1900-02-29; it rolls over to March 1st.
    assert_eq!(engine.parse_date("1900-02-29"), Some(midnight(1900, 3, 1)));
}

#[test]
fn test_engines_do_not_share_locales() {
    let mut french = Validators::new();
    french.set_locale("fr").unwrap();
    let american = Validators::new();

    assert_eq!(french.parse_date("02/03/2024"), Some(midnight(2024, 3, 2)));
    assert_eq!(american.parse_date("02/03/2024"), Some(midnight(2024, 2, 3)));
}

#[test]
fn test_float_rule_under_french_locale() {
    let form = MemoryForm::new()
        .with_control("price", Element::text("12,50"))
        .with_control("max", Element::text("20.00"))
        .with_validator([
            ("data-validate", "float"),
            ("data-control", "price"),
            ("data-message", "Price too high"),
            ("data-operator", "lessthanequal"),
            ("data-comparecontrol", "max"),
        ]);

    let mut engine = Validators::new();
    engine.set_locale("fr").unwrap();
    assert!(engine.validate(&form, None).unwrap());
}

#[test]
fn test_date_rule_follows_active_locale() {
    let form = MemoryForm::new()
        .with_control("birthday", Element::text("31/12/1999"))
        .with_validator([
            ("data-validate", "date"),
            ("data-control", "birthday"),
            ("data-message", "Invalid date"),
        ]);

    let mut engine = Validators::new();
    assert!(!engine.validate(&form, None).unwrap());
    engine.set_locale("fr").unwrap();
    assert!(engine.validate(&form, None).unwrap());
}
