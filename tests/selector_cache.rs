use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use docwright::prelude::*;
use docwright::write_model::WriteModelTranslator;
use serde_json::json;

fn selector() -> Arc<TranslatorSelector> {
    let model = Model::builder()
        .entity(
            EntityDescriptor::builder("Customer")
                .collection("customers")
                .key("id")
                .property("tier")
                .build(),
        )
        .build();
    Arc::new(TranslatorSelector::new(
        Arc::new(model),
        Arc::new(ValueGeneratorRegistry::new()),
    ))
}

#[test]
fn selecting_twice_returns_the_same_instance() -> Result<()> {
    let selector = selector();
    let entry = TrackedEntry::added("Customer", json!({"id": "c-1"}));

    let first = selector.select(&entry)?;
    let second = selector.select(&entry)?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn concurrent_first_use_retains_a_single_instance() -> Result<()> {
    let selector = selector();
    let translators = Arc::new(Mutex::new(Vec::new()));

    thread::scope(|scope| {
        for _ in 0..16 {
            let selector = selector.clone();
            let translators = translators.clone();
            scope.spawn(move || {
                let entry = TrackedEntry::added("Customer", json!({"id": "c-1"}));
                let translator = selector.select(&entry).expect("select");
                translators.lock().expect("lock").push(translator);
            });
        }
    });

    let translators = translators.lock().expect("lock");
    assert_eq!(translators.len(), 16);
    for translator in translators.iter() {
        assert!(Arc::ptr_eq(&translators[0], translator));
    }
    Ok(())
}

#[test]
fn selected_translators_are_behaviorally_identical() -> Result<()> {
    // Two independent selectors resolve independently, but the translators
    // they produce yield the same shape for the same entry.
    let entry = |tier: &str| {
        let mut entry = TrackedEntry::loaded("Customer", json!({"id": "c-1", "tier": "free"}));
        entry.set_current_value(&"tier".into(), json!(tier));
        entry.mark_modified();
        entry
    };

    let mut first_entry = entry("pro");
    let mut second_entry = entry("pro");

    let first = selector().select(&first_entry)?.translate(&mut first_entry)?;
    let second = selector()
        .select(&second_entry)?
        .translate(&mut second_entry)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn unmapped_type_fails_selection() {
    let selector = selector();
    let entry = TrackedEntry::added("Ghost", json!({"id": 1}));

    let err = selector.select(&entry).expect_err("must reject");
    assert!(matches!(err, Error::UnmappedType(name) if name == "Ghost"));
}
