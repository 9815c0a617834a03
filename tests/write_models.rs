use std::sync::Arc;

use anyhow::Result;
use docwright::filter::Filter;
use docwright::prelude::*;
use docwright::write_model::{UpdateDocument, WriteModelTranslator};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct Customer {
    id: String,
    email: String,
    tier: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct Invoice {
    id: String,
    amount: i64,
    revision: Option<String>,
}

fn model() -> Arc<Model> {
    Arc::new(
        Model::builder()
            .entity(
                EntityDescriptor::builder("Customer")
                    .collection("customers")
                    .key("id")
                    .property("email")
                    .property("tier")
                    .build(),
            )
            .entity(
                EntityDescriptor::builder("Invoice")
                    .collection("invoices")
                    .key("id")
                    .property("amount")
                    .concurrency_token("revision")
                    .build(),
            )
            .build(),
    )
}

fn selector() -> Arc<TranslatorSelector> {
    Arc::new(TranslatorSelector::new(
        model(),
        Arc::new(ValueGeneratorRegistry::new()),
    ))
}

#[test]
fn creates_insert_one_model_for_added_entity() -> Result<()> {
    let selector = selector();
    let customer = Customer {
        id: "c-1".into(),
        email: "ada@example.com".into(),
        tier: "free".into(),
    };
    let mut entry = TrackedEntry::added_from("Customer", &customer)?;

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    assert_eq!(model.entity_type, "Customer");
    assert_eq!(model.collection, "customers");
    match model.operation {
        WriteOperation::InsertOne { document } => {
            assert_eq!(
                document,
                json!({"id": "c-1", "email": "ada@example.com", "tier": "free"})
            );
        }
        other => panic!("expected insert, got {other:?}"),
    }
    Ok(())
}

#[test]
fn creates_insert_one_model_and_stamps_concurrency_token() -> Result<()> {
    let selector = selector();
    let invoice = Invoice {
        id: "i-1".into(),
        amount: 100,
        revision: None,
    };
    let mut entry = TrackedEntry::added_from("Invoice", &invoice)?;

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    let document = match model.operation {
        WriteOperation::InsertOne { document } => document,
        other => panic!("expected insert, got {other:?}"),
    };
    let persisted = document["revision"]
        .as_str()
        .expect("token stamped into document");
    assert!(!persisted.is_empty());

    // The in-memory entity reflects the value actually persisted.
    let stamped: Invoice = entry.current_as()?;
    assert_eq!(stamped.revision.as_deref(), Some(persisted));
    Ok(())
}

#[test]
fn insert_respects_caller_supplied_token() -> Result<()> {
    let selector = selector();
    let invoice = Invoice {
        id: "i-2".into(),
        amount: 7,
        revision: Some("caller-token".into()),
    };
    let mut entry = TrackedEntry::added_from("Invoice", &invoice)?;

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    match model.operation {
        WriteOperation::InsertOne { document } => {
            assert_eq!(document["revision"], json!("caller-token"));
        }
        other => panic!("expected insert, got {other:?}"),
    }
    Ok(())
}

#[test]
fn insert_without_token_declared_adds_no_token_field() -> Result<()> {
    let selector = selector();
    let customer = Customer {
        id: "c-2".into(),
        email: "g@example.com".into(),
        tier: "free".into(),
    };
    let mut entry = TrackedEntry::added_from("Customer", &customer)?;

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    match model.operation {
        WriteOperation::InsertOne { document } => {
            assert_eq!(document.as_object().unwrap().len(), 3);
        }
        other => panic!("expected insert, got {other:?}"),
    }
    Ok(())
}

#[test]
fn creates_update_one_model_referencing_only_id() -> Result<()> {
    let selector = selector();
    let customer = Customer {
        id: "c-3".into(),
        email: "ada@example.com".into(),
        tier: "free".into(),
    };
    let mut entry = TrackedEntry::loaded_from("Customer", &customer)?;
    entry.set_current_value(&"tier".into(), json!("pro"));
    entry.mark_modified();

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    assert_eq!(
        model.operation,
        WriteOperation::UpdateOne {
            filter: Filter::eq("id", json!("c-3")),
            update: UpdateDocument::default().with_set("tier", json!("pro")),
        }
    );
    Ok(())
}

#[test]
fn creates_update_one_model_referencing_concurrency_token() -> Result<()> {
    let selector = selector();
    let invoice = Invoice {
        id: "i-3".into(),
        amount: 10,
        revision: Some("r-1".into()),
    };
    let mut entry = TrackedEntry::loaded_from("Invoice", &invoice)?;
    entry.set_current_value(&"amount".into(), json!(25));
    entry.mark_modified();

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    assert_eq!(
        model.operation,
        WriteOperation::UpdateOne {
            filter: Filter::eq("id", json!("i-3")).and_eq("revision", json!("r-1")),
            update: UpdateDocument::default().with_set("amount", json!(25)),
        }
    );
    Ok(())
}

#[test]
fn modified_entry_with_no_changes_still_produces_an_update() -> Result<()> {
    let selector = selector();
    let customer = Customer {
        id: "c-4".into(),
        email: "ada@example.com".into(),
        tier: "free".into(),
    };
    let mut entry = TrackedEntry::loaded_from("Customer", &customer)?;
    entry.mark_modified();

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    match model.operation {
        WriteOperation::UpdateOne { filter, update } => {
            assert_eq!(filter, Filter::eq("id", json!("c-4")));
            assert!(update.is_empty());
            assert_eq!(update.to_value(), json!({"$set": {}}));
        }
        other => panic!("expected update, got {other:?}"),
    }
    Ok(())
}

#[test]
fn creates_delete_one_model_referencing_only_id() -> Result<()> {
    let selector = selector();
    let customer = Customer {
        id: "c-5".into(),
        email: "ada@example.com".into(),
        tier: "free".into(),
    };
    let mut entry = TrackedEntry::loaded_from("Customer", &customer)?;
    entry.mark_deleted();

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    assert_eq!(
        model.operation,
        WriteOperation::DeleteOne {
            filter: Filter::eq("id", json!("c-5")),
        }
    );
    Ok(())
}

#[test]
fn creates_delete_one_model_referencing_concurrency_token() -> Result<()> {
    let selector = selector();
    let invoice = Invoice {
        id: "i-4".into(),
        amount: 3,
        revision: Some("r-9".into()),
    };
    let mut entry = TrackedEntry::loaded_from("Invoice", &invoice)?;
    entry.mark_deleted();

    let translator = selector.select(&entry)?;
    let model = translator.translate(&mut entry)?;

    assert_eq!(
        model.operation,
        WriteOperation::DeleteOne {
            filter: Filter::eq("id", json!("i-4")).and_eq("revision", json!("r-9")),
        }
    );
    Ok(())
}

#[test]
fn unchanged_entry_fails_translation() -> Result<()> {
    let selector = selector();
    let customer = Customer {
        id: "c-6".into(),
        email: "ada@example.com".into(),
        tier: "free".into(),
    };
    let mut entry = TrackedEntry::loaded_from("Customer", &customer)?;

    let translator = selector.select(&entry)?;
    let err = translator.translate(&mut entry).expect_err("must reject");
    assert!(matches!(
        err,
        Error::UnsupportedState {
            state: EntityState::Unchanged
        }
    ));
    Ok(())
}

#[test]
fn added_entry_without_key_value_errors() -> Result<()> {
    let selector = selector();
    let mut entry = TrackedEntry::added("Customer", json!({"email": "a@x"}));

    let translator = selector.select(&entry)?;
    let err = translator.translate(&mut entry).expect_err("must reject");
    assert!(matches!(err, Error::MissingKeyValue { .. }));
    Ok(())
}
