// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cardclip::models::{Card, CategoryRule, Installment, Settings, Transaction};
use cardclip::store::{Store, next_id};
use tempfile::TempDir;

fn setup() -> (TempDir, Store) {
    let tmp = TempDir::new().unwrap();
    let store = Store::open(tmp.path()).unwrap();
    (tmp, store)
}

#[test]
fn missing_files_load_as_empty_or_default() {
    let (_tmp, store) = setup();
    assert!(store.load_transactions().unwrap().is_empty());
    assert!(store.load_cards().unwrap().is_empty());
    assert!(store.load_rules().unwrap().is_empty());
    assert!(store.load_installments().unwrap().is_empty());
    let settings = store.load_settings().unwrap();
    assert_eq!(settings.start_day_of_month, 25);
    assert_eq!(settings.goal_spending, 100_000);
}

#[test]
fn records_round_trip() {
    let (_tmp, store) = setup();
    let cards = vec![Card {
        id: 1,
        name: "Main".into(),
        credit_limit: 1_000_000,
        due_day: 14,
        performance: vec![],
    }];
    store.save_cards(&cards).unwrap();

    let txs = vec![Transaction {
        id: 1,
        date: "2025-03-26T19:30:00".parse().unwrap(),
        merchant: "GS25".into(),
        amount: -4_500,
        card_id: 1,
        description: Some("late snack".into()),
    }];
    store.save_transactions(&txs).unwrap();

    let rules = vec![CategoryRule {
        id: 1,
        pattern: "gs25|cu|7-eleven".into(),
        category_id: "convenience".into(),
        sub_category_id: None,
        active: true,
    }];
    store.save_rules(&rules).unwrap();

    let installments = vec![Installment {
        id: 1,
        start_date: "2025-01-15".parse().unwrap(),
        merchant: "Laptop".into(),
        card_id: 1,
        total_amount: 1_200_000,
        months: 12,
    }];
    store.save_installments(&installments).unwrap();

    store
        .save_settings(&Settings {
            start_day_of_month: 10,
            goal_spending: 500_000,
            income: 3_000_000,
        })
        .unwrap();

    let loaded_txs = store.load_transactions().unwrap();
    assert_eq!(loaded_txs.len(), 1);
    assert_eq!(loaded_txs[0].merchant, "GS25");
    assert_eq!(loaded_txs[0].amount, -4_500);
    assert_eq!(store.load_cards().unwrap()[0].name, "Main");
    assert_eq!(store.load_rules().unwrap()[0].category_id, "convenience");
    assert_eq!(store.load_installments().unwrap()[0].months, 12);
    assert_eq!(store.load_settings().unwrap().start_day_of_month, 10);
}

#[test]
fn corrupt_json_is_a_fatal_load_error() {
    let (tmp, store) = setup();
    std::fs::write(tmp.path().join("transactions.json"), "not json").unwrap();
    let err = store.load_transactions().unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"));
}

#[test]
fn invalid_stored_record_is_a_fatal_load_error() {
    let (tmp, store) = setup();
    // due_day 0 violates the card schema.
    std::fs::write(
        tmp.path().join("cards.json"),
        r#"[{"id":1,"name":"Bad","credit_limit":0,"due_day":0,"performance":[]}]"#,
    )
    .unwrap();
    assert!(store.load_cards().is_err());
}

#[test]
fn settings_out_of_range_rejected_on_load() {
    let (tmp, store) = setup();
    std::fs::write(
        tmp.path().join("settings.json"),
        r#"{"start_day_of_month":31,"goal_spending":0,"income":0}"#,
    )
    .unwrap();
    assert!(store.load_settings().is_err());
}

#[test]
fn next_id_starts_at_one_and_increments_past_max() {
    assert_eq!(next_id([]), 1);
    assert_eq!(next_id([3, 1, 7]), 8);
}
