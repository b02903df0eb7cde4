// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cardclip::engine::aggregate::{by_category, high_value, top_merchants, total_spent};
use cardclip::engine::classify::{Classifier, UNCATEGORIZED};
use cardclip::engine::installment::amortize;
use cardclip::engine::period::{self, Period};
use cardclip::engine::{goal, recurring};
use cardclip::models::{CategoryRule, Installment, Transaction};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(id: i64, datetime: &str, merchant: &str, amount: i64) -> Transaction {
    Transaction {
        id,
        date: datetime.parse().unwrap(),
        merchant: merchant.to_string(),
        amount,
        card_id: 1,
        description: None,
    }
}

fn rule(id: i64, pattern: &str, category: &str) -> CategoryRule {
    CategoryRule {
        id,
        pattern: pattern.to_string(),
        category_id: category.to_string(),
        sub_category_id: None,
        active: true,
    }
}

#[test]
fn consecutive_periods_tile_the_calendar() {
    // Walking a full year of reference dates must produce gapless,
    // non-overlapping cycles for every legal start day.
    for start_day in [1, 15, 28] {
        let mut current = period::resolve(d(2024, 1, 20), start_day).unwrap();
        for _ in 0..12 {
            let next = period::resolve(current.end, start_day).unwrap();
            assert_eq!(next.start, current.end);
            assert!(next.end > next.start);
            current = next;
        }
    }
}

#[test]
fn expense_sum_respects_amount_sign() {
    let p = period::resolve(d(2025, 3, 26), 25).unwrap();
    let txs = vec![
        tx(1, "2025-03-26T10:00:00", "A", -1000),
        tx(2, "2025-03-27T10:00:00", "B", 500),
        tx(3, "2025-03-28T10:00:00", "C", -2000),
    ];
    assert_eq!(total_spent(&txs, &p), 3000);
}

#[test]
fn category_rollup_classifies_and_sorts() {
    let p = period::resolve(d(2025, 3, 26), 25).unwrap();
    let classifier = Classifier::new(&[
        rule(1, "gs25|cu", "convenience"),
        rule(2, "netflix|watcha", "subscription"),
    ]);
    let txs = vec![
        tx(1, "2025-03-26T09:00:00", "GS25 Yeoksam", -3000),
        tx(2, "2025-03-27T21:00:00", "NETFLIX.COM", -17_000),
        tx(3, "2025-03-28T12:00:00", "CU Gangnam", -5000),
        tx(4, "2025-03-29T12:00:00", "Mystery shop", -1000),
    ];
    let spend = by_category(&txs, &p, &classifier);
    assert_eq!(spend[0].category_id, "subscription");
    assert_eq!(spend[0].total, 17_000);
    assert_eq!(spend[1].category_id, "convenience");
    assert_eq!(spend[1].total, 8000);
    assert_eq!(spend[2].category_id, UNCATEGORIZED);
}

#[test]
fn merchant_ranking_over_full_period() {
    let p = period::resolve(d(2025, 3, 26), 25).unwrap();
    let mut txs = Vec::new();
    for i in 0..4 {
        txs.push(tx(i, "2025-03-26T12:00:00", "Coupang", -10_000));
    }
    txs.push(tx(10, "2025-03-27T12:00:00", "Emart", -25_000));
    txs.push(tx(11, "2025-03-28T12:00:00", "Kakao T", -15_000));

    let ranking = top_merchants(&txs, &p, 2);
    assert_eq!(ranking.entries[0].merchant, "Coupang");
    assert_eq!(ranking.entries[0].total, 40_000);
    assert_eq!(ranking.entries[1].merchant, "Emart");
    let covered = ranking.entries[0].percent + ranking.entries[1].percent;
    assert!((ranking.remainder_percent - (100.0 - covered)).abs() < 1e-9);
}

#[test]
fn high_value_expenses_rank_by_magnitude() {
    let p = period::resolve(d(2025, 3, 26), 25).unwrap();
    let txs = vec![
        tx(1, "2025-03-26T10:00:00", "GS25", -4_500),
        tx(2, "2025-03-27T14:00:00", "Apple Store", -1_790_000),
        tx(3, "2025-03-28T09:00:00", "Costco", -180_000),
        tx(4, "2025-03-29T20:00:00", "Dinner", -65_000),
        // Below the 50,000 won floor and outside the period respectively.
        tx(5, "2025-03-30T12:00:00", "Bakery", -12_000),
        tx(6, "2025-05-01T12:00:00", "Costco", -500_000),
    ];
    let entries = high_value(&txs, &p, 5);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].transaction.merchant, "Apple Store");
    assert!(entries[0].flagged);
    assert_eq!(entries[1].transaction.merchant, "Costco");
    assert_eq!(entries[2].transaction.merchant, "Dinner");
    assert!(!entries[2].flagged);
}

#[test]
fn goal_progress_guards_every_zero() {
    let p = Period {
        start: d(2025, 3, 25),
        end: d(2025, 4, 25),
    };
    let zero_goal = goal::compute(&p, 0, 50_000, d(2025, 4, 1));
    assert_eq!(zero_goal.current_progress_percent, 0.0);
    assert_eq!(zero_goal.projected_total_percent, 0.0);

    let not_started = goal::compute(&p, 300_000, 0, d(2025, 3, 1));
    assert_eq!(not_started.days_passed, 0);
    assert_eq!(not_started.actual_daily_average, 0.0);
    assert!(not_started.remaining_daily_budget.is_finite());
}

#[test]
fn monthly_bill_is_recurring_but_habitual_spending_is_not() {
    let mut txs = vec![
        // Once a month, two distinct months, same amount: fixed.
        tx(1, "2025-01-15T08:00:00", "Netflix", -17_000),
        tx(2, "2025-02-15T08:00:00", "Netflix", -17_000),
        // Once a month, different amounts: variable.
        tx(3, "2025-01-20T08:00:00", "KEPCO", -42_000),
        tx(4, "2025-02-20T08:00:00", "KEPCO", -55_000),
    ];
    // Five charges every month for three months: over the frequency ceiling.
    let mut id = 100;
    for month in 1..=3 {
        for day in [3, 9, 15, 21, 27] {
            id += 1;
            txs.push(tx(
                id,
                &format!("2025-{month:02}-{day:02}T19:00:00"),
                "Baemin",
                -14_000,
            ));
        }
    }

    let profiles = recurring::detect(&txs, d(2025, 3, 10));
    assert!(!profiles.get("Netflix").unwrap().is_variable);
    assert!(profiles.get("KEPCO").unwrap().is_variable);
    assert!(profiles.get("Baemin").is_none());
}

#[test]
fn upcoming_bills_skip_paid_merchants() {
    let p = period::resolve(d(2025, 3, 1), 25).unwrap();
    assert_eq!(p.start, d(2025, 2, 25));
    let txs = vec![
        tx(1, "2025-01-15T08:00:00", "Netflix", -17_000),
        tx(2, "2025-02-15T08:00:00", "Netflix", -17_000),
        tx(3, "2025-01-01T08:00:00", "Gym", -60_000),
        tx(4, "2025-02-01T08:00:00", "Gym", -60_000),
        // The gym already charged inside the current period.
        tx(5, "2025-03-01T08:00:00", "Gym", -60_000),
    ];
    let bills = recurring::upcoming_bills(&txs, &p, d(2025, 3, 1));
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].merchant, "Netflix");
    assert_eq!(bills[0].expected_date, d(2025, 3, 15));
}

#[test]
fn installment_amortization_end_to_end() {
    let inst = Installment {
        id: 1,
        start_date: d(2024, 1, 15),
        merchant: "Laptop".into(),
        card_id: 1,
        total_amount: 1_200_000,
        months: 12,
    };
    let status = amortize(&inst, d(2024, 4, 20));
    assert_eq!(status.current_round, 4);
    assert!(!status.is_finished);
    assert_eq!(status.monthly_amount, 100_000);
    assert_eq!(status.paid_amount, 400_000);
    assert_eq!(status.remaining_amount, 800_000);
    assert!((status.progress_percent - 33.33).abs() < 0.01);
}
