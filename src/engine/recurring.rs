// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::engine::period::Period;
use crate::models::Transaction;

/// A merchant must appear in at least this many distinct calendar months to
/// count as recurring.
pub const RECURRING_MIN_MONTHS: usize = 2;

/// Merchants averaging more charges per month than this are treated as
/// discretionary spending (food delivery, convenience stores), not bills.
pub const FREQUENCY_THRESHOLD: f64 = 3.0;

/// Trailing window used for the recent-occurrence count.
pub const RECENT_MONTHS_WINDOW: u32 = 6;

/// Historical profile of a recurring merchant.
#[derive(Debug, Clone, Serialize)]
pub struct MerchantProfile {
    pub merchant: String,
    /// False when every historical charge had the identical amount.
    pub is_variable: bool,
    pub min: i64,
    pub max: i64,
    pub avg: f64,
    /// Charges within the trailing [`RECENT_MONTHS_WINDOW`] months.
    pub recent_count: usize,
    /// Rounded mean day-of-month across all occurrences. An approximation:
    /// merchants billing near month boundaries (day 30 one month, day 1 the
    /// next) average toward mid-month.
    pub expected_day: u32,
    pub occurrences: usize,
}

struct MerchantHistory {
    monthly_counts: HashMap<(i32, u32), u32>,
    amounts: Vec<i64>,
    dates: Vec<NaiveDate>,
}

/// Scan the full expense history and profile every recurring merchant:
/// present in >= 2 distinct months and below the per-month frequency ceiling.
/// Sparse data is simply not recurring; this never errors.
pub fn detect(txs: &[Transaction], today: NaiveDate) -> BTreeMap<String, MerchantProfile> {
    let mut histories: HashMap<String, MerchantHistory> = HashMap::new();
    for tx in txs.iter().filter(|t| t.is_expense()) {
        let date = tx.date.date();
        let entry = histories
            .entry(tx.merchant.trim().to_string())
            .or_insert_with(|| MerchantHistory {
                monthly_counts: HashMap::new(),
                amounts: Vec::new(),
                dates: Vec::new(),
            });
        *entry
            .monthly_counts
            .entry((date.year(), date.month()))
            .or_default() += 1;
        entry.amounts.push(tx.amount.abs());
        entry.dates.push(date);
    }

    let window_start = today - Months::new(RECENT_MONTHS_WINDOW);
    let mut profiles = BTreeMap::new();
    for (merchant, history) in histories {
        let months = history.monthly_counts.len();
        if months < RECURRING_MIN_MONTHS {
            continue;
        }
        let total_count: u32 = history.monthly_counts.values().sum();
        let avg_frequency = f64::from(total_count) / months as f64;
        if avg_frequency > FREQUENCY_THRESHOLD {
            continue;
        }

        let min = history.amounts.iter().copied().min().unwrap_or(0);
        let max = history.amounts.iter().copied().max().unwrap_or(0);
        let avg =
            history.amounts.iter().sum::<i64>() as f64 / history.amounts.len() as f64;
        let recent_count = history.dates.iter().filter(|d| **d > window_start).count();
        let day_sum: u32 = history.dates.iter().map(|d| d.day()).sum();
        let expected_day =
            (f64::from(day_sum) / history.dates.len() as f64).round() as u32;

        profiles.insert(
            merchant.clone(),
            MerchantProfile {
                merchant,
                is_variable: min != max,
                min,
                max,
                avg,
                recent_count,
                expected_day,
                occurrences: history.dates.len(),
            },
        );
    }
    profiles
}

#[derive(Debug, Clone, Serialize)]
pub struct FixedExpenseEntry {
    pub transaction: Transaction,
    pub profile: MerchantProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixedExpenseReport {
    /// Period expenses at recurring merchants, in date order.
    pub entries: Vec<FixedExpenseEntry>,
    pub fixed_total: i64,
    pub period_total: i64,
    /// Fixed spend as a share of all period spend, 0 when nothing was spent.
    pub fixed_percent: f64,
}

/// Current-period expenses whose merchant the detector profiled as recurring,
/// each carrying its historical stats.
pub fn fixed_in_period(
    txs: &[Transaction],
    period: &Period,
    profiles: &BTreeMap<String, MerchantProfile>,
) -> FixedExpenseReport {
    let in_period: Vec<&Transaction> = txs
        .iter()
        .filter(|t| t.is_expense() && period.contains(t.date.date()))
        .collect();
    let period_total: i64 = in_period.iter().map(|t| t.amount.abs()).sum();

    let mut entries: Vec<FixedExpenseEntry> = in_period
        .iter()
        .filter_map(|tx| {
            profiles
                .get(tx.merchant.trim())
                .map(|profile| FixedExpenseEntry {
                    transaction: (*tx).clone(),
                    profile: profile.clone(),
                })
        })
        .collect();
    entries.sort_by_key(|e| e.transaction.date);

    let fixed_total: i64 = entries
        .iter()
        .map(|e| e.transaction.amount.abs())
        .sum();
    let fixed_percent = if period_total > 0 {
        fixed_total as f64 / period_total as f64 * 100.0
    } else {
        0.0
    };
    FixedExpenseReport {
        entries,
        fixed_total,
        period_total,
        fixed_percent,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingBill {
    pub merchant: String,
    pub expected_date: NaiveDate,
    /// Historical average charge, rounded to whole won.
    pub expected_amount: i64,
    /// Days until the expected date; negative means overdue.
    pub d_day: i64,
    pub overdue: bool,
}

/// Predict which recurring bills are still due this period. The expected
/// day-of-month is projected onto the period's opening month and the month
/// after; whichever projection lands inside the period is the target. A
/// merchant already charged within the period counts as paid and is omitted.
pub fn upcoming_bills(txs: &[Transaction], period: &Period, today: NaiveDate) -> Vec<UpcomingBill> {
    let profiles = detect(txs, today);
    let mut bills: Vec<UpcomingBill> = Vec::new();

    for profile in profiles.values() {
        let candidates = [
            period.start.with_day(profile.expected_day),
            (period.start + Months::new(1)).with_day(profile.expected_day),
        ];
        let Some(target) = candidates
            .into_iter()
            .flatten()
            .find(|d| period.contains(*d))
        else {
            continue;
        };

        let paid = txs.iter().any(|t| {
            t.is_expense()
                && t.merchant.trim() == profile.merchant
                && period.contains(t.date.date())
        });
        if paid {
            continue;
        }

        let d_day = (target - today).num_days();
        bills.push(UpcomingBill {
            merchant: profile.merchant.clone(),
            expected_date: target,
            expected_amount: profile.avg.round() as i64,
            d_day,
            overdue: d_day < 0,
        });
    }

    bills.sort_by_key(|b| b.expected_date);
    bills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, date: &str, merchant: &str, amount: i64) -> Transaction {
        Transaction {
            id,
            date: format!("{date}T09:00:00").parse().unwrap(),
            merchant: merchant.to_string(),
            amount,
            card_id: 1,
            description: None,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn two_months_same_amount_is_fixed() {
        let txs = vec![
            tx(1, "2025-01-15", "Netflix", -17_000),
            tx(2, "2025-02-15", "Netflix", -17_000),
        ];
        let profiles = detect(&txs, d(2025, 3, 1));
        let p = profiles.get("Netflix").unwrap();
        assert!(!p.is_variable);
        assert_eq!(p.expected_day, 15);
        assert_eq!(p.avg, 17_000.0);
    }

    #[test]
    fn differing_amounts_are_variable_with_stats() {
        let txs = vec![
            tx(1, "2025-01-20", "KEPCO", -30_000),
            tx(2, "2025-02-20", "KEPCO", -50_000),
        ];
        let profiles = detect(&txs, d(2025, 3, 1));
        let p = profiles.get("KEPCO").unwrap();
        assert!(p.is_variable);
        assert_eq!(p.min, 30_000);
        assert_eq!(p.max, 50_000);
        assert_eq!(p.avg, 40_000.0);
    }

    #[test]
    fn high_frequency_merchant_is_excluded() {
        let mut txs = Vec::new();
        let mut id = 0;
        for month in 1..=3 {
            for day in [2, 8, 14, 20, 26] {
                id += 1;
                txs.push(tx(id, &format!("2025-{month:02}-{day:02}"), "Baemin", -12_000));
            }
        }
        let profiles = detect(&txs, d(2025, 4, 1));
        assert!(profiles.get("Baemin").is_none());
    }

    #[test]
    fn single_month_is_not_recurring() {
        let txs = vec![tx(1, "2025-01-15", "One-off", -99_000)];
        assert!(detect(&txs, d(2025, 3, 1)).is_empty());
    }

    #[test]
    fn merchant_names_are_trimmed_before_grouping() {
        let txs = vec![
            tx(1, "2025-01-15", "Netflix ", -17_000),
            tx(2, "2025-02-15", " Netflix", -17_000),
        ];
        let profiles = detect(&txs, d(2025, 3, 1));
        assert!(profiles.contains_key("Netflix"));
    }

    #[test]
    fn paid_bill_is_not_upcoming() {
        let period = Period {
            start: d(2025, 2, 25),
            end: d(2025, 3, 25),
        };
        let txs = vec![
            tx(1, "2025-01-15", "Netflix", -17_000),
            tx(2, "2025-02-15", "Netflix", -17_000),
            // Already charged inside the current period.
            tx(3, "2025-03-15", "Netflix", -17_000),
        ];
        let bills = upcoming_bills(&txs, &period, d(2025, 3, 1));
        assert!(bills.is_empty());
    }

    #[test]
    fn unpaid_bill_is_projected_into_the_period() {
        let period = Period {
            start: d(2025, 2, 25),
            end: d(2025, 3, 25),
        };
        let txs = vec![
            tx(1, "2025-01-15", "Netflix", -17_000),
            tx(2, "2025-02-15", "Netflix", -17_000),
        ];
        let bills = upcoming_bills(&txs, &period, d(2025, 3, 1));
        assert_eq!(bills.len(), 1);
        // Day 15 of the period's opening month falls before the period start,
        // so the following month's projection is the target.
        assert_eq!(bills[0].expected_date, d(2025, 3, 15));
        assert_eq!(bills[0].expected_amount, 17_000);
        assert_eq!(bills[0].d_day, 14);
        assert!(!bills[0].overdue);
    }

    #[test]
    fn overdue_bill_has_negative_d_day() {
        let period = Period {
            start: d(2025, 2, 25),
            end: d(2025, 3, 25),
        };
        let txs = vec![
            tx(1, "2025-01-01", "Gym", -60_000),
            tx(2, "2025-02-01", "Gym", -60_000),
        ];
        let bills = upcoming_bills(&txs, &period, d(2025, 3, 10));
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].expected_date, d(2025, 3, 1));
        assert_eq!(bills[0].d_day, -9);
        assert!(bills[0].overdue);
    }

    #[test]
    fn fixed_in_period_attaches_profiles_and_share() {
        let period = Period {
            start: d(2025, 2, 25),
            end: d(2025, 3, 25),
        };
        let txs = vec![
            tx(1, "2025-01-15", "Netflix", -17_000),
            tx(2, "2025-02-15", "Netflix", -17_000),
            tx(3, "2025-03-15", "Netflix", -17_000),
            tx(4, "2025-03-16", "Random shop", -3_000),
        ];
        let profiles = detect(&txs, d(2025, 3, 20));
        let report = fixed_in_period(&txs, &period, &profiles);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.fixed_total, 17_000);
        assert_eq!(report.period_total, 20_000);
        assert!((report.fixed_percent - 85.0).abs() < 1e-9);
    }
}
