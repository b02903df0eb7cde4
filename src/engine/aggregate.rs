// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Timelike};
use serde::Serialize;
use std::collections::HashMap;

use crate::engine::classify::Classifier;
use crate::engine::period::Period;
use crate::models::{Card, PerformanceTier, Transaction};

/// Expense transactions (amount < 0) dated inside the period. Every other
/// aggregation in this module starts from this filter.
pub fn period_expenses<'a>(txs: &'a [Transaction], period: &Period) -> Vec<&'a Transaction> {
    txs.iter()
        .filter(|t| t.is_expense() && period.contains(t.date.date()))
        .collect()
}

/// Total spent in the period, as a positive magnitude. Income is excluded by
/// the sign filter, never netted against spend.
pub fn total_spent(txs: &[Transaction], period: &Period) -> i64 {
    period_expenses(txs, period)
        .iter()
        .map(|t| t.amount.abs())
        .sum()
}

#[derive(Debug, Clone, Serialize)]
pub struct SubCategorySpend {
    pub sub_category_id: Option<String>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySpend {
    pub category_id: String,
    pub total: i64,
    pub sub_categories: Vec<SubCategorySpend>,
}

/// Period spend grouped by classified category, subcategory totals nested
/// within each, both levels sorted descending by total.
pub fn by_category(
    txs: &[Transaction],
    period: &Period,
    classifier: &Classifier,
) -> Vec<CategorySpend> {
    let mut groups: HashMap<String, (i64, HashMap<Option<String>, i64>)> = HashMap::new();
    for tx in period_expenses(txs, period) {
        let (category, sub) = match classifier.classify(&tx.merchant) {
            Some(m) => (
                m.category_id.to_string(),
                m.sub_category_id.map(str::to_string),
            ),
            None => (crate::engine::classify::UNCATEGORIZED.to_string(), None),
        };
        let entry = groups.entry(category).or_default();
        entry.0 += tx.amount.abs();
        *entry.1.entry(sub).or_default() += tx.amount.abs();
    }
    let mut out: Vec<CategorySpend> = groups
        .into_iter()
        .map(|(category_id, (total, subs))| {
            let mut sub_categories: Vec<SubCategorySpend> = subs
                .into_iter()
                .map(|(sub_category_id, total)| SubCategorySpend {
                    sub_category_id,
                    total,
                })
                .collect();
            sub_categories.sort_by(|a, b| b.total.cmp(&a.total));
            CategorySpend {
                category_id,
                total,
                sub_categories,
            }
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct MerchantSpend {
    pub merchant: String,
    pub total: i64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MerchantRanking {
    pub entries: Vec<MerchantSpend>,
    /// Share of period spend not covered by the ranked entries.
    pub remainder_percent: f64,
}

/// Top-N merchants by period spend. Merchants are grouped by trimmed name
/// only; no further normalization.
pub fn top_merchants(txs: &[Transaction], period: &Period, limit: usize) -> MerchantRanking {
    let expenses = period_expenses(txs, period);
    let total: i64 = expenses.iter().map(|t| t.amount.abs()).sum();
    let mut groups: HashMap<&str, i64> = HashMap::new();
    for tx in &expenses {
        *groups.entry(tx.merchant.trim()).or_default() += tx.amount.abs();
    }
    let mut ranked: Vec<(&str, i64)> = groups.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked.truncate(limit);
    let entries: Vec<MerchantSpend> = ranked
        .into_iter()
        .map(|(merchant, spent)| MerchantSpend {
            merchant: merchant.to_string(),
            total: spent,
            percent: if total > 0 {
                spent as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    let covered: f64 = entries.iter().map(|e| e.percent).sum();
    let remainder_percent = if entries.is_empty() {
        0.0
    } else {
        100.0 - covered
    };
    MerchantRanking {
        entries,
        remainder_percent,
    }
}

/// Expenses of at least this magnitude count as high-value.
pub const HIGH_VALUE_FLOOR: i64 = 50_000;

/// Magnitude at which a high-value expense is additionally flagged.
pub const HIGH_VALUE_ALERT: i64 = 300_000;

#[derive(Debug, Clone, Serialize)]
pub struct HighValueEntry {
    pub transaction: Transaction,
    pub flagged: bool,
}

/// The largest period expenses at or above [`HIGH_VALUE_FLOOR`], biggest
/// first, capped at `limit`.
pub fn high_value(txs: &[Transaction], period: &Period, limit: usize) -> Vec<HighValueEntry> {
    let mut hits: Vec<&Transaction> = period_expenses(txs, period)
        .into_iter()
        .filter(|t| t.amount.abs() >= HIGH_VALUE_FLOOR)
        .collect();
    hits.sort_by(|a, b| b.amount.abs().cmp(&a.amount.abs()).then(a.date.cmp(&b.date)));
    hits.truncate(limit);
    hits.into_iter()
        .map(|tx| HighValueEntry {
            transaction: tx.clone(),
            flagged: tx.amount.abs() >= HIGH_VALUE_ALERT,
        })
        .collect()
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Serialize)]
pub struct WeekdaySpend {
    /// Totals indexed 0 = Sunday .. 6 = Saturday.
    pub totals: [i64; 7],
    /// Index of the heaviest weekday, `None` when nothing was spent.
    pub dominant: Option<usize>,
}

pub fn by_weekday(txs: &[Transaction], period: &Period) -> WeekdaySpend {
    let mut totals = [0i64; 7];
    for tx in period_expenses(txs, period) {
        let idx = tx.date.date().weekday().num_days_from_sunday() as usize;
        totals[idx] += tx.amount.abs();
    }
    let dominant = totals
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0)
        .max_by_key(|&(_, &v)| v)
        .map(|(i, _)| i);
    WeekdaySpend { totals, dominant }
}

/// Named hour-of-day buckets. The late-night slot wraps midnight and is
/// matched as `hour >= 22 || hour < 2` rather than by its bounds.
pub const TIME_SLOTS: [(&str, u32, u32); 6] = [
    ("morning", 6, 11),
    ("lunch", 11, 14),
    ("afternoon", 14, 18),
    ("evening", 18, 22),
    ("late night", 22, 2),
    ("dawn", 2, 6),
];

#[derive(Debug, Clone, Serialize)]
pub struct SlotSpend {
    pub label: &'static str,
    pub total: i64,
}

fn slot_index(hour: u32) -> usize {
    if hour >= 22 || hour < 2 {
        return 4;
    }
    TIME_SLOTS
        .iter()
        .position(|&(_, start, end)| hour >= start && hour < end)
        .unwrap_or(4)
}

pub fn by_time_slot(txs: &[Transaction], period: &Period) -> Vec<SlotSpend> {
    let mut slots: Vec<SlotSpend> = TIME_SLOTS
        .iter()
        .map(|&(label, _, _)| SlotSpend { label, total: 0 })
        .collect();
    for tx in period_expenses(txs, period) {
        slots[slot_index(tx.date.hour())].total += tx.amount.abs();
    }
    slots
}

#[derive(Debug, Clone, Serialize)]
pub struct NextTier {
    pub amount: i64,
    pub benefit: String,
    /// Spend still missing to reach this tier.
    pub gap: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardUsage {
    pub card_id: i64,
    pub name: String,
    pub used: i64,
    pub credit_limit: i64,
    pub limit_percent: f64,
    pub remaining_limit: i64,
    /// Every tier whose threshold the period spend meets, lowest first.
    pub achieved_tiers: Vec<PerformanceTier>,
    pub next_tier: Option<NextTier>,
}

/// Per-card period utilization and performance-tier progress, sorted by
/// utilization descending. A zero credit limit yields 0%, not a division
/// error.
pub fn card_usage(cards: &[Card], txs: &[Transaction], period: &Period) -> Vec<CardUsage> {
    let expenses = period_expenses(txs, period);
    let mut out: Vec<CardUsage> = cards
        .iter()
        .map(|card| {
            let used: i64 = expenses
                .iter()
                .filter(|t| t.card_id == card.id)
                .map(|t| t.amount.abs())
                .sum();
            let limit_percent = if card.credit_limit > 0 {
                used as f64 / card.credit_limit as f64 * 100.0
            } else {
                0.0
            };
            let mut tiers = card.performance.clone();
            tiers.sort_by_key(|t| t.amount);
            let achieved_tiers: Vec<PerformanceTier> = tiers
                .iter()
                .filter(|t| used >= t.amount)
                .cloned()
                .collect();
            let next_tier = tiers.iter().find(|t| used < t.amount).map(|t| NextTier {
                amount: t.amount,
                benefit: t.benefit.clone(),
                gap: t.amount - used,
            });
            CardUsage {
                card_id: card.id,
                name: card.name.clone(),
                used,
                credit_limit: card.credit_limit,
                limit_percent,
                remaining_limit: card.credit_limit - used,
                achieved_tiers,
                next_tier,
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.limit_percent
            .partial_cmp(&a.limit_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(id: i64, date: &str, merchant: &str, amount: i64) -> Transaction {
        Transaction {
            id,
            date: format!("{date}T12:00:00").parse().unwrap(),
            merchant: merchant.to_string(),
            amount,
            card_id: 1,
            description: None,
        }
    }

    fn period() -> Period {
        Period {
            start: NaiveDate::from_ymd_opt(2025, 3, 25).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 4, 25).unwrap(),
        }
    }

    #[test]
    fn income_and_out_of_period_excluded() {
        let txs = vec![
            tx(1, "2025-03-26", "GS25", -1000),
            tx(2, "2025-03-27", "Payroll", 500),
            tx(3, "2025-03-28", "Oliveyoung", -2000),
            tx(4, "2025-05-01", "GS25", -9999),
        ];
        assert_eq!(total_spent(&txs, &period()), 3000);
    }

    #[test]
    fn slot_index_wraps_midnight() {
        assert_eq!(slot_index(23), 4);
        assert_eq!(slot_index(0), 4);
        assert_eq!(slot_index(1), 4);
        assert_eq!(slot_index(2), 5);
        assert_eq!(slot_index(6), 0);
        assert_eq!(slot_index(12), 1);
        assert_eq!(slot_index(15), 2);
        assert_eq!(slot_index(19), 3);
    }

    #[test]
    fn top_merchants_caps_and_computes_remainder() {
        let txs = vec![
            tx(1, "2025-03-26", "A", -5000),
            tx(2, "2025-03-27", "B", -3000),
            tx(3, "2025-03-28", "C", -2000),
        ];
        let ranking = top_merchants(&txs, &period(), 2);
        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.entries[0].merchant, "A");
        assert!((ranking.entries[0].percent - 50.0).abs() < 1e-9);
        assert!((ranking.remainder_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_valid() {
        let ranking = top_merchants(&[], &period(), 5);
        assert!(ranking.entries.is_empty());
        assert_eq!(ranking.remainder_percent, 0.0);
        let weekday = by_weekday(&[], &period());
        assert_eq!(weekday.dominant, None);
        assert_eq!(total_spent(&[], &period()), 0);
    }

    #[test]
    fn high_value_filters_sorts_and_flags() {
        let txs = vec![
            tx(1, "2025-03-26", "GS25", -4_900),
            tx(2, "2025-03-27", "Dentist", -350_000),
            tx(3, "2025-03-28", "Emart", -82_000),
            tx(4, "2025-03-29", "Hotel", -210_000),
            tx(5, "2025-03-30", "Refund desk", 120_000),
        ];
        let entries = high_value(&txs, &period(), 5);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].transaction.merchant, "Dentist");
        assert!(entries[0].flagged);
        assert_eq!(entries[1].transaction.merchant, "Hotel");
        assert!(!entries[1].flagged);
        assert_eq!(entries[2].transaction.merchant, "Emart");

        let capped = high_value(&txs, &period(), 2);
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn exactly_at_the_floor_is_high_value() {
        let txs = vec![tx(1, "2025-03-26", "Butcher", -50_000)];
        assert_eq!(high_value(&txs, &period(), 5).len(), 1);
    }

    #[test]
    fn card_usage_guards_zero_limit_and_ranks_tiers() {
        let cards = vec![Card {
            id: 1,
            name: "Main".into(),
            credit_limit: 0,
            due_day: 14,
            performance: vec![
                PerformanceTier {
                    amount: 300_000,
                    benefit: "tier 1".into(),
                },
                PerformanceTier {
                    amount: 100_000,
                    benefit: "tier 0".into(),
                },
            ],
        }];
        let txs = vec![tx(1, "2025-03-26", "GS25", -150_000)];
        let usage = card_usage(&cards, &txs, &period());
        assert_eq!(usage[0].limit_percent, 0.0);
        assert_eq!(usage[0].achieved_tiers.len(), 1);
        assert_eq!(usage[0].achieved_tiers[0].amount, 100_000);
        let next = usage[0].next_tier.as_ref().unwrap();
        assert_eq!(next.amount, 300_000);
        assert_eq!(next.gap, 150_000);
    }
}
