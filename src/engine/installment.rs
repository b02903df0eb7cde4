// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::models::Installment;

#[derive(Debug, Clone, Serialize)]
pub struct InstallmentStatus {
    pub installment_id: i64,
    /// 1-based billing round, capped at the plan length.
    pub current_round: u32,
    pub is_finished: bool,
    pub monthly_amount: i64,
    pub paid_amount: i64,
    pub remaining_amount: i64,
    pub progress_percent: f64,
    pub end_date: NaiveDate,
}

/// Whole months from `start` to `now`, date-of-month aware: the month only
/// counts once `now` has reached the start's day-of-month.
fn months_between(start: NaiveDate, now: NaiveDate) -> i32 {
    let mut months =
        (now.year() - start.year()) * 12 + now.month() as i32 - start.month() as i32;
    if now.day() < start.day() {
        months -= 1;
    }
    months
}

/// Amortize an installment plan as of `today`. The start month is round 1.
/// The monthly amount is floor(total / months) with no remainder adjustment
/// in the final round, so `monthly_amount * months` may undershoot the
/// principal slightly; `remaining_amount` is measured against the true total.
pub fn amortize(installment: &Installment, today: NaiveDate) -> InstallmentStatus {
    let mut months_passed = months_between(installment.start_date, today)
        + i32::from(today.day() >= installment.start_date.day());
    if months_passed < 1 {
        months_passed = 1;
    }
    let months_passed = months_passed as u32;

    let is_finished = months_passed > installment.months;
    let current_round = months_passed.min(installment.months);
    let monthly_amount = installment.total_amount / i64::from(installment.months);
    let paid_amount = monthly_amount * i64::from(current_round);

    InstallmentStatus {
        installment_id: installment.id,
        current_round,
        is_finished,
        monthly_amount,
        paid_amount,
        remaining_amount: installment.total_amount - paid_amount,
        progress_percent: f64::from(current_round) / f64::from(installment.months) * 100.0,
        end_date: installment.start_date + Months::new(installment.months),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveSummary {
    pub active_count: usize,
    /// Principal left across all unfinished plans.
    pub total_remaining: i64,
    /// Combined monthly outlay across all unfinished plans.
    pub total_monthly: i64,
}

/// Roll up the unfinished installments. Finished plans are excluded here but
/// never deleted from storage.
pub fn active_summary(installments: &[Installment], today: NaiveDate) -> ActiveSummary {
    let active: Vec<InstallmentStatus> = installments
        .iter()
        .map(|i| amortize(i, today))
        .filter(|s| !s.is_finished)
        .collect();
    ActiveSummary {
        active_count: active.len(),
        total_remaining: active.iter().map(|s| s.remaining_amount).sum(),
        total_monthly: active.iter().map(|s| s.monthly_amount).sum(),
    }
}
