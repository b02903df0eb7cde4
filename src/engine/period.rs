// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, ensure};
use chrono::{Datelike, Months, NaiveDate};

/// One billing cycle: the half-open date range `[start, end)` anchored to the
/// configured start day of month. Never persisted; recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Resolve the billing period containing `reference`. If the reference day of
/// month is before the configured start day, the cycle began in the previous
/// calendar month; otherwise it began in the reference month. The end date is
/// the next cycle's start (exclusive).
///
/// `start_day_of_month` must be in 1..=28, which guarantees the anchor day
/// exists in every month.
pub fn resolve(reference: NaiveDate, start_day_of_month: u32) -> Result<Period> {
    ensure!(
        (1..=28).contains(&start_day_of_month),
        "start_day_of_month must be in 1..=28, got {}",
        start_day_of_month
    );
    let anchor = reference
        .with_day(start_day_of_month)
        .ok_or_else(|| anyhow!("No day {} in {}", start_day_of_month, reference))?;
    let start = if reference.day() < start_day_of_month {
        anchor - Months::new(1)
    } else {
        anchor
    };
    Ok(Period {
        start,
        end: start + Months::new(1),
    })
}

/// Shift the reference date by whole months and re-resolve, for
/// previous/next-period navigation.
pub fn shift(reference: NaiveDate, start_day_of_month: u32, months: i32) -> Result<Period> {
    let shifted = if months >= 0 {
        reference + Months::new(months as u32)
    } else {
        reference - Months::new(months.unsigned_abs())
    };
    resolve(shifted, start_day_of_month)
}
