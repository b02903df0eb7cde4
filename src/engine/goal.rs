// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::period::Period;

/// Pace-versus-plan metrics for one billing period. Pure arithmetic over the
/// period bounds, the goal, the summed period spend, and "today".
///
/// Every division here has a configuration-derived denominator that can
/// legitimately be small or zero (one-day periods, zero goals, a period that
/// has not started yet), so each one is guarded rather than trusted.
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub goal: i64,
    pub spent: i64,
    pub total_days: i64,
    pub days_passed: i64,
    pub current_progress_percent: f64,
    pub expected_spent: f64,
    pub expected_progress_percent: f64,
    /// Spend ahead (+) or behind (-) of the linear plan as of today.
    pub diff: f64,
    pub is_over_spent: bool,
    pub is_total_over_spent: bool,
    pub daily_budget: f64,
    pub remaining_days: i64,
    pub remaining_daily_budget: f64,
    pub actual_daily_average: f64,
    pub projected_total_spending: f64,
    pub projected_total_percent: f64,
}

pub fn compute(period: &Period, goal: i64, spent: i64, today: NaiveDate) -> GoalProgress {
    let total_days = period.total_days();

    // Elapsed days: full length once the period is over, zero before it
    // starts, and the running day counts as elapsed while inside it.
    let days_passed = if today >= period.end {
        total_days
    } else if today < period.start {
        0
    } else {
        (today - period.start).num_days() + 1
    };

    let goal_f = goal as f64;
    let spent_f = spent as f64;

    let current_progress_percent = if goal > 0 {
        spent_f / goal_f * 100.0
    } else {
        0.0
    };

    let (expected_spent, expected_progress_percent, daily_budget) = if total_days > 0 {
        (
            goal_f / total_days as f64 * days_passed as f64,
            days_passed as f64 / total_days as f64 * 100.0,
            goal_f / total_days as f64,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let diff = spent_f - expected_spent;
    let remaining_days = (total_days - days_passed).max(1);
    let remaining_daily_budget = (goal_f - spent_f) / remaining_days as f64;

    let actual_daily_average = if days_passed > 0 {
        spent_f / days_passed as f64
    } else {
        0.0
    };
    let projected_total_spending = actual_daily_average * total_days as f64;
    let projected_total_percent = if goal > 0 {
        projected_total_spending / goal_f * 100.0
    } else {
        0.0
    };

    GoalProgress {
        goal,
        spent,
        total_days,
        days_passed,
        current_progress_percent,
        expected_spent,
        expected_progress_percent,
        diff,
        is_over_spent: diff > 0.0,
        is_total_over_spent: spent > goal,
        daily_budget,
        remaining_days,
        remaining_daily_budget,
        actual_daily_average,
        projected_total_spending,
        projected_total_percent,
    }
}
