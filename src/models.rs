// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field-level validation failure for a stored record. Stored data that fails
/// validation is a fatal load error; the analytics engine only ever sees
/// records that passed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("transaction {id}: merchant must not be empty")]
    EmptyMerchant { id: i64 },
    #[error("card {id}: credit_limit must be >= 0, got {value}")]
    NegativeCreditLimit { id: i64, value: i64 },
    #[error("card {id}: due_day must be in 1..=31, got {value}")]
    DueDayOutOfRange { id: i64, value: u32 },
    #[error("card {id}: tier amount must be >= 0, got {value}")]
    NegativeTierAmount { id: i64, value: i64 },
    #[error("rule {id}: pattern must not be empty")]
    EmptyPattern { id: i64 },
    #[error("rule {id}: category_id must not be empty")]
    EmptyCategory { id: i64 },
    #[error("installment {id}: total_amount must be >= 0, got {value}")]
    NegativeInstallmentTotal { id: i64, value: i64 },
    #[error("installment {id}: months must be >= 2, got {value}")]
    InstallmentTooShort { id: i64, value: u32 },
    #[error("settings: start_day_of_month must be in 1..=28, got {value}")]
    StartDayOutOfRange { value: u32 },
    #[error("settings: {field} must be >= 0, got {value}")]
    NegativeSetting { field: &'static str, value: i64 },
}

/// A single card transaction. The sign of `amount` is the only
/// expense/income discriminator: negative is an expense, positive is income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDateTime,
    pub merchant: String,
    pub amount: i64,
    pub card_id: i64,
    pub description: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.merchant.trim().is_empty() {
            return Err(ValidationError::EmptyMerchant { id: self.id });
        }
        Ok(())
    }
}

/// A spend threshold on a card that unlocks a benefit once period spend
/// reaches it. Tiers are cumulative: every met threshold counts as achieved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceTier {
    pub amount: i64,
    pub benefit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub credit_limit: i64,
    pub due_day: u32,
    #[serde(default)]
    pub performance: Vec<PerformanceTier>,
}

impl Card {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.credit_limit < 0 {
            return Err(ValidationError::NegativeCreditLimit {
                id: self.id,
                value: self.credit_limit,
            });
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(ValidationError::DueDayOutOfRange {
                id: self.id,
                value: self.due_day,
            });
        }
        for tier in &self.performance {
            if tier.amount < 0 {
                return Err(ValidationError::NegativeTierAmount {
                    id: self.id,
                    value: tier.amount,
                });
            }
        }
        Ok(())
    }
}

/// Merchant-to-category classification rule. Rules live in an ordered list
/// where position encodes priority: the first matching rule wins. The list is
/// always persisted as a whole (replace-on-write); new rules are prepended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub id: i64,
    pub pattern: String,
    pub category_id: String,
    pub sub_category_id: Option<String>,
    pub active: bool,
}

impl CategoryRule {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pattern.trim().is_empty() {
            return Err(ValidationError::EmptyPattern { id: self.id });
        }
        if self.category_id.trim().is_empty() {
            return Err(ValidationError::EmptyCategory { id: self.id });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: i64,
    pub start_date: NaiveDate,
    pub merchant: String,
    pub card_id: i64,
    pub total_amount: i64,
    pub months: u32,
}

impl Installment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_amount < 0 {
            return Err(ValidationError::NegativeInstallmentTotal {
                id: self.id,
                value: self.total_amount,
            });
        }
        if self.months < 2 {
            return Err(ValidationError::InstallmentTooShort {
                id: self.id,
                value: self.months,
            });
        }
        Ok(())
    }
}

/// Process-wide singleton configuration. `start_day_of_month` is capped at 28
/// so every month of every year contains the period boundary day and no
/// clamping logic is ever needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub start_day_of_month: u32,
    pub goal_spending: i64,
    pub income: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_day_of_month: 25,
            goal_spending: 100_000,
            income: 200_000,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=28).contains(&self.start_day_of_month) {
            return Err(ValidationError::StartDayOutOfRange {
                value: self.start_day_of_month,
            });
        }
        if self.goal_spending < 0 {
            return Err(ValidationError::NegativeSetting {
                field: "goal_spending",
                value: self.goal_spending,
            });
        }
        if self.income < 0 {
            return Err(ValidationError::NegativeSetting {
                field: "income",
                value: self.income,
            });
        }
        Ok(())
    }
}
