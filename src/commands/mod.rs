// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::engine::period::{self, Period};
use crate::store::Store;
use crate::utils::parse_date;

pub mod cards;
pub mod exporter;
pub mod installments;
pub mod reports;
pub mod rules;
pub mod settings;
pub mod transactions;

/// Reference date for period resolution: `--date` when given, else today.
pub(crate) fn reference_date(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// Resolve the billing period containing the reference date, using the
/// configured start day of month.
pub(crate) fn resolve_period_arg(store: &Store, sub: &clap::ArgMatches) -> Result<Period> {
    let settings = store.load_settings()?;
    period::resolve(reference_date(sub)?, settings.start_day_of_month)
}
