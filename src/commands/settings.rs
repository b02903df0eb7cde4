// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::store::Store;
use crate::utils::{fmt_won, maybe_print_json, parse_amount, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let settings = store.load_settings()?;
            if maybe_print_json(json_flag, jsonl_flag, &settings)? {
                return Ok(());
            }
            let rows = vec![
                vec![
                    "start_day_of_month".to_string(),
                    settings.start_day_of_month.to_string(),
                ],
                vec!["goal_spending".to_string(), fmt_won(settings.goal_spending)],
                vec!["income".to_string(), fmt_won(settings.income)],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set", sub)) => {
            let mut settings = store.load_settings()?;
            if let Some(day) = sub.get_one::<u32>("start-day") {
                settings.start_day_of_month = *day;
            }
            if let Some(goal) = sub.get_one::<String>("goal") {
                settings.goal_spending = parse_amount(goal)?;
            }
            if let Some(income) = sub.get_one::<String>("income") {
                settings.income = parse_amount(income)?;
            }
            settings.validate()?;
            store.save_settings(&settings)?;
            println!(
                "Settings updated: start day {}, goal {}, income {}",
                settings.start_day_of_month,
                fmt_won(settings.goal_spending),
                fmt_won(settings.income)
            );
        }
        _ => {}
    }
    Ok(())
}
