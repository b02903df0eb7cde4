// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::commands::{reference_date, resolve_period_arg};
use crate::engine::aggregate::{
    WEEKDAY_LABELS, by_category, by_time_slot, by_weekday, card_usage, high_value, top_merchants,
    total_spent,
};
use crate::engine::classify::Classifier;
use crate::engine::{goal, recurring};
use crate::store::Store;
use crate::utils::{fmt_won, maybe_print_json, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("goal", sub)) => goal_report(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        Some(("merchants", sub)) => merchants(store, sub)?,
        Some(("highvalue", sub)) => highvalue(store, sub)?,
        Some(("weekday", sub)) => weekday(store, sub)?,
        Some(("timeslots", sub)) => timeslots(store, sub)?,
        Some(("cards", sub)) => cards(store, sub)?,
        Some(("fixed", sub)) => fixed(store, sub)?,
        Some(("upcoming", sub)) => upcoming(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn goal_report(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let settings = store.load_settings()?;
    let period = resolve_period_arg(store, sub)?;
    let today = reference_date(sub)?;
    let txs = store.load_transactions()?;

    let spent = total_spent(&txs, &period);
    let progress = goal::compute(&period, settings.goal_spending, spent, today);
    if maybe_print_json(json_flag, jsonl_flag, &progress)? {
        return Ok(());
    }

    println!("Period {} .. {} (exclusive)", period.start, period.end);
    println!(
        "Day {}/{} | spent {} of {} ({:.1}%, plan says {:.1}%)",
        progress.days_passed,
        progress.total_days,
        fmt_won(progress.spent),
        fmt_won(progress.goal),
        progress.current_progress_percent,
        progress.expected_progress_percent
    );
    let pace = if progress.is_over_spent { "over" } else { "under" };
    println!(
        "Plan-to-date {} | {} by {}",
        fmt_won(progress.expected_spent as i64),
        pace,
        fmt_won(progress.diff.abs() as i64)
    );
    println!(
        "Daily budget {} | actual daily average {} | remaining daily budget {}",
        fmt_won(progress.daily_budget as i64),
        fmt_won(progress.actual_daily_average as i64),
        fmt_won(progress.remaining_daily_budget as i64)
    );
    println!(
        "Projected period total {} ({:.1}% of goal)",
        fmt_won(progress.projected_total_spending as i64),
        progress.projected_total_percent
    );
    if progress.is_total_over_spent {
        println!("Goal exceeded.");
    }
    Ok(())
}

fn categories(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = resolve_period_arg(store, sub)?;
    let txs = store.load_transactions()?;
    let classifier = Classifier::new(&store.load_rules()?);

    let spend = by_category(&txs, &period, &classifier);
    if maybe_print_json(json_flag, jsonl_flag, &spend)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for cat in &spend {
        data.push(vec![cat.category_id.clone(), String::new(), fmt_won(cat.total)]);
        for sc in &cat.sub_categories {
            data.push(vec![
                String::new(),
                sc.sub_category_id.clone().unwrap_or_else(|| "-".to_string()),
                fmt_won(sc.total),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Category", "Subcategory", "Spent"], data)
    );
    Ok(())
}

fn merchants(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let period = resolve_period_arg(store, sub)?;
    let txs = store.load_transactions()?;

    let ranking = top_merchants(&txs, &period, limit);
    if maybe_print_json(json_flag, jsonl_flag, &ranking)? {
        return Ok(());
    }
    let data = ranking
        .entries
        .iter()
        .map(|e| {
            vec![
                e.merchant.clone(),
                fmt_won(e.total),
                format!("{:.1}%", e.percent),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Merchant", "Spent", "Share"], data));
    if !ranking.entries.is_empty() {
        println!("Others: {:.1}%", ranking.remainder_percent);
    }
    Ok(())
}

fn highvalue(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let period = resolve_period_arg(store, sub)?;
    let txs = store.load_transactions()?;

    let entries = high_value(&txs, &period, limit);
    if maybe_print_json(json_flag, jsonl_flag, &entries)? {
        return Ok(());
    }
    if entries.is_empty() {
        println!("No high-value expenses this period.");
        return Ok(());
    }
    let data = entries
        .iter()
        .map(|e| {
            vec![
                e.transaction.date.format("%Y-%m-%d %H:%M").to_string(),
                e.transaction.merchant.clone(),
                fmt_won(e.transaction.amount.abs()),
                if e.flagged { "!".to_string() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Merchant", "Amount", "Alert"], data)
    );
    Ok(())
}

fn weekday(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = resolve_period_arg(store, sub)?;
    let txs = store.load_transactions()?;

    let spend = by_weekday(&txs, &period);
    if maybe_print_json(json_flag, jsonl_flag, &spend)? {
        return Ok(());
    }
    let data = WEEKDAY_LABELS
        .iter()
        .zip(spend.totals.iter())
        .map(|(label, total)| vec![label.to_string(), fmt_won(*total)])
        .collect();
    println!("{}", pretty_table(&["Weekday", "Spent"], data));
    if let Some(idx) = spend.dominant {
        println!("Heaviest day: {}", WEEKDAY_LABELS[idx]);
    }
    Ok(())
}

fn timeslots(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = resolve_period_arg(store, sub)?;
    let txs = store.load_transactions()?;

    let slots = by_time_slot(&txs, &period);
    if maybe_print_json(json_flag, jsonl_flag, &slots)? {
        return Ok(());
    }
    let data = slots
        .iter()
        .map(|s| vec![s.label.to_string(), fmt_won(s.total)])
        .collect();
    println!("{}", pretty_table(&["Slot", "Spent"], data));
    Ok(())
}

fn cards(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = resolve_period_arg(store, sub)?;
    let txs = store.load_transactions()?;
    let cards = store.load_cards()?;

    let usage = card_usage(&cards, &txs, &period);
    if maybe_print_json(json_flag, jsonl_flag, &usage)? {
        return Ok(());
    }
    let data = usage
        .iter()
        .map(|u| {
            let next = u.next_tier.as_ref().map_or_else(
                || "-".to_string(),
                |t| format!("{} ({} to go)", t.benefit, fmt_won(t.gap)),
            );
            vec![
                u.name.clone(),
                fmt_won(u.used),
                format!("{:.1}%", u.limit_percent),
                fmt_won(u.remaining_limit),
                u.achieved_tiers.len().to_string(),
                next,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Card", "Used", "Of Limit", "Remaining", "Tiers Hit", "Next Tier"],
            data,
        )
    );
    Ok(())
}

fn fixed(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = resolve_period_arg(store, sub)?;
    let today = reference_date(sub)?;
    let txs = store.load_transactions()?;

    let profiles = recurring::detect(&txs, today);
    let report = recurring::fixed_in_period(&txs, &period, &profiles);
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    let data = report
        .entries
        .iter()
        .map(|e| {
            let kind = if e.profile.is_variable { "variable" } else { "fixed" };
            let range = if e.profile.is_variable {
                format!(
                    "{} .. {} (avg {})",
                    fmt_won(e.profile.min),
                    fmt_won(e.profile.max),
                    fmt_won(e.profile.avg.round() as i64)
                )
            } else {
                fmt_won(e.profile.avg.round() as i64)
            };
            vec![
                e.transaction.date.date().to_string(),
                e.transaction.merchant.clone(),
                fmt_won(e.transaction.amount.abs()),
                kind.to_string(),
                range,
                format!("{} in last 6 months", e.profile.recent_count),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Merchant", "Amount", "Kind", "History", "Recency"],
            data,
        )
    );
    println!(
        "Recurring spend {} of {} period total ({:.1}%)",
        fmt_won(report.fixed_total),
        fmt_won(report.period_total),
        report.fixed_percent
    );
    Ok(())
}

fn upcoming(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = resolve_period_arg(store, sub)?;
    let today = reference_date(sub)?;
    let txs = store.load_transactions()?;

    let bills = recurring::upcoming_bills(&txs, &period, today);
    if maybe_print_json(json_flag, jsonl_flag, &bills)? {
        return Ok(());
    }
    if bills.is_empty() {
        println!("No upcoming bills left in this period.");
        return Ok(());
    }
    let data = bills
        .iter()
        .map(|b| {
            let due = if b.overdue {
                format!("overdue {}d", b.d_day.abs())
            } else if b.d_day == 0 {
                "today".to_string()
            } else {
                format!("D-{}", b.d_day)
            };
            vec![
                b.merchant.clone(),
                b.expected_date.to_string(),
                format!("~{}", fmt_won(b.expected_amount)),
                due,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Merchant", "Expected Date", "Expected Amount", "Due"], data)
    );
    Ok(())
}
