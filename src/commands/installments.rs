// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::commands::reference_date;
use crate::engine::installment::{InstallmentStatus, active_summary, amortize};
use crate::models::Installment;
use crate::store::{Store, next_id};
use crate::utils::{fmt_won, maybe_print_json, parse_amount, parse_date, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let start_date = parse_date(sub.get_one::<String>("start-date").unwrap())?;
    let merchant = sub.get_one::<String>("merchant").unwrap().trim().to_string();
    let card_id = sub.get_one::<String>("card").unwrap().trim().parse::<i64>()?;
    let total_amount = parse_amount(sub.get_one::<String>("total").unwrap())?;
    let months = *sub.get_one::<u32>("months").unwrap();

    let cards = store.load_cards()?;
    if !cards.iter().any(|c| c.id == card_id) {
        return Err(anyhow!("Card {} not found", card_id));
    }

    let mut installments = store.load_installments()?;
    let inst = Installment {
        id: next_id(installments.iter().map(|i| i.id)),
        start_date,
        merchant,
        card_id,
        total_amount,
        months,
    };
    inst.validate()?;
    println!(
        "Added installment '{}': {} over {} months from {}",
        inst.merchant,
        fmt_won(inst.total_amount),
        inst.months,
        inst.start_date
    );
    installments.push(inst);
    store.save_installments(&installments)?;
    Ok(())
}

#[derive(Serialize)]
struct InstallmentRow {
    merchant: String,
    months: u32,
    #[serde(flatten)]
    status: InstallmentStatus,
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = reference_date(sub)?;
    let installments = store.load_installments()?;

    let rows: Vec<InstallmentRow> = installments
        .iter()
        .map(|i| InstallmentRow {
            merchant: i.merchant.clone(),
            months: i.months,
            status: amortize(i, today),
        })
        .collect();
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }

    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.status.installment_id.to_string(),
                r.merchant.clone(),
                format!("{}/{}", r.status.current_round, r.months),
                fmt_won(r.status.monthly_amount),
                fmt_won(r.status.paid_amount),
                fmt_won(r.status.remaining_amount),
                format!("{:.0}%", r.status.progress_percent),
                if r.status.is_finished { "done" } else { "active" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Merchant", "Round", "Monthly", "Paid", "Remaining", "Progress", "State"],
            data,
        )
    );

    let summary = active_summary(&installments, today);
    println!(
        "{} active plan(s): {} remaining, {} due monthly",
        summary.active_count,
        fmt_won(summary.total_remaining),
        fmt_won(summary.total_monthly)
    );
    Ok(())
}

fn rm(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub
        .get_one::<String>("id")
        .unwrap()
        .trim()
        .parse::<i64>()?;
    let mut installments = store.load_installments()?;
    let before = installments.len();
    installments.retain(|i| i.id != id);
    if installments.len() == before {
        return Err(anyhow!("Installment {} not found", id));
    }
    store.save_installments(&installments)?;
    println!("Removed installment {}", id);
    Ok(())
}
