// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::commands::resolve_period_arg;
use crate::engine::classify::Classifier;
use crate::models::Transaction;
use crate::store::{Store, next_id};
use crate::utils::{fmt_won, maybe_print_json, parse_amount, parse_datetime, pretty_table};

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
    let date = parse_datetime(sub.get_one::<String>("date").unwrap())?;
    let merchant = sub.get_one::<String>("merchant").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let card_id = sub.get_one::<String>("card").unwrap().trim().parse::<i64>()?;
    let description = sub.get_one::<String>("description").map(|s| s.to_string());

    let cards = store.load_cards()?;
    if !cards.iter().any(|c| c.id == card_id) {
        return Err(anyhow!("Card {} not found", card_id));
    }

    let mut txs = store.load_transactions()?;
    let tx = Transaction {
        id: next_id(txs.iter().map(|t| t.id)),
        date,
        merchant,
        amount,
        card_id,
        description,
    };
    tx.validate()?;

    // Classification is derived at read time, never stored; echo it here so
    // the user sees where the merchant will land.
    let classifier = Classifier::new(&store.load_rules()?);
    let category = classifier.category_of(&tx.merchant).to_string();

    println!(
        "Recorded {} on {} at '{}' (category: {})",
        fmt_won(tx.amount),
        tx.date,
        tx.merchant,
        category
    );
    txs.push(tx);
    store.save_transactions(&txs)?;
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub merchant: String,
    pub amount: i64,
    pub card: String,
    pub category: String,
    pub description: String,
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let all = sub.get_flag("all");
    let card_filter = sub
        .get_one::<String>("card")
        .map(|s| s.trim().parse::<i64>())
        .transpose()?;
    let merchant_filter = sub.get_one::<String>("merchant").map(|s| s.to_lowercase());

    let txs = store.load_transactions()?;
    let cards = store.load_cards()?;
    let classifier = Classifier::new(&store.load_rules()?);
    let period = resolve_period_arg(store, sub)?;

    let mut rows: Vec<TransactionRow> = txs
        .iter()
        .filter(|t| all || period.contains(t.date.date()))
        .filter(|t| card_filter.is_none_or(|id| t.card_id == id))
        .filter(|t| {
            merchant_filter
                .as_ref()
                .is_none_or(|m| t.merchant.to_lowercase().contains(m))
        })
        .map(|t| {
            // A card may be deleted after transactions reference it; show
            // "unknown" rather than failing.
            let card = cards
                .iter()
                .find(|c| c.id == t.card_id)
                .map_or_else(|| "unknown".to_string(), |c| c.name.clone());
            TransactionRow {
                id: t.id,
                date: t.date.to_string(),
                merchant: t.merchant.clone(),
                amount: t.amount,
                card,
                category: classifier.category_of(&t.merchant).to_string(),
                description: t.description.clone().unwrap_or_default(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.clone(),
                r.merchant.clone(),
                fmt_won(r.amount),
                r.card.clone(),
                r.category.clone(),
                r.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Merchant", "Amount", "Card", "Category", "Note"],
            data,
        )
    );
    Ok(())
}

fn rm(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub
        .get_one::<String>("id")
        .unwrap()
        .trim()
        .parse::<i64>()?;
    let mut txs = store.load_transactions()?;
    let before = txs.len();
    txs.retain(|t| t.id != id);
    if txs.len() == before {
        return Err(anyhow!("Transaction {} not found", id));
    }
    store.save_transactions(&txs)?;
    println!("Removed transaction {}", id);
    Ok(())
}
