// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};

use crate::models::{Card, PerformanceTier};
use crate::store::{Store, next_id};
use crate::utils::{fmt_won, maybe_print_json, parse_amount, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_tier(raw: &str) -> Result<PerformanceTier> {
    let (amount, benefit) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid tier '{}', expected AMOUNT:BENEFIT", raw))?;
    Ok(PerformanceTier {
        amount: parse_amount(amount)?,
        benefit: benefit.trim().to_string(),
    })
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let credit_limit = parse_amount(sub.get_one::<String>("limit").unwrap())?;
    let due_day = *sub.get_one::<u32>("due-day").unwrap();
    let performance = sub
        .get_many::<String>("tier")
        .unwrap_or_default()
        .map(|t| parse_tier(t))
        .collect::<Result<Vec<_>>>()?;

    let mut cards = store.load_cards()?;
    let card = Card {
        id: next_id(cards.iter().map(|c| c.id)),
        name,
        credit_limit,
        due_day,
        performance,
    };
    card.validate()?;
    cards.push(card);
    store.save_cards(&cards)?;
    let added = cards.last().context("card list empty after append")?;
    println!("Added card '{}' (id {})", added.name, added.id);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let cards = store.load_cards()?;
    if maybe_print_json(json_flag, jsonl_flag, &cards)? {
        return Ok(());
    }
    let rows = cards
        .iter()
        .map(|c| {
            let tiers = c
                .performance
                .iter()
                .map(|t| format!("{}: {}", fmt_won(t.amount), t.benefit))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                c.id.to_string(),
                c.name.clone(),
                fmt_won(c.credit_limit),
                c.due_day.to_string(),
                tiers,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Limit", "Due Day", "Tiers"], rows)
    );
    Ok(())
}

fn rm(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub
        .get_one::<String>("id")
        .unwrap()
        .trim()
        .parse::<i64>()?;
    let mut cards = store.load_cards()?;
    let before = cards.len();
    cards.retain(|c| c.id != id);
    if cards.len() == before {
        return Err(anyhow!("Card {} not found", id));
    }
    store.save_cards(&cards)?;
    println!("Removed card {}", id);
    Ok(())
}
