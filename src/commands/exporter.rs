// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use crate::engine::classify::Classifier;
use crate::store::Store;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut txs = store.load_transactions()?;
    txs.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    let cards = store.load_cards()?;
    let classifier = Classifier::new(&store.load_rules()?);
    let card_name = |id: i64| {
        cards
            .iter()
            .find(|c| c.id == id)
            .map_or_else(|| "unknown".to_string(), |c| c.name.clone())
    };

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "merchant", "amount", "card", "category", "description"])?;
            for t in &txs {
                wtr.write_record([
                    t.date.to_string(),
                    t.merchant.clone(),
                    t.amount.to_string(),
                    card_name(t.card_id),
                    classifier.category_of(&t.merchant).to_string(),
                    t.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<serde_json::Value> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date,
                        "merchant": t.merchant,
                        "amount": t.amount,
                        "card": card_name(t.card_id),
                        "category": classifier.category_of(&t.merchant),
                        "description": t.description,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
