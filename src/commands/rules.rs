// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use regex::Regex;

use crate::engine::classify::{Classifier, UNCATEGORIZED};
use crate::models::CategoryRule;
use crate::store::{Store, next_id};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern_raw = sub.get_one::<String>("pattern").unwrap();
            let pattern = pattern_raw.trim();
            // Reject bad patterns up front; only legacy stored data may carry
            // an uncompilable one, and the classifier skips those.
            Regex::new(pattern)
                .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;

            let category = sub.get_one::<String>("category").unwrap().trim().to_string();
            let sub_category = sub
                .get_one::<String>("sub-category")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());

            let mut rules = store.load_rules()?;
            let rule = CategoryRule {
                id: next_id(rules.iter().map(|r| r.id)),
                pattern: pattern.to_string(),
                category_id: category,
                sub_category_id: sub_category,
                active: true,
            };
            rule.validate()?;
            println!(
                "Added rule: /{}/ -> {}{}",
                rule.pattern,
                rule.category_id,
                rule.sub_category_id
                    .as_deref()
                    .map(|s| format!(" / {}", s))
                    .unwrap_or_default()
            );
            // New rules take highest priority: prepend, then replace the list.
            rules.insert(0, rule);
            store.save_rules(&rules)?;
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let rules = store.load_rules()?;
            if maybe_print_json(json_flag, jsonl_flag, &rules)? {
                return Ok(());
            }
            let data = rules
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.pattern.clone(),
                        r.category_id.clone(),
                        r.sub_category_id.clone().unwrap_or_default(),
                        if r.active { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["ID", "Pattern", "Category", "Subcategory", "Active"], data)
            );
        }
        Some(("rm", sub)) => {
            let id = sub
                .get_one::<String>("id")
                .unwrap()
                .trim()
                .parse::<i64>()?;
            let mut rules = store.load_rules()?;
            let before = rules.len();
            rules.retain(|r| r.id != id);
            if rules.len() == before {
                return Err(anyhow!("Rule {} not found", id));
            }
            store.save_rules(&rules)?;
            println!("Removed rule {}", id);
        }
        Some(("test", sub)) => {
            let merchant = sub.get_one::<String>("merchant").unwrap();
            let rules = store.load_rules()?;
            let classifier = Classifier::new(&rules);
            match classifier.classify(merchant) {
                Some(m) => println!(
                    "'{}' -> {}{}",
                    merchant,
                    m.category_id,
                    m.sub_category_id
                        .map(|s| format!(" / {}", s))
                        .unwrap_or_default()
                ),
                None => println!("'{}' -> {}", merchant, UNCATEGORIZED),
            }
        }
        _ => {}
    }
    Ok(())
}
