// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use regex::{Regex, RegexBuilder};

use crate::models::CategoryRule;

/// Sentinel category for merchants no rule matches. Classification is total:
/// every merchant string maps to exactly one category, possibly this one.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug)]
struct CompiledRule {
    regex: Regex,
    category_id: String,
    sub_category_id: Option<String>,
}

/// The outcome of a successful rule match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub category_id: &'a str,
    pub sub_category_id: Option<&'a str>,
}

/// First-match-wins merchant classifier. Patterns are compiled once per rule
/// list, case-insensitive, in list order; classification over thousands of
/// transactions then reuses the compiled set.
///
/// A rule whose pattern fails to compile is skipped at construction, never an
/// error: one bad stored rule must not take classification down. (New rules
/// are validated before they are accepted, so skips only arise from legacy
/// data.) Inactive rules are skipped the same way.
#[derive(Debug)]
pub struct Classifier {
    rules: Vec<CompiledRule>,
}

impl Classifier {
    pub fn new(rules: &[CategoryRule]) -> Self {
        let compiled = rules
            .iter()
            .filter(|r| r.active)
            .filter_map(|r| {
                let regex = RegexBuilder::new(&r.pattern)
                    .case_insensitive(true)
                    .build()
                    .ok()?;
                Some(CompiledRule {
                    regex,
                    category_id: r.category_id.clone(),
                    sub_category_id: r.sub_category_id.clone(),
                })
            })
            .collect();
        Self { rules: compiled }
    }

    /// First rule (in list order) whose pattern matches the merchant, or
    /// `None` when the merchant is uncategorized.
    pub fn classify(&self, merchant: &str) -> Option<RuleMatch<'_>> {
        self.rules
            .iter()
            .find(|r| r.regex.is_match(merchant))
            .map(|r| RuleMatch {
                category_id: &r.category_id,
                sub_category_id: r.sub_category_id.as_deref(),
            })
    }

    /// Total classification: the matching category id or the sentinel.
    pub fn category_of(&self, merchant: &str) -> &str {
        self.classify(merchant)
            .map_or(UNCATEGORIZED, |m| m.category_id)
    }
}
