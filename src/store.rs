// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Card, CategoryRule, Installment, Settings, Transaction};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Cardclip", "cardclip"));

const TRANSACTIONS_FILE: &str = "transactions.json";
const CARDS_FILE: &str = "cards.json";
const RULES_FILE: &str = "rules.json";
const INSTALLMENTS_FILE: &str = "installments.json";
const SETTINGS_FILE: &str = "settings.json";

/// Whole-document JSON store: one file per record kind, read and written in
/// full. There is no row-level update; every mutation is a load, edit in
/// memory, save-all cycle. Concurrent writers race last-writer-wins — a known
/// limitation of the storage contract, not something the engine coordinates.
pub struct Store {
    dir: PathBuf,
}

pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CARDCLIP_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

impl Store {
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir()?)
    }

    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
    }

    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let list: Vec<Transaction> = self.load_list(TRANSACTIONS_FILE)?;
        for tx in &list {
            tx.validate()
                .with_context(|| format!("Invalid stored data in {}", TRANSACTIONS_FILE))?;
        }
        Ok(list)
    }

    pub fn save_transactions(&self, list: &[Transaction]) -> Result<()> {
        self.save_json(TRANSACTIONS_FILE, &list)
    }

    pub fn load_cards(&self) -> Result<Vec<Card>> {
        let list: Vec<Card> = self.load_list(CARDS_FILE)?;
        for card in &list {
            card.validate()
                .with_context(|| format!("Invalid stored data in {}", CARDS_FILE))?;
        }
        Ok(list)
    }

    pub fn save_cards(&self, list: &[Card]) -> Result<()> {
        self.save_json(CARDS_FILE, &list)
    }

    pub fn load_rules(&self) -> Result<Vec<CategoryRule>> {
        let list: Vec<CategoryRule> = self.load_list(RULES_FILE)?;
        for rule in &list {
            rule.validate()
                .with_context(|| format!("Invalid stored data in {}", RULES_FILE))?;
        }
        Ok(list)
    }

    pub fn save_rules(&self, list: &[CategoryRule]) -> Result<()> {
        self.save_json(RULES_FILE, &list)
    }

    pub fn load_installments(&self) -> Result<Vec<Installment>> {
        let list: Vec<Installment> = self.load_list(INSTALLMENTS_FILE)?;
        for inst in &list {
            inst.validate()
                .with_context(|| format!("Invalid stored data in {}", INSTALLMENTS_FILE))?;
        }
        Ok(list)
    }

    pub fn save_installments(&self, list: &[Installment]) -> Result<()> {
        self.save_json(INSTALLMENTS_FILE, &list)
    }

    pub fn load_settings(&self) -> Result<Settings> {
        let path = self.dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("Invalid stored data in {}", SETTINGS_FILE))?;
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save_json(SETTINGS_FILE, settings)
    }
}

/// Next append id: max existing + 1, starting at 1 on an empty list.
pub fn next_id(existing: impl IntoIterator<Item = i64>) -> i64 {
    existing.into_iter().max().unwrap_or(0) + 1
}
