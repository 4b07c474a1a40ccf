pub mod models;
pub mod record;

pub use models::{
    pair_outcome, Bout, BoutId, BoutOutcome, FightResult, Fighter, FighterId, OrderKey, Outcome,
};
pub use record::{LedgerRecord, ParsedBout};

use std::collections::BTreeMap;

/// Roster plus the bouts fought between its fighters.
///
/// The ledger is the only input of a rebuild. It is append-only: bouts are
/// never edited once recorded.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    fighters: BTreeMap<FighterId, Fighter>,
    bouts: Vec<Bout>,
}

impl Ledger {
    pub fn new(fighters: impl IntoIterator<Item = Fighter>, bouts: Vec<Bout>) -> Self {
        Self {
            fighters: fighters.into_iter().map(|f| (f.id, f)).collect(),
            bouts,
        }
    }

    pub fn fighters(&self) -> &BTreeMap<FighterId, Fighter> {
        &self.fighters
    }

    pub fn bouts(&self) -> &[Bout] {
        &self.bouts
    }

    pub fn add_fighter(&mut self, fighter: Fighter) {
        self.fighters.insert(fighter.id, fighter);
    }

    pub fn append(&mut self, bout: Bout) {
        self.bouts.push(bout);
    }

    pub fn len(&self) -> usize {
        self.bouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bouts.is_empty()
    }
}
