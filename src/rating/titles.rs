use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ledger::FighterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleStatus {
    Champion { defenses: u32 },
    FormerChampion,
}

impl TitleStatus {
    pub fn label(&self) -> String {
        match self {
            TitleStatus::Champion { defenses } => format!("Champion ({} defenses)", defenses),
            TitleStatus::FormerChampion => "Former Champion".to_string(),
        }
    }
}

/// Title holders per weight class, derived from title fights in ledger order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleRegistry {
    champions: BTreeMap<String, FighterId>,
    defenses: BTreeMap<FighterId, u32>,
    former: BTreeSet<FighterId>,
}

impl TitleRegistry {
    pub fn holds_title(&self, weight_class: &str, fighter: FighterId) -> bool {
        self.champions.get(weight_class) == Some(&fighter)
    }

    /// Applies the winner of a title fight. Draws and no-contests leave the
    /// belt where it is, so callers only invoke this with a winner.
    pub fn crown(&mut self, weight_class: &str, winner: FighterId) {
        match self.champions.insert(weight_class.to_string(), winner) {
            Some(previous) if previous == winner => {
                *self.defenses.entry(winner).or_insert(0) += 1;
            }
            Some(previous) => {
                if !self.champions.values().any(|&c| c == previous) {
                    self.former.insert(previous);
                }
                self.defenses.insert(winner, 0);
            }
            None => {
                self.defenses.insert(winner, 0);
            }
        }
        self.former.remove(&winner);
    }

    pub fn status(&self, fighter: FighterId) -> Option<TitleStatus> {
        if self.champions.values().any(|&c| c == fighter) {
            let defenses = self.defenses.get(&fighter).copied().unwrap_or(0);
            return Some(TitleStatus::Champion { defenses });
        }
        self.former
            .contains(&fighter)
            .then_some(TitleStatus::FormerChampion)
    }

    pub fn champion_of(&self, weight_class: &str) -> Option<FighterId> {
        self.champions.get(weight_class).copied()
    }
}
