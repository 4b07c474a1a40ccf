use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::errors::{RatingError, RatingResult};
use crate::ledger::{Fighter, FighterId};
use crate::rating::{FighterRatingState, RatingBook, TitleRegistry};

/// Immutable point-in-time view of every fighter's rating state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    book: RatingBook,
    roster: BTreeMap<FighterId, Fighter>,
    names: HashMap<String, FighterId>,
    version: u64,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            book: RatingBook::default(),
            roster: BTreeMap::new(),
            names: HashMap::new(),
            version: 0,
        }
    }

    pub(crate) fn build(
        book: RatingBook,
        roster: BTreeMap<FighterId, Fighter>,
        version: u64,
    ) -> RatingResult<Self> {
        let mut names = HashMap::with_capacity(roster.len());
        for fighter in roster.values() {
            if let Some(other) = names.insert(name_key(&fighter.name), fighter.id) {
                return Err(RatingError::validation(
                    format!("fighter {}", fighter.id),
                    format!("name '{}' is already used by fighter {}", fighter.name, other),
                ));
            }
        }

        Ok(Self {
            book,
            roster,
            names,
            version,
        })
    }

    /// Rating state of a fighter that has at least one ledger entry.
    pub fn state(&self, fighter: FighterId) -> RatingResult<&FighterRatingState> {
        self.book
            .state(fighter)
            .ok_or_else(|| RatingError::not_found(fighter.to_string()))
    }

    pub fn states(&self) -> impl Iterator<Item = &FighterRatingState> {
        self.book.states()
    }

    pub fn name_of(&self, id: FighterId) -> &str {
        self.roster
            .get(&id)
            .map(|f| f.name.as_str())
            .unwrap_or("Unknown Fighter")
    }

    /// Exact name lookup, ignoring ASCII case.
    pub fn resolve_name(&self, name: &str) -> RatingResult<FighterId> {
        self.names
            .get(&name_key(name))
            .copied()
            .ok_or_else(|| RatingError::not_found(name))
    }

    pub fn roster(&self) -> &BTreeMap<FighterId, Fighter> {
        &self.roster
    }

    pub fn titles(&self) -> &TitleRegistry {
        self.book.titles()
    }

    pub(crate) fn book(&self) -> &RatingBook {
        &self.book
    }

    pub fn fighter_count(&self) -> usize {
        self.book.fighter_count()
    }

    pub fn bouts_processed(&self) -> usize {
        self.book.bouts_processed()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Date of the last bout replayed into this snapshot.
    pub fn latest_bout_date(&self) -> Option<NaiveDate> {
        self.book.last_key().map(|key| key.date)
    }
}

/// Same folding as the `COLLATE NOCASE` fighter names column.
fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> BTreeMap<FighterId, Fighter> {
        names
            .iter()
            .zip(1..)
            .map(|(name, id)| {
                (
                    id,
                    Fighter {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn names_differing_outside_ascii_are_distinct() {
        let snapshot = Snapshot::build(RatingBook::default(), roster(&["Émile", "émile"]), 1).unwrap();
        assert_eq!(snapshot.resolve_name("Émile").unwrap(), 1);
        assert_eq!(snapshot.resolve_name("émile").unwrap(), 2);
        assert!(snapshot.resolve_name("ÉMILE").unwrap_err().is_not_found());
    }

    #[test]
    fn ascii_case_collisions_are_rejected() {
        assert!(Snapshot::build(RatingBook::default(), roster(&["Ann", "ANN"]), 1).is_err());
    }

    #[test]
    fn empty_snapshot_has_no_latest_bout() {
        assert_eq!(Snapshot::empty().latest_bout_date(), None);
    }
}
