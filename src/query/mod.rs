use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

use crate::errors::{RatingError, RatingResult};
use crate::ledger::FighterId;
use crate::rating::{FighterRatingState, RatingEvent, Record, TitleStatus};
use crate::store::{RatingStore, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardKind {
    Current,
    Peak,
}

impl LeaderboardKind {
    /// JSON field the rating is published under.
    pub fn field_name(&self) -> &'static str {
        match self {
            LeaderboardKind::Current => "Elo",
            LeaderboardKind::Peak => "Peak Elo",
        }
    }

    fn value_of(&self, state: &FighterRatingState) -> f64 {
        match self {
            LeaderboardKind::Current => state.current_rating,
            LeaderboardKind::Peak => state.peak_rating,
        }
    }
}

/// A rating value together with which rating it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedRating {
    pub kind: LeaderboardKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub fighter: FighterId,
    pub name: String,
    pub record: Record,
    pub rating: TaggedRating,
    pub weight_class: Option<String>,
    pub status: Option<TitleStatus>,
    pub last_fight: Option<NaiveDate>,
}

impl Serialize for LeaderboardEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Fighter", &self.name)?;
        map.serialize_entry("Record", &self.record.to_string())?;
        map.serialize_entry(self.rating.kind.field_name(), &self.rating.value)?;
        if let Some(wc) = &self.weight_class {
            map.serialize_entry("Weight Class", wc)?;
        }
        if let Some(status) = &self.status {
            map.serialize_entry("Status", &status.label())?;
        }
        if let Some(date) = &self.last_fight {
            map.serialize_entry("Last_Fight", &date.format("%Y-%m-%d").to_string())?;
        }
        map.end()
    }
}

/// Fighters whose last bout is this many days or more before the latest bout
/// in the ledger count as retired.
pub const RETIREMENT_THRESHOLD_DAYS: i64 = 730;

#[derive(Debug, Clone)]
pub struct LeaderboardFilter {
    /// Case-insensitive substring of the fighter name.
    pub search: Option<String>,
    /// Case-insensitive weight class of the fighter's latest bout.
    pub weight_class: Option<String>,
    /// Retirement cutoff in days, current board only. `None` keeps everyone.
    pub retired_after_days: Option<i64>,
}

impl Default for LeaderboardFilter {
    fn default() -> Self {
        Self {
            search: None,
            weight_class: None,
            retired_after_days: Some(RETIREMENT_THRESHOLD_DAYS),
        }
    }
}

impl LeaderboardFilter {
    fn is_active(&self, state: &FighterRatingState, latest: Option<NaiveDate>) -> bool {
        match (self.retired_after_days, state.last_fight, latest) {
            (Some(days), Some(last), Some(latest)) => (latest - last).num_days() < days,
            _ => true,
        }
    }

    fn matches(&self, name: &str, state: &FighterRatingState) -> bool {
        let name_ok = match &self.search {
            Some(needle) => name.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        let class_ok = match &self.weight_class {
            Some(wanted) => state
                .weight_class
                .as_deref()
                .is_some_and(|wc| wc.eq_ignore_ascii_case(wanted)),
            None => true,
        };
        name_ok && class_ok
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub event: RatingEvent,
    pub opponent_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FighterTrend {
    pub fighter: FighterId,
    pub name: String,
    pub points: Vec<TrendPoint>,
}

/// Read-only projections over the current rating snapshot. Every call works
/// on a single snapshot.
pub struct QueryService {
    store: Arc<RatingStore>,
}

impl QueryService {
    pub fn new(store: Arc<RatingStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RatingStore> {
        &self.store
    }

    pub fn leaderboard(&self, kind: LeaderboardKind, limit: usize) -> Vec<LeaderboardEntry> {
        self.leaderboard_filtered(kind, &LeaderboardFilter::default(), limit)
    }

    /// Fighters sorted by the requested rating, highest first, ties broken by
    /// fighter id. Filters apply before truncation.
    pub fn leaderboard_filtered(
        &self,
        kind: LeaderboardKind,
        filter: &LeaderboardFilter,
        limit: usize,
    ) -> Vec<LeaderboardEntry> {
        let snapshot = self.store.snapshot();
        let latest = snapshot.latest_bout_date();

        let mut entries: Vec<LeaderboardEntry> = snapshot
            .states()
            .filter(|state| filter.matches(snapshot.name_of(state.fighter), state))
            .filter(|state| kind == LeaderboardKind::Peak || filter.is_active(state, latest))
            .map(|state| entry(&snapshot, state, kind))
            .collect();

        entries.sort_by(|a, b| {
            b.rating
                .value
                .total_cmp(&a.rating.value)
                .then(a.fighter.cmp(&b.fighter))
        });
        entries.truncate(limit);
        entries
    }

    pub fn fighter_by_name(&self, name: &str) -> RatingResult<FighterId> {
        let snapshot = self.store.snapshot();
        let id = snapshot.resolve_name(name)?;
        // A rostered fighter without bouts has nothing to show.
        snapshot
            .state(id)
            .map(|_| id)
            .map_err(|_| RatingError::not_found(name))
    }

    /// Current rating row of one fighter.
    pub fn summary(&self, fighter: FighterId) -> RatingResult<LeaderboardEntry> {
        let snapshot = self.store.snapshot();
        let state = snapshot.state(fighter)?;
        Ok(entry(&snapshot, state, LeaderboardKind::Current))
    }

    pub fn trend(&self, fighter: FighterId) -> RatingResult<FighterTrend> {
        let snapshot = self.store.snapshot();
        let state = snapshot.state(fighter)?;
        Ok(trend_of(&snapshot, state))
    }

    pub fn trend_by_name(&self, name: &str) -> RatingResult<FighterTrend> {
        let snapshot = self.store.snapshot();
        let id = snapshot.resolve_name(name)?;
        let state = snapshot
            .state(id)
            .map_err(|_| RatingError::not_found(name))?;
        Ok(trend_of(&snapshot, state))
    }
}

fn entry(snapshot: &Snapshot, state: &FighterRatingState, kind: LeaderboardKind) -> LeaderboardEntry {
    LeaderboardEntry {
        fighter: state.fighter,
        name: snapshot.name_of(state.fighter).to_string(),
        record: state.record,
        rating: TaggedRating {
            kind,
            value: kind.value_of(state),
        },
        weight_class: state.weight_class.clone(),
        status: match kind {
            LeaderboardKind::Current => snapshot.titles().status(state.fighter),
            LeaderboardKind::Peak => None,
        },
        last_fight: match kind {
            LeaderboardKind::Current => state.last_fight,
            LeaderboardKind::Peak => None,
        },
    }
}

fn trend_of(snapshot: &Snapshot, state: &FighterRatingState) -> FighterTrend {
    FighterTrend {
        fighter: state.fighter,
        name: snapshot.name_of(state.fighter).to_string(),
        points: state
            .history
            .iter()
            .map(|event| TrendPoint {
                opponent_name: snapshot.name_of(event.context.opponent).to_string(),
                event: event.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::RatingSettings;
    use crate::ledger::{Bout, BoutOutcome, Fighter, Ledger};
    use chrono::NaiveDate;

    fn service(fighters: &[(FighterId, &str)], bouts: Vec<Bout>) -> QueryService {
        let store = Arc::new(RatingStore::new(RatingSettings::default()));
        let roster = fighters.iter().map(|&(id, name)| Fighter {
            id,
            name: name.to_string(),
        });
        store.rebuild(&Ledger::new(roster, bouts)).unwrap();
        QueryService::new(store)
    }

    fn bout(id: i64, day: u32, a: FighterId, b: FighterId, outcome: BoutOutcome, wc: &str) -> Bout {
        Bout {
            id,
            event: format!("UFC {}", 300 + day),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            bout_order: 0,
            weight_class: Some(wc.to_string()),
            fighter_a: a,
            fighter_b: b,
            outcome,
            method: "U-DEC".to_string(),
            round: Some(3),
            title_fight: false,
        }
    }

    #[test]
    fn current_leaderboard_sorts_descending() {
        let qs = service(
            &[(1, "Ann"), (2, "Bea"), (3, "Cat")],
            vec![
                bout(1, 1, 1, 2, BoutOutcome::FighterAWins, "Flyweight"),
                bout(2, 2, 3, 2, BoutOutcome::FighterAWins, "Flyweight"),
            ],
        );
        let board = qs.leaderboard(LeaderboardKind::Current, 10);
        let order: Vec<FighterId> = board.iter().map(|e| e.fighter).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert!(board.windows(2).all(|w| w[0].rating.value >= w[1].rating.value));
    }

    #[test]
    fn ties_break_on_fighter_id_and_limit_truncates() {
        let qs = service(
            &[(4, "Dee"), (2, "Bea"), (3, "Cat"), (1, "Ann")],
            vec![
                bout(1, 1, 4, 3, BoutOutcome::FighterAWins, "Flyweight"),
                bout(2, 2, 2, 1, BoutOutcome::FighterAWins, "Flyweight"),
            ],
        );
        let board = qs.leaderboard(LeaderboardKind::Current, 3);
        let order: Vec<FighterId> = board.iter().map(|e| e.fighter).collect();
        assert_eq!(order, vec![2, 4, 1]);
    }

    #[test]
    fn peak_board_uses_peak_rating() {
        let qs = service(
            &[(1, "Ann"), (2, "Bea")],
            vec![
                bout(1, 1, 1, 2, BoutOutcome::FighterAWins, "Flyweight"),
                bout(2, 2, 1, 2, BoutOutcome::FighterBWins, "Flyweight"),
            ],
        );
        let board = qs.leaderboard(LeaderboardKind::Peak, 10);
        assert_eq!(board[0].fighter, 1);
        assert_eq!(board[0].rating.kind, LeaderboardKind::Peak);
        assert_eq!(board[0].rating.value, 1516.0);
    }

    #[test]
    fn filters_apply_before_limit() {
        let qs = service(
            &[(1, "Ann Smith"), (2, "Bea Jones"), (3, "Cat Smith"), (4, "Dee Jones")],
            vec![
                bout(1, 1, 1, 2, BoutOutcome::FighterAWins, "Flyweight"),
                bout(2, 2, 3, 4, BoutOutcome::FighterAWins, "Bantamweight"),
            ],
        );
        let filter = LeaderboardFilter {
            search: Some("smith".to_string()),
            weight_class: Some("bantamweight".to_string()),
            ..Default::default()
        };
        let board = qs.leaderboard_filtered(LeaderboardKind::Current, &filter, 1);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "Cat Smith");
    }

    #[test]
    fn trend_lists_events_with_opponent_names() {
        let qs = service(
            &[(1, "Ann"), (2, "Bea")],
            vec![
                bout(2, 2, 2, 1, BoutOutcome::Draw, "Flyweight"),
                bout(1, 1, 1, 2, BoutOutcome::FighterAWins, "Flyweight"),
            ],
        );
        let trend = qs.trend_by_name("ANN").unwrap();
        assert_eq!(trend.fighter, 1);
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].event.bout, 1);
        assert_eq!(trend.points[0].opponent_name, "Bea");
        assert_eq!(
            trend.points[1].event.rating_before,
            trend.points[0].event.rating_after
        );
    }

    #[test]
    fn absent_fighter_is_not_found() {
        let qs = service(
            &[(1, "Ann"), (2, "Bea"), (3, "Idle")],
            vec![bout(1, 1, 1, 2, BoutOutcome::FighterAWins, "Flyweight")],
        );
        assert!(qs.trend(99).unwrap_err().is_not_found());
        assert!(qs.trend_by_name("Idle").unwrap_err().is_not_found());
        assert!(qs.fighter_by_name("Idle").unwrap_err().is_not_found());
        assert!(qs.summary(3).unwrap_err().is_not_found());
    }

    #[test]
    fn entry_serializes_rating_under_its_kind() {
        let qs = service(
            &[(1, "Ann"), (2, "Bea")],
            vec![bout(1, 1, 1, 2, BoutOutcome::FighterAWins, "Flyweight")],
        );
        let current = serde_json::to_value(&qs.leaderboard(LeaderboardKind::Current, 1)[0]).unwrap();
        assert_eq!(current["Fighter"], "Ann");
        assert_eq!(current["Record"], "1-0-0");
        assert_eq!(current["Elo"], 1516.0);
        assert!(current.get("Peak Elo").is_none());

        assert_eq!(current["Last_Fight"], "2024-03-01");

        let peak = serde_json::to_value(&qs.leaderboard(LeaderboardKind::Peak, 1)[0]).unwrap();
        assert_eq!(peak["Peak Elo"], 1516.0);
        assert!(peak.get("Elo").is_none());
        assert!(peak.get("Last_Fight").is_none());
    }

    #[test]
    fn retired_fighters_leave_the_current_board() {
        let mut comeback = bout(2, 1, 2, 3, BoutOutcome::FighterAWins, "Flyweight");
        comeback.date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut last_call = bout(3, 1, 3, 4, BoutOutcome::Draw, "Flyweight");
        last_call.date = NaiveDate::from_ymd_opt(2022, 3, 2).unwrap();
        let qs = service(
            &[(1, "Ann"), (2, "Bea"), (3, "Cat"), (4, "Dee")],
            vec![
                bout(1, 1, 1, 2, BoutOutcome::FighterAWins, "Flyweight"),
                last_call,
                comeback,
            ],
        );

        // Ann's last bout is exactly two years before the latest one.
        let current: Vec<FighterId> = qs
            .leaderboard(LeaderboardKind::Current, 10)
            .iter()
            .map(|e| e.fighter)
            .collect();
        assert!(!current.contains(&1));
        assert!(current.contains(&2));
        assert!(current.contains(&3));
        assert!(!current.contains(&4));

        assert_eq!(qs.leaderboard(LeaderboardKind::Peak, 10).len(), 4);

        let everyone = LeaderboardFilter {
            retired_after_days: None,
            ..Default::default()
        };
        assert_eq!(
            qs.leaderboard_filtered(LeaderboardKind::Current, &everyone, 10).len(),
            4
        );
    }
}
