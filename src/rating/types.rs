use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::{BoutId, FighterId, Outcome};

pub type RatingValue = f64;

/// What happened in the bout a rating event was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultContext {
    pub outcome: Outcome,
    pub opponent: FighterId,
    pub method: String,
    pub event: String,
    /// Championship multiplier applied to this fighter's delta (1.0 if none).
    pub multiplier: f64,
}

/// One rating change of one fighter. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    pub fighter: FighterId,
    pub bout: BoutId,
    pub date: NaiveDate,
    pub rating_before: RatingValue,
    pub rating_after: RatingValue,
    pub rating_delta: RatingValue,
    pub context: ResultContext,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub no_contests: u32,
}

impl Record {
    pub fn count(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::NoContest => self.no_contests += 1,
        }
    }

    pub fn fights(&self) -> u32 {
        self.wins + self.losses + self.draws + self.no_contests
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.draws)
    }
}

/// Materialized rating state of a fighter, rebuilt by replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterRatingState {
    pub fighter: FighterId,
    pub initial_rating: RatingValue,
    pub current_rating: RatingValue,
    pub peak_rating: RatingValue,
    pub record: Record,
    pub history: Vec<RatingEvent>,
    pub weight_class: Option<String>,
    pub last_fight: Option<NaiveDate>,
}

impl FighterRatingState {
    pub fn new(fighter: FighterId, initial_rating: RatingValue) -> Self {
        Self {
            fighter,
            initial_rating,
            current_rating: initial_rating,
            peak_rating: initial_rating,
            record: Record::default(),
            history: Vec::new(),
            weight_class: None,
            last_fight: None,
        }
    }

    /// Rating the next event must start from.
    pub fn chain_head(&self) -> RatingValue {
        self.history
            .last()
            .map(|e| e.rating_after)
            .unwrap_or(self.initial_rating)
    }

    pub(crate) fn push(&mut self, event: RatingEvent, weight_class: Option<&str>) {
        self.current_rating = event.rating_after;
        self.peak_rating = self.peak_rating.max(event.rating_after);
        self.record.count(event.context.outcome);
        self.last_fight = Some(event.date);
        if let Some(wc) = weight_class {
            self.weight_class = Some(wc.to_string());
        }
        self.history.push(event);
    }
}
