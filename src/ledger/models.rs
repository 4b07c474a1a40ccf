use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{RatingError, RatingResult};

pub type FighterId = i64;
pub type BoutId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub id: FighterId,
    pub name: String,
}

/// Result of a bout from the point of view of the bout itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoutOutcome {
    FighterAWins,
    FighterBWins,
    Draw,
    NoContest,
}

impl BoutOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoutOutcome::FighterAWins => "a_wins",
            BoutOutcome::FighterBWins => "b_wins",
            BoutOutcome::Draw => "draw",
            BoutOutcome::NoContest => "no_contest",
        }
    }

    /// Outcome seen by fighter A, or by fighter B when `for_a` is false.
    pub fn for_side(&self, for_a: bool) -> Outcome {
        let outcome = match self {
            BoutOutcome::FighterAWins => Outcome::Win,
            BoutOutcome::FighterBWins => Outcome::Loss,
            BoutOutcome::Draw => Outcome::Draw,
            BoutOutcome::NoContest => Outcome::NoContest,
        };
        if for_a { outcome } else { outcome.mirror() }
    }
}

impl FromStr for BoutOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a_wins" => Ok(BoutOutcome::FighterAWins),
            "b_wins" => Ok(BoutOutcome::FighterBWins),
            "draw" => Ok(BoutOutcome::Draw),
            "no_contest" => Ok(BoutOutcome::NoContest),
            other => Err(format!("unknown outcome '{}'", other)),
        }
    }
}

/// Result of a bout from one fighter's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    NoContest,
}

impl Outcome {
    pub fn mirror(&self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
            Outcome::NoContest => Outcome::NoContest,
        }
    }

    /// Actual score fed into the Elo update. No-contests have none.
    pub fn actual_score(&self) -> Option<f64> {
        match self {
            Outcome::Win => Some(1.0),
            Outcome::Loss => Some(0.0),
            Outcome::Draw => Some(0.5),
            Outcome::NoContest => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::Draw => "Draw",
            Outcome::NoContest => "No Contest",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a bout in the ledger. Bouts are replayed in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderKey {
    pub date: NaiveDate,
    pub event: String,
    pub bout_order: u32,
}

/// One matchup in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    pub id: BoutId,
    pub event: String,
    pub date: NaiveDate,
    /// Position on the event card, 0 for the first bout fought.
    pub bout_order: u32,
    pub weight_class: Option<String>,
    pub fighter_a: FighterId,
    pub fighter_b: FighterId,
    pub outcome: BoutOutcome,
    pub method: String,
    pub round: Option<u8>,
    pub title_fight: bool,
}

impl Bout {
    pub fn order_key(&self) -> OrderKey {
        OrderKey {
            date: self.date,
            event: self.event.clone(),
            bout_order: self.bout_order,
        }
    }

    pub fn label(&self) -> String {
        format!("bout {} ({} #{}, {})", self.id, self.event, self.bout_order, self.date)
    }

    /// Both fighter-perspective records of this bout, A first.
    pub fn perspectives(&self) -> [FightResult; 2] {
        [self.perspective_of(true), self.perspective_of(false)]
    }

    fn perspective_of(&self, for_a: bool) -> FightResult {
        let (fighter, opponent) = if for_a {
            (self.fighter_a, self.fighter_b)
        } else {
            (self.fighter_b, self.fighter_a)
        };
        FightResult {
            bout: self.id,
            fighter,
            opponent,
            date: self.date,
            event: self.event.clone(),
            method: self.method.clone(),
            outcome: self.outcome.for_side(for_a),
        }
    }
}

/// A bout as seen by one of its fighters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightResult {
    pub bout: BoutId,
    pub fighter: FighterId,
    pub opponent: FighterId,
    pub date: NaiveDate,
    pub event: String,
    pub method: String,
    pub outcome: Outcome,
}

/// Recovers the bout outcome (from `first`'s side as fighter A) out of two
/// perspective records, rejecting pairs that do not describe the same bout
/// consistently.
pub fn pair_outcome(first: &FightResult, second: &FightResult) -> RatingResult<BoutOutcome> {
    let record = format!("bout {}", first.bout);

    if first.bout != second.bout
        || first.fighter != second.opponent
        || first.opponent != second.fighter
        || first.date != second.date
        || first.event != second.event
    {
        return Err(RatingError::validation(
            record,
            "perspective records describe different bouts",
        ));
    }

    if first.outcome.mirror() != second.outcome {
        return Err(RatingError::validation(
            record,
            format!("{} does not pair with {}", first.outcome, second.outcome),
        ));
    }

    Ok(match first.outcome {
        Outcome::Win => BoutOutcome::FighterAWins,
        Outcome::Loss => BoutOutcome::FighterBWins,
        Outcome::Draw => BoutOutcome::Draw,
        Outcome::NoContest => BoutOutcome::NoContest,
    })
}
