use chrono::NaiveDate;

use crate::errors::{RatingError, RatingResult};
use crate::ledger::{Bout, BoutOutcome};

/// Bout as stored. Converted into a [`Bout`] once its columns are validated.
#[derive(Debug, Clone)]
pub struct BoutRow {
    pub id: i64,
    pub event: String,
    pub date: Option<String>,
    pub bout_order: i64,
    pub weight_class: Option<String>,
    pub fighter_a_id: i64,
    pub fighter_b_id: i64,
    pub outcome: String,
    pub method: String,
    pub round: Option<i64>,
    pub title_fight: bool,
}

impl BoutRow {
    pub fn into_bout(self) -> RatingResult<Bout> {
        let record = format!("bout {} ({})", self.id, self.event);
        let fail = |reason: String| RatingError::validation(record.clone(), reason);

        let date = match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| fail(format!("unparseable date '{}'", raw)))?,
            _ => return Err(fail("missing date".to_string())),
        };
        let outcome: BoutOutcome = self.outcome.parse().map_err(fail)?;
        let bout_order = u32::try_from(self.bout_order)
            .map_err(|_| fail(format!("invalid bout order {}", self.bout_order)))?;
        let round = self
            .round
            .map(u8::try_from)
            .transpose()
            .map_err(|_| fail("invalid round".to_string()))?;

        Ok(Bout {
            id: self.id,
            event: self.event,
            date,
            bout_order,
            weight_class: self.weight_class,
            fighter_a: self.fighter_a_id,
            fighter_b: self.fighter_b_id,
            outcome,
            method: self.method,
            round,
            title_fight: self.title_fight,
        })
    }
}

/// Bout ready to be appended, fighters already resolved to ids.
#[derive(Debug, Clone)]
pub struct NewBout {
    pub event: String,
    pub date: NaiveDate,
    pub bout_order: u32,
    pub weight_class: Option<String>,
    pub fighter_a_id: i64,
    pub fighter_b_id: i64,
    pub outcome: BoutOutcome,
    pub method: String,
    pub round: Option<u8>,
    pub title_fight: bool,
}
