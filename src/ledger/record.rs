use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::BoutOutcome;
use crate::errors::{RatingError, RatingResult};

/// One row of the scraped fight CSV.
///
/// Columns the rating core does not use (time, fight URL) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LedgerRecord {
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Weight Class", default)]
    pub weight_class: Option<String>,
    #[serde(rename = "Fighter 1")]
    pub fighter_1: String,
    #[serde(rename = "Fighter 2")]
    pub fighter_2: String,
    #[serde(rename = "Winner", default)]
    pub winner: Option<String>,
    #[serde(rename = "Method", alias = "method", default)]
    pub method: Option<String>,
    #[serde(rename = "Round", default)]
    pub round: Option<String>,
    #[serde(rename = "Is_Title_Fight", default)]
    pub title_fight: Option<String>,
}

/// A validated CSV row. Fighters are still names; ids are assigned by the
/// ledger store.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBout {
    pub line: usize,
    pub event: String,
    pub date: NaiveDate,
    pub bout_order: u32,
    pub weight_class: Option<String>,
    pub fighter_a: String,
    pub fighter_b: String,
    pub outcome: BoutOutcome,
    pub method: String,
    pub round: Option<u8>,
    pub title_fight: bool,
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];

impl LedgerRecord {
    /// Validates one row. `line` is the 1-based CSV line used in errors.
    pub fn parse(&self, line: usize) -> RatingResult<ParsedBout> {
        let record = format!("line {} ({} vs {})", line, self.fighter_1, self.fighter_2);
        let fail = |reason: String| RatingError::validation(record.clone(), reason);

        let event = self.event.trim();
        if event.is_empty() {
            return Err(fail("missing event name".to_string()));
        }

        let fighter_a = self.fighter_1.trim();
        let fighter_b = self.fighter_2.trim();
        if fighter_a.is_empty() || fighter_b.is_empty() {
            return Err(fail("missing fighter name".to_string()));
        }
        if fighter_a.eq_ignore_ascii_case(fighter_b) {
            return Err(fail("fighter cannot face themselves".to_string()));
        }

        let date = match non_empty(&self.date) {
            Some(raw) => parse_date(raw).ok_or_else(|| fail(format!("unparseable date '{}'", raw)))?,
            None => return Err(fail("missing date".to_string())),
        };

        let outcome = parse_winner(non_empty(&self.winner), fighter_a, fighter_b).map_err(fail)?;

        let round = match non_empty(&self.round) {
            Some(raw) => Some(
                raw.parse::<u8>()
                    .map_err(|_| fail(format!("invalid round '{}'", raw)))?,
            ),
            None => None,
        };

        let title_fight = match non_empty(&self.title_fight) {
            Some(raw) => parse_flag(raw).ok_or_else(|| fail(format!("invalid title flag '{}'", raw)))?,
            None => false,
        };

        let weight_class = non_empty(&self.weight_class).map(str::to_string);
        if title_fight && weight_class.is_none() {
            return Err(fail("title fight without a weight class".to_string()));
        }

        Ok(ParsedBout {
            line,
            event: event.to_string(),
            date,
            bout_order: 0,
            weight_class,
            fighter_a: fighter_a.to_string(),
            fighter_b: fighter_b.to_string(),
            outcome,
            method: non_empty(&self.method).unwrap_or_default().to_string(),
            round,
            title_fight,
        })
    }
}

/// Validates every row, failing on the first bad one, and assigns card
/// positions. Scraped cards list the main event first, so the last row of an
/// event is the first bout fought.
pub fn parse_records(records: &[LedgerRecord]) -> RatingResult<Vec<ParsedBout>> {
    let mut parsed = records
        .iter()
        .enumerate()
        .map(|(idx, r)| r.parse(idx + 2))
        .collect::<RatingResult<Vec<_>>>()?;

    let mut card_sizes: HashMap<(String, NaiveDate), u32> = HashMap::new();
    for bout in &parsed {
        *card_sizes.entry((bout.event.clone(), bout.date)).or_insert(0) += 1;
    }

    let mut seen: HashMap<(String, NaiveDate), u32> = HashMap::new();
    for bout in &mut parsed {
        let key = (bout.event.clone(), bout.date);
        let position = seen.entry(key.clone()).or_insert(0);
        bout.bout_order = card_sizes[&key] - 1 - *position;
        *position += 1;
    }

    Ok(parsed)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_winner(winner: Option<&str>, fighter_a: &str, fighter_b: &str) -> Result<BoutOutcome, String> {
    let Some(winner) = winner else {
        return Err("missing winner".to_string());
    };

    if winner.eq_ignore_ascii_case(fighter_a) {
        return Ok(BoutOutcome::FighterAWins);
    }
    if winner.eq_ignore_ascii_case(fighter_b) {
        return Ok(BoutOutcome::FighterBWins);
    }

    match winner.to_lowercase().as_str() {
        "draw" => Ok(BoutOutcome::Draw),
        "nc" | "no contest" => Ok(BoutOutcome::NoContest),
        _ => Err(format!(
            "winner '{}' is neither fighter, 'Draw' nor 'NC'",
            winner
        )),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
