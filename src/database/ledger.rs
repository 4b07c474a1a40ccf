use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::Connection;

use super::models::NewBout;
use super::setup::reset_database;
use super::{bouts, fighters};
use crate::errors::{RatingError, RatingResult};
use crate::ledger::{Bout, Ledger, ParsedBout};

/// Reads the full ledger. Stored rows that no longer validate fail the load.
pub fn load_ledger(conn: &Connection) -> Result<Ledger> {
    let roster = fighters::list_all(conn)?;
    let rows = bouts::list_in_ledger_order(conn)?;

    let bouts = rows
        .into_iter()
        .map(|row| row.into_bout())
        .collect::<RatingResult<Vec<Bout>>>()?;

    info!("Loaded ledger: {} fighters, {} bouts", roster.len(), bouts.len());
    Ok(Ledger::new(roster, bouts))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Appends validated bouts in one transaction; either all new bouts land or
/// none do. A bout whose ledger slot already holds the same matchup and result
/// is skipped; a slot holding a different bout rejects the whole batch.
pub fn append_bouts(conn: &mut Connection, parsed: &[ParsedBout]) -> Result<AppendSummary> {
    let tx = conn.transaction().context("Failed to open import transaction")?;
    let summary = write_bouts(&tx, parsed)?;
    tx.commit().context("Failed to commit import transaction")?;
    Ok(summary)
}

/// Replaces the whole ledger with `parsed`, atomically.
pub fn replace_ledger(conn: &mut Connection, parsed: &[ParsedBout]) -> Result<AppendSummary> {
    let tx = conn.transaction().context("Failed to open import transaction")?;
    reset_database(&tx)?;
    let summary = write_bouts(&tx, parsed)?;
    tx.commit().context("Failed to commit import transaction")?;
    Ok(summary)
}

fn write_bouts(tx: &Connection, parsed: &[ParsedBout]) -> Result<AppendSummary> {
    let mut summary = AppendSummary::default();

    for bout in parsed {
        let fighter_a = fighters::upsert_fighter(tx, &bout.fighter_a)?;
        let fighter_b = fighters::upsert_fighter(tx, &bout.fighter_b)?;

        let new_bout = NewBout {
            event: bout.event.clone(),
            date: bout.date,
            bout_order: bout.bout_order,
            weight_class: bout.weight_class.clone(),
            fighter_a_id: fighter_a.id,
            fighter_b_id: fighter_b.id,
            outcome: bout.outcome,
            method: bout.method.clone(),
            round: bout.round,
            title_fight: bout.title_fight,
        };

        if bouts::insert_bout(tx, &new_bout)? {
            summary.inserted += 1;
        } else {
            ensure_same_bout(tx, bout, &new_bout)?;
            warn!(
                "Skipping line {}: {} #{} on {} is already in the ledger",
                bout.line, bout.event, bout.bout_order, bout.date
            );
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

fn ensure_same_bout(tx: &Connection, bout: &ParsedBout, new_bout: &NewBout) -> Result<()> {
    let stored = bouts::find_in_slot(tx, &new_bout.event, new_bout.date, new_bout.bout_order)?;
    let same = stored.is_some_and(|row| {
        row.fighter_a_id == new_bout.fighter_a_id
            && row.fighter_b_id == new_bout.fighter_b_id
            && row.outcome == new_bout.outcome.as_str()
            && row.method == new_bout.method
    });
    if same {
        return Ok(());
    }

    Err(RatingError::validation(
        format!("line {} ({} vs {})", bout.line, bout.fighter_a, bout.fighter_b),
        format!(
            "{} #{} on {} already holds a different bout; the card changed since the last import, re-import with --reset",
            bout.event, bout.bout_order, bout.date
        ),
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::ensure_schema;
    use crate::ledger::BoutOutcome;
    use chrono::NaiveDate;

    fn parsed(line: usize, order: u32, a: &str, b: &str, outcome: BoutOutcome) -> ParsedBout {
        ParsedBout {
            line,
            event: "UFC 229".to_string(),
            date: NaiveDate::from_ymd_opt(2018, 10, 6).unwrap(),
            bout_order: order,
            weight_class: Some("Lightweight".to_string()),
            fighter_a: a.to_string(),
            fighter_b: b.to_string(),
            outcome,
            method: "SUB".to_string(),
            round: Some(4),
            title_fight: true,
        }
    }

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn appended_bouts_load_back_in_ledger_order() {
        let mut conn = conn();
        let batch = vec![
            parsed(2, 1, "Khabib Nurmagomedov", "Conor McGregor", BoutOutcome::FighterAWins),
            parsed(3, 0, "Tony Ferguson", "Anthony Pettis", BoutOutcome::FighterAWins),
        ];
        let summary = append_bouts(&mut conn, &batch).unwrap();
        assert_eq!(summary, AppendSummary { inserted: 2, skipped: 0 });

        let ledger = load_ledger(&conn).unwrap();
        assert_eq!(ledger.fighters().len(), 4);
        assert_eq!(ledger.bouts()[0].bout_order, 0);
        assert!(ledger.bouts()[1].title_fight);
        assert_eq!(ledger.bouts()[1].outcome, BoutOutcome::FighterAWins);
    }

    #[test]
    fn reimport_only_appends_new_bouts() {
        let mut conn = conn();
        let first = vec![parsed(2, 0, "A", "B", BoutOutcome::Draw)];
        append_bouts(&mut conn, &first).unwrap();

        let second = vec![
            parsed(2, 0, "A", "B", BoutOutcome::Draw),
            parsed(3, 1, "a", "C", BoutOutcome::NoContest),
        ];
        let summary = append_bouts(&mut conn, &second).unwrap();
        assert_eq!(summary, AppendSummary { inserted: 1, skipped: 1 });
        assert_eq!(bouts::count(&conn).unwrap(), 2);
        assert_eq!(fighters::list_all(&conn).unwrap().len(), 3);
    }

    #[test]
    fn shifted_card_is_rejected_without_writing() {
        let mut conn = conn();
        append_bouts(&mut conn, &[parsed(2, 0, "Ann", "Bea", BoutOutcome::FighterAWins)]).unwrap();

        // The same event scraped again with one more bout: the card order shifts.
        let rescraped = vec![
            parsed(2, 1, "Ann", "Bea", BoutOutcome::FighterAWins),
            parsed(3, 0, "Cat", "Dee", BoutOutcome::FighterBWins),
        ];
        let err = append_bouts(&mut conn, &rescraped).unwrap_err();
        match err.downcast_ref::<RatingError>() {
            Some(RatingError::Validation { record, .. }) => assert!(record.starts_with("line 3")),
            other => panic!("expected a validation error, got {:?}", other),
        }

        assert_eq!(bouts::count(&conn).unwrap(), 1);
        assert_eq!(fighters::list_all(&conn).unwrap().len(), 2);
    }

    #[test]
    fn same_slot_with_other_result_is_rejected() {
        let mut conn = conn();
        append_bouts(&mut conn, &[parsed(2, 0, "Ann", "Bea", BoutOutcome::FighterAWins)]).unwrap();
        assert!(append_bouts(&mut conn, &[parsed(2, 0, "Ann", "Bea", BoutOutcome::Draw)]).is_err());
        assert_eq!(load_ledger(&conn).unwrap().bouts()[0].outcome, BoutOutcome::FighterAWins);
    }

    #[test]
    fn replace_drops_previous_bouts() {
        let mut conn = conn();
        append_bouts(&mut conn, &[parsed(2, 0, "A", "B", BoutOutcome::Draw)]).unwrap();
        let summary = replace_ledger(&mut conn, &[parsed(2, 0, "C", "D", BoutOutcome::FighterBWins)]).unwrap();
        assert_eq!(summary.inserted, 1);

        let ledger = load_ledger(&conn).unwrap();
        let names: Vec<&str> = ledger.fighters().values().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["C", "D"]);
    }

    #[test]
    fn corrupt_stored_outcome_fails_the_load() {
        let mut conn = conn();
        append_bouts(&mut conn, &[parsed(2, 0, "A", "B", BoutOutcome::Draw)]).unwrap();
        conn.execute("UPDATE bouts SET outcome = 'forfeit'", []).unwrap();
        assert!(load_ledger(&conn).is_err());
    }
}
