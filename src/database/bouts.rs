use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{BoutRow, NewBout};

const SELECT_COLUMNS: &str = "SELECT id, event, date, bout_order, weight_class, fighter_a_id, fighter_b_id, outcome, method, round, title_fight FROM bouts";

/// Appends a bout. Returns `false` when a bout already occupies the same
/// `(event, date, bout_order)` slot.
pub fn insert_bout(conn: &Connection, bout: &NewBout) -> Result<bool> {
    let sql = "INSERT OR IGNORE INTO bouts (event, date, bout_order, weight_class, fighter_a_id, fighter_b_id, outcome, method, round, title_fight) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

    let inserted = conn
        .execute(
            sql,
            params![
                bout.event,
                bout.date,
                bout.bout_order,
                bout.weight_class,
                bout.fighter_a_id,
                bout.fighter_b_id,
                bout.outcome.as_str(),
                bout.method,
                bout.round,
                bout.title_fight
            ],
        )
        .with_context(|| format!("Failed to insert bout of {}", bout.event))?;

    Ok(inserted > 0)
}

fn parse_bout_row(row: &rusqlite::Row) -> rusqlite::Result<BoutRow> {
    Ok(BoutRow {
        id: row.get(0)?,
        event: row.get(1)?,
        date: row.get(2)?,
        bout_order: row.get(3)?,
        weight_class: row.get(4)?,
        fighter_a_id: row.get(5)?,
        fighter_b_id: row.get(6)?,
        outcome: row.get(7)?,
        method: row.get(8)?,
        round: row.get(9)?,
        title_fight: row.get(10)?,
    })
}

/// Every bout in ledger order.
pub fn list_in_ledger_order(conn: &Connection) -> Result<Vec<BoutRow>> {
    let sql = format!("{} ORDER BY date, event, bout_order", SELECT_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_bout_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read bouts")?;

    Ok(rows)
}

/// The bout occupying an `(event, date, bout_order)` slot, if any.
pub fn find_in_slot(conn: &Connection, event: &str, date: NaiveDate, bout_order: u32) -> Result<Option<BoutRow>> {
    let sql = format!("{} WHERE event = ?1 AND date = ?2 AND bout_order = ?3", SELECT_COLUMNS);

    conn.query_row(&sql, params![event, date, bout_order], parse_bout_row)
        .optional()
        .context("Failed to query bout slot")
}

pub fn count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM bouts", [], |row| row.get(0))
        .context("Failed to count bouts")
}
