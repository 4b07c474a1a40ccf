use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::ledger::Fighter;

/// Returns the fighter with this name (case-insensitive), creating it first
/// if needed.
pub fn upsert_fighter(conn: &Connection, name: &str) -> Result<Fighter> {
    if let Some(existing) = find_by_name(conn, name)? {
        return Ok(existing);
    }

    insert_new_fighter(conn, name)
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Fighter>> {
    let sql = "SELECT id, name FROM fighters WHERE name = ?1";

    conn.query_row(sql, params![name], parse_fighter_row)
        .optional()
        .context("Failed to query fighter by name")
}

fn insert_new_fighter(conn: &Connection, name: &str) -> Result<Fighter> {
    let sql = "INSERT INTO fighters (name) VALUES (?1) RETURNING id, name";

    conn.query_row(sql, params![name], parse_fighter_row)
        .with_context(|| format!("Failed to insert fighter {}", name))
}

fn parse_fighter_row(row: &rusqlite::Row) -> rusqlite::Result<Fighter> {
    Ok(Fighter {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub fn list_all(conn: &Connection) -> Result<Vec<Fighter>> {
    let sql = "SELECT id, name FROM fighters ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_fighter_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
