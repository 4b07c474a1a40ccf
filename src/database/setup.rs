use anyhow::{Context, Result};
use rusqlite::Connection;

const DROP_SQL: &str = "DROP TABLE IF EXISTS bouts; DROP TABLE IF EXISTS fighters";

/// Creates missing tables. Existing ledger data is kept.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::debug!("Database schema ensured ({} statements)", statements.len());
    Ok(())
}

/// Drops the whole ledger and recreates an empty schema.
pub fn reset_database(conn: &Connection) -> Result<()> {
    for statement in split_sql_statements(DROP_SQL) {
        execute_sql(conn, &statement)?;
    }
    ensure_schema(conn)?;

    log::info!("Database schema reset successfully");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO fighters (name) VALUES ('Ann')", []).unwrap();

        reset_database(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM fighters", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
