use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::config::settings::AppConfig;
use crate::database::{self, setup, AppendSummary, DbPool};
use crate::ledger::record::{parse_records, LedgerRecord};

/// Loads a scraped fight CSV into the ledger database.
pub struct IngestionService {
    pool: DbPool,
}

impl IngestionService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let pool = database::create_pool(&config.storage.database_path)?;
        let conn = database::get_connection(&pool)?;
        setup::ensure_schema(&conn)?;
        Ok(Self { pool })
    }

    /// Validates the whole file before touching the database; one bad row
    /// rejects the import. With `replace` the existing ledger is dropped in
    /// the same transaction.
    pub fn run(&self, csv_path: &Path, replace: bool) -> Result<AppendSummary> {
        info!("=== Starting Ledger Import ===\n");

        let records = self.read_records(csv_path)?;
        info!("  → Read {} rows from {}", records.len(), csv_path.display());

        let parsed = parse_records(&records)?;
        info!("  → Validated {} bouts\n", parsed.len());

        let mut conn = database::get_connection(&self.pool)?;
        let summary = if replace {
            database::replace_ledger(&mut conn, &parsed)?
        } else {
            database::append_bouts(&mut conn, &parsed)?
        };

        info!(
            "  → Appended {} bouts, skipped {} already recorded\n",
            summary.inserted, summary.skipped
        );
        info!("=== Import Complete ===");
        Ok(summary)
    }

    fn read_records(&self, csv_path: &Path) -> Result<Vec<LedgerRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(csv_path)
            .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;

        reader
            .deserialize::<LedgerRecord>()
            .enumerate()
            .map(|(idx, row)| row.with_context(|| format!("Malformed CSV row at line {}", idx + 2)))
            .collect()
    }
}
