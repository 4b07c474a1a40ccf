use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::database::{self, setup, DbPool};
use crate::exports::SnapshotExporter;
use crate::query::{LeaderboardKind, QueryService};
use crate::store::{RatingStore, Snapshot};

/// Reloads the ledger from the database and publishes a fresh snapshot.
pub fn rebuild_from_database(pool: &DbPool, store: &RatingStore) -> Result<Arc<Snapshot>> {
    let conn = database::get_connection(pool)?;
    setup::ensure_schema(&conn)?;
    let ledger = database::load_ledger(&conn)?;
    Ok(store.rebuild(&ledger)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingReport {
    pub fighters: usize,
    pub bouts: usize,
}

/// Batch pipeline: ledger → ratings → export files.
pub struct ProcessingService {
    config: AppConfig,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, export_dir: &Path) -> Result<ProcessingReport> {
        info!("=== Starting Rating Processing ===\n");
        info!("Ledger DB: {}", self.config.storage.database_path);

        let pool = database::create_pool(&self.config.storage.database_path)?;
        let conn = database::get_connection(&pool)?;
        setup::ensure_schema(&conn)?;
        let ledger = database::load_ledger(&conn)?;

        let store = Arc::new(RatingStore::new(self.config.rating.clone()));
        let snapshot = store.rebuild(&ledger)?;
        info!(
            "  → Rated {} fighters over {} bouts\n",
            snapshot.fighter_count(),
            snapshot.bouts_processed()
        );

        let queries = QueryService::new(store);
        let exporter = SnapshotExporter::new(export_dir)?;
        for kind in [LeaderboardKind::Current, LeaderboardKind::Peak] {
            exporter.export_leaderboard(kind, &queries.leaderboard(kind, usize::MAX))?;
        }
        exporter.export_fights(&ledger, &snapshot)?;

        info!("=== Processing Complete ===");
        Ok(ProcessingReport {
            fighters: snapshot.fighter_count(),
            bouts: snapshot.bouts_processed(),
        })
    }
}
