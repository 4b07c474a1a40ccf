pub mod snapshot;

pub use snapshot::Snapshot;

use log::{error, info};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::config::settings::RatingSettings;
use crate::errors::{RatingError, RatingResult};
use crate::ledger::{Bout, Fighter, FighterId, Ledger};
use crate::rating::{FighterRatingState, RatingEngine};

/// Materialized rating view served to readers.
///
/// Writers build a complete new [`Snapshot`] next to the current one and swap
/// it in; readers only ever clone the `Arc` of a finished snapshot.
pub struct RatingStore {
    engine: RatingEngine,
    current: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
}

impl RatingStore {
    pub fn new(settings: RatingSettings) -> Self {
        Self {
            engine: RatingEngine::new(settings),
            current: RwLock::new(Arc::new(Snapshot::empty())),
            writer: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self, fighter: FighterId) -> RatingResult<FighterRatingState> {
        self.snapshot().state(fighter).cloned()
    }

    /// Replays `ledger` from scratch. On failure the previous snapshot stays
    /// current.
    pub fn rebuild(&self, ledger: &Ledger) -> RatingResult<Arc<Snapshot>> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let version = self.snapshot().version() + 1;

        let book = self.engine.replay(ledger).inspect_err(log_failure)?;
        let snapshot = Arc::new(Snapshot::build(book, ledger.fighters().clone(), version)?);

        self.publish(snapshot.clone());
        info!(
            "Published rating snapshot v{} ({} fighters, {} bouts)",
            version,
            snapshot.fighter_count(),
            snapshot.bouts_processed()
        );
        Ok(snapshot)
    }

    /// Applies one bout on top of the current snapshot without a replay.
    /// `new_fighters` are roster entries first seen with this bout.
    pub fn append(&self, new_fighters: &[Fighter], bout: &Bout) -> RatingResult<Arc<Snapshot>> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot();

        let mut roster = current.roster().clone();
        for fighter in new_fighters {
            roster.insert(fighter.id, fighter.clone());
        }

        let mut book = current.book().clone();
        self.engine
            .apply(&mut book, &roster, bout)
            .inspect_err(log_failure)?;

        let snapshot = Arc::new(Snapshot::build(book, roster, current.version() + 1)?);
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    fn publish(&self, snapshot: Arc<Snapshot>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

fn log_failure(err: &RatingError) {
    match err {
        RatingError::ComputationInvariant { .. } => error!("Rating replay is inconsistent: {}", err),
        _ => error!("Rating rebuild rejected: {}", err),
    }
}
