use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ledger::{Bout, BoutOutcome, FighterId, Ledger};
use crate::query::{LeaderboardEntry, LeaderboardKind};
use crate::store::Snapshot;

const CURRENT_FILE: &str = "current.json";
const PEAK_FILE: &str = "peak.json";
const FIGHTS_FILE: &str = "fights_with_elo.csv";

/// Writes rating snapshots to disk. Every file is written to a temp path and
/// renamed into place, so readers never see a half-written export.
pub struct SnapshotExporter {
    export_dir: PathBuf,
}

/// One bout with both fighters' ratings around it.
#[derive(Debug, Serialize)]
struct FightRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Event")]
    event: &'a str,
    #[serde(rename = "Weight Class")]
    weight_class: &'a str,
    #[serde(rename = "Fighter 1")]
    fighter_1: &'a str,
    #[serde(rename = "Fighter 2")]
    fighter_2: &'a str,
    #[serde(rename = "Winner")]
    winner: &'a str,
    #[serde(rename = "Method")]
    method: &'a str,
    #[serde(rename = "Is_Title_Fight")]
    title_fight: bool,
    #[serde(rename = "Fighter1_Elo_Start")]
    fighter_1_start: f64,
    #[serde(rename = "Fighter1_Elo_End")]
    fighter_1_end: f64,
    #[serde(rename = "Fighter2_Elo_Start")]
    fighter_2_start: f64,
    #[serde(rename = "Fighter2_Elo_End")]
    fighter_2_end: f64,
}

impl SnapshotExporter {
    pub fn new<P: AsRef<Path>>(export_dir: P) -> Result<Self> {
        let export_dir = export_dir.as_ref().to_path_buf();
        fs::create_dir_all(&export_dir).context("Failed to create export directory")?;
        Ok(Self { export_dir })
    }

    pub fn export_leaderboard(&self, kind: LeaderboardKind, rows: &[LeaderboardEntry]) -> Result<PathBuf> {
        let path = self.export_dir.join(leaderboard_file(kind));
        let json = serde_json::to_string_pretty(rows).context("Failed to serialize leaderboard")?;
        self.write_atomic(&path, json.as_bytes())?;
        info!("Exported {} rows to {}", rows.len(), path.display());
        Ok(path)
    }

    /// Fight-by-fight ratings in ledger order.
    pub fn export_fights(&self, ledger: &Ledger, snapshot: &Snapshot) -> Result<PathBuf> {
        let path = self.export_dir.join(FIGHTS_FILE);

        let mut ordered: Vec<&Bout> = ledger.bouts().iter().collect();
        ordered.sort_by_cached_key(|b| b.order_key());

        let mut writer = csv::Writer::from_writer(Vec::new());
        for bout in ordered {
            let (start_1, end_1) = ratings_around(snapshot, bout, bout.fighter_a)?;
            let (start_2, end_2) = ratings_around(snapshot, bout, bout.fighter_b)?;
            let fighter_1 = snapshot.name_of(bout.fighter_a);
            let fighter_2 = snapshot.name_of(bout.fighter_b);

            writer
                .serialize(FightRow {
                    date: bout.date.format("%Y-%m-%d").to_string(),
                    event: &bout.event,
                    weight_class: bout.weight_class.as_deref().unwrap_or(""),
                    fighter_1,
                    fighter_2,
                    winner: match bout.outcome {
                        BoutOutcome::FighterAWins => fighter_1,
                        BoutOutcome::FighterBWins => fighter_2,
                        BoutOutcome::Draw => "Draw",
                        BoutOutcome::NoContest => "NC",
                    },
                    method: &bout.method,
                    title_fight: bout.title_fight,
                    fighter_1_start: start_1,
                    fighter_1_end: end_1,
                    fighter_2_start: start_2,
                    fighter_2_end: end_2,
                })
                .with_context(|| format!("Failed to write {}", bout.label()))?;
        }

        let bytes = writer.into_inner().context("Failed to flush fight export")?;
        self.write_atomic(&path, &bytes)?;
        info!("Exported fight history to {}", path.display());
        Ok(path)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, bytes)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to move export into {}", path.display()))?;
        Ok(())
    }
}

fn leaderboard_file(kind: LeaderboardKind) -> &'static str {
    match kind {
        LeaderboardKind::Current => CURRENT_FILE,
        LeaderboardKind::Peak => PEAK_FILE,
    }
}

fn ratings_around(snapshot: &Snapshot, bout: &Bout, fighter: FighterId) -> Result<(f64, f64)> {
    let state = snapshot.state(fighter)?;
    state
        .history
        .iter()
        .find(|e| e.bout == bout.id)
        .map(|e| (e.rating_before, e.rating_after))
        .with_context(|| format!("No rating event for fighter {} in {}", fighter, bout.label()))
}
