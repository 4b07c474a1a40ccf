/// Hard ceiling on the championship multiplier.
pub const MAX_CHAMPIONSHIP_MULTIPLIER: f64 = 1.18;

/// Who the championship multiplier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChampionEligibility {
    /// The fighter holding the weight class title when the bout starts.
    ReigningChampion,
    /// Both fighters of any title fight.
    TitleFight,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub initial_rating: f64,
    pub k_factor: f64,
    pub championship_multiplier: f64,
    pub champion_eligibility: ChampionEligibility,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            initial_rating: 1500.0,
            k_factor: 32.0,
            championship_multiplier: MAX_CHAMPIONSHIP_MULTIPLIER,
            champion_eligibility: ChampionEligibility::ReigningChampion,
        }
    }
}

impl RatingSettings {
    /// Configured multiplier clamped into `[1.0, 1.18]`. Non-finite values
    /// disable it.
    pub fn effective_multiplier(&self) -> f64 {
        if !self.championship_multiplier.is_finite() {
            return 1.0;
        }
        self.championship_multiplier
            .clamp(1.0, MAX_CHAMPIONSHIP_MULTIPLIER)
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
    pub export_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "fight_elo.db".to_string()),
            export_dir: std::env::var("EXPORT_DIR").unwrap_or_else(|_| "exports".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            storage: StorageSettings::default(),
        }
    }

    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.storage.database_path = path.into();
        self
    }
}
