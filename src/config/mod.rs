pub mod settings;

pub use settings::{AppConfig, ChampionEligibility, RatingSettings, StorageSettings};
