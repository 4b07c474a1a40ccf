pub mod elo;
pub mod engine;
pub mod titles;
pub mod types;

pub use engine::{RatingBook, RatingEngine};
pub use titles::{TitleRegistry, TitleStatus};
pub use types::{FighterRatingState, RatingEvent, RatingValue, Record, ResultContext};
