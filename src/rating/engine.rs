use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

use super::elo;
use super::titles::TitleRegistry;
use super::types::{FighterRatingState, RatingEvent, RatingValue, ResultContext};
use crate::config::settings::{ChampionEligibility, RatingSettings};
use crate::errors::{RatingError, RatingResult};
use crate::ledger::{Bout, BoutOutcome, FightResult, Fighter, FighterId, Ledger, OrderKey};

/// Everything the engine derived from the bouts replayed so far.
///
/// Cloning a book and applying one more bout gives the same result as
/// replaying the longer ledger from scratch.
#[derive(Debug, Clone, Default)]
pub struct RatingBook {
    states: HashMap<FighterId, FighterRatingState>,
    titles: TitleRegistry,
    last_key: Option<OrderKey>,
    bouts_processed: usize,
}

impl RatingBook {
    pub fn state(&self, fighter: FighterId) -> Option<&FighterRatingState> {
        self.states.get(&fighter)
    }

    pub fn states(&self) -> impl Iterator<Item = &FighterRatingState> {
        self.states.values()
    }

    pub fn titles(&self) -> &TitleRegistry {
        &self.titles
    }

    pub fn last_key(&self) -> Option<&OrderKey> {
        self.last_key.as_ref()
    }

    pub fn bouts_processed(&self) -> usize {
        self.bouts_processed
    }

    pub fn fighter_count(&self) -> usize {
        self.states.len()
    }

    fn rating_of(&self, fighter: FighterId, initial: RatingValue) -> RatingValue {
        self.states
            .get(&fighter)
            .map(|s| s.current_rating)
            .unwrap_or(initial)
    }

    fn check_chain(&self, event: &RatingEvent, initial: RatingValue) -> RatingResult<()> {
        let head = self
            .states
            .get(&event.fighter)
            .map(FighterRatingState::chain_head)
            .unwrap_or(initial);

        if event.rating_before != head {
            return Err(RatingError::invariant(
                event.fighter,
                format!(
                    "bout {} starts at {} but previous rating is {}",
                    event.bout, event.rating_before, head
                ),
            ));
        }
        if !event.rating_after.is_finite() {
            return Err(RatingError::invariant(
                event.fighter,
                format!("bout {} produced non-finite rating", event.bout),
            ));
        }
        if event.rating_before + event.rating_delta != event.rating_after {
            return Err(RatingError::invariant(
                event.fighter,
                format!(
                    "bout {}: {} + {} != {}",
                    event.bout, event.rating_before, event.rating_delta, event.rating_after
                ),
            ));
        }
        Ok(())
    }

    fn push(&mut self, event: RatingEvent, initial: RatingValue, weight_class: Option<&str>) {
        self.states
            .entry(event.fighter)
            .or_insert_with(|| FighterRatingState::new(event.fighter, initial))
            .push(event, weight_class);
    }
}

pub struct RatingEngine {
    settings: RatingSettings,
}

impl RatingEngine {
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    /// Replays the whole ledger in ledger order.
    ///
    /// Input order does not matter; bouts are sorted by `(date, event, bout
    /// order)` first. Any invalid bout aborts the replay.
    pub fn replay(&self, ledger: &Ledger) -> RatingResult<RatingBook> {
        info!(
            "Replaying {} bouts for {} fighters",
            ledger.len(),
            ledger.fighters().len()
        );

        let mut ordered: Vec<&Bout> = ledger.bouts().iter().collect();
        ordered.sort_by_cached_key(|b| b.order_key());
        ensure_unique_positions(&ordered)?;

        let mut book = RatingBook::default();
        for bout in ordered {
            self.apply(&mut book, ledger.fighters(), bout)?;
        }

        info!(
            "Replay complete: {} rating events across {} fighters",
            book.bouts_processed * 2,
            book.fighter_count()
        );
        Ok(book)
    }

    /// Applies one bout on top of `book`. The bout must sort after every bout
    /// already in the book. On error the book is left untouched.
    pub fn apply(
        &self,
        book: &mut RatingBook,
        roster: &BTreeMap<FighterId, Fighter>,
        bout: &Bout,
    ) -> RatingResult<()> {
        validate_bout(bout, roster)?;

        let key = bout.order_key();
        if let Some(last) = &book.last_key {
            if key <= *last {
                return Err(RatingError::validation(
                    bout.label(),
                    "bout does not come after the last processed bout; a full rebuild is required",
                ));
            }
        }

        let initial = self.settings.initial_rating;
        let rating_a = book.rating_of(bout.fighter_a, initial);
        let rating_b = book.rating_of(bout.fighter_b, initial);
        let (mult_a, mult_b) = self.multipliers(&book.titles, bout);
        let [result_a, result_b] = bout.perspectives();

        let (delta_a, delta_b, mult_a, mult_b) = match result_a.outcome.actual_score() {
            Some(actual_a) => {
                let (raw_a, raw_b) =
                    elo::pair_deltas(rating_a, rating_b, actual_a, self.settings.k_factor);
                (raw_a * mult_a, raw_b * mult_b, mult_a, mult_b)
            }
            // No-contests are recorded but never move a rating.
            None => (0.0, 0.0, 1.0, 1.0),
        };

        let event_a = build_event(result_a, rating_a, delta_a, mult_a);
        let event_b = build_event(result_b, rating_b, delta_b, mult_b);

        book.check_chain(&event_a, initial)?;
        book.check_chain(&event_b, initial)?;

        debug!(
            "{}: {} {:.2} -> {:.2}, {} {:.2} -> {:.2}",
            bout.label(),
            bout.fighter_a,
            event_a.rating_before,
            event_a.rating_after,
            bout.fighter_b,
            event_b.rating_before,
            event_b.rating_after
        );

        let weight_class = bout.weight_class.as_deref();
        book.push(event_a, initial, weight_class);
        book.push(event_b, initial, weight_class);

        if bout.title_fight {
            if let Some(wc) = weight_class {
                match bout.outcome {
                    BoutOutcome::FighterAWins => book.titles.crown(wc, bout.fighter_a),
                    BoutOutcome::FighterBWins => book.titles.crown(wc, bout.fighter_b),
                    BoutOutcome::Draw | BoutOutcome::NoContest => {}
                }
            }
        }

        book.last_key = Some(key);
        book.bouts_processed += 1;
        Ok(())
    }

    fn multipliers(&self, titles: &TitleRegistry, bout: &Bout) -> (f64, f64) {
        let m = self.settings.effective_multiplier();
        match self.settings.champion_eligibility {
            ChampionEligibility::Disabled => (1.0, 1.0),
            ChampionEligibility::TitleFight if bout.title_fight => (m, m),
            ChampionEligibility::TitleFight => (1.0, 1.0),
            ChampionEligibility::ReigningChampion => match bout.weight_class.as_deref() {
                Some(wc) => (
                    if titles.holds_title(wc, bout.fighter_a) { m } else { 1.0 },
                    if titles.holds_title(wc, bout.fighter_b) { m } else { 1.0 },
                ),
                None => (1.0, 1.0),
            },
        }
    }
}

fn build_event(result: FightResult, before: RatingValue, delta: f64, multiplier: f64) -> RatingEvent {
    let (after, delta) = elo::settle(before, delta);
    RatingEvent {
        fighter: result.fighter,
        bout: result.bout,
        date: result.date,
        rating_before: before,
        rating_after: after,
        rating_delta: delta,
        context: ResultContext {
            outcome: result.outcome,
            opponent: result.opponent,
            method: result.method,
            event: result.event,
            multiplier,
        },
    }
}

fn validate_bout(bout: &Bout, roster: &BTreeMap<FighterId, Fighter>) -> RatingResult<()> {
    if bout.event.trim().is_empty() {
        return Err(RatingError::validation(bout.label(), "missing event name"));
    }
    if bout.fighter_a == bout.fighter_b {
        return Err(RatingError::validation(
            bout.label(),
            format!("fighter {} cannot face themselves", bout.fighter_a),
        ));
    }
    for fighter in [bout.fighter_a, bout.fighter_b] {
        if !roster.contains_key(&fighter) {
            return Err(RatingError::validation(
                bout.label(),
                format!("unknown fighter reference {}", fighter),
            ));
        }
    }
    if bout.title_fight && bout.weight_class.is_none() {
        return Err(RatingError::validation(
            bout.label(),
            "title fight without a weight class",
        ));
    }
    Ok(())
}

fn ensure_unique_positions(ordered: &[&Bout]) -> RatingResult<()> {
    for pair in ordered.windows(2) {
        if pair[0].order_key() == pair[1].order_key() {
            return Err(RatingError::validation(
                pair[1].label(),
                format!("shares its ledger position with bout {}", pair[0].id),
            ));
        }
    }
    Ok(())
}
