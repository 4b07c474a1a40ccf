/// Standard Elo expectation of `rating` scoring against `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Delta before any championship adjustment.
pub fn raw_delta(k_factor: f64, actual: f64, expected: f64) -> f64 {
    k_factor * (actual - expected)
}

/// Raw deltas of both fighters for one bout, A first. `actual_a` is 1, 0 or
/// 0.5.
pub fn pair_deltas(rating_a: f64, rating_b: f64, actual_a: f64, k_factor: f64) -> (f64, f64) {
    let expected_a = expected_score(rating_a, rating_b);
    let expected_b = 1.0 - expected_a;
    (
        raw_delta(k_factor, actual_a, expected_a),
        raw_delta(k_factor, 1.0 - actual_a, expected_b),
    )
}

/// Moves `before` by `delta` and returns `(after, recorded_delta)`.
///
/// The recorded delta is re-derived from the stored ratings so that
/// `after - before == recorded_delta` holds bit for bit.
pub fn settle(before: f64, delta: f64) -> (f64, f64) {
    let after = before + delta;
    (after, after - before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn even_fight_expectation_is_half() {
        assert_eq!(expected_score(1500.0, 1500.0), 0.5);
    }

    #[test]
    fn expectations_sum_to_one() {
        for (a, b) in [(1500.0, 1600.0), (1732.5, 1201.25), (900.0, 2100.0)] {
            assert_relative_eq!(expected_score(a, b) + expected_score(b, a), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn even_fight_win_moves_sixteen_points() {
        let (da, db) = pair_deltas(1500.0, 1500.0, 1.0, 32.0);
        assert_eq!(da, 16.0);
        assert_eq!(db, -16.0);
    }

    #[test]
    fn favourite_losing_drops_more() {
        let expected = expected_score(1600.0, 1500.0);
        assert_relative_eq!(expected, 0.6401, epsilon = 1e-4);
        let delta = raw_delta(32.0, 0.0, expected);
        assert_relative_eq!(delta, -20.48, epsilon = 1e-2);
    }

    #[test]
    fn draw_between_equals_changes_nothing() {
        let (da, db) = pair_deltas(1500.0, 1500.0, 0.5, 32.0);
        assert_eq!(da, 0.0);
        assert_eq!(db, 0.0);
    }

    #[test]
    fn settled_delta_matches_ratings_exactly() {
        let (after, delta) = settle(1516.0, -17.311_042_9);
        assert_eq!(after - 1516.0, delta);
        assert_eq!(1516.0 + delta, after);
    }
}
