use serde::{Deserialize, Serialize};

use crate::query::{LeaderboardFilter, TrendPoint};

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub weight_class: Option<String>,
    /// Keep fighters past the retirement cutoff on the current board.
    pub include_retired: Option<bool>,
}

impl LeaderboardParams {
    pub fn filter(&self) -> LeaderboardFilter {
        let mut filter = LeaderboardFilter {
            search: non_blank(self.search.as_deref()),
            weight_class: non_blank(self.weight_class.as_deref())
                .filter(|wc| !wc.eq_ignore_ascii_case("all")),
            ..Default::default()
        };
        if self.include_retired.unwrap_or(false) {
            filter.retired_after_days = None;
        }
        filter
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(usize::MAX)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One point of a fighter's rating trend.
#[derive(Debug, Serialize)]
pub struct TrendEntry {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Opponent")]
    pub opponent: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Method")]
    pub method: String,
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "EloBefore")]
    pub elo_before: f64,
    #[serde(rename = "EloAfter")]
    pub elo_after: f64,
    #[serde(rename = "EloChange")]
    pub elo_change: f64,
}

impl From<TrendPoint> for TrendEntry {
    fn from(point: TrendPoint) -> Self {
        let event = point.event;
        TrendEntry {
            date: event.date.format("%Y-%m-%d").to_string(),
            opponent: point.opponent_name,
            result: event.context.outcome.label().to_string(),
            method: event.context.method,
            event: event.context.event,
            elo_before: event.rating_before,
            elo_after: event.rating_after,
            elo_change: event.rating_delta,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RebuildResponse {
    pub fighters: usize,
    pub bouts: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
