//! String wear model and the guitar arsenal view
//!
//! Strings are assumed spent after 60 hours of play or 112 days on the
//! guitar, whichever comes first. Health falls linearly toward that limit.

use crate::resolve::{ResolvedGuitar, ResolvedSession};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Hours of play that wear a set of strings out
pub const STRING_LIFE_HOURS: f64 = 60.0;

/// Days on the guitar that wear a set of strings out
pub const STRING_LIFE_DAYS: f64 = 112.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringWear {
    pub hours: f64,
    pub days: i64,
    /// 1.0 for fresh strings, 0.0 for spent ones
    pub health: f64,
    /// `None` on the install day, when no wear rate is known yet
    pub expected_days_left: Option<i64>,
    pub expiration: Option<NaiveDate>,
}

/// Wear after `minutes` of play over `days` since the strings went on
pub fn string_wear(minutes: i64, days: i64, today: NaiveDate) -> StringWear {
    let hours = minutes as f64 / 60.0;
    if days <= 0 {
        return StringWear {
            hours,
            days,
            health: 1.0,
            expected_days_left: None,
            expiration: None,
        };
    }

    let worn = (hours / STRING_LIFE_HOURS).max(days as f64 / STRING_LIFE_DAYS);

    // slope = (health - 1) / days over unclamped health, so -1 / slope is
    // days / worn. Spent strings get a negative count.
    let expected_days_left = Some((days as f64 / worn).floor() as i64 - days);
    let health = (1.0 - worn).clamp(0.0, 1.0);

    StringWear {
        hours,
        days,
        health,
        expected_days_left,
        expiration: expected_days_left.map(|left| today + Duration::days(left)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArsenalEntry {
    #[serde(flatten)]
    pub guitar: ResolvedGuitar,
    /// `None` when the strings install date is unknown
    pub wear: Option<StringWear>,
}

/// Every guitar with its current string wear
pub fn arsenal(
    guitars: &[ResolvedGuitar],
    sessions: &[ResolvedSession],
    today: NaiveDate,
) -> Vec<ArsenalEntry> {
    guitars
        .iter()
        .map(|g| {
            let wear = g.guitar.strings_install_date.map(|installed| {
                let minutes: i64 = sessions
                    .iter()
                    .filter(|s| s.guitar_id.is_some() && s.guitar_id == g.guitar.id)
                    .filter(|s| s.session_date >= installed && s.session_date <= today)
                    .map(|s| s.duration)
                    .sum();
                string_wear(minutes, (today - installed).num_days(), today)
            });
            ArsenalEntry {
                guitar: g.clone(),
                wear,
            }
        })
        .collect()
}
