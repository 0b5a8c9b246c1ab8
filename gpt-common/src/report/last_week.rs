//! Session notes and per-song totals over a run of days
//!
//! Backs both the trailing-week view and the single-day drill-down from a
//! heatmap cell.

use crate::resolve::{cmp_missing_last, ResolvedSession};
use crate::time::display_date;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Days before today included in the week view
pub const LAST_WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionNote {
    pub id: Option<i64>,
    pub song: Option<String>,
    pub session_date: NaiveDate,
    pub date_label: String,
    pub duration: i64,
    pub notes: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongMinutes {
    pub song: String,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionNotes {
    pub notes: Vec<SessionNote>,
    pub bars: Vec<SongMinutes>,
}

/// Sessions from `today - 7 days` through `today`
pub fn last_week(sessions: &[ResolvedSession], today: NaiveDate) -> SessionNotes {
    session_notes(sessions, today - Duration::days(LAST_WEEK_DAYS), LAST_WEEK_DAYS)
}

/// Sessions from `from` through `from + num_days` (both inclusive)
///
/// `num_days = 0` selects the single day `from`. Notes are grouped by song,
/// the most practiced song first, and run oldest to newest within a song.
/// Bars run smallest total first.
pub fn session_notes(
    sessions: &[ResolvedSession],
    from: NaiveDate,
    num_days: i64,
) -> SessionNotes {
    let to = from + Duration::days(num_days.max(0));
    let week: Vec<&ResolvedSession> = sessions
        .iter()
        .filter(|s| s.session_date >= from && s.session_date <= to)
        .collect();

    let mut totals: HashMap<Option<&str>, i64> = HashMap::new();
    for s in &week {
        *totals.entry(s.song.as_deref()).or_default() += s.duration;
    }

    // Rank songs by total, unknown songs last
    let mut ranked: Vec<(Option<&str>, i64)> = totals.iter().map(|(k, v)| (*k, *v)).collect();
    ranked.sort_by(|(a_song, a_total), (b_song, b_total)| {
        a_song
            .is_none()
            .cmp(&b_song.is_none())
            .then_with(|| b_total.cmp(a_total))
            .then_with(|| cmp_missing_last(a_song, b_song))
    });
    let rank: HashMap<Option<&str>, usize> = ranked
        .iter()
        .enumerate()
        .map(|(i, (song, _))| (*song, i))
        .collect();

    let mut ordered = week.clone();
    ordered.sort_by(|a, b| {
        rank[&a.song.as_deref()]
            .cmp(&rank[&b.song.as_deref()])
            .then_with(|| a.session_date.cmp(&b.session_date))
    });

    let notes = ordered
        .into_iter()
        .map(|s| SessionNote {
            id: s.id,
            song: s.song.clone(),
            session_date: s.session_date,
            date_label: display_date(Some(s.session_date)).unwrap_or_default(),
            duration: s.duration,
            notes: s.notes.clone(),
            video_url: s.video_url.clone(),
        })
        .collect();

    let mut bars: Vec<SongMinutes> = ranked
        .into_iter()
        .filter_map(|(song, minutes)| {
            song.map(|song| SongMinutes {
                song: song.to_string(),
                minutes,
            })
        })
        .collect();
    bars.reverse();

    SessionNotes { notes, bars }
}
