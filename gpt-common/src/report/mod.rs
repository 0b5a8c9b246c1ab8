//! Reporting aggregator
//!
//! Pure functions over resolved sessions. "Today" is always a parameter so
//! every report is reproducible in tests.

pub mod career;
pub mod heatmap;
pub mod last_week;
pub mod repertoire;
pub mod stage;
pub mod strings;
pub mod videos;

use crate::resolve::ResolvedSession;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

pub use career::{career_range, career_stats, CareerStats};
pub use heatmap::{build_heatmap, Heatmap};
pub use last_week::{last_week, session_notes, SessionNote, SessionNotes};
pub use repertoire::{repertoire, RepertoireBar};
pub use stage::classify;
pub use strings::{arsenal, string_wear, ArsenalEntry, StringWear};
pub use videos::{embed_url, video_widgets, VideoWidget};

/// Length of the dashboard's trailing window
pub const WINDOW_DAYS: i64 = 365;

/// Sessions in the trailing year ending `today` (inclusive)
pub fn past_year(sessions: &[ResolvedSession], today: NaiveDate) -> Vec<&ResolvedSession> {
    let start = today - Duration::days(WINDOW_DAYS - 1);
    sessions
        .iter()
        .filter(|s| s.session_date >= start && s.session_date <= today)
        .collect()
}

/// Song-title filter: `None` keeps everything, sessions without a song always pass
pub fn song_selected(session: &ResolvedSession, filter: Option<&[String]>) -> bool {
    match (filter, session.song.as_deref()) {
        (None, _) | (_, None) => true,
        (Some(selected), Some(song)) => selected.iter().any(|s| s == song),
    }
}

/// Distinct song titles practiced in the trailing year, for the filter shelf
pub fn song_titles(sessions: &[ResolvedSession], today: NaiveDate) -> Vec<String> {
    past_year(sessions, today)
        .into_iter()
        .filter_map(|s| s.song.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
