//! Activity heatmap: 7 weekday rows by one column per practiced week

use super::{past_year, song_selected};
use crate::resolve::ResolvedSession;
use crate::time::{week_start, WEEKDAY_ABBR};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Two-level column label: ISO year over the week's Monday
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapColumn {
    pub year: i32,
    pub week_start: NaiveDate,
    pub label: String,
}

/// Parallel grids indexed `[row][column]`, rows Mon..Sun
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub rows: Vec<&'static str>,
    pub columns: Vec<HeatmapColumn>,
    /// Minutes practiced; `None` where no session was held
    pub minutes: Vec<Vec<Option<i64>>>,
    pub has_video: Vec<Vec<bool>>,
    pub dates: Vec<Vec<Option<NaiveDate>>>,
    /// `Mon 01-15-2024` style labels for days with sessions
    pub date_labels: Vec<Vec<Option<String>>>,
}

impl Heatmap {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Default)]
struct Day {
    minutes: i64,
    has_video: bool,
}

/// Heatmap over the trailing year, optionally restricted to selected songs
pub fn build_heatmap(
    sessions: &[ResolvedSession],
    today: NaiveDate,
    filter: Option<&[String]>,
) -> Heatmap {
    let mut days: BTreeMap<NaiveDate, Day> = BTreeMap::new();
    for s in past_year(sessions, today) {
        if !song_selected(s, filter) {
            continue;
        }
        let day = days.entry(s.session_date).or_default();
        day.minutes += s.duration;
        day.has_video |= s.has_video();
    }

    let weeks: BTreeSet<NaiveDate> = days.keys().map(|d| week_start(*d)).collect();
    let columns: Vec<HeatmapColumn> = weeks
        .iter()
        .map(|start| HeatmapColumn {
            year: start.iso_week().year(),
            week_start: *start,
            label: start.format("%b %d").to_string(),
        })
        .collect();

    let n = columns.len();
    let mut heatmap = Heatmap {
        rows: WEEKDAY_ABBR.to_vec(),
        minutes: vec![vec![None; n]; 7],
        has_video: vec![vec![false; n]; 7],
        dates: vec![vec![None; n]; 7],
        date_labels: vec![vec![None; n]; 7],
        columns,
    };

    for (col, column) in heatmap.columns.iter().enumerate() {
        for row in 0..7 {
            let date = column.week_start + Duration::days(row as i64);
            if let Some(day) = days.get(&date) {
                heatmap.minutes[row][col] = Some(day.minutes);
                heatmap.has_video[row][col] = day.has_video;
                heatmap.dates[row][col] = Some(date);
                heatmap.date_labels[row][col] = Some(date.format("%a %m-%d-%Y").to_string());
            }
        }
    }

    heatmap
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_grid_shape_and_empty_cells() {
        let today = d(2024, 1, 31);
        let sessions = vec![
            // Monday 2024-01-15, two sessions
            session(1, d(2024, 1, 15), 20, Some("Lagrima")),
            session(2, d(2024, 1, 15), 10, Some("Adelita")),
            // Sunday 2024-01-28
            session(3, d(2024, 1, 28), 0, Some("Lagrima")),
        ];
        let heatmap = build_heatmap(&sessions, today, None);

        assert_eq!(heatmap.rows, WEEKDAY_ABBR.to_vec());
        assert_eq!(heatmap.columns.len(), 2);
        assert_eq!(heatmap.columns[0].week_start, d(2024, 1, 15));
        assert_eq!(heatmap.columns[0].label, "Jan 15");
        assert_eq!(heatmap.columns[1].week_start, d(2024, 1, 22));

        assert_eq!(heatmap.minutes[0][0], Some(30));
        assert_eq!(heatmap.minutes[1][0], None);
        // A zero-minute session is distinct from no session
        assert_eq!(heatmap.minutes[6][1], Some(0));
        assert_eq!(heatmap.date_labels[0][0].as_deref(), Some("Mon 01-15-2024"));
        assert_eq!(heatmap.dates[6][1], Some(d(2024, 1, 28)));
    }

    #[test]
    fn test_has_video_if_any_session_that_day() {
        let today = d(2024, 1, 31);
        let mut with_video = session(1, d(2024, 1, 16), 20, Some("Lagrima"));
        with_video.video_url = Some("https://youtu.be/abc".into());
        let sessions = vec![with_video, session(2, d(2024, 1, 16), 10, Some("Lagrima"))];

        let heatmap = build_heatmap(&sessions, today, None);
        assert!(heatmap.has_video[1][0]);
        assert!(!heatmap.has_video[0][0]);
    }

    #[test]
    fn test_iso_year_of_boundary_week() {
        // 2024-12-30 (Monday) starts ISO week 1 of 2025
        let today = d(2025, 1, 5);
        let sessions = vec![session(1, d(2025, 1, 2), 15, None)];
        let heatmap = build_heatmap(&sessions, today, None);
        assert_eq!(heatmap.columns[0].week_start, d(2024, 12, 30));
        assert_eq!(heatmap.columns[0].year, 2025);
        assert_eq!(heatmap.minutes[3][0], Some(15));
    }

    #[test]
    fn test_song_filter() {
        let today = d(2024, 1, 31);
        let sessions = vec![
            session(1, d(2024, 1, 15), 20, Some("Lagrima")),
            session(2, d(2024, 1, 15), 10, Some("Adelita")),
            session(3, d(2024, 1, 15), 5, None),
        ];
        let filter = vec!["Lagrima".to_string()];
        let heatmap = build_heatmap(&sessions, today, Some(&filter));
        assert_eq!(heatmap.minutes[0][0], Some(25));
    }

    #[test]
    fn test_old_sessions_excluded() {
        let today = d(2024, 6, 1);
        let sessions = vec![session(1, d(2022, 1, 3), 20, Some("Lagrima"))];
        assert!(build_heatmap(&sessions, today, None).is_empty());
    }
}
