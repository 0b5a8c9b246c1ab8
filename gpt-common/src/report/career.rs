//! Career statistics over a date range

use crate::resolve::ResolvedSession;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub session_count: usize,
    pub total_minutes: i64,
    /// Total minutes over every calendar day in the range
    pub average_minutes_per_day: f64,
    /// Most consecutive calendar days with at least one session
    pub longest_streak_days: i64,
    pub longest_session_minutes: i64,
}

/// Statistics for sessions dated `from..=to`
///
/// A reversed range is swapped.
pub fn career_stats(sessions: &[ResolvedSession], from: NaiveDate, to: NaiveDate) -> CareerStats {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let in_range: Vec<&ResolvedSession> = sessions
        .iter()
        .filter(|s| s.session_date >= from && s.session_date <= to)
        .collect();

    let total_minutes: i64 = in_range.iter().map(|s| s.duration).sum();
    let days_in_range = (to - from).num_days() + 1;
    let longest_session_minutes = in_range.iter().map(|s| s.duration).max().unwrap_or(0);

    let days: BTreeSet<NaiveDate> = in_range.iter().map(|s| s.session_date).collect();
    let mut longest_streak_days = 0;
    let mut streak = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        streak = match previous {
            Some(p) if (day - p).num_days() == 1 => streak + 1,
            _ => 1,
        };
        longest_streak_days = longest_streak_days.max(streak);
        previous = Some(day);
    }

    CareerStats {
        from,
        to,
        session_count: in_range.len(),
        total_minutes,
        average_minutes_per_day: total_minutes as f64 / days_in_range as f64,
        longest_streak_days,
        longest_session_minutes,
    }
}

/// Date range spanning every session, if there are any
pub fn career_range(sessions: &[ResolvedSession]) -> Option<(NaiveDate, NaiveDate)> {
    let first = sessions.iter().map(|s| s.session_date).min()?;
    let last = sessions.iter().map(|s| s.session_date).max()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_career_stats() {
        let sessions = vec![
            session(1, d(2024, 1, 1), 30, Some("A")),
            session(2, d(2024, 1, 2), 45, Some("A")),
            session(3, d(2024, 1, 2), 15, Some("B")),
            session(4, d(2024, 1, 3), 10, Some("A")),
            session(5, d(2024, 1, 7), 100, Some("A")),
            session(6, d(2024, 2, 1), 500, Some("A")),
        ];
        let stats = career_stats(&sessions, d(2024, 1, 1), d(2024, 1, 10));
        assert_eq!(stats.session_count, 5);
        assert_eq!(stats.total_minutes, 200);
        assert_eq!(stats.average_minutes_per_day, 20.0);
        assert_eq!(stats.longest_streak_days, 3);
        assert_eq!(stats.longest_session_minutes, 100);
    }

    #[test]
    fn test_empty_range() {
        let stats = career_stats(&[], d(2024, 1, 10), d(2024, 1, 1));
        assert_eq!(stats.from, d(2024, 1, 1));
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.longest_streak_days, 0);
        assert_eq!(stats.average_minutes_per_day, 0.0);
    }

    #[test]
    fn test_career_range() {
        let sessions = vec![
            session(1, d(2024, 3, 1), 30, None),
            session(2, d(2023, 1, 2), 30, None),
        ];
        assert_eq!(career_range(&sessions), Some((d(2023, 1, 2), d(2024, 3, 1))));
        assert_eq!(career_range(&[]), None);
    }
}
