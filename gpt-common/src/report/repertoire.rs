//! Trailing-year practice time per arrangement
//!
//! Bars are keyed by their labels (song type, song, composer, arranger), so
//! two arrangements that read the same share one bar.

use super::{past_year, song_selected};
use crate::models::{SongType, Stage};
use crate::resolve::ResolvedSession;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepertoireBar {
    pub song_type: Option<SongType>,
    pub song: String,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub total_minutes: i64,
    pub hours: i64,
    /// Minutes left over after whole hours
    pub minutes: i64,
    pub fractional_hours: f64,
    pub stage_minutes: BTreeMap<Stage, i64>,
}

type BarKey = (Option<&'static str>, String, Option<String>, Option<String>);

/// One bar per practiced arrangement label, smallest total first
///
/// Sessions without a resolvable song are left out.
pub fn repertoire(
    sessions: &[ResolvedSession],
    today: NaiveDate,
    filter: Option<&[String]>,
) -> Vec<RepertoireBar> {
    let mut bars: Vec<RepertoireBar> = Vec::new();
    let mut index: HashMap<BarKey, usize> = HashMap::new();

    for s in past_year(sessions, today) {
        if !song_selected(s, filter) {
            continue;
        }
        let Some(song) = &s.song else { continue };
        let key = (
            s.song_type.map(|t| t.label()),
            song.clone(),
            s.composer.clone(),
            s.arranger.clone(),
        );
        let slot = *index.entry(key).or_insert_with(|| {
            bars.push(RepertoireBar {
                song_type: s.song_type,
                song: song.clone(),
                composer: s.composer.clone(),
                arranger: s.arranger.clone(),
                total_minutes: 0,
                hours: 0,
                minutes: 0,
                fractional_hours: 0.0,
                stage_minutes: BTreeMap::new(),
            });
            bars.len() - 1
        });
        let bar = &mut bars[slot];
        bar.total_minutes += s.duration;
        if let Some(stage) = s.stage {
            *bar.stage_minutes.entry(stage).or_default() += s.duration;
        }
    }

    for bar in &mut bars {
        bar.hours = bar.total_minutes.div_euclid(60);
        bar.minutes = bar.total_minutes.rem_euclid(60);
        bar.fractional_hours = bar.total_minutes as f64 / 60.0;
    }

    bars.sort_by(|a, b| {
        a.total_minutes
            .cmp(&b.total_minutes)
            .then_with(|| a.song.cmp(&b.song))
    });
    bars
}
