//! Lookup controls: ordered value/label pairs for form selects
//!
//! Every lookup starts with the empty sentinel (`""` -> `""`), which a form
//! submits to mean "no selection".

use super::{cmp_missing_last, resolve_arrangements, resolve_sessions, resolve_songs, UNKNOWN};
use crate::db::Tables;
use crate::models::{GuitarStatus, SongType, DIFFICULTIES};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Days back from today that count as "recently practiced"
pub const RECENT_PRACTICE_DAYS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Lookup(Vec<LookupOption>);

impl Default for Lookup {
    fn default() -> Self {
        Self::new()
    }
}

impl Lookup {
    /// A lookup holding only the empty sentinel
    pub fn new() -> Self {
        Self(vec![LookupOption {
            value: String::new(),
            label: String::new(),
        }])
    }

    pub fn push(&mut self, value: impl ToString, label: impl Into<String>) {
        self.0.push(LookupOption {
            value: value.to_string(),
            label: label.into(),
        });
    }

    /// Lookup whose values are their own labels
    pub fn fixed(labels: &[&str]) -> Self {
        let mut lookup = Self::new();
        for label in labels {
            lookup.push(label, *label);
        }
        lookup
    }

    pub fn options(&self) -> &[LookupOption] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|o| o.value == value)
    }

    pub fn label(&self, value: &str) -> Option<&str> {
        self.0.iter().find(|o| o.value == value).map(|o| o.label.as_str())
    }

    /// Values after the sentinel, in order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().skip(1).map(|o| o.value.as_str())
    }
}

pub fn difficulty_lookup() -> Lookup {
    Lookup::fixed(&DIFFICULTIES)
}

pub fn song_type_lookup() -> Lookup {
    let labels: Vec<&str> = SongType::ALL.iter().map(|t| t.label()).collect();
    Lookup::fixed(&labels)
}

pub fn guitar_status_lookup() -> Lookup {
    let labels: Vec<&str> = GuitarStatus::ALL.iter().map(|s| s.label()).collect();
    Lookup::fixed(&labels)
}

/// Artists by last name
pub fn artist_lookup(tables: &Tables) -> Lookup {
    let mut lookup = Lookup::new();
    for artist in super::sorted_artists(tables) {
        if let Some(id) = artist.id {
            lookup.push(id, artist.name);
        }
    }
    lookup
}

pub fn style_lookup(tables: &Tables) -> Lookup {
    let mut styles = tables.styles.rows.clone();
    styles.sort_by(|a, b| a.style.cmp(&b.style));
    let mut lookup = Lookup::new();
    for style in styles {
        if let Some(id) = style.id {
            lookup.push(id, style.style);
        }
    }
    lookup
}

pub fn string_set_lookup(tables: &Tables) -> Lookup {
    let mut sets = tables.string_sets.rows.clone();
    sets.sort_by(|a, b| a.name.cmp(&b.name));
    let mut lookup = Lookup::new();
    for set in sets {
        if let Some(id) = set.id {
            lookup.push(id, set.name);
        }
    }
    lookup
}

/// Songs by title
pub fn song_lookup(tables: &Tables) -> Lookup {
    let mut songs = tables.songs.rows.clone();
    songs.sort_by(|a, b| a.title.cmp(&b.title));
    let mut lookup = Lookup::new();
    for song in songs {
        if let Some(id) = song.id {
            lookup.push(id, song.title);
        }
    }
    lookup
}

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN)
}

/// Arrangements a goal may reference
///
/// Arrangements already referenced by a goal are left out. When editing the
/// goal `editing`, its own arrangement stays in so the current selection shows.
pub fn arrangement_goal_pool(tables: &Tables, editing: Option<i64>) -> Lookup {
    let current = editing
        .and_then(|id| tables.arrangement_goals.get(id))
        .map(|g| g.arrangement_id);
    let taken: HashSet<i64> = tables
        .arrangement_goals
        .rows
        .iter()
        .map(|g| g.arrangement_id)
        .filter(|id| Some(*id) != current)
        .collect();

    let mut lookup = Lookup::new();
    for arr in resolve_arrangements(tables) {
        let Some(id) = arr.id else { continue };
        if taken.contains(&id) {
            continue;
        }
        lookup.push(
            id,
            format!(
                "Composer: {}, Arrangement: {}, Arranger: {}",
                or_unknown(arr.composer.as_deref()),
                or_unknown(arr.title.as_deref()),
                or_unknown(arr.arranger.as_deref())
            ),
        );
    }
    lookup
}

/// Songs a song goal may reference, under the same rule as arrangement goals
pub fn song_goal_pool(tables: &Tables, editing: Option<i64>) -> Lookup {
    let current = editing
        .and_then(|id| tables.song_goals.get(id))
        .map(|g| g.song_id);
    let taken: HashSet<i64> = tables
        .song_goals
        .rows
        .iter()
        .map(|g| g.song_id)
        .filter(|id| Some(*id) != current)
        .collect();

    let mut lookup = Lookup::new();
    for song in resolve_songs(tables) {
        let Some(id) = song.id else { continue };
        if taken.contains(&id) {
            continue;
        }
        lookup.push(
            id,
            format!(
                "Composer: {}, Song: {}",
                or_unknown(song.composer.as_deref()),
                song.title
            ),
        );
    }
    lookup
}

/// Arrangement choices for the session form
///
/// Three tiers: arrangements practiced from `today - 9` through today
/// (latest session first, ties by composer surname), then other practiced
/// arrangements by total minutes, then the never-practiced ones by composer
/// surname.
pub fn session_arrangement_lookup(tables: &Tables, today: NaiveDate) -> Lookup {
    let arrangements = resolve_arrangements(tables);
    let by_id: HashMap<i64, _> = arrangements
        .iter()
        .filter_map(|a| a.id.map(|id| (id, a)))
        .collect();
    let cutoff = today - Duration::days(RECENT_PRACTICE_DAYS);

    let mut latest: HashMap<i64, NaiveDate> = HashMap::new();
    let mut totals: HashMap<i64, i64> = HashMap::new();
    for s in resolve_sessions(tables) {
        let Some(id) = s.arrangement_id else { continue };
        if !by_id.contains_key(&id) {
            continue;
        }
        *totals.entry(id).or_default() += s.duration;
        if s.session_date > cutoff {
            let entry = latest.entry(id).or_insert(s.session_date);
            if s.session_date > *entry {
                *entry = s.session_date;
            }
        }
    }

    let mut recent: Vec<(i64, NaiveDate)> = latest.into_iter().collect();
    recent.sort_by(|(a_id, a_date), (b_id, b_date)| {
        b_date
            .cmp(a_date)
            .then_with(|| cmp_missing_last(&by_id[a_id].composer_last, &by_id[b_id].composer_last))
            .then_with(|| a_id.cmp(b_id))
    });
    let recent_ids: HashSet<i64> = recent.iter().map(|(id, _)| *id).collect();

    let mut practiced: Vec<(i64, i64)> = totals
        .iter()
        .filter(|(id, _)| !recent_ids.contains(id))
        .map(|(id, total)| (*id, *total))
        .collect();
    practiced.sort_by(|(a_id, a_total), (b_id, b_total)| {
        b_total.cmp(a_total).then_with(|| a_id.cmp(b_id))
    });

    let mut lookup = Lookup::new();
    let label = |id: i64| {
        let arr = by_id[&id];
        format!(
            "{} ({}/{})",
            or_unknown(arr.title.as_deref()),
            or_unknown(arr.composer_last.as_deref()),
            or_unknown(arr.arranger_last.as_deref())
        )
    };
    for (id, _) in &recent {
        lookup.push(id, label(*id));
    }
    for (id, _) in &practiced {
        lookup.push(id, label(*id));
    }
    // Resolved arrangements are already in composer-surname order
    for arr in &arrangements {
        let Some(id) = arr.id else { continue };
        if !totals.contains_key(&id) {
            lookup.push(id, label(id));
        }
    }
    lookup
}

/// Guitars as `make - model`, with ` (Default)` on the default guitar
pub fn guitar_lookup(tables: &Tables) -> Lookup {
    let mut lookup = Lookup::new();
    for guitar in &tables.guitars.rows {
        let Some(id) = guitar.id else { continue };
        let suffix = if guitar.default_guitar { " (Default)" } else { "" };
        lookup.push(id, format!("{} - {}{}", guitar.make, guitar.model, suffix));
    }
    lookup
}

/// The guitar new sessions preselect
pub fn default_guitar_id(tables: &Tables) -> Option<i64> {
    let defaults: Vec<i64> = tables
        .guitars
        .rows
        .iter()
        .filter(|g| g.default_guitar)
        .filter_map(|g| g.id)
        .collect();
    if defaults.len() > 1 {
        warn!("{} guitars are marked default, using id {}", defaults.len(), defaults[0]);
    }
    defaults.first().copied()
}
