//! View resolver
//!
//! Left joins from each fact table onto its lookup tables. Every fact row
//! comes out exactly once; a null or dangling key yields `None` labels.

pub mod lookup;
pub mod summary;

use crate::db::Tables;
use crate::models::{Artist, Guitar, Milestones, SongType, Stage};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub use lookup::{Lookup, LookupOption};
pub use summary::SummaryTable;

/// Label used where a joined value is missing from a composed label
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSong {
    pub id: Option<i64>,
    pub title: String,
    pub song_type: Option<SongType>,
    pub style_id: Option<i64>,
    pub style: Option<String>,
    pub composer_id: Option<i64>,
    pub composer: Option<String>,
    pub composer_last: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedArrangement {
    pub id: Option<i64>,
    pub song_id: Option<i64>,
    pub title: Option<String>,
    pub song_type: Option<SongType>,
    pub style: Option<String>,
    pub composer: Option<String>,
    pub composer_last: Option<String>,
    pub arranger_id: Option<i64>,
    pub arranger: Option<String>,
    pub arranger_last: Option<String>,
    #[serde(flatten)]
    pub milestones: Milestones,
    pub difficulty: Option<String>,
    pub sheet_music_link: Option<String>,
    pub performance_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSession {
    pub id: Option<i64>,
    pub session_date: NaiveDate,
    pub duration: i64,
    pub arrangement_id: Option<i64>,
    pub song_id: Option<i64>,
    pub song: Option<String>,
    pub song_type: Option<SongType>,
    pub style: Option<String>,
    pub composer: Option<String>,
    pub composer_last: Option<String>,
    pub arranger: Option<String>,
    pub arranger_last: Option<String>,
    pub guitar_id: Option<i64>,
    pub guitar_make: Option<String>,
    pub guitar_model: Option<String>,
    pub notes: Option<String>,
    pub video_url: Option<String>,
    pub stage: Option<Stage>,
}

impl ResolvedSession {
    pub fn has_video(&self) -> bool {
        self.video_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedArrangementGoal {
    pub id: Option<i64>,
    pub arrangement_id: i64,
    pub title: Option<String>,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    pub discovery_date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSongGoal {
    pub id: Option<i64>,
    pub song_id: i64,
    pub title: Option<String>,
    pub composer: Option<String>,
    pub discovery_date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGuitar {
    #[serde(flatten)]
    pub guitar: Guitar,
    pub strings: Option<String>,
}

/// Compare optional sort keys with missing values last
pub(crate) fn cmp_missing_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn index_by_id<T: Clone>(rows: &[T], id: impl Fn(&T) -> Option<i64>) -> HashMap<i64, T> {
    rows.iter()
        .filter_map(|r| id(r).map(|i| (i, r.clone())))
        .collect()
}

fn artist_index(tables: &Tables) -> HashMap<i64, Artist> {
    index_by_id(&tables.artists.rows, |a| a.id)
}

/// Artists sorted by last name
pub fn sorted_artists(tables: &Tables) -> Vec<Artist> {
    let mut artists = tables.artists.rows.clone();
    artists.sort_by(|a, b| a.last_name().cmp(b.last_name()).then_with(|| a.name.cmp(&b.name)));
    artists
}

/// Songs joined to composer and style, by composer surname then title
pub fn resolve_songs(tables: &Tables) -> Vec<ResolvedSong> {
    let artists = artist_index(tables);
    let styles: HashMap<i64, String> = tables
        .styles
        .rows
        .iter()
        .filter_map(|s| s.id.map(|id| (id, s.style.clone())))
        .collect();

    let mut songs: Vec<ResolvedSong> = tables
        .songs
        .rows
        .iter()
        .map(|song| {
            let composer = song.composer_id.and_then(|id| artists.get(&id));
            ResolvedSong {
                id: song.id,
                title: song.title.clone(),
                song_type: song.song_type,
                style_id: song.style_id,
                style: song.style_id.and_then(|id| styles.get(&id).cloned()),
                composer_id: song.composer_id,
                composer: composer.map(|a| a.name.clone()),
                composer_last: composer.map(|a| a.last_name().to_string()),
            }
        })
        .collect();

    songs.sort_by(|a, b| {
        cmp_missing_last(&a.composer_last, &b.composer_last).then_with(|| a.title.cmp(&b.title))
    });
    songs
}

/// Arrangements joined to song (with its composer and style) and arranger
pub fn resolve_arrangements(tables: &Tables) -> Vec<ResolvedArrangement> {
    let artists = artist_index(tables);
    let songs = index_by_id(&resolve_songs(tables), |s| s.id);

    let mut arrangements: Vec<ResolvedArrangement> = tables
        .arrangements
        .rows
        .iter()
        .map(|arr| {
            let song = arr.song_id.and_then(|id| songs.get(&id));
            let arranger = arr.arranger.and_then(|id| artists.get(&id));
            ResolvedArrangement {
                id: arr.id,
                song_id: arr.song_id,
                title: song.map(|s| s.title.clone()),
                song_type: song.and_then(|s| s.song_type),
                style: song.and_then(|s| s.style.clone()),
                composer: song.and_then(|s| s.composer.clone()),
                composer_last: song.and_then(|s| s.composer_last.clone()),
                arranger_id: arr.arranger,
                arranger: arranger.map(|a| a.name.clone()),
                arranger_last: arranger.map(|a| a.last_name().to_string()),
                milestones: arr.milestones,
                difficulty: arr.difficulty.clone(),
                sheet_music_link: arr.sheet_music_link.clone(),
                performance_link: arr.performance_link.clone(),
            }
        })
        .collect();

    arrangements.sort_by(|a, b| {
        cmp_missing_last(&a.composer_last, &b.composer_last)
            .then_with(|| cmp_missing_last(&a.title, &b.title))
    });
    arrangements
}

/// Practice sessions joined to arrangement and guitar, newest first
pub fn resolve_sessions(tables: &Tables) -> Vec<ResolvedSession> {
    let arrangements = index_by_id(&resolve_arrangements(tables), |a| a.id);
    let guitars = index_by_id(&tables.guitars.rows, |g| g.id);

    let mut sessions: Vec<ResolvedSession> = tables
        .sessions
        .rows
        .iter()
        .map(|s| {
            let arr = s.arrangement_id.and_then(|id| arrangements.get(&id));
            let guitar = s.guitar_id.and_then(|id| guitars.get(&id));
            ResolvedSession {
                id: s.id,
                session_date: s.session_date,
                duration: s.duration,
                arrangement_id: s.arrangement_id,
                song_id: arr.and_then(|a| a.song_id),
                song: arr.and_then(|a| a.title.clone()),
                song_type: arr.and_then(|a| a.song_type),
                style: arr.and_then(|a| a.style.clone()),
                composer: arr.and_then(|a| a.composer.clone()),
                composer_last: arr.and_then(|a| a.composer_last.clone()),
                arranger: arr.and_then(|a| a.arranger.clone()),
                arranger_last: arr.and_then(|a| a.arranger_last.clone()),
                guitar_id: s.guitar_id,
                guitar_make: guitar.map(|g| g.make.clone()),
                guitar_model: guitar.map(|g| g.model.clone()),
                notes: s.notes.clone(),
                video_url: s.video_url.clone(),
                stage: s.stage,
            }
        })
        .collect();

    sessions.sort_by(|a, b| b.session_date.cmp(&a.session_date));
    sessions
}

/// Arrangement goals, most recently discovered first
pub fn resolve_arrangement_goals(tables: &Tables) -> Vec<ResolvedArrangementGoal> {
    let arrangements = index_by_id(&resolve_arrangements(tables), |a| a.id);

    let mut goals: Vec<ResolvedArrangementGoal> = tables
        .arrangement_goals
        .rows
        .iter()
        .map(|g| {
            let arr = arrangements.get(&g.arrangement_id);
            ResolvedArrangementGoal {
                id: g.id,
                arrangement_id: g.arrangement_id,
                title: arr.and_then(|a| a.title.clone()),
                composer: arr.and_then(|a| a.composer.clone()),
                arranger: arr.and_then(|a| a.arranger.clone()),
                discovery_date: g.discovery_date,
                description: g.description.clone(),
            }
        })
        .collect();

    goals.sort_by(|a, b| b.discovery_date.cmp(&a.discovery_date));
    goals
}

/// Song goals, most recently discovered first
pub fn resolve_song_goals(tables: &Tables) -> Vec<ResolvedSongGoal> {
    let songs = index_by_id(&resolve_songs(tables), |s| s.id);

    let mut goals: Vec<ResolvedSongGoal> = tables
        .song_goals
        .rows
        .iter()
        .map(|g| {
            let song = songs.get(&g.song_id);
            ResolvedSongGoal {
                id: g.id,
                song_id: g.song_id,
                title: song.map(|s| s.title.clone()),
                composer: song.and_then(|s| s.composer.clone()),
                discovery_date: g.discovery_date,
                description: g.description.clone(),
            }
        })
        .collect();

    goals.sort_by(|a, b| b.discovery_date.cmp(&a.discovery_date));
    goals
}

/// Guitars joined to their string set, in table order
pub fn resolve_guitars(tables: &Tables) -> Vec<ResolvedGuitar> {
    let string_sets: HashMap<i64, String> = tables
        .string_sets
        .rows
        .iter()
        .filter_map(|s| s.id.map(|id| (id, s.name.clone())))
        .collect();

    tables
        .guitars
        .rows
        .iter()
        .map(|g| ResolvedGuitar {
            guitar: g.clone(),
            strings: g.string_set_id.and_then(|id| string_sets.get(&id).cloned()),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small in-memory data set shared by resolver and report tests

    use crate::db::Tables;
    use crate::models::*;
    use chrono::NaiveDate;

    pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    pub fn artist(id: i64, name: &str) -> Artist {
        Artist { id: Some(id), name: name.into() }
    }

    pub fn song(id: i64, title: &str, composer: Option<i64>, style: Option<i64>) -> Song {
        Song {
            id: Some(id),
            title: title.into(),
            style_id: style,
            composer_id: composer,
            song_type: Some(SongType::Song),
        }
    }

    pub fn arrangement(id: i64, song: i64, arranger: Option<i64>) -> Arrangement {
        Arrangement {
            id: Some(id),
            song_id: Some(song),
            arranger,
            milestones: Milestones::default(),
            difficulty: None,
            sheet_music_link: None,
            performance_link: None,
        }
    }

    pub fn session(id: i64, date: NaiveDate, minutes: i64, arrangement: Option<i64>) -> PracticeSession {
        PracticeSession {
            id: Some(id),
            session_date: date,
            duration: minutes,
            guitar_id: Some(1),
            arrangement_id: arrangement,
            notes: None,
            video_url: None,
            stage: None,
        }
    }

    pub fn arrangement_goal(id: i64, arrangement: i64, date: NaiveDate) -> ArrangementGoal {
        ArrangementGoal {
            id: Some(id),
            arrangement_id: arrangement,
            discovery_date: date,
            description: None,
        }
    }

    pub fn guitar(id: i64, make: &str, default_guitar: bool) -> Guitar {
        Guitar {
            id: Some(id),
            make: make.into(),
            model: "Classical".into(),
            status: GuitarStatus::Permanent,
            about: "Nylon string".into(),
            string_set_id: Some(1),
            image_link: None,
            date_added: None,
            date_retired: None,
            strings_install_date: None,
            default_guitar,
        }
    }

    /// Three composers, four songs (one without composer or style), four arrangements
    pub fn tables() -> Tables {
        let mut t = Tables::empty(false);
        t.artists.rows = vec![
            artist(1, "Fernando Sor"),
            artist(2, "Francisco Tarrega"),
            artist(3, "Matteo Carcassi"),
        ];
        t.styles.rows = vec![Style { id: Some(1), style: "Classical".into() }];
        t.string_sets.rows = vec![StringSet {
            id: Some(1),
            name: "D'Addario Pro-Arte".into(),
            hyperlink: None,
            image_url: None,
        }];
        t.songs.rows = vec![
            song(10, "Lagrima", Some(2), Some(1)),
            song(11, "Study in B minor", Some(1), Some(1)),
            song(12, "Greensleeves", None, None),
            song(13, "Andantino", Some(3), Some(1)),
        ];
        t.arrangements.rows = vec![
            arrangement(100, 10, Some(2)),
            arrangement(101, 11, None),
            arrangement(102, 12, Some(3)),
            arrangement(103, 13, Some(3)),
        ];
        t.guitars.rows = vec![guitar(1, "Yamaha", true), guitar(2, "Cordoba", false)];
        t
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_song_with_null_composer_and_style_resolves() {
        let tables = tables();
        let songs = resolve_songs(&tables);
        assert_eq!(songs.len(), tables.songs.rows.len());

        let greensleeves = songs.iter().find(|s| s.id == Some(12)).unwrap();
        assert_eq!(greensleeves.composer, None);
        assert_eq!(greensleeves.style, None);
        // Missing composer sorts last
        assert_eq!(songs.last().unwrap().id, Some(12));
    }

    #[test]
    fn test_songs_sorted_by_composer_surname() {
        let titles: Vec<String> = resolve_songs(&tables()).into_iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Andantino", "Study in B minor", "Lagrima", "Greensleeves"]
        );
    }

    #[test]
    fn test_dangling_keys_keep_rows() {
        let mut tables = tables();
        tables.arrangements.rows.push(arrangement(104, 999, Some(999)));
        tables.sessions.rows = vec![
            session(1, d(2024, 1, 1), 30, Some(104)),
            session(2, d(2024, 1, 2), 20, None),
        ];
        tables.sessions.rows[1].guitar_id = Some(42);

        let arrangements = resolve_arrangements(&tables);
        assert_eq!(arrangements.len(), tables.arrangements.rows.len());
        let dangling = arrangements.iter().find(|a| a.id == Some(104)).unwrap();
        assert_eq!(dangling.title, None);
        assert_eq!(dangling.arranger, None);

        let sessions = resolve_sessions(&tables);
        assert_eq!(sessions.len(), 2);
        // Newest first
        assert_eq!(sessions[0].id, Some(2));
        assert_eq!(sessions[0].song, None);
        assert_eq!(sessions[0].guitar_make, None);
        assert_eq!(sessions[1].song, None);
        assert_eq!(sessions[1].guitar_make.as_deref(), Some("Yamaha"));
    }

    #[test]
    fn test_session_carries_arrangement_labels() {
        let mut tables = tables();
        tables.sessions.rows = vec![session(1, d(2024, 3, 1), 45, Some(100))];
        let s = &resolve_sessions(&tables)[0];
        assert_eq!(s.song.as_deref(), Some("Lagrima"));
        assert_eq!(s.composer_last.as_deref(), Some("Tarrega"));
        assert_eq!(s.arranger_last.as_deref(), Some("Tarrega"));
        assert_eq!(s.style.as_deref(), Some("Classical"));
        assert_eq!(s.song_id, Some(10));
    }

    #[test]
    fn test_goals_newest_first() {
        let mut tables = tables();
        tables.arrangement_goals.rows = vec![
            arrangement_goal(1, 100, d(2024, 1, 1)),
            arrangement_goal(2, 102, d(2024, 5, 1)),
        ];
        let goals = resolve_arrangement_goals(&tables);
        assert_eq!(goals[0].id, Some(2));
        assert_eq!(goals[0].composer, None);
        assert_eq!(goals[0].arranger.as_deref(), Some("Matteo Carcassi"));
    }

    #[test]
    fn test_guitar_strings_label() {
        let guitars = resolve_guitars(&tables());
        assert_eq!(guitars[0].strings.as_deref(), Some("D'Addario Pro-Arte"));
    }

    #[test]
    fn test_missing_values_sort_last() {
        let mut keys = vec![None, Some(2), Some(1)];
        keys.sort_by(cmp_missing_last);
        assert_eq!(keys, vec![Some(1), Some(2), None]);
    }
}
