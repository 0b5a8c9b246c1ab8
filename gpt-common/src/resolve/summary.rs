//! Summary tables for the table navigator
//!
//! Fixed projections of the resolved rows with human-readable column labels.
//! The first column of every table is `id`; dates render as `MM/DD/YYYY`.

use super::{
    resolve_arrangement_goals, resolve_arrangements, resolve_guitars, resolve_sessions,
    resolve_song_goals, resolve_songs, sorted_artists,
};
use crate::db::{Tables, Value};
use crate::time::display_date;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Value>>,
}

impl SummaryTable {
    fn new(columns: &[&'static str]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    /// Cell of the row whose id is `id`
    pub fn cell(&self, id: i64, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows
            .iter()
            .find(|r| r.first() == Some(&Value::Int(id)))
            .and_then(|r| r.get(index))
    }
}

fn text(value: Option<impl Into<String>>) -> Value {
    value.map(|v| Value::Text(v.into())).unwrap_or(Value::Null)
}

fn date(value: Option<NaiveDate>) -> Value {
    text(display_date(value))
}

pub fn artist_summary(tables: &Tables) -> SummaryTable {
    let mut table = SummaryTable::new(&["id", "Artist"]);
    for a in sorted_artists(tables) {
        table.push(vec![a.id.into(), a.name.into()]);
    }
    table
}

pub fn style_summary(tables: &Tables) -> SummaryTable {
    let mut styles = tables.styles.rows.clone();
    styles.sort_by(|a, b| a.style.cmp(&b.style));
    let mut table = SummaryTable::new(&["id", "Style"]);
    for s in styles {
        table.push(vec![s.id.into(), s.style.into()]);
    }
    table
}

pub fn string_set_summary(tables: &Tables) -> SummaryTable {
    let mut sets = tables.string_sets.rows.clone();
    sets.sort_by(|a, b| a.name.cmp(&b.name));
    let mut table = SummaryTable::new(&["id", "Name", "Hyperlink", "Image URL"]);
    for s in sets {
        table.push(vec![
            s.id.into(),
            s.name.into(),
            s.hyperlink.into(),
            s.image_url.into(),
        ]);
    }
    table
}

pub fn song_summary(tables: &Tables) -> SummaryTable {
    let mut table = SummaryTable::new(&["id", "Title", "Composer", "Song Type", "Style"]);
    for s in resolve_songs(tables) {
        table.push(vec![
            s.id.into(),
            s.title.into(),
            s.composer.into(),
            text(s.song_type.map(|t| t.label())),
            s.style.into(),
        ]);
    }
    table
}

pub fn arrangement_summary(tables: &Tables) -> SummaryTable {
    let mut table = SummaryTable::new(&[
        "id",
        "Title",
        "Composer",
        "Arranger",
        "Song Type",
        "Style",
        "Start Date",
        "Off Book Date",
        "At Tempo Date",
        "Play Ready Date",
        "Difficulty",
        "Sheet Music Link",
        "Performance Link",
    ]);
    for a in resolve_arrangements(tables) {
        table.push(vec![
            a.id.into(),
            a.title.into(),
            a.composer.into(),
            a.arranger.into(),
            text(a.song_type.map(|t| t.label())),
            a.style.into(),
            date(a.milestones.start_date),
            date(a.milestones.off_book_date),
            date(a.milestones.at_tempo_date),
            date(a.milestones.play_ready_date),
            a.difficulty.into(),
            a.sheet_music_link.into(),
            a.performance_link.into(),
        ]);
    }
    table
}

pub fn arrangement_goal_summary(tables: &Tables) -> SummaryTable {
    let mut table = SummaryTable::new(&[
        "id",
        "Title",
        "Composer",
        "Arranger",
        "Date Discovered",
        "Description",
    ]);
    for g in resolve_arrangement_goals(tables) {
        table.push(vec![
            g.id.into(),
            g.title.into(),
            g.composer.into(),
            g.arranger.into(),
            date(Some(g.discovery_date)),
            g.description.into(),
        ]);
    }
    table
}

pub fn song_goal_summary(tables: &Tables) -> SummaryTable {
    let mut table =
        SummaryTable::new(&["id", "Title", "Composer", "Date Discovered", "Description"]);
    for g in resolve_song_goals(tables) {
        table.push(vec![
            g.id.into(),
            g.title.into(),
            g.composer.into(),
            date(Some(g.discovery_date)),
            g.description.into(),
        ]);
    }
    table
}

pub fn guitar_summary(tables: &Tables) -> SummaryTable {
    let mut table = SummaryTable::new(&[
        "id",
        "Make",
        "Model",
        "Status",
        "About",
        "Image Link",
        "Date Added",
        "Date Retired",
        "Strings Installed",
        "Strings",
        "Default Guitar",
    ]);
    for r in resolve_guitars(tables) {
        let g = r.guitar;
        let default_msg = if g.default_guitar {
            "Default for new Sessions"
        } else {
            ""
        };
        table.push(vec![
            g.id.into(),
            g.make.into(),
            g.model.into(),
            g.status.label().to_string().into(),
            g.about.into(),
            g.image_link.into(),
            date(g.date_added),
            date(g.date_retired),
            date(g.strings_install_date),
            r.strings.into(),
            default_msg.to_string().into(),
        ]);
    }
    table
}

pub fn session_summary(tables: &Tables) -> SummaryTable {
    let mut table = SummaryTable::new(&[
        "id",
        "Session Date",
        "Duration",
        "Song",
        "Composer",
        "Arranger",
        "Stage",
        "Notes",
        "Video URL",
        "Guitar Make",
        "Guitar Model",
    ]);
    for s in resolve_sessions(tables) {
        table.push(vec![
            s.id.into(),
            date(Some(s.session_date)),
            s.duration.into(),
            s.song.into(),
            s.composer.into(),
            s.arranger.into(),
            text(s.stage.map(|st| st.label())),
            s.notes.into(),
            s.video_url.into(),
            s.guitar_make.into(),
            s.guitar_model.into(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_summary_row_count_matches_fact_table() {
        let mut tables = tables();
        tables.sessions.rows = vec![
            session(1, d(2024, 2, 5), 30, Some(100)),
            session(2, d(2024, 2, 6), 30, Some(555)),
        ];
        assert_eq!(song_summary(&tables).rows.len(), 4);
        assert_eq!(arrangement_summary(&tables).rows.len(), 4);
        assert_eq!(session_summary(&tables).rows.len(), 2);
    }

    #[test]
    fn test_dates_render_month_first() {
        let mut tables = tables();
        tables.sessions.rows = vec![session(1, d(2024, 2, 5), 30, Some(100))];
        let summary = session_summary(&tables);
        assert_eq!(summary.cell(1, "Session Date"), Some(&Value::Text("02/05/2024".into())));
        assert_eq!(summary.cell(1, "Song"), Some(&Value::Text("Lagrima".into())));
    }

    #[test]
    fn test_null_labels_stay_null() {
        let summary = song_summary(&tables());
        assert_eq!(summary.cell(12, "Composer"), Some(&Value::Null));
        assert_eq!(summary.cell(12, "Style"), Some(&Value::Null));
    }

    #[test]
    fn test_guitar_default_message() {
        let summary = guitar_summary(&tables());
        assert_eq!(
            summary.cell(1, "Default Guitar"),
            Some(&Value::Text("Default for new Sessions".into()))
        );
        assert_eq!(summary.cell(2, "Default Guitar"), Some(&Value::Text(String::new())));
    }
}
