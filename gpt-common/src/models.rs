//! Entity records
//!
//! One struct per table. Foreign keys are `Option<i64>` so a missing
//! reference survives every join unchanged.

use crate::db::schema::{self, Row, TableDef, Value};
use crate::db::Record;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Every entity the data entry service edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Artist,
    Style,
    StringSet,
    Song,
    Arrangement,
    ArrangementGoal,
    SongGoal,
    Guitar,
    Session,
}

impl Entity {
    pub const ALL: [Entity; 9] = [
        Entity::Artist,
        Entity::Style,
        Entity::StringSet,
        Entity::Song,
        Entity::Arrangement,
        Entity::ArrangementGoal,
        Entity::SongGoal,
        Entity::Guitar,
        Entity::Session,
    ];

    /// URL path segment and form namespace
    pub fn namespace(self) -> &'static str {
        match self {
            Entity::Artist => "artist",
            Entity::Style => "style",
            Entity::StringSet => "string_set",
            Entity::Song => "song",
            Entity::Arrangement => "arrangement",
            Entity::ArrangementGoal => "arrangement_goal",
            Entity::SongGoal => "song_goal",
            Entity::Guitar => "guitar",
            Entity::Session => "session",
        }
    }

    /// Display title used in form headings
    pub fn title(self) -> &'static str {
        match self {
            Entity::Artist => "Artist",
            Entity::Style => "Style",
            Entity::StringSet => "String Set",
            Entity::Song => "Song",
            Entity::Arrangement => "Arrangement",
            Entity::ArrangementGoal => "Arrangement Goal",
            Entity::SongGoal => "Song Goal",
            Entity::Guitar => "Guitar",
            Entity::Session => "Practice Session",
        }
    }

    pub fn from_namespace(namespace: &str) -> Option<Entity> {
        Entity::ALL.into_iter().find(|e| e.namespace() == namespace)
    }

    pub fn table(self) -> &'static TableDef {
        match self {
            Entity::Artist => &schema::ARTIST,
            Entity::Style => &schema::STYLE,
            Entity::StringSet => &schema::STRING_SET,
            Entity::Song => &schema::SONG,
            Entity::Arrangement => &schema::ARRANGEMENT,
            Entity::ArrangementGoal => &schema::ARRANGEMENT_GOALS,
            Entity::SongGoal => &schema::SONG_GOALS,
            Entity::Guitar => &schema::GUITAR,
            Entity::Session => &schema::PRACTICE_SESSION,
        }
    }
}

/// Position of a practice session in an arrangement's learning lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Learning Notes")]
    LearningNotes,
    #[serde(rename = "Achieving Tempo")]
    AchievingTempo,
    #[serde(rename = "Phrasing")]
    Phrasing,
    #[serde(rename = "Maintenance")]
    Maintenance,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::LearningNotes,
        Stage::AchievingTempo,
        Stage::Phrasing,
        Stage::Maintenance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::LearningNotes => "Learning Notes",
            Stage::AchievingTempo => "Achieving Tempo",
            Stage::Phrasing => "Phrasing",
            Stage::Maintenance => "Maintenance",
        }
    }

    pub fn from_label(label: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SongType {
    Song,
    Exercise,
}

impl SongType {
    pub const ALL: [SongType; 2] = [SongType::Song, SongType::Exercise];

    pub fn label(self) -> &'static str {
        match self {
            SongType::Song => "Song",
            SongType::Exercise => "Exercise",
        }
    }

    pub fn from_label(label: &str) -> Option<SongType> {
        SongType::ALL.into_iter().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuitarStatus {
    Permanent,
    Temporary,
    Retired,
}

impl GuitarStatus {
    pub const ALL: [GuitarStatus; 3] = [
        GuitarStatus::Permanent,
        GuitarStatus::Temporary,
        GuitarStatus::Retired,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GuitarStatus::Permanent => "Permanent",
            GuitarStatus::Temporary => "Temporary",
            GuitarStatus::Retired => "Retired",
        }
    }

    pub fn from_label(label: &str) -> Option<GuitarStatus> {
        GuitarStatus::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// Difficulty labels offered by the arrangement form
pub const DIFFICULTIES: [&str; 3] = ["Beginner", "Intermediate", "Advanced"];

// Column accessors. Absent columns read as NULL.

fn value<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn wrong_type(column: &str, found: &Value) -> Error {
    Error::InvalidInput(format!("Column {} holds unexpected value {:?}", column, found))
}

fn opt_int(row: &Row, column: &str) -> Result<Option<i64>> {
    match value(row, column) {
        Value::Null => Ok(None),
        Value::Int(v) => Ok(Some(*v)),
        other => Err(wrong_type(column, other)),
    }
}

fn opt_text(row: &Row, column: &str) -> Result<Option<String>> {
    match value(row, column) {
        Value::Null => Ok(None),
        Value::Text(v) => Ok(Some(v.clone())),
        other => Err(wrong_type(column, other)),
    }
}

fn opt_date(row: &Row, column: &str) -> Result<Option<NaiveDate>> {
    match value(row, column) {
        Value::Null => Ok(None),
        Value::Date(v) => Ok(Some(*v)),
        other => Err(wrong_type(column, other)),
    }
}

fn opt_bool(row: &Row, column: &str) -> Result<Option<bool>> {
    match value(row, column) {
        Value::Null => Ok(None),
        Value::Bool(v) => Ok(Some(*v)),
        Value::Int(v) => Ok(Some(*v != 0)),
        other => Err(wrong_type(column, other)),
    }
}

fn required<T>(v: Option<T>, table: &str, column: &str) -> Result<T> {
    v.ok_or_else(|| Error::InvalidInput(format!("{}.{} is NULL", table, column)))
}

fn row_of(pairs: Vec<(&str, Value)>) -> Row {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub id: Option<i64>,
    pub name: String,
}

impl Artist {
    /// Surname, taken as the last word of a "first last" name
    pub fn last_name(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or("")
    }
}

impl Record for Artist {
    const ENTITY: Entity = Entity::Artist;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: opt_int(row, "id")?,
            name: required(opt_text(row, "name")?, "artist", "name")?,
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![("id", self.id.into()), ("name", self.name.clone().into())])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub id: Option<i64>,
    pub style: String,
}

impl Record for Style {
    const ENTITY: Entity = Entity::Style;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: opt_int(row, "id")?,
            style: required(opt_text(row, "style")?, "style", "style")?,
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![("id", self.id.into()), ("style", self.style.clone().into())])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringSet {
    pub id: Option<i64>,
    pub name: String,
    pub hyperlink: Option<String>,
    pub image_url: Option<String>,
}

impl Record for StringSet {
    const ENTITY: Entity = Entity::StringSet;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: opt_int(row, "id")?,
            name: required(opt_text(row, "name")?, "string_set", "name")?,
            hyperlink: opt_text(row, "hyperlink")?,
            image_url: opt_text(row, "image_url")?,
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("hyperlink", self.hyperlink.clone().into()),
            ("image_url", self.image_url.clone().into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub id: Option<i64>,
    pub title: String,
    pub style_id: Option<i64>,
    pub composer_id: Option<i64>,
    pub song_type: Option<SongType>,
}

impl Record for Song {
    const ENTITY: Entity = Entity::Song;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        let song_type = match opt_text(row, "song_type")? {
            Some(label) if !label.is_empty() => {
                let song_type = SongType::from_label(&label);
                if song_type.is_none() {
                    warn!("Unknown song type {:?} read as unset", label);
                }
                song_type
            }
            _ => None,
        };
        Ok(Self {
            id: opt_int(row, "id")?,
            title: required(opt_text(row, "title")?, "song", "title")?,
            style_id: opt_int(row, "style_id")?,
            composer_id: opt_int(row, "composer_id")?,
            song_type,
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("style_id", self.style_id.into()),
            ("composer_id", self.composer_id.into()),
            (
                "song_type",
                self.song_type.map(|t| t.label().to_string()).into(),
            ),
        ])
    }
}

/// The four learning milestones of an arrangement, in assumed order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Milestones {
    pub start_date: Option<NaiveDate>,
    pub off_book_date: Option<NaiveDate>,
    pub at_tempo_date: Option<NaiveDate>,
    pub play_ready_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrangement {
    pub id: Option<i64>,
    pub song_id: Option<i64>,
    pub arranger: Option<i64>,
    #[serde(flatten)]
    pub milestones: Milestones,
    pub difficulty: Option<String>,
    pub sheet_music_link: Option<String>,
    pub performance_link: Option<String>,
}

impl Record for Arrangement {
    const ENTITY: Entity = Entity::Arrangement;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: opt_int(row, "id")?,
            song_id: opt_int(row, "song_id")?,
            arranger: opt_int(row, "arranger")?,
            milestones: Milestones {
                start_date: opt_date(row, "start_date")?,
                off_book_date: opt_date(row, "off_book_date")?,
                at_tempo_date: opt_date(row, "at_tempo_date")?,
                play_ready_date: opt_date(row, "play_ready_date")?,
            },
            difficulty: opt_text(row, "difficulty")?,
            sheet_music_link: opt_text(row, "sheet_music_link")?,
            performance_link: opt_text(row, "performance_link")?,
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![
            ("id", self.id.into()),
            ("song_id", self.song_id.into()),
            ("arranger", self.arranger.into()),
            ("start_date", self.milestones.start_date.into()),
            ("off_book_date", self.milestones.off_book_date.into()),
            ("at_tempo_date", self.milestones.at_tempo_date.into()),
            ("play_ready_date", self.milestones.play_ready_date.into()),
            ("difficulty", self.difficulty.clone().into()),
            ("sheet_music_link", self.sheet_music_link.clone().into()),
            ("performance_link", self.performance_link.clone().into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrangementGoal {
    pub id: Option<i64>,
    pub arrangement_id: i64,
    pub discovery_date: NaiveDate,
    pub description: Option<String>,
}

impl Record for ArrangementGoal {
    const ENTITY: Entity = Entity::ArrangementGoal;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: opt_int(row, "id")?,
            arrangement_id: required(
                opt_int(row, "arrangement_id")?,
                "arrangement_goals",
                "arrangement_id",
            )?,
            discovery_date: required(
                opt_date(row, "discovery_date")?,
                "arrangement_goals",
                "discovery_date",
            )?,
            description: opt_text(row, "description")?,
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![
            ("id", self.id.into()),
            ("arrangement_id", self.arrangement_id.into()),
            ("discovery_date", self.discovery_date.into()),
            ("description", self.description.clone().into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongGoal {
    pub id: Option<i64>,
    pub song_id: i64,
    pub discovery_date: NaiveDate,
    pub description: Option<String>,
}

impl Record for SongGoal {
    const ENTITY: Entity = Entity::SongGoal;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: opt_int(row, "id")?,
            song_id: required(opt_int(row, "song_id")?, "song_goals", "song_id")?,
            discovery_date: required(
                opt_date(row, "discovery_date")?,
                "song_goals",
                "discovery_date",
            )?,
            description: opt_text(row, "description")?,
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![
            ("id", self.id.into()),
            ("song_id", self.song_id.into()),
            ("discovery_date", self.discovery_date.into()),
            ("description", self.description.clone().into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guitar {
    pub id: Option<i64>,
    pub make: String,
    pub model: String,
    pub status: GuitarStatus,
    pub about: String,
    pub string_set_id: Option<i64>,
    pub image_link: Option<String>,
    pub date_added: Option<NaiveDate>,
    pub date_retired: Option<NaiveDate>,
    pub strings_install_date: Option<NaiveDate>,
    pub default_guitar: bool,
}

impl Record for Guitar {
    const ENTITY: Entity = Entity::Guitar;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        let status = required(opt_text(row, "status")?, "guitar", "status")?;
        Ok(Self {
            id: opt_int(row, "id")?,
            make: required(opt_text(row, "make")?, "guitar", "make")?,
            model: required(opt_text(row, "model")?, "guitar", "model")?,
            status: GuitarStatus::from_label(&status)
                .ok_or_else(|| Error::InvalidInput(format!("Unknown guitar status: {}", status)))?,
            about: required(opt_text(row, "about")?, "guitar", "about")?,
            string_set_id: opt_int(row, "string_set_id")?,
            image_link: opt_text(row, "image_link")?,
            date_added: opt_date(row, "date_added")?,
            date_retired: opt_date(row, "date_retired")?,
            strings_install_date: opt_date(row, "strings_install_date")?,
            default_guitar: opt_bool(row, "default_guitar")?.unwrap_or(false),
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![
            ("id", self.id.into()),
            ("make", self.make.clone().into()),
            ("model", self.model.clone().into()),
            ("status", self.status.label().to_string().into()),
            ("about", self.about.clone().into()),
            ("string_set_id", self.string_set_id.into()),
            ("image_link", self.image_link.clone().into()),
            ("date_added", self.date_added.into()),
            ("date_retired", self.date_retired.into()),
            ("strings_install_date", self.strings_install_date.into()),
            ("default_guitar", self.default_guitar.into()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeSession {
    pub id: Option<i64>,
    pub session_date: NaiveDate,
    /// Minutes
    pub duration: i64,
    pub guitar_id: Option<i64>,
    pub arrangement_id: Option<i64>,
    pub notes: Option<String>,
    pub video_url: Option<String>,
    /// Stage at the time the session was written; never recomputed
    pub stage: Option<Stage>,
}

impl Record for PracticeSession {
    const ENTITY: Entity = Entity::Session;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: opt_int(row, "id")?,
            session_date: required(
                opt_date(row, "session_date")?,
                "practice_session",
                "session_date",
            )?,
            duration: required(opt_int(row, "duration")?, "practice_session", "duration")?,
            guitar_id: opt_int(row, "guitar_id")?,
            arrangement_id: opt_int(row, "l_arrangement_id")?,
            notes: opt_text(row, "notes")?,
            video_url: opt_text(row, "video_url")?,
            stage: opt_text(row, "stage")?.and_then(|s| Stage::from_label(&s)),
        })
    }

    fn to_row(&self) -> Row {
        row_of(vec![
            ("id", self.id.into()),
            ("session_date", self.session_date.into()),
            ("duration", self.duration.into()),
            ("guitar_id", self.guitar_id.into()),
            ("l_arrangement_id", self.arrangement_id.into()),
            ("notes", self.notes.clone().into()),
            ("video_url", self.video_url.clone().into()),
            ("stage", self.stage.map(|s| s.label().to_string()).into()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_artist_last_name() {
        let artist = Artist { id: Some(1), name: "Fernando Sor".into() };
        assert_eq!(artist.last_name(), "Sor");
        let single = Artist { id: Some(2), name: "Anonymous".into() };
        assert_eq!(single.last_name(), "Anonymous");
    }

    #[test]
    fn test_entity_namespace_lookup() {
        for entity in Entity::ALL {
            assert_eq!(Entity::from_namespace(entity.namespace()), Some(entity));
        }
        assert_eq!(Entity::from_namespace("nope"), None);
    }

    #[test]
    fn test_every_row_column_exists_in_table() {
        let session = PracticeSession {
            id: None,
            session_date: d(2024, 1, 1),
            duration: 30,
            guitar_id: Some(1),
            arrangement_id: Some(2),
            notes: None,
            video_url: None,
            stage: Some(Stage::Phrasing),
        };
        let row = session.to_row();
        let table = Entity::Session.table();
        for column in row.keys() {
            assert!(table.column(column).is_some(), "unknown column {}", column);
        }
        assert_eq!(row["l_arrangement_id"], Value::Int(2));
        assert_eq!(row["stage"], Value::Text("Phrasing".into()));
    }

    #[test]
    fn test_song_with_null_references() {
        let mut row = Row::new();
        row.insert("id".into(), Value::Int(7));
        row.insert("title".into(), Value::Text("Lagrima".into()));
        row.insert("style_id".into(), Value::Null);
        let song = Song::from_row(&row).unwrap();
        assert_eq!(song.composer_id, None);
        assert_eq!(song.style_id, None);
        assert_eq!(song.song_type, None);
    }

    #[test]
    fn test_unknown_song_type_reads_as_unset() {
        let mut row = Row::new();
        row.insert("id".into(), Value::Int(3));
        row.insert("title".into(), Value::Text("Adelita".into()));
        row.insert("song_type".into(), Value::Text("Etude".into()));
        let song = Song::from_row(&row).unwrap();
        assert_eq!(song.title, "Adelita");
        assert_eq!(song.song_type, None);
    }

    #[test]
    fn test_guitar_rejects_unknown_status() {
        let guitar = Guitar {
            id: Some(1),
            make: "Yamaha".into(),
            model: "CG101".into(),
            status: GuitarStatus::Permanent,
            about: "Nylon".into(),
            string_set_id: Some(1),
            image_link: None,
            date_added: None,
            date_retired: None,
            strings_install_date: None,
            default_guitar: true,
        };
        let mut row = guitar.to_row();
        assert_eq!(Guitar::from_row(&row).unwrap(), guitar);

        row.insert("status".into(), Value::Text("Borrowed".into()));
        assert!(Guitar::from_row(&row).is_err());
    }

    #[test]
    fn test_sqlite_integer_default_flag() {
        let mut row = Row::new();
        row.insert("default_guitar".into(), Value::Int(1));
        assert_eq!(opt_bool(&row, "default_guitar").unwrap(), Some(true));
    }

    #[test]
    fn test_unknown_stage_text_reads_as_none() {
        let mut row = PracticeSession {
            id: Some(1),
            session_date: d(2024, 1, 1),
            duration: 10,
            guitar_id: None,
            arrangement_id: None,
            notes: None,
            video_url: None,
            stage: None,
        }
        .to_row();
        row.insert("stage".into(), Value::Text(String::new()));
        assert_eq!(PracticeSession::from_row(&row).unwrap().stage, None);
    }
}
