//! Table Schema Definitions
//!
//! Single source of truth for the column layout of every table. The store
//! builds its SELECT/INSERT/UPDATE statements and the SQLite DDL from these.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Does this value fit a column of type `ty`
    pub fn fits(&self, ty: ColumnType) -> bool {
        matches!(
            (self, ty),
            (Value::Null, _)
                | (Value::Int(_), ColumnType::Integer)
                | (Value::Text(_), ColumnType::Text)
                | (Value::Bool(_), ColumnType::Boolean)
                | (Value::Date(_), ColumnType::Date)
        )
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        v.map(Value::Int).unwrap_or(Value::Null)
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        v.map(Value::Text).unwrap_or(Value::Null)
    }
}

impl From<Option<NaiveDate>> for Value {
    fn from(v: Option<NaiveDate>) -> Self {
        v.map(Value::Date).unwrap_or(Value::Null)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

/// A row: column name to scalar value
pub type Row = BTreeMap<String, Value>;

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Boolean,
    Date,
}

impl ColumnType {
    fn sqlite_decl(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
}

const fn col(name: &'static str, ty: ColumnType, nullable: bool) -> ColumnDef {
    ColumnDef { name, ty, nullable }
}

/// Table name plus columns; the first column is always `id`
#[derive(Debug, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Every column except `id`
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.name != "id")
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for the SQLite fallback
    pub fn sqlite_ddl(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.name == "id" {
                    "id INTEGER PRIMARY KEY".to_string()
                } else if c.nullable {
                    format!("{} {}", c.name, c.ty.sqlite_decl())
                } else {
                    format!("{} {} NOT NULL", c.name, c.ty.sqlite_decl())
                }
            })
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            columns.join(",\n    ")
        )
    }
}

use ColumnType::{Boolean, Date, Integer, Text};

pub static ARTIST: TableDef = TableDef {
    name: "artist",
    columns: &[col("id", Integer, false), col("name", Text, false)],
};

pub static STYLE: TableDef = TableDef {
    name: "style",
    columns: &[col("id", Integer, false), col("style", Text, false)],
};

pub static STRING_SET: TableDef = TableDef {
    name: "string_set",
    columns: &[
        col("id", Integer, false),
        col("name", Text, false),
        col("hyperlink", Text, true),
        col("image_url", Text, true),
    ],
};

pub static SONG: TableDef = TableDef {
    name: "song",
    columns: &[
        col("id", Integer, false),
        col("title", Text, false),
        col("style_id", Integer, true),
        col("composer_id", Integer, true),
        col("song_type", Text, true),
    ],
};

pub static ARRANGEMENT: TableDef = TableDef {
    name: "arrangement",
    columns: &[
        col("id", Integer, false),
        col("start_date", Date, true),
        col("off_book_date", Date, true),
        col("at_tempo_date", Date, true),
        col("play_ready_date", Date, true),
        col("song_id", Integer, false),
        col("arranger", Integer, true),
        col("difficulty", Text, true),
        col("sheet_music_link", Text, true),
        col("performance_link", Text, true),
    ],
};

pub static PRACTICE_SESSION: TableDef = TableDef {
    name: "practice_session",
    columns: &[
        col("id", Integer, false),
        col("session_date", Date, false),
        col("duration", Integer, false),
        col("guitar_id", Integer, false),
        col("l_arrangement_id", Integer, false),
        col("notes", Text, true),
        col("video_url", Text, true),
        col("stage", Text, true),
    ],
};

pub static GUITAR: TableDef = TableDef {
    name: "guitar",
    columns: &[
        col("id", Integer, false),
        col("make", Text, false),
        col("model", Text, false),
        col("status", Text, false),
        col("about", Text, false),
        col("string_set_id", Integer, false),
        col("image_link", Text, true),
        col("date_added", Date, true),
        col("date_retired", Date, true),
        col("strings_install_date", Date, true),
        col("default_guitar", Boolean, true),
    ],
};

pub static ARRANGEMENT_GOALS: TableDef = TableDef {
    name: "arrangement_goals",
    columns: &[
        col("id", Integer, false),
        col("arrangement_id", Integer, false),
        col("discovery_date", Date, false),
        col("description", Text, true),
    ],
};

pub static SONG_GOALS: TableDef = TableDef {
    name: "song_goals",
    columns: &[
        col("id", Integer, false),
        col("song_id", Integer, false),
        col("discovery_date", Date, false),
        col("description", Text, true),
    ],
};

/// All tables, lookup tables first
pub static ALL_TABLES: [&TableDef; 9] = [
    &STRING_SET,
    &ARTIST,
    &STYLE,
    &SONG,
    &ARRANGEMENT,
    &PRACTICE_SESSION,
    &ARRANGEMENT_GOALS,
    &SONG_GOALS,
    &GUITAR,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_starts_with_id() {
        for table in ALL_TABLES {
            assert_eq!(table.columns[0].name, "id", "table {}", table.name);
            assert_eq!(table.data_columns().count(), table.columns.len() - 1);
        }
    }

    #[test]
    fn test_sqlite_ddl() {
        let ddl = STRING_SET.sqlite_ddl();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS string_set"));
        assert!(ddl.contains("id INTEGER PRIMARY KEY"));
        assert!(ddl.contains("name TEXT NOT NULL"));
        assert!(ddl.contains("hyperlink TEXT,"));
    }

    #[test]
    fn test_value_fits_column() {
        assert!(Value::Null.fits(ColumnType::Date));
        assert!(Value::Int(3).fits(ColumnType::Integer));
        assert!(!Value::Int(3).fits(ColumnType::Text));
        assert!(!Value::Text("x".into()).fits(ColumnType::Boolean));
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_value(vec![
            Value::Null,
            Value::Int(4),
            Value::Text("a".into()),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!([null, 4, "a", "2024-01-02"]));
    }
}
