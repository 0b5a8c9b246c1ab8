use super::{id_value, selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{Entity, Song, SongType};
use gpt_common::resolve::lookup::{artist_lookup, song_type_lookup, style_lookup};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::{Error, Result};

pub struct SongInputTableModel;

impl InputTableModel for SongInputTableModel {
    fn entity(&self) -> Entity {
        Entity::Song
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::song_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, _today: NaiveDate) -> Result<InputForm> {
        let song = selected(&tables.songs, Entity::Song, id)?;
        let fields = vec![
            FormField::text("title", "Title", song.map(|s| s.title.clone())).required(),
            FormField::select(
                "song_type",
                "Song Type",
                song_type_lookup(),
                song.and_then(|s| s.song_type).map(|t| t.label().to_string()),
            ),
            FormField::select(
                "style_id",
                "Style",
                style_lookup(tables),
                id_value(song.and_then(|s| s.style_id)),
            ),
            FormField::select(
                "composer_id",
                "Composer",
                artist_lookup(tables),
                id_value(song.and_then(|s| s.composer_id)),
            ),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["title"])?;
        let song_type = match submission.choice("song_type", &song_type_lookup())? {
            Some(label) => Some(
                SongType::from_label(&label)
                    .ok_or_else(|| Error::Validation(format!("Invalid song type: {}", label)))?,
            ),
            None => None,
        };
        let song = Song {
            id: submission.id,
            title: submission.text("title").unwrap_or_default(),
            style_id: submission.reference("style_id", &style_lookup(tables))?,
            composer_id: submission.reference("composer_id", &artist_lookup(tables))?,
            song_type,
        };
        Ok(vec![submission.write(Entity::Song, song.to_row())])
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use gpt_common::db::{Value, WriteKind};

    #[test]
    fn test_song_without_composer() {
        let ops = SongInputTableModel
            .plan_submit(
                &tables(),
                &submission(None, &[("title", "Romance"), ("composer_id", ""), ("song_type", "Song")]),
            )
            .unwrap();
        let WriteKind::Insert(row) = &ops[0].kind else {
            panic!("expected insert");
        };
        assert_eq!(row["composer_id"], Value::Null);
        assert_eq!(row["song_type"], Value::Text("Song".into()));
    }

    #[test]
    fn test_rejects_unknown_song_type() {
        let result = SongInputTableModel.plan_submit(
            &tables(),
            &submission(None, &[("title", "Romance"), ("song_type", "Ballad")]),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_composer_not_in_lookup() {
        let result = SongInputTableModel.plan_submit(
            &tables(),
            &submission(None, &[("title", "Romance"), ("composer_id", "99")]),
        );
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
