use super::{id_value, selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{Arrangement, Entity, Milestones};
use gpt_common::resolve::lookup::{artist_lookup, difficulty_lookup, song_lookup};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::Result;

pub struct ArrangementInputTableModel;

impl InputTableModel for ArrangementInputTableModel {
    fn entity(&self) -> Entity {
        Entity::Arrangement
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::arrangement_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, _today: NaiveDate) -> Result<InputForm> {
        let arr = selected(&tables.arrangements, Entity::Arrangement, id)?;
        let milestones = arr.map(|a| a.milestones).unwrap_or_default();
        let fields = vec![
            FormField::select(
                "song_id",
                "Song",
                song_lookup(tables),
                id_value(arr.and_then(|a| a.song_id)),
            )
            .required(),
            FormField::select(
                "arranger",
                "Arranger",
                artist_lookup(tables),
                id_value(arr.and_then(|a| a.arranger)),
            ),
            FormField::date("start_date", "Start Date", milestones.start_date),
            FormField::date("off_book_date", "Off Book Date", milestones.off_book_date),
            FormField::date("at_tempo_date", "At Tempo Date", milestones.at_tempo_date),
            FormField::date("play_ready_date", "Play Ready Date", milestones.play_ready_date),
            FormField::select(
                "difficulty",
                "Difficulty",
                difficulty_lookup(),
                arr.and_then(|a| a.difficulty.clone()),
            ),
            FormField::text(
                "sheet_music_link",
                "Sheet Music Link",
                arr.and_then(|a| a.sheet_music_link.clone()),
            ),
            FormField::text(
                "performance_link",
                "Performance Link",
                arr.and_then(|a| a.performance_link.clone()),
            ),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["song_id"])?;
        let arrangement = Arrangement {
            id: submission.id,
            song_id: submission.reference("song_id", &song_lookup(tables))?,
            arranger: submission.reference("arranger", &artist_lookup(tables))?,
            milestones: Milestones {
                start_date: submission.date("start_date")?,
                off_book_date: submission.date("off_book_date")?,
                at_tempo_date: submission.date("at_tempo_date")?,
                play_ready_date: submission.date("play_ready_date")?,
            },
            difficulty: submission.choice("difficulty", &difficulty_lookup())?,
            sheet_music_link: submission.text("sheet_music_link"),
            performance_link: submission.text("performance_link"),
        };
        Ok(vec![submission.write(Entity::Arrangement, arrangement.to_row())])
    }
}
