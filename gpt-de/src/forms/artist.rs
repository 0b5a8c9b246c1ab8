use super::{selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{Artist, Entity};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::Result;

pub struct ArtistInputTableModel;

impl InputTableModel for ArtistInputTableModel {
    fn entity(&self) -> Entity {
        Entity::Artist
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::artist_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, _today: NaiveDate) -> Result<InputForm> {
        let artist = selected(&tables.artists, Entity::Artist, id)?;
        let fields = vec![
            FormField::text("name", "Artist Name", artist.map(|a| a.name.clone())).required(),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, _tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["name"])?;
        let artist = Artist {
            id: submission.id,
            name: submission.text("name").unwrap_or_default(),
        };
        Ok(vec![submission.write(Entity::Artist, artist.to_row())])
    }
}
