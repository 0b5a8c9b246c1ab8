use super::{selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{Entity, StringSet};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::Result;

pub struct StringSetInputTableModel;

impl InputTableModel for StringSetInputTableModel {
    fn entity(&self) -> Entity {
        Entity::StringSet
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::string_set_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, _today: NaiveDate) -> Result<InputForm> {
        let set = selected(&tables.string_sets, Entity::StringSet, id)?;
        let fields = vec![
            FormField::text("name", "String Set Name", set.map(|s| s.name.clone())).required(),
            FormField::text("hyperlink", "Hyperlink", set.and_then(|s| s.hyperlink.clone())),
            FormField::text("image_url", "Image URL", set.and_then(|s| s.image_url.clone())),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, _tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["name"])?;
        let set = StringSet {
            id: submission.id,
            name: submission.text("name").unwrap_or_default(),
            hyperlink: submission.text("hyperlink"),
            image_url: submission.text("image_url"),
        };
        Ok(vec![submission.write(Entity::StringSet, set.to_row())])
    }
}
