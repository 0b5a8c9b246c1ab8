use super::{selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{Entity, Style};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::Result;

pub struct StyleInputTableModel;

impl InputTableModel for StyleInputTableModel {
    fn entity(&self) -> Entity {
        Entity::Style
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::style_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, _today: NaiveDate) -> Result<InputForm> {
        let style = selected(&tables.styles, Entity::Style, id)?;
        let fields = vec![FormField::text("style", "Style", style.map(|s| s.style.clone())).required()];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, _tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["style"])?;
        let style = Style {
            id: submission.id,
            style: submission.text("style").unwrap_or_default(),
        };
        Ok(vec![submission.write(Entity::Style, style.to_row())])
    }
}
