use super::{id_value, selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{Entity, Guitar, GuitarStatus};
use gpt_common::resolve::lookup::{guitar_status_lookup, string_set_lookup};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::{Error, Result};

pub struct GuitarInputTableModel;

impl InputTableModel for GuitarInputTableModel {
    fn entity(&self) -> Entity {
        Entity::Guitar
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::guitar_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, _today: NaiveDate) -> Result<InputForm> {
        let guitar = selected(&tables.guitars, Entity::Guitar, id)?;
        let fields = vec![
            FormField::text("make", "Make", guitar.map(|g| g.make.clone())).required(),
            FormField::text("model", "Model", guitar.map(|g| g.model.clone())).required(),
            FormField::select(
                "status",
                "Status",
                guitar_status_lookup(),
                guitar.map(|g| g.status.label().to_string()),
            )
            .required(),
            FormField::text_area("about", "About", guitar.map(|g| g.about.clone())).required(),
            FormField::select(
                "string_set_id",
                "Strings",
                string_set_lookup(tables),
                id_value(guitar.and_then(|g| g.string_set_id)),
            )
            .required(),
            FormField::text("image_link", "Image Link", guitar.and_then(|g| g.image_link.clone())),
            FormField::date("date_added", "Date Added", guitar.and_then(|g| g.date_added)),
            FormField::date(
                "strings_install_date",
                "Strings Installed",
                guitar.and_then(|g| g.strings_install_date),
            ),
            FormField::date("date_retired", "Date Retired", guitar.and_then(|g| g.date_retired)),
            FormField::checkbox(
                "default_guitar",
                "Default for new Sessions",
                guitar.is_some_and(|g| g.default_guitar),
            ),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    /// Marking a guitar default first clears the flag on every other default
    /// guitar, so at most one stays marked when every write succeeds.
    fn plan_submit(&self, tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["make", "model", "status", "about", "string_set_id"])?;
        let status = submission
            .choice("status", &guitar_status_lookup())?
            .and_then(|label| GuitarStatus::from_label(&label))
            .ok_or_else(|| Error::Validation("Invalid guitar status".to_string()))?;

        let guitar = Guitar {
            id: submission.id,
            make: submission.text("make").unwrap_or_default(),
            model: submission.text("model").unwrap_or_default(),
            status,
            about: submission.text("about").unwrap_or_default(),
            string_set_id: submission.reference("string_set_id", &string_set_lookup(tables))?,
            image_link: submission.text("image_link"),
            date_added: submission.date("date_added")?,
            date_retired: submission.date("date_retired")?,
            strings_install_date: submission.date("strings_install_date")?,
            default_guitar: submission.flag("default_guitar")?,
        };

        let mut ops = Vec::new();
        if guitar.default_guitar {
            for other in &tables.guitars.rows {
                let Some(other_id) = other.id else { continue };
                if other.default_guitar && Some(other_id) != submission.id {
                    let demoted = Guitar {
                        default_guitar: false,
                        ..other.clone()
                    };
                    ops.push(WriteOp::update(Entity::Guitar, other_id, demoted.to_row()));
                }
            }
        }
        ops.push(submission.write(Entity::Guitar, guitar.to_row()));
        Ok(ops)
    }
}
