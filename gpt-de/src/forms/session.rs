//! Practice session form
//!
//! The session's stage is not a form field. It is classified from the
//! arrangement's milestones as of the session date when the row is written,
//! and never recomputed afterwards.

use super::{id_value, selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{Entity, PracticeSession};
use gpt_common::report::classify;
use gpt_common::resolve::lookup::{default_guitar_id, guitar_lookup, session_arrangement_lookup};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::{Error, Result};
use tracing::warn;

pub struct SessionInputTableModel;

impl InputTableModel for SessionInputTableModel {
    fn entity(&self) -> Entity {
        Entity::Session
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::session_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, today: NaiveDate) -> Result<InputForm> {
        let session = selected(&tables.sessions, Entity::Session, id)?;
        let guitar = match session {
            Some(s) => s.guitar_id,
            None => default_guitar_id(tables),
        };
        let fields = vec![
            FormField::date(
                "session_date",
                "Session Date",
                Some(session.map(|s| s.session_date).unwrap_or(today)),
            )
            .required(),
            FormField::select("guitar_id", "Guitar", guitar_lookup(tables), id_value(guitar))
                .required(),
            FormField::text(
                "duration",
                "Duration (minutes)",
                session.map(|s| s.duration.to_string()),
            )
            .required(),
            FormField::select(
                "arrangement_id",
                "Arrangement",
                session_arrangement_lookup(tables, today),
                id_value(session.and_then(|s| s.arrangement_id)),
            )
            .required(),
            FormField::text_area("notes", "Notes", session.and_then(|s| s.notes.clone())),
            FormField::text("video_url", "Video URL", session.and_then(|s| s.video_url.clone())),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["session_date", "guitar_id", "duration", "arrangement_id"])?;
        let required = || Error::Validation(super::REQUIRED_FIELDS_MESSAGE.to_string());

        let session_date = submission.date("session_date")?.ok_or_else(required)?;
        let duration = submission.int("duration")?.ok_or_else(required)?;
        if duration < 0 {
            return Err(Error::Validation(format!(
                "Duration must not be negative: {}",
                duration
            )));
        }
        let guitar_id = submission.reference("guitar_id", &guitar_lookup(tables))?;
        let arrangement_id = submission.int("arrangement_id")?.ok_or_else(required)?;

        let milestones = match tables.arrangements.get(arrangement_id) {
            Some(arr) => arr.milestones,
            None => {
                warn!(
                    "Arrangement {} not found, classifying session without milestones",
                    arrangement_id
                );
                Default::default()
            }
        };

        let session = PracticeSession {
            id: submission.id,
            session_date,
            duration,
            guitar_id,
            arrangement_id: Some(arrangement_id),
            notes: submission.text("notes"),
            video_url: submission.text("video_url"),
            stage: Some(classify(&milestones, session_date)),
        };
        Ok(vec![submission.write(Entity::Session, session.to_row())])
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use gpt_common::db::{Value, WriteKind};

    fn plan(fields: &[(&str, &str)]) -> Result<Vec<WriteOp>> {
        SessionInputTableModel.plan_submit(&tables(), &submission(None, fields))
    }

    fn stage_of(ops: &[WriteOp]) -> Value {
        match &ops[0].kind {
            WriteKind::Insert(row) => row["stage"].clone(),
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_follows_milestones() {
        let base = [("guitar_id", "1"), ("duration", "30"), ("arrangement_id", "100")];
        let cases = [
            ("2024-01-15", "Learning Notes"),
            ("2024-02-01", "Achieving Tempo"),
            ("2024-03-15", "Phrasing"),
            ("2024-04-01", "Maintenance"),
        ];
        for (date, expected) in cases {
            let mut fields = base.to_vec();
            fields.push(("session_date", date));
            let ops = plan(&fields).unwrap();
            assert_eq!(stage_of(&ops), Value::Text(expected.into()), "{}", date);
        }
    }

    #[test]
    fn test_missing_arrangement_uses_empty_milestones() {
        let ops = plan(&[
            ("session_date", "2024-05-01"),
            ("guitar_id", "1"),
            ("duration", "30"),
            ("arrangement_id", "555"),
        ])
        .unwrap();
        assert_eq!(stage_of(&ops), Value::Text("Learning Notes".into()));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = plan(&[
            ("session_date", "2024-05-01"),
            ("guitar_id", "1"),
            ("duration", "-5"),
            ("arrangement_id", "100"),
        ]);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_zero_duration_allowed() {
        let ops = plan(&[
            ("session_date", "2024-05-01"),
            ("guitar_id", "2"),
            ("duration", "0"),
            ("arrangement_id", "100"),
        ])
        .unwrap();
        let WriteKind::Insert(row) = &ops[0].kind else {
            panic!("expected insert");
        };
        assert_eq!(row["duration"], Value::Int(0));
        assert_eq!(row["guitar_id"], Value::Int(2));
        assert_eq!(row["l_arrangement_id"], Value::Int(100));
    }

    #[test]
    fn test_new_form_preselects_default_guitar() {
        let form = SessionInputTableModel.form(&tables(), None, d(2024, 6, 1)).unwrap();
        assert_eq!(form.title, "Input Form - New Practice Session");
        assert_eq!(form.field("guitar_id").unwrap().value.as_deref(), Some("1"));
        assert_eq!(form.field("session_date").unwrap().value.as_deref(), Some("2024-06-01"));
    }
}
