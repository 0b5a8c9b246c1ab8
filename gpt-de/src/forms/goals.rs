//! Arrangement and song goal forms
//!
//! A goal's reference is picked from a pool that leaves out anything that
//! already has a goal, so each arrangement (or song) carries at most one.

use super::{id_value, selected, FormField, FormSubmission, InputForm, InputTableModel};
use chrono::NaiveDate;
use gpt_common::db::{Record, Tables, WriteOp};
use gpt_common::models::{ArrangementGoal, Entity, SongGoal};
use gpt_common::resolve::lookup::{arrangement_goal_pool, song_goal_pool};
use gpt_common::resolve::{summary, SummaryTable};
use gpt_common::{Error, Result};

fn required_value<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::Validation(super::REQUIRED_FIELDS_MESSAGE.to_string()))
}

pub struct ArrangementGoalInputTableModel;

impl InputTableModel for ArrangementGoalInputTableModel {
    fn entity(&self) -> Entity {
        Entity::ArrangementGoal
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::arrangement_goal_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, today: NaiveDate) -> Result<InputForm> {
        let goal = selected(&tables.arrangement_goals, Entity::ArrangementGoal, id)?;
        let fields = vec![
            FormField::select(
                "arrangement_id",
                "Arrangement",
                arrangement_goal_pool(tables, id),
                id_value(goal.map(|g| g.arrangement_id)),
            )
            .required(),
            FormField::date(
                "discovery_date",
                "Date Discovered",
                Some(goal.map(|g| g.discovery_date).unwrap_or(today)),
            )
            .required(),
            FormField::text_area(
                "description",
                "Description",
                goal.and_then(|g| g.description.clone()),
            ),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["arrangement_id", "discovery_date"])?;
        let pool = arrangement_goal_pool(tables, submission.id);
        let goal = ArrangementGoal {
            id: submission.id,
            arrangement_id: required_value(submission.reference("arrangement_id", &pool)?)?,
            discovery_date: required_value(submission.date("discovery_date")?)?,
            description: submission.text("description"),
        };
        Ok(vec![submission.write(Entity::ArrangementGoal, goal.to_row())])
    }
}

pub struct SongGoalInputTableModel;

impl InputTableModel for SongGoalInputTableModel {
    fn entity(&self) -> Entity {
        Entity::SongGoal
    }

    fn summary(&self, tables: &Tables) -> SummaryTable {
        summary::song_goal_summary(tables)
    }

    fn form(&self, tables: &Tables, id: Option<i64>, today: NaiveDate) -> Result<InputForm> {
        let goal = selected(&tables.song_goals, Entity::SongGoal, id)?;
        let fields = vec![
            FormField::select(
                "song_id",
                "Song",
                song_goal_pool(tables, id),
                id_value(goal.map(|g| g.song_id)),
            )
            .required(),
            FormField::date(
                "discovery_date",
                "Date Discovered",
                Some(goal.map(|g| g.discovery_date).unwrap_or(today)),
            )
            .required(),
            FormField::text_area(
                "description",
                "Description",
                goal.and_then(|g| g.description.clone()),
            ),
        ];
        Ok(InputForm::new(self, tables, id, fields))
    }

    fn plan_submit(&self, tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>> {
        submission.require(&["song_id", "discovery_date"])?;
        let pool = song_goal_pool(tables, submission.id);
        let goal = SongGoal {
            id: submission.id,
            song_id: required_value(submission.reference("song_id", &pool)?)?,
            discovery_date: required_value(submission.date("discovery_date")?)?,
            description: submission.text("description"),
        };
        Ok(vec![submission.write(Entity::SongGoal, goal.to_row())])
    }
}
