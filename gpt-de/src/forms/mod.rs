//! Input table models
//!
//! One model per entity. Each produces the entity's summary table, renders
//! its input form, and turns a submitted form into the ordered writes that
//! carry it out. Planning is pure; the HTTP layer runs the writes.

mod arrangement;
mod artist;
mod goals;
mod guitar;
mod session;
mod song;
mod string_set;
mod style;

use chrono::NaiveDate;
use gpt_common::db::{Tables, WriteOp};
use gpt_common::models::Entity;
use gpt_common::resolve::{Lookup, SummaryTable};
use gpt_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use arrangement::ArrangementInputTableModel;
pub use artist::ArtistInputTableModel;
pub use goals::{ArrangementGoalInputTableModel, SongGoalInputTableModel};
pub use guitar::GuitarInputTableModel;
pub use session::SessionInputTableModel;
pub use song::SongInputTableModel;
pub use string_set::StringSetInputTableModel;
pub use style::StyleInputTableModel;

/// Message shown when a required field is blank
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required form fields!";

pub trait InputTableModel: Send + Sync {
    fn entity(&self) -> Entity;

    fn namespace(&self) -> &'static str {
        self.entity().namespace()
    }

    fn title(&self) -> &'static str {
        self.entity().title()
    }

    /// Resolved view shown in the table navigator
    fn summary(&self, tables: &Tables) -> SummaryTable;

    /// Field descriptors, prefilled from `selected` when editing
    fn form(&self, tables: &Tables, selected: Option<i64>, today: NaiveDate) -> Result<InputForm>;

    /// Validate `submission` and plan the writes that apply it
    fn plan_submit(&self, tables: &Tables, submission: &FormSubmission) -> Result<Vec<WriteOp>>;
}

/// The model that handles `entity`
pub fn model_for(entity: Entity) -> &'static dyn InputTableModel {
    match entity {
        Entity::Artist => &ArtistInputTableModel,
        Entity::Style => &StyleInputTableModel,
        Entity::StringSet => &StringSetInputTableModel,
        Entity::Song => &SongInputTableModel,
        Entity::Arrangement => &ArrangementInputTableModel,
        Entity::ArrangementGoal => &ArrangementGoalInputTableModel,
        Entity::SongGoal => &SongGoalInputTableModel,
        Entity::Guitar => &GuitarInputTableModel,
        Entity::Session => &SessionInputTableModel,
    }
}

/// Body of `POST /api/<entity>`: an id means update, no id means insert
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormSubmission {
    pub id: Option<i64>,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl FormSubmission {
    /// Submitted value, with blank input read as absent
    fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Every name in `names` must be filled in
    pub fn require(&self, names: &[&str]) -> Result<()> {
        if names.iter().all(|n| self.get(n).is_some()) {
            Ok(())
        } else {
            Err(Error::Validation(REQUIRED_FIELDS_MESSAGE.to_string()))
        }
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(String::from)
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>> {
        self.get(name)
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|_| Error::Validation(format!("Invalid number for {}: {}", name, v)))
            })
            .transpose()
    }

    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>> {
        self.get(name)
            .map(|v| {
                gpt_common::time::parse_form_date(v)
                    .ok_or_else(|| Error::Validation(format!("Invalid date for {}: {}", name, v)))
            })
            .transpose()
    }

    /// Checkbox value; blank or missing is unchecked
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name).map(|v| v.to_ascii_lowercase()) {
            None => Ok(false),
            Some(v) => match v.as_str() {
                "true" | "on" | "1" | "yes" => Ok(true),
                "false" | "off" | "0" | "no" => Ok(false),
                _ => Err(Error::Validation(format!("Invalid value for {}: {}", name, v))),
            },
        }
    }

    /// Value that must be one of `lookup`'s choices
    pub fn choice(&self, name: &str, lookup: &Lookup) -> Result<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(v) if lookup.contains(v) => Ok(Some(v.to_string())),
            Some(v) => Err(Error::Validation(format!("Invalid value for {}: {}", name, v))),
        }
    }

    /// Foreign key picked from an id lookup
    pub fn reference(&self, name: &str, lookup: &Lookup) -> Result<Option<i64>> {
        self.choice(name, lookup)?
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|_| Error::Validation(format!("Invalid value for {}: {}", name, v)))
            })
            .transpose()
    }

    /// Insert for a new record, update for an existing one
    pub fn write(&self, entity: Entity, row: gpt_common::db::Row) -> WriteOp {
        match self.id {
            Some(id) => WriteOp::update(entity, id, row),
            None => WriteOp::insert(entity, row),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    Date,
    Select,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Lookup>,
}

impl FormField {
    pub fn text(name: &'static str, label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name,
            label: label.into(),
            kind: FieldKind::Text,
            required: false,
            value,
            choices: None,
        }
    }

    pub fn text_area(name: &'static str, label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            kind: FieldKind::TextArea,
            ..Self::text(name, label, value)
        }
    }

    pub fn date(name: &'static str, label: impl Into<String>, value: Option<NaiveDate>) -> Self {
        Self {
            kind: FieldKind::Date,
            ..Self::text(name, label, value.map(|d| d.format("%Y-%m-%d").to_string()))
        }
    }

    /// Select prefilled with `value`, or the empty sentinel when unset
    pub fn select(
        name: &'static str,
        label: impl Into<String>,
        choices: Lookup,
        value: Option<String>,
    ) -> Self {
        Self {
            kind: FieldKind::Select,
            choices: Some(choices),
            ..Self::text(name, label, Some(value.unwrap_or_default()))
        }
    }

    pub fn checkbox(name: &'static str, label: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: FieldKind::Checkbox,
            ..Self::text(name, label, Some(checked.to_string()))
        }
    }

    /// Mark required; the label gains a trailing ` *`
    pub fn required(mut self) -> Self {
        self.required = true;
        self.label.push_str(" *");
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputForm {
    pub namespace: &'static str,
    pub title: String,
    pub id: Option<i64>,
    pub id_text: String,
    /// Submit is disabled for read-only tables
    pub read_only: bool,
    pub fields: Vec<FormField>,
}

impl InputForm {
    pub fn new(
        model: &dyn InputTableModel,
        tables: &Tables,
        selected: Option<i64>,
        fields: Vec<FormField>,
    ) -> Self {
        let title = match selected {
            Some(_) => format!("Input Form - Edit {}", model.title()),
            None => format!("Input Form - New {}", model.title()),
        };
        let id_text = match selected {
            Some(id) => format!("id: {}", id),
            None => "id: [NEW RECORD]".to_string(),
        };
        Self {
            namespace: model.namespace(),
            title,
            id: selected,
            id_text,
            read_only: tables.is_read_only(model.entity()),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Record selected for editing, or NotFound
pub(crate) fn selected<'a, T>(
    rows: &'a gpt_common::db::RawTable<T>,
    entity: Entity,
    selected: Option<i64>,
) -> Result<Option<&'a T>>
where
    T: gpt_common::db::Record,
{
    match selected {
        None => Ok(None),
        Some(id) => rows
            .get(id)
            .map(Some)
            .ok_or_else(|| Error::NotFound(format!("{} {}", entity.namespace(), id))),
    }
}

pub(crate) fn id_value(id: Option<i64>) -> Option<String> {
    id.map(|i| i.to_string())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_blank_fields_read_as_absent() {
        let s = submission(None, &[("name", "  "), ("count", ""), ("when", "")]);
        assert_eq!(s.text("name"), None);
        assert_eq!(s.int("count").unwrap(), None);
        assert_eq!(s.date("when").unwrap(), None);
        assert!(s.require(&["name"]).is_err());
    }

    #[test]
    fn test_unparseable_values_name_the_field() {
        let s = submission(None, &[("duration", "abc"), ("session_date", "13/45/2024")]);
        let err = s.int("duration").unwrap_err().to_string();
        assert!(err.contains("duration"), "{}", err);
        let err = s.date("session_date").unwrap_err().to_string();
        assert!(err.contains("session_date"), "{}", err);
    }

    #[test]
    fn test_required_message() {
        let err = submission(None, &[]).require(&["title"]).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == REQUIRED_FIELDS_MESSAGE));
    }

    #[test]
    fn test_every_entity_has_a_model() {
        for entity in Entity::ALL {
            assert_eq!(model_for(entity).entity(), entity);
        }
    }

    #[test]
    fn test_forms_render_for_every_entity() {
        let tables = tables();
        for entity in Entity::ALL {
            let form = model_for(entity).form(&tables, None, d(2024, 6, 1)).unwrap();
            assert_eq!(form.id_text, "id: [NEW RECORD]");
            assert!(form.fields.iter().any(|f| f.required), "{:?}", entity);
        }
    }

    #[test]
    fn test_unknown_selection_is_not_found() {
        let tables = tables();
        let result = model_for(Entity::Artist).form(&tables, Some(404), d(2024, 6, 1));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_required_field_label() {
        let field = FormField::text("name", "Artist Name", None).required();
        assert_eq!(field.label, "Artist Name *");
        assert!(field.required);
    }
}
