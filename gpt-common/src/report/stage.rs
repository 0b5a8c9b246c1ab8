//! Learning-stage classification

use crate::models::{Milestones, Stage};
use chrono::NaiveDate;

/// Stage of a session held on `date`, given the arrangement's milestones
///
/// Each milestone counts as reached from its own date onward. An unset
/// milestone is never reached.
pub fn classify(milestones: &Milestones, date: NaiveDate) -> Stage {
    let reached = |milestone: Option<NaiveDate>| milestone.is_some_and(|m| date >= m);

    if reached(milestones.at_tempo_date) {
        if reached(milestones.play_ready_date) {
            Stage::Maintenance
        } else {
            Stage::Phrasing
        }
    } else if reached(milestones.off_book_date) {
        Stage::AchievingTempo
    } else {
        Stage::LearningNotes
    }
}
