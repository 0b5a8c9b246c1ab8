//! Chart data
//!
//! GET /api/heatmap?songs=A&songs=B - activity grid, optionally per song
//! GET /api/repertoire?songs=...    - practice time per arrangement
//! GET /api/songs                   - titles offered by the song filter
//! GET /api/last-week               - recent notes and minutes per song
//! GET /api/day?date=YYYY-MM-DD      - one day's notes and videos (heatmap click)
//! GET /api/videos                  - embeddable videos keyed by session id
//! GET /api/arsenal                 - guitars with string wear
//! GET /api/career?from=&to=        - career statistics (dates as YYYY-MM-DD)

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use gpt_common::report::{
    arsenal, build_heatmap, career_range, career_stats, last_week, repertoire, session_notes,
    song_titles, video_widgets, ArsenalEntry, CareerStats, Heatmap, RepertoireBar, SessionNote,
    SessionNotes, VideoWidget,
};
use gpt_common::resolve::ResolvedSession;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::AppState;

/// Repeated `songs` parameters; none means no filter
fn song_filter(params: &[(String, String)]) -> Option<Vec<String>> {
    let songs: Vec<String> = params
        .iter()
        .filter(|(k, _)| k == "songs")
        .map(|(_, v)| v.clone())
        .collect();
    (!songs.is_empty()).then_some(songs)
}

/// GET /api/heatmap
pub async fn get_heatmap(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Heatmap> {
    let filter = song_filter(&params);
    let data = &state.data;
    Json(build_heatmap(&data.sessions, data.today, filter.as_deref()))
}

/// GET /api/repertoire
pub async fn get_repertoire(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<RepertoireBar>> {
    let filter = song_filter(&params);
    let data = &state.data;
    Json(repertoire(&data.sessions, data.today, filter.as_deref()))
}

/// GET /api/songs
pub async fn get_songs(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(song_titles(&state.data.sessions, state.data.today))
}

/// GET /api/last-week
pub async fn get_last_week(State(state): State<AppState>) -> Json<SessionNotes> {
    Json(last_week(&state.data.sessions, state.data.today))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub notes: Vec<SessionNote>,
    pub videos: BTreeMap<i64, VideoWidget>,
}

/// GET /api/day
pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Json<DayView> {
    let day: Vec<ResolvedSession> = state
        .data
        .sessions
        .iter()
        .filter(|s| s.session_date == query.date)
        .cloned()
        .collect();
    Json(DayView {
        date: query.date,
        notes: session_notes(&day, query.date, 0).notes,
        videos: video_widgets(&day),
    })
}

/// GET /api/videos
pub async fn get_videos(State(state): State<AppState>) -> Json<BTreeMap<i64, VideoWidget>> {
    Json(video_widgets(&state.data.sessions))
}

/// GET /api/arsenal
pub async fn get_arsenal(State(state): State<AppState>) -> Json<Vec<ArsenalEntry>> {
    let data = &state.data;
    Json(arsenal(&data.guitars, &data.sessions, data.today))
}

#[derive(Debug, Deserialize)]
pub struct CareerQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/career
///
/// Missing bounds default to the first and last session, or today when
/// there are no sessions.
pub async fn get_career(
    State(state): State<AppState>,
    Query(query): Query<CareerQuery>,
) -> Json<CareerStats> {
    let data = &state.data;
    let (first, last) = career_range(&data.sessions).unwrap_or((data.today, data.today));
    let from = query.from.unwrap_or(first);
    let to = query.to.unwrap_or(last);
    Json(career_stats(&data.sessions, from, to))
}

pub fn chart_routes() -> Router<AppState> {
    Router::new()
        .route("/api/heatmap", get(get_heatmap))
        .route("/api/repertoire", get(get_repertoire))
        .route("/api/songs", get(get_songs))
        .route("/api/last-week", get(get_last_week))
        .route("/api/day", get(get_day))
        .route("/api/videos", get(get_videos))
        .route("/api/arsenal", get(get_arsenal))
        .route("/api/career", get(get_career))
}
