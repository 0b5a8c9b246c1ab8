//! Integration tests for gpt-dash API endpoints
//!
//! A small practice history is written to a temp SQLite file, loaded the way
//! the service loads it, and queried with "today" fixed at Monday 2024-06-03.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use gpt_common::db::{init_database, Record, Store, Tables};
use gpt_common::models::*;
use gpt_dash::{build_router, AppState, DashboardData};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

async fn put<T: Record>(store: &Store, record: T) {
    store
        .insert_row_with_id(T::table(), &record.to_row())
        .await
        .unwrap();
}

fn session(id: i64, date: NaiveDate, minutes: i64, arrangement: i64, video: Option<&str>) -> PracticeSession {
    PracticeSession {
        id: Some(id),
        session_date: date,
        duration: minutes,
        guitar_id: Some(1),
        arrangement_id: Some(arrangement),
        notes: Some(format!("session {}", id)),
        video_url: video.map(String::from),
        stage: Some(Stage::LearningNotes),
    }
}

/// Test helper: seeded state; keep the TempDir alive
async fn setup_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("local_guitar_data.db"))
        .await
        .unwrap();
    let store = Store::sqlite(pool, "main").unwrap();

    put(&store, Artist { id: Some(1), name: "Francisco Tarrega".into() }).await;
    for (id, title) in [(1, "Lagrima"), (2, "Adelita")] {
        put(
            &store,
            Song {
                id: Some(id),
                title: title.into(),
                style_id: None,
                composer_id: Some(1),
                song_type: Some(SongType::Song),
            },
        )
        .await;
        put(
            &store,
            Arrangement {
                id: Some(id),
                song_id: Some(id),
                arranger: None,
                milestones: Milestones::default(),
                difficulty: None,
                sheet_music_link: None,
                performance_link: None,
            },
        )
        .await;
    }
    put(
        &store,
        StringSet {
            id: Some(1),
            name: "Savarez Cantiga".into(),
            hyperlink: None,
            image_url: None,
        },
    )
    .await;
    put(
        &store,
        Guitar {
            id: Some(1),
            make: "Cordoba".into(),
            model: "C10".into(),
            status: GuitarStatus::Permanent,
            about: "Cedar top".into(),
            string_set_id: Some(1),
            image_link: None,
            date_added: Some(d(2023, 1, 1)),
            date_retired: None,
            strings_install_date: Some(d(2024, 5, 1)),
            default_guitar: true,
        },
    )
    .await;

    put(&store, session(1, d(2024, 5, 27), 30, 1, Some("https://youtu.be/abc?t=5"))).await;
    put(&store, session(2, d(2024, 5, 28), 45, 1, None)).await;
    put(&store, session(3, d(2024, 6, 3), 20, 2, None)).await;
    put(&store, session(4, d(2023, 1, 1), 60, 1, None)).await;

    let tables = Tables::load(&store, true).await.unwrap();
    let data = DashboardData::build(&tables, d(2024, 6, 3));
    (dir, AppState::new(data))
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
    let response = build_router(state.clone())
        .oneshot(test_request(uri))
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, serde_json::from_slice(&bytes).expect("Should parse JSON"))
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, state) = setup_state().await;
    let (status, body) = get(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "gpt-dash");
    assert_eq!(body["data_as_of"], "2024-06-03");
    assert_eq!(body["sessions"], 4);
}

#[tokio::test]
async fn test_heatmap_covers_practiced_weeks() {
    let (_dir, state) = setup_state().await;
    let (status, body) = get(&state, "/api/heatmap").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"][0], "Mon");
    assert_eq!(body["columns"].as_array().unwrap().len(), 2);
    assert_eq!(body["columns"][0]["label"], "May 27");
    assert_eq!(body["columns"][0]["year"], 2024);

    assert_eq!(body["minutes"][0][0], 30);
    assert_eq!(body["minutes"][1][0], 45);
    assert_eq!(body["minutes"][2][0], Value::Null);
    assert_eq!(body["minutes"][0][1], 20);
    assert_eq!(body["has_video"][0][0], true);
    assert_eq!(body["has_video"][1][0], false);
    assert_eq!(body["date_labels"][1][0], "Tue 05-28-2024");
}

#[tokio::test]
async fn test_heatmap_song_filter() {
    let (_dir, state) = setup_state().await;
    let (_, body) = get(&state, "/api/heatmap?songs=Adelita").await;

    assert_eq!(body["columns"].as_array().unwrap().len(), 1);
    assert_eq!(body["columns"][0]["week_start"], "2024-06-03");
    assert_eq!(body["minutes"][0][0], 20);
}

#[tokio::test]
async fn test_repertoire_smallest_first() {
    let (_dir, state) = setup_state().await;
    let (_, body) = get(&state, "/api/repertoire").await;

    let bars = body.as_array().unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0]["song"], "Adelita");
    assert_eq!(bars[1]["song"], "Lagrima");
    // The 2023 session is outside the trailing year
    assert_eq!(bars[1]["total_minutes"], 75);
    assert_eq!(bars[1]["hours"], 1);
    assert_eq!(bars[1]["minutes"], 15);
    assert_eq!(bars[1]["stage_minutes"]["Learning Notes"], 75);
}

#[tokio::test]
async fn test_song_titles() {
    let (_dir, state) = setup_state().await;
    let (_, body) = get(&state, "/api/songs").await;
    assert_eq!(body, json!(["Adelita", "Lagrima"]));
}

#[tokio::test]
async fn test_last_week() {
    let (_dir, state) = setup_state().await;
    let (_, body) = get(&state, "/api/last-week").await;

    let notes = body["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0]["song"], "Lagrima");
    assert_eq!(notes[0]["session_date"], "2024-05-27");
    assert_eq!(notes[2]["song"], "Adelita");
    assert_eq!(
        body["bars"],
        json!([
            { "song": "Adelita", "minutes": 20 },
            { "song": "Lagrima", "minutes": 75 },
        ])
    );
}

#[tokio::test]
async fn test_day_drill_down() {
    let (_dir, state) = setup_state().await;
    let (status, body) = get(&state, "/api/day?date=2024-05-27").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024-05-27");
    let notes = body["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["id"], 1);
    assert_eq!(notes[0]["song"], "Lagrima");
    assert_eq!(notes[0]["duration"], 30);
    assert_eq!(body["videos"]["1"]["embed_url"], "https://youtube.com/embed/abc");

    let (_, body) = get(&state, "/api/day?date=2024-05-28").await;
    assert_eq!(body["notes"].as_array().unwrap().len(), 1);
    assert_eq!(body["videos"], json!({}));
}

#[tokio::test]
async fn test_day_rejects_bad_date() {
    let (_dir, state) = setup_state().await;
    let response = build_router(state)
        .oneshot(test_request("/api/day?date=yesterday"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_videos_keyed_by_session() {
    let (_dir, state) = setup_state().await;
    let (_, body) = get(&state, "/api/videos").await;

    assert_eq!(body.as_object().unwrap().len(), 1);
    assert_eq!(body["1"]["embed_url"], "https://youtube.com/embed/abc");
    assert_eq!(body["1"]["title"], "05/27/2024 - Lagrima");
}

#[tokio::test]
async fn test_arsenal_string_wear() {
    let (_dir, state) = setup_state().await;
    let (_, body) = get(&state, "/api/arsenal").await;

    let entry = &body[0];
    assert_eq!(entry["make"], "Cordoba");
    assert_eq!(entry["strings"], "Savarez Cantiga");
    assert_eq!(entry["wear"]["days"], 33);
    let hours = entry["wear"]["hours"].as_f64().unwrap();
    assert!((hours - 95.0 / 60.0).abs() < 1e-9);
    let health = entry["wear"]["health"].as_f64().unwrap();
    assert!((health - (1.0 - 33.0 / 112.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_career_defaults_to_full_history() {
    let (_dir, state) = setup_state().await;
    let (_, body) = get(&state, "/api/career").await;

    assert_eq!(body["from"], "2023-01-01");
    assert_eq!(body["to"], "2024-06-03");
    assert_eq!(body["session_count"], 4);
    assert_eq!(body["total_minutes"], 155);
    assert_eq!(body["longest_session_minutes"], 60);
    assert_eq!(body["longest_streak_days"], 2);
}

#[tokio::test]
async fn test_career_range() {
    let (_dir, state) = setup_state().await;
    let (status, body) = get(&state, "/api/career?from=2024-05-01&to=2024-06-03").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_count"], 3);
    assert_eq!(body["total_minutes"], 95);
}
