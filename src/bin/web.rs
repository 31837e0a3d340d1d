//! Single binary web server: JSON API for generating, editing and exporting schedules.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, http::header, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use doubles_scheduler::{
    export_schedule_to_csv, generate_schedule_with_report, GenerationReport, MatchId, MatchScore,
    Schedule, ScheduleConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a stored schedule.
type ScheduleId = Uuid;

/// Per-schedule entry: schedule data + last activity time (for auto-cleanup).
struct ScheduleEntry {
    schedule: Schedule,
    report: GenerationReport,
    created_at: DateTime<Utc>,
    last_activity: Instant,
}

/// In-memory state: many schedules by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<ScheduleId, ScheduleEntry>>>;

/// Inactivity threshold: schedules not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct ScheduleResponse<'a> {
    id: ScheduleId,
    created_at: DateTime<Utc>,
    report: &'a GenerationReport,
    schedule: &'a Schedule,
}

impl<'a> ScheduleResponse<'a> {
    fn new(id: ScheduleId, entry: &'a ScheduleEntry) -> Self {
        Self {
            id,
            created_at: entry.created_at,
            report: &entry.report,
            schedule: &entry.schedule,
        }
    }
}

#[derive(Deserialize)]
struct RenamePlayersBody {
    names: Vec<String>,
}

#[derive(Deserialize)]
struct SwapPlayersBody {
    match_a: MatchId,
    slot_a: usize,
    match_b: MatchId,
    slot_b: usize,
}

/// Path segment: schedule id (e.g. /api/schedules/{id})
#[derive(Deserialize)]
struct SchedulePath {
    id: ScheduleId,
}

/// Path segments: schedule id and match id (e.g. /api/schedules/{id}/matches/{match_id}/result)
#[derive(Deserialize)]
struct ScheduleMatchPath {
    id: ScheduleId,
    match_id: MatchId,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No schedule" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-scheduler",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Generate a schedule from a config and store it (returns it with id; client keeps the id).
#[post("/api/schedules")]
async fn api_create_schedule(state: AppState, body: Json<ScheduleConfig>) -> HttpResponse {
    let config = body.into_inner();
    if let Err(e) = config.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
    }

    // Multi-start search is CPU bound; keep it off the async workers.
    let generated = match web::block(move || generate_schedule_with_report(&config)).await {
        Ok(result) => result,
        Err(_) => return HttpResponse::InternalServerError().body("generation task failed"),
    };
    let (schedule, report) = match generated {
        Ok(pair) => pair,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    };

    let id = Uuid::new_v4();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(ScheduleEntry {
        schedule,
        report,
        created_at: Utc::now(),
        last_activity: Instant::now(),
    });
    log::info!("Stored schedule {} ({} matches)", id, entry.schedule.matches.len());
    HttpResponse::Ok().json(ScheduleResponse::new(id, entry))
}

/// Get a schedule by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/schedules/{id}")]
async fn api_get_schedule(state: AppState, path: Path<SchedulePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(ScheduleResponse::new(path.id, entry))
        }
        None => not_found(),
    }
}

/// Delete a stored schedule.
#[delete("/api/schedules/{id}")]
async fn api_delete_schedule(state: AppState, path: Path<SchedulePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => not_found(),
    }
}

/// Download the schedule as CSV.
#[get("/api/schedules/{id}/csv")]
async fn api_export_csv(state: AppState, path: Path<SchedulePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match export_schedule_to_csv(&entry.schedule) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"schedule-{}.csv\"", path.id),
            ))
            .body(csv),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Record (or overwrite) the score of one match.
#[put("/api/schedules/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<ScheduleMatchPath>,
    body: Json<MatchScore>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.schedule.record_result(path.match_id, body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ScheduleResponse::new(path.id, entry)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Clear the score of one match.
#[delete("/api/schedules/{id}/matches/{match_id}/result")]
async fn api_clear_result(state: AppState, path: Path<ScheduleMatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.schedule.clear_result(path.match_id) {
        Ok(()) => HttpResponse::Ok().json(ScheduleResponse::new(path.id, entry)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Bulk rename players by position (ids stay the same).
#[put("/api/schedules/{id}/players")]
async fn api_rename_players(
    state: AppState,
    path: Path<SchedulePath>,
    body: Json<RenamePlayersBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.schedule.rename_players(&body.names) {
        Ok(()) => HttpResponse::Ok().json(ScheduleResponse::new(path.id, entry)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Manually swap two player slots. Fairness is not re-checked.
#[post("/api/schedules/{id}/swap")]
async fn api_swap_players(
    state: AppState,
    path: Path<SchedulePath>,
    body: Json<SwapPlayersBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry
        .schedule
        .swap_players(body.match_a, body.slot_a, body.match_b, body.slot_b)
    {
        Ok(()) => HttpResponse::Ok().json(ScheduleResponse::new(path.id, entry)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<ScheduleId, ScheduleEntry>::new()));

    // Background task: every 30 minutes, remove schedules inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive schedule(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_schedule)
            .service(api_get_schedule)
            .service(api_delete_schedule)
            .service(api_export_csv)
            .service(api_record_result)
            .service(api_clear_result)
            .service(api_rename_players)
            .service(api_swap_players)
    })
    .bind(bind)?
    .run()
    .await
}
