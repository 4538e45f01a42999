//! Single binary web server: bracket generation and result submission via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, BRACKET_TTL_HOURS (inactivity before a bracket is dropped).

use actix_web::{
    delete, get, post,
    web::{Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use knockout_bracket_web::{
    generate_bracket, parse_seeding_csv, resolve_advancement, submit_bracket_result, validate_bracket,
    Advancement, Bracket, BracketError, BracketId, BracketMatch, Contestant, MatchId,
    ParticipantId, Score, SlotSide,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-bracket entry: bracket data + last activity time (for auto-cleanup).
struct BracketEntry {
    bracket: Bracket,
    last_activity: Instant,
}

/// In-memory state: many brackets by ID. Entries are removed after the inactivity timeout.
type AppState = Data<RwLock<HashMap<BracketId, BracketEntry>>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateBracketBody {
    #[serde(default = "default_bracket_name")]
    name: String,
    /// Ranked best-to-worst; each entry lists the contestant's participants.
    contestants: Vec<Vec<ParticipantId>>,
}

#[derive(Deserialize)]
struct CsvQuery {
    #[serde(default = "default_bracket_name")]
    name: String,
}

#[derive(Deserialize)]
struct ImportBracketBody {
    #[serde(default = "default_bracket_name")]
    name: String,
    matches: Vec<BracketMatch>,
}

#[derive(Deserialize)]
struct SubmitResultBody {
    match_id: MatchId,
    winner: SlotSide,
    #[serde(default)]
    score: Option<Score>,
    /// Bracket version the client last saw; mismatch → 409.
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Serialize)]
struct SubmitResultResponse<'a> {
    bracket: &'a Bracket,
    advancement: AdvancementView<'a>,
}

/// JSON view of an `Advancement`.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum AdvancementView<'a> {
    Champion { contestant: &'a Contestant },
    Advanced { round: u32, position: u32, slot: SlotSide },
    AlreadyApplied { round: u32, position: u32, slot: SlotSide },
}

impl<'a> From<&'a Advancement> for AdvancementView<'a> {
    fn from(a: &'a Advancement) -> Self {
        match a {
            Advancement::Champion(contestant) => AdvancementView::Champion { contestant },
            Advancement::Advanced(t) => AdvancementView::Advanced {
                round: t.round,
                position: t.position,
                slot: t.slot,
            },
            Advancement::AlreadyApplied(t) => AdvancementView::AlreadyApplied {
                round: t.round,
                position: t.position,
                slot: t.slot,
            },
        }
    }
}

/// Path segment: bracket id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct BracketPath {
    id: BracketId,
}

/// Path segments: bracket id and match id (e.g. /api/brackets/{id}/matches/{match_id}/target)
#[derive(Deserialize)]
struct BracketMatchPath {
    id: BracketId,
    match_id: MatchId,
}

fn default_bracket_name() -> String {
    "Elimination".to_string()
}

/// Map an engine error to a status code. Replays never reach here (they are `AlreadyApplied`).
fn error_response(e: &BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        BracketError::InvalidInput(_)
        | BracketError::MatchNotCompleted(_)
        | BracketError::SlotNotResolved(_) => HttpResponse::BadRequest().json(body),
        BracketError::MatchNotFound(_) | BracketError::TargetNotFound { .. } => {
            HttpResponse::NotFound().json(body)
        }
        BracketError::MatchAlreadyCompleted(_)
        | BracketError::SlotAlreadyResolved { .. }
        | BracketError::VersionConflict { .. } => HttpResponse::Conflict().json(body),
        BracketError::AmbiguousAdvancement { .. } | BracketError::MalformedBracket(_) => {
            log::error!("Corrupted bracket: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No bracket" }))
}

/// Store a new bracket and return it.
fn insert_bracket(state: &AppState, bracket: Bracket) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!(
        "Created bracket {} '{}' with {} matches",
        bracket.id,
        bracket.name,
        bracket.matches.len()
    );
    let response = HttpResponse::Ok().json(&bracket);
    g.insert(
        bracket.id,
        BracketEntry {
            bracket,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "knockout-bracket-web",
    })
}

/// Generate a bracket from a ranked contestant list.
#[post("/api/brackets")]
async fn api_create_bracket(state: AppState, body: Json<CreateBracketBody>) -> HttpResponse {
    let body = body.into_inner();
    let contestants: Vec<Contestant> = body.contestants.into_iter().map(Contestant::from).collect();
    match generate_bracket(&contestants) {
        Ok(matches) => insert_bracket(&state, Bracket::new(body.name.trim(), matches)),
        Err(e) => error_response(&e),
    }
}

/// Generate a bracket from CSV standings (rank,participant,...).
#[post("/api/brackets/csv")]
async fn api_create_bracket_csv(state: AppState, query: Query<CsvQuery>, body: Bytes) -> HttpResponse {
    let result = parse_seeding_csv(body.as_ref()).and_then(|contestants| generate_bracket(&contestants));
    match result {
        Ok(matches) => insert_bracket(&state, Bracket::new(query.name.trim(), matches)),
        Err(e) => error_response(&e),
    }
}

/// Import a match list produced elsewhere (checked before it is accepted).
#[post("/api/brackets/import")]
async fn api_import_bracket(state: AppState, body: Json<ImportBracketBody>) -> HttpResponse {
    let body = body.into_inner();
    match validate_bracket(&body.matches) {
        Ok(()) => insert_bracket(&state, Bracket::new(body.name.trim(), body.matches)),
        Err(e) => error_response(&e),
    }
}

/// Get a bracket by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.bracket)
        }
        None => not_found(),
    }
}

/// Discard a bracket (regenerating is delete + create, never a partial edit).
#[delete("/api/brackets/{id}")]
async fn api_delete_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.id) {
        Some(_) => {
            log::info!("Deleted bracket {}", path.id);
            HttpResponse::NoContent().finish()
        }
        None => not_found(),
    }
}

/// Record a result and advance the winner. Resubmitting the same winner is a no-op, whatever version the client sends.
#[post("/api/brackets/{id}/results")]
async fn api_submit_result(
    state: AppState,
    path: Path<BracketPath>,
    body: Json<SubmitResultBody>,
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
    let bracket = &mut entry.bracket;

    match submit_bracket_result(
        bracket,
        body.match_id,
        body.winner,
        body.score,
        body.expected_version,
    ) {
        Ok(advancement) => HttpResponse::Ok().json(SubmitResultResponse {
            bracket,
            advancement: AdvancementView::from(&advancement),
        }),
        Err(e) => error_response(&e),
    }
}

/// Where the winner of a completed match goes (null for the final).
#[get("/api/brackets/{id}/matches/{match_id}/target")]
async fn api_match_target(state: AppState, path: Path<BracketMatchPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    match resolve_advancement(&entry.bracket.matches, path.match_id) {
        Ok(target) => HttpResponse::Ok().json(target),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_ttl_hours() -> u64 {
    12
}

/// Inactivity before a bracket is dropped; huge hour counts saturate instead of overflowing.
fn inactivity_timeout(ttl_hours: u64) -> Duration {
    Duration::from_secs(ttl_hours.saturating_mul(3600))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let ttl_hours: u64 = std::env::var("BRACKET_TTL_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_ttl_hours);
    let inactivity_timeout = inactivity_timeout(ttl_hours);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<BracketId, BracketEntry>::new()));

    // Background task: every 30 minutes, remove brackets inactive for longer than the timeout
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
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive bracket(s) (no activity for {}h)",
                    removed,
                    ttl_hours
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_bracket)
            .service(api_create_bracket_csv)
            .service(api_import_bracket)
            .service(api_get_bracket)
            .service(api_delete_bracket)
            .service(api_submit_result)
            .service(api_match_target)
    })
    .bind(bind)?
    .run()
    .await
}
