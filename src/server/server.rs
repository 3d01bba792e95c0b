use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::registry::{EventPayload, FrequencyFilter, Registry, UserPayload};

use axum::{
    extract::{Path, Query, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct SkillsFrequencyParams {
    pub min_frequency: Option<u64>,
    pub max_frequency: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct EventsFrequencyParams {
    pub category: Option<String>,
    pub min_frequency: Option<u64>,
    pub max_frequency: Option<u64>,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn get_users(State(registry): State<GuardedRegistry>) -> Response {
    match registry.list_users() {
        Ok(users) => Json(users).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_user(
    State(registry): State<GuardedRegistry>,
    Json(body): Json<UserPayload>,
) -> Response {
    match registry.register_user(&body) {
        Ok(message) => Json(message).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_user(State(registry): State<GuardedRegistry>, Path(email): Path<String>) -> Response {
    match registry.get_user(&email) {
        Ok(user) => Json(user).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn put_user(
    State(registry): State<GuardedRegistry>,
    Path(email): Path<String>,
    Json(body): Json<UserPayload>,
) -> Response {
    match registry.update_user(&email, &body) {
        Ok(message) => Json(message).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_user(
    State(registry): State<GuardedRegistry>,
    Path(email): Path<String>,
) -> Response {
    match registry.delete_user(&email) {
        Ok(message) => Json(message).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_user_events(
    State(registry): State<GuardedRegistry>,
    Path(email): Path<String>,
) -> Response {
    match registry.list_user_events(&email) {
        Ok(events) => Json(events).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_user_event(
    State(registry): State<GuardedRegistry>,
    Path(email): Path<String>,
    Json(body): Json<EventPayload>,
) -> Response {
    match registry.register_event(&email, &body) {
        Ok(message) => Json(message).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_skills(
    State(registry): State<GuardedRegistry>,
    Query(params): Query<SkillsFrequencyParams>,
) -> Response {
    let filter = FrequencyFilter {
        min: params.min_frequency,
        max: params.max_frequency,
    };
    match registry.skills_frequency(filter) {
        Ok(frequencies) => Json(frequencies).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_events(
    State(registry): State<GuardedRegistry>,
    Query(params): Query<EventsFrequencyParams>,
) -> Response {
    let filter = FrequencyFilter {
        min: params.min_frequency,
        max: params.max_frequency,
    };
    match registry.events_frequency(params.category.as_deref(), filter) {
        Ok(frequencies) => Json(frequencies).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_app(config: ServerConfig, registry: Arc<Registry>) -> Result<Router> {
    let state = ServerState {
        config: config.clone(),
        start_time: Instant::now(),
        registry,
        hash: format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")),
    };

    let api_routes: Router = Router::new()
        .route("/users", get(get_users))
        .route("/users", post(post_user))
        .route("/users/{email}", get(get_user))
        .route("/users/{email}", put(put_user))
        .route("/users/{email}", delete(delete_user))
        .route("/users/events/{email}", get(get_user_events))
        .route("/users/events/{email}", post(post_user_event))
        .route("/skills", get(get_skills))
        .route("/events", get(get_events))
        .with_state(state.clone());

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    let mut app: Router = home_router.merge(api_routes);

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    registry: Arc<Registry>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
    };
    let app = make_app(config, registry)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
