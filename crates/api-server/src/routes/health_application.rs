//! Health application API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

use mb_core::health::{
    CreateHealthApplicationRequest, HealthApplication, HealthApplicationRepository,
};
use mb_core::member::MemberRepository;

use crate::error::{map_core_error, map_json_rejection, parse_uuid, route_error, RouteError};
use crate::state::AppState;

/// GET /api/health/id/:id - Get one application
async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HealthApplication>, RouteError> {
    let id = parse_uuid(&id, "health application")?;
    let application = state
        .health_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| {
            route_error(
                StatusCode::NOT_FOUND,
                format!("Health application {} not found", id),
            )
        })?;
    Ok(Json(application))
}

/// GET /api/health/member/:id - List a member's applications
async fn list_member_applications(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HealthApplication>>, RouteError> {
    let member = parse_uuid(&id, "member")?;
    let applications = state
        .health_store()
        .list_by_member(member)
        .await
        .map_err(map_core_error)?;
    Ok(Json(applications))
}

/// POST /api/health/ - Submit an application for an existing member
async fn create_application(
    State(state): State<AppState>,
    body: Result<Json<CreateHealthApplicationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<HealthApplication>), RouteError> {
    let Json(req) = body.map_err(map_json_rejection)?;

    let _lifecycle = state.lock_member_lifecycle().await;
    let member = state
        .member_store()
        .get(req.member)
        .await
        .map_err(map_core_error)?;
    if member.is_none() {
        return Err(route_error(
            StatusCode::NOT_FOUND,
            format!("Member {} not found", req.member),
        ));
    }

    let application = req.into_application().map_err(map_core_error)?;
    let created = state
        .health_store()
        .create(application)
        .await
        .map_err(map_core_error)?;

    info!(
        "Health application {} submitted for member {}",
        created.id, created.member
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/health/link/:id - Approve an application
async fn link_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HealthApplication>, RouteError> {
    let id = parse_uuid(&id, "health application")?;
    let linked = state
        .health_store()
        .link(id)
        .await
        .map_err(map_core_error)?;
    Ok(Json(linked))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", post(create_application))
        .route("/api/health/", post(create_application))
        .route("/api/health/id/{id}", get(get_application))
        .route("/api/health/member/{id}", get(list_member_applications))
        .route("/api/health/link/{id}", put(link_application))
}
