//! Membership API endpoints
//!
//! List, read, create, update, delete and fund members.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use mb_core::health::HealthApplicationRepository;
use mb_core::member::{CreateMemberRequest, Member, MemberRepository};

use crate::error::{map_core_error, map_json_rejection, parse_uuid, route_error, RouteError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FundRequest {
    #[serde(default)]
    pub amount: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeleteMemberResponse {
    pub message: String,
    pub removed_health_applications: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/membership/ - List all members
async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, RouteError> {
    let members = state.member_store().list().await.map_err(map_core_error)?;
    Ok(Json(members))
}

/// GET /api/membership/id/:id - Get one member
async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Member>, RouteError> {
    let id = parse_uuid(&id, "member")?;
    let member = state
        .member_store()
        .get(id)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| route_error(StatusCode::NOT_FOUND, format!("Member {} not found", id)))?;
    Ok(Json(member))
}

/// POST /api/membership/ - Create a member
async fn create_member(
    State(state): State<AppState>,
    body: Result<Json<CreateMemberRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Member>), RouteError> {
    let Json(req) = body.map_err(map_json_rejection)?;
    let member = req.into_member().map_err(map_core_error)?;
    let created = state
        .member_store()
        .create(member)
        .await
        .map_err(map_core_error)?;

    info!("Created member {} ({})", created.id, created.member_id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/membership/update/id/:id - Update member fields
async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Member>, RouteError> {
    let id = parse_uuid(&id, "member")?;
    let Json(body) = body.map_err(map_json_rejection)?;
    let Value::Object(changes) = body else {
        return Err(route_error(
            StatusCode::BAD_REQUEST,
            "Update body must be a JSON object",
        ));
    };

    debug!("Updating member {} fields {:?}", id, changes.keys().collect::<Vec<_>>());
    let updated = state
        .member_store()
        .update(id, changes)
        .await
        .map_err(map_core_error)?;
    Ok(Json(updated))
}

/// DELETE /api/membership/delete/:id - Delete a member and their health applications
async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteMemberResponse>, RouteError> {
    let id = parse_uuid(&id, "member")?;
    let _lifecycle = state.lock_member_lifecycle().await;
    let deleted = state
        .member_store()
        .delete(id)
        .await
        .map_err(map_core_error)?;
    if !deleted {
        return Err(route_error(
            StatusCode::NOT_FOUND,
            format!("Member {} not found", id),
        ));
    }

    let removed = state
        .health_store()
        .delete_by_member(id)
        .await
        .map_err(map_core_error)?;

    info!("Deleted member {} and {} health applications", id, removed);
    Ok(Json(DeleteMemberResponse {
        message: "Member deleted".to_string(),
        removed_health_applications: removed,
    }))
}

/// PUT /api/membership/fund/:member_id - Add to a member's balance
///
/// The path carries the external membership id, not the internal one.
async fn fund_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    body: Result<Json<FundRequest>, JsonRejection>,
) -> Result<Json<Member>, RouteError> {
    let Json(req) = body.map_err(map_json_rejection)?;
    let amount = req
        .amount
        .ok_or_else(|| route_error(StatusCode::BAD_REQUEST, "Amount is required"))?;

    let funded = state
        .member_store()
        .fund(&member_id, amount)
        .await
        .map_err(map_core_error)?;

    info!(
        "Funded member {} with {}, balance {}",
        funded.member_id, amount, funded.account_balance
    );
    Ok(Json(funded))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/membership", get(list_members).post(create_member))
        .route("/api/membership/", get(list_members).post(create_member))
        .route("/api/membership/id/{id}", get(get_member))
        .route("/api/membership/update/id/{id}", put(update_member))
        .route("/api/membership/delete/{id}", delete(delete_member))
        .route("/api/membership/fund/{member_id}", put(fund_member))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use chrono::NaiveDate;
    use mb_core::health::HealthApplication;
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn build_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path().to_path_buf()).await.unwrap();
        (state, temp_dir)
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = super::router()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn list_returns_members_in_creation_order() {
        let (state, _tmp) = build_state().await;
        state
            .member_store()
            .create(Member::new("M-1", "Ada").with_account("ACC-1"))
            .await
            .unwrap();
        state
            .member_store()
            .create(Member::new("M-2", "Grace"))
            .await
            .unwrap();

        let (status, payload) = send(&state, "GET", "/api/membership/", None).await;
        assert_eq!(status, StatusCode::OK);
        let members = payload.as_array().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0]["name"], "Ada");
        assert_eq!(members[0]["account"], "ACC-1");
        assert!(members[0]["_id"].is_string());
    }

    #[tokio::test]
    async fn get_member_validates_id() {
        let (state, _tmp) = build_state().await;
        let member = state
            .member_store()
            .create(Member::new("M-1", "Ada"))
            .await
            .unwrap();

        let (status, payload) =
            send(&state, "GET", &format!("/api/membership/id/{}", member.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["member_id"], "M-1");

        let (status, payload) = send(&state, "GET", "/api/membership/id/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["message"], "Invalid member ID");

        let (status, _) = send(
            &state,
            "GET",
            &format!("/api/membership/id/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_member_returns_created() {
        let (state, _tmp) = build_state().await;

        let (status, payload) = send(
            &state,
            "POST",
            "/api/membership/",
            Some(json!({ "member_id": "M-9", "name": "Ada", "occupation": "Analyst" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payload["occupation"], "Analyst");
        assert_eq!(payload["account_balance"], 0);

        let (status, payload) = send(
            &state,
            "POST",
            "/api/membership/",
            Some(json!({ "member_id": "M-9", "name": "Copy" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(payload["message"].as_str().unwrap().contains("M-9"));
    }

    #[tokio::test]
    async fn update_ignores_identity_fields() {
        let (state, _tmp) = build_state().await;
        let member = state
            .member_store()
            .create(Member::new("M-1", "Ada"))
            .await
            .unwrap();

        let (status, payload) = send(
            &state,
            "PUT",
            &format!("/api/membership/update/id/{}", member.id),
            Some(json!({ "name": "Ada King", "email": "ada@example.com", "__v": 40 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["name"], "Ada King");
        assert_eq!(payload["_id"], json!(member.id.to_string()));
        assert_eq!(payload["__v"], 1);

        state.member_store().fund("M-1", 500).await.unwrap();
        let (status, payload) = send(
            &state,
            "PUT",
            &format!("/api/membership/update/id/{}", member.id),
            Some(json!({ "name": "Ada", "account_balance": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["account_balance"], 500);

        let (status, _) = send(
            &state,
            "PUT",
            &format!("/api/membership/update/id/{}", member.id),
            Some(json!(["not", "an", "object"])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_cascades_to_health_applications() {
        let (state, _tmp) = build_state().await;
        let member = state
            .member_store()
            .create(Member::new("M-1", "Ada"))
            .await
            .unwrap();
        state
            .health_store()
            .create(HealthApplication::new(
                member.id,
                NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                "0700",
                "1 Main St",
                40.0,
                "Dental",
            ))
            .await
            .unwrap();

        let (status, payload) = send(
            &state,
            "DELETE",
            &format!("/api/membership/delete/{}", member.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["removed_health_applications"], 1);
        assert!(state
            .health_store()
            .list_by_member(member.id)
            .await
            .unwrap()
            .is_empty());

        let (status, _) = send(
            &state,
            "DELETE",
            &format!("/api/membership/delete/{}", member.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn fund_uses_external_member_id() {
        let (state, _tmp) = build_state().await;
        let member = state
            .member_store()
            .create(Member::new("M-1", "Ada"))
            .await
            .unwrap();

        let (status, payload) = send(
            &state,
            "PUT",
            "/api/membership/fund/M-1",
            Some(json!({ "amount": 1000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["account_balance"], 1000);

        let (status, payload) = send(
            &state,
            "PUT",
            &format!("/api/membership/fund/{}", member.id),
            Some(json!({ "amount": 1000 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(payload["message"].is_string());
    }

    #[tokio::test]
    async fn fund_rejects_missing_or_invalid_amount() {
        let (state, _tmp) = build_state().await;
        state
            .member_store()
            .create(Member::new("M-1", "Ada"))
            .await
            .unwrap();

        let (status, payload) = send(
            &state,
            "PUT",
            "/api/membership/fund/M-1",
            Some(json!({ "amount": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["message"], "Amount is required");

        let (status, payload) = send(
            &state,
            "PUT",
            "/api/membership/fund/M-1",
            Some(json!({ "amount": -20 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["message"].as_str().unwrap().contains("positive"));

        let (status, payload) = send(
            &state,
            "PUT",
            "/api/membership/fund/M-1",
            Some(json!({ "amount": "lots" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["message"].is_string());
    }
}
