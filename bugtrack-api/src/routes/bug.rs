//! Bug REST API Routes
//!
//! Axum route handlers for the five bug operations. All handlers call the
//! bug collection operations on DbClient and map failures through ApiError.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{BugFilter, DbClient},
    error::{ApiError, ApiResult},
    types::{
        page_offset, total_pages, BugPayload, BugResponse, DeleteBugResponse, ListBugsParams,
        ListBugsResponse, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT,
    },
    validation::ValidateRange,
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for bug routes.
#[derive(Clone)]
pub struct BugState {
    pub db: DbClient,
}

impl BugState {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/bugs - List bugs with optional filters and pagination
#[utoipa::path(
    get,
    path = "/api/bugs",
    tag = "Bugs",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("severity" = Option<String>, Query, description = "Filter by severity"),
        ("priority" = Option<String>, Query, description = "Filter by priority"),
        ("assignedTo" = Option<String>, Query, description = "Filter by assignee"),
        ("page" = Option<i64>, Query, description = "Page number, 1-based (default 1)"),
        ("limit" = Option<i64>, Query, description = "Page size (default 10, max 100)"),
    ),
    responses(
        (status = 200, description = "One page of bugs", body = ListBugsResponse),
        (status = 400, description = "Invalid pagination input", body = ApiError),
    )
)]
pub async fn list_bugs(
    State(state): State<Arc<BugState>>,
    Query(params): Query<ListBugsParams>,
) -> ApiResult<impl IntoResponse> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    page.validate_positive("page")?;
    limit.validate_range("limit", 1, MAX_LIMIT)?;

    // Equality filters on the stored text values. Unknown values are not
    // rejected; they match nothing and produce an empty page.
    let filter = BugFilter {
        status: params.status,
        severity: params.severity,
        priority: params.priority,
        assigned_to: params.assigned_to,
    };

    let offset = page_offset(page, limit)?;
    let bugs = state.db.bug_list(&filter, limit, offset).await?;
    let total = state.db.bug_count(&filter).await?;

    tracing::debug!(total, page, limit, "Listed bugs");

    let response = ListBugsResponse {
        bugs: bugs.into_iter().map(BugResponse::from).collect(),
        total_pages: total_pages(total, limit),
        current_page: page,
        total,
    };

    Ok(Json(response))
}

/// GET /api/bugs/{id} - Get bug by ID
#[utoipa::path(
    get,
    path = "/api/bugs/{id}",
    tag = "Bugs",
    params(
        ("id" = String, Path, description = "Bug ID")
    ),
    responses(
        (status = 200, description = "Bug details", body = BugResponse),
        (status = 400, description = "Malformed bug ID", body = ApiError),
        (status = 404, description = "Bug not found", body = ApiError),
    )
)]
pub async fn get_bug(
    State(state): State<Arc<BugState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    // Parse the path segment ourselves so a malformed identifier maps to
    // the InvalidIdentifier error body instead of a framework rejection.
    let id = Uuid::parse_str(&id)?;

    let bug = state
        .db
        .bug_get(id)
        .await?
        .ok_or_else(|| ApiError::bug_not_found(id))?;

    Ok(Json(BugResponse::from(bug)))
}

/// POST /api/bugs - Create a new bug
#[utoipa::path(
    post,
    path = "/api/bugs",
    tag = "Bugs",
    request_body = BugPayload,
    responses(
        (status = 201, description = "Bug created successfully", body = BugResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn create_bug(
    State(state): State<Arc<BugState>>,
    Json(payload): Json<BugPayload>,
) -> ApiResult<impl IntoResponse> {
    let validated = payload.validate()?;

    let bug = state.db.bug_create(&validated).await?;
    tracing::info!(bug_id = %bug.bug_id, "Created bug");

    Ok((StatusCode::CREATED, Json(BugResponse::from(bug))))
}

/// PUT /api/bugs/{id} - Replace an existing bug
#[utoipa::path(
    put,
    path = "/api/bugs/{id}",
    tag = "Bugs",
    params(
        ("id" = String, Path, description = "Bug ID")
    ),
    request_body = BugPayload,
    responses(
        (status = 200, description = "Bug updated successfully", body = BugResponse),
        (status = 400, description = "Invalid request or malformed bug ID", body = ApiError),
        (status = 404, description = "Bug not found", body = ApiError),
    )
)]
pub async fn update_bug(
    State(state): State<Arc<BugState>>,
    Path(id): Path<String>,
    Json(payload): Json<BugPayload>,
) -> ApiResult<impl IntoResponse> {
    let id = Uuid::parse_str(&id)?;

    // Full replacement payload, re-validated exactly like a create.
    let validated = payload.validate()?;

    let bug = state
        .db
        .bug_update(id, &validated)
        .await?
        .ok_or_else(|| ApiError::bug_not_found(id))?;

    tracing::info!(bug_id = %bug.bug_id, "Updated bug");

    Ok(Json(BugResponse::from(bug)))
}

/// DELETE /api/bugs/{id} - Delete bug
#[utoipa::path(
    delete,
    path = "/api/bugs/{id}",
    tag = "Bugs",
    params(
        ("id" = String, Path, description = "Bug ID")
    ),
    responses(
        (status = 200, description = "Bug deleted successfully", body = DeleteBugResponse),
        (status = 400, description = "Malformed bug ID", body = ApiError),
        (status = 404, description = "Bug not found", body = ApiError),
    )
)]
pub async fn delete_bug(
    State(state): State<Arc<BugState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = Uuid::parse_str(&id)?;

    if !state.db.bug_delete(id).await? {
        return Err(ApiError::bug_not_found(id));
    }

    tracing::info!(bug_id = %id, "Deleted bug");

    Ok(Json(DeleteBugResponse {
        message: "Bug deleted successfully".to_string(),
    }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the bug routes router.
pub fn create_router(db: DbClient) -> axum::Router {
    let state = Arc::new(BugState::new(db));

    axum::Router::new()
        .route("/", axum::routing::get(list_bugs))
        .route("/", axum::routing::post(create_bug))
        .route("/:id", axum::routing::get(get_bug))
        .route("/:id", axum::routing::put(update_bug))
        .route("/:id", axum::routing::delete(delete_bug))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_pagination_defaults() {
        let params = ListBugsParams::default();
        assert_eq!(params.page.unwrap_or(DEFAULT_PAGE), 1);
        assert_eq!(params.limit.unwrap_or(DEFAULT_LIMIT), 10);
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(1i64.validate_positive("page").is_ok());
        assert!(0i64.validate_positive("page").is_err());
        assert!(MAX_LIMIT.validate_range("limit", 1, MAX_LIMIT).is_ok());
        assert!((MAX_LIMIT + 1).validate_range("limit", 1, MAX_LIMIT).is_err());
    }

    #[test]
    fn test_offset_arithmetic() {
        assert_eq!(page_offset(3, 10).unwrap(), 20);

        // A huge page number that passed the positivity check must come
        // back as a range error, never a wrapped negative offset.
        assert!(page_offset(i64::MAX / 50, MAX_LIMIT).is_err());
    }

    #[test]
    fn test_malformed_id_is_invalid_identifier() {
        let err = ApiError::from(Uuid::parse_str("definitely-not-a-uuid").unwrap_err());
        assert_eq!(err.code, ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_filter_passthrough_preserves_raw_values() {
        let params = ListBugsParams {
            status: Some("In Progress".to_string()),
            severity: Some("NotASeverity".to_string()),
            ..Default::default()
        };

        let filter = BugFilter {
            status: params.status,
            severity: params.severity,
            priority: params.priority,
            assigned_to: params.assigned_to,
        };

        assert_eq!(filter.status.as_deref(), Some("In Progress"));
        assert_eq!(filter.severity.as_deref(), Some("NotASeverity"));
    }
}
