//! OpenAPI Specification for the Bugtrack API
//!
//! Uses utoipa to generate the OpenAPI document from Rust types and route
//! annotations.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{bug, health};
use crate::types::{BugPayload, BugResponse, DeleteBugResponse, ListBugsResponse, RootResponse};

use bugtrack_core::{Bug, Priority, Severity, Status};

/// OpenAPI document for the Bugtrack API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bug Tracker API",
        version = "0.1.0",
        description = "REST API for tracking bugs: create, list, inspect, update, and delete bug records",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local Development")
    ),
    tags(
        (name = "Bugs", description = "Bug record CRUD with filtered, paginated listing"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        bug::list_bugs,
        bug::get_bug,
        bug::create_bug,
        bug::update_bug,
        bug::delete_bug,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        Bug,
        Severity,
        Status,
        Priority,
        BugPayload,
        BugResponse,
        ListBugsResponse,
        DeleteBugResponse,
        RootResponse,
        ApiError,
        ErrorCode,
        health::HealthResponse,
        health::HealthStatus,
        health::ReadinessResponse,
        health::ComponentHealth,
    ))
)]
pub struct ApiDoc;
