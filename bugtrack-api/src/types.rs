//! API Request and Response Types
//!
//! This module defines all request and response types for the Bugtrack API.
//! Wire field names are camelCase to match the public REST surface
//! (`assignedTo`, `reportedBy`, `createdAt`, `totalPages`, ...).

use crate::error::{ApiError, ApiResult};
use bugtrack_core::{Bug, EntityId, Priority, Severity, Status, Timestamp};
use serde::{Deserialize, Serialize};

/// Default page number when the client omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when the client omits `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on page size.
pub const MAX_LIMIT: i64 = 100;

// ============================================================================
// BUG TYPES
// ============================================================================

/// Request body for creating or replacing a bug.
///
/// POST and PUT share this type: an update is a full replacement payload
/// re-validated exactly like a create, never a partial patch. Required
/// fields are modeled as `Option` so that a missing field surfaces as a
/// structured MissingField error instead of a framework rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BugPayload {
    /// Short summary of the bug (required, at most 100 characters)
    pub title: Option<String>,
    /// Full description (required, at most 1000 characters)
    pub description: Option<String>,
    /// Defaults to Medium when omitted
    pub severity: Option<Severity>,
    /// Defaults to Open when omitted
    pub status: Option<Status>,
    /// Defaults to Medium when omitted
    pub priority: Option<Priority>,
    /// Defaults to "Unassigned" when omitted
    pub assigned_to: Option<String>,
    /// Name of the reporter (required)
    pub reported_by: Option<String>,
    /// Free-form labels; entries are trimmed
    pub tags: Option<Vec<String>>,
}

/// Query parameters for listing bugs.
///
/// Filters are equality matches against the stored text values. They are
/// deliberately untyped strings: an unknown filter value matches nothing
/// and yields an empty page rather than a validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListBugsParams {
    /// Filter by status
    pub status: Option<String>,
    /// Filter by severity
    pub severity: Option<String>,
    /// Filter by priority
    pub priority: Option<String>,
    /// Filter by assignee
    pub assigned_to: Option<String>,
    /// Page number, 1-based (default 1)
    pub page: Option<i64>,
    /// Page size (default 10, at most 100)
    pub limit: Option<i64>,
}

/// A single bug on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BugResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: Status,
    pub priority: Priority,
    pub assigned_to: String,
    pub reported_by: String,
    pub tags: Vec<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl From<Bug> for BugResponse {
    fn from(bug: Bug) -> Self {
        Self {
            id: bug.bug_id,
            title: bug.title,
            description: bug.description,
            severity: bug.severity,
            status: bug.status,
            priority: bug.priority,
            assigned_to: bug.assigned_to,
            reported_by: bug.reported_by,
            tags: bug.tags,
            created_at: bug.created_at,
            updated_at: bug.updated_at,
        }
    }
}

/// Response for the list endpoint: one page of bugs plus pagination totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ListBugsResponse {
    pub bugs: Vec<BugResponse>,
    /// ceil(total / limit)
    pub total_pages: i64,
    /// Page that was returned (1-based)
    pub current_page: i64,
    /// Total records matching the filter, before pagination
    pub total: i64,
}

/// Confirmation body returned by the delete endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteBugResponse {
    pub message: String,
}

/// Body served at the API root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
}

// ============================================================================
// PAGINATION ARITHMETIC
// ============================================================================

/// Compute the page count for a filtered total: ceil(total / limit).
///
/// Zero matching records means zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    debug_assert!(limit > 0);
    if total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Compute the row offset for a 1-based page number.
///
/// Checked arithmetic: an absurdly large page number that would overflow
/// the offset is rejected instead of wrapping to a negative OFFSET the
/// store would refuse.
pub fn page_offset(page: i64, limit: i64) -> ApiResult<i64> {
    debug_assert!(page > 0 && limit > 0);
    page.checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
        .ok_or_else(|| ApiError::invalid_range("page", 1, i64::MAX / MAX_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_total_pages_exact_and_partial() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(100, 10), 10);
        assert_eq!(total_pages(101, 10), 11);
        assert_eq!(total_pages(5, 1), 5);
    }

    #[test]
    fn test_bug_response_wire_field_names() {
        let bug = bugtrack_core::Bug {
            bug_id: bugtrack_core::new_entity_id(),
            title: "t".to_string(),
            description: "d".to_string(),
            severity: Severity::High,
            status: Status::InProgress,
            priority: Priority::Urgent,
            assigned_to: "bob".to_string(),
            reported_by: "alice".to_string(),
            tags: vec![],
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(BugResponse::from(bug)).unwrap();

        assert!(json.get("assignedTo").is_some());
        assert!(json.get("reportedBy").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["status"], "In Progress");
    }

    #[test]
    fn test_list_params_accept_unknown_filter_values() {
        // Unknown enum strings deserialize fine; they simply match nothing.
        let params: ListBugsParams =
            serde_json::from_str(r#"{"status":"Bogus","page":2,"limit":5}"#).unwrap();
        assert_eq!(params.status.as_deref(), Some("Bogus"));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.limit, Some(5));
    }

    #[test]
    fn test_payload_missing_fields_deserialize_as_none() {
        let payload: BugPayload = serde_json::from_str(r#"{"title":"only title"}"#).unwrap();
        assert_eq!(payload.title.as_deref(), Some("only title"));
        assert!(payload.description.is_none());
        assert!(payload.reported_by.is_none());
        assert!(payload.severity.is_none());
    }

    #[test]
    fn test_list_response_wire_field_names() {
        let resp = ListBugsResponse {
            bugs: vec![],
            total_pages: 3,
            current_page: 1,
            total: 25,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["total"], 25);
    }

    #[test]
    fn test_page_offset_arithmetic() {
        assert_eq!(page_offset(1, 10).unwrap(), 0);
        assert_eq!(page_offset(3, 10).unwrap(), 20);
        assert_eq!(page_offset(2, MAX_LIMIT).unwrap(), 100);
    }

    #[test]
    fn test_page_offset_rejects_overflowing_page() {
        use crate::error::ErrorCode;

        let err = page_offset(i64::MAX / 50, MAX_LIMIT).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRange);

        // The largest representable offsets still compute.
        assert!(page_offset(i64::MAX, 1).is_ok());
        assert!(page_offset(i64::MAX / MAX_LIMIT, MAX_LIMIT).is_ok());
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 0i64..1_000_000, limit in 1i64..1_000) {
            let pages = total_pages(total, limit);
            // Enough pages to hold every record
            prop_assert!(pages * limit >= total);
            // But not a page more than needed
            prop_assert!((pages - 1).max(0) * limit < total || total == 0);
        }
    }
}
