//! The Bug entity
//!
//! A bug is a single tracked record in a flat collection. Identity is an
//! opaque server-generated UUID; `created_at`/`updated_at` are assigned at
//! creation and `updated_at` is refreshed on every successful update.

use crate::enums::{Priority, Severity, Status};
use crate::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Maximum length of a bug title, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum length of a bug description, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Assignee recorded when a bug has not been assigned to anyone.
pub const DEFAULT_ASSIGNEE: &str = "Unassigned";

/// A tracked bug record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Bug {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub bug_id: EntityId,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_entity_id;
    use chrono::Utc;

    fn sample_bug() -> Bug {
        let now = Utc::now();
        Bug {
            bug_id: new_entity_id(),
            title: "Login button unresponsive".to_string(),
            description: "Clicking the login button does nothing on Firefox".to_string(),
            severity: Severity::default(),
            status: Status::default(),
            priority: Priority::default(),
            assigned_to: DEFAULT_ASSIGNEE.to_string(),
            reported_by: "alice".to_string(),
            tags: vec!["ui".to_string(), "auth".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_default_field_values() {
        let bug = sample_bug();
        assert_eq!(bug.severity, Severity::Medium);
        assert_eq!(bug.status, Status::Open);
        assert_eq!(bug.priority, Priority::Medium);
        assert_eq!(bug.assigned_to, "Unassigned");
    }

    #[test]
    fn test_bug_json_round_trip() {
        let bug = sample_bug();
        let json = serde_json::to_string(&bug).unwrap();
        let back: Bug = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bug);
    }
}
