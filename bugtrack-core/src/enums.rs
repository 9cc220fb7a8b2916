//! Enum types for Bugtrack entities
//!
//! Each enumerated bug field is restricted to a fixed value set. The wire
//! and database representations use the human-readable strings from the
//! public API ("In Progress", not "in_progress").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity of a reported bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid severity '{0}': must be Low, Medium, High, or Critical")]
pub struct ParseSeverityError(pub String);

impl Severity {
    /// All valid severity values, in display form.
    pub const VALUES: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ParseSeverityError> {
        match s {
            "Low" => Ok(Severity::Low),
            "Medium" => Ok(Severity::Medium),
            "High" => Ok(Severity::High),
            "Critical" => Ok(Severity::Critical),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::from_db_str(s)
    }
}

// ============================================================================
// STATUS
// ============================================================================

/// Lifecycle status of a bug.
///
/// The values form a natural progression (Open -> In Progress -> Resolved ->
/// Closed) but transitions are NOT enforced: any status may be set to any
/// other status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status '{0}': must be Open, In Progress, Resolved, or Closed")]
pub struct ParseStatusError(pub String);

impl Status {
    /// All valid status values, in display form.
    pub const VALUES: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ParseStatusError> {
        match s {
            "Open" => Ok(Status::Open),
            "In Progress" => Ok(Status::InProgress),
            "Resolved" => Ok(Status::Resolved),
            "Closed" => Ok(Status::Closed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_db_str(s)
    }
}

// ============================================================================
// PRIORITY
// ============================================================================

/// Scheduling priority of a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid priority '{0}': must be Low, Medium, High, or Urgent")]
pub struct ParsePriorityError(pub String);

impl Priority {
    /// All valid priority values, in display form.
    pub const VALUES: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ParsePriorityError> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "Urgent" => Ok(Priority::Urgent),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::from_db_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Severity::default(), Severity::Medium);
        assert_eq!(Status::default(), Status::Open);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_status_wire_form_uses_space() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");

        let parsed: Status = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, Status::InProgress);
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(Severity::from_db_str("Catastrophic").is_err());
        assert!(Status::from_db_str("Reopened").is_err());
        assert!(Priority::from_db_str("Whenever").is_err());
        assert!(serde_json::from_str::<Severity>("\"Catastrophic\"").is_err());
    }

    #[test]
    fn test_db_str_round_trip() {
        for s in Severity::VALUES {
            assert_eq!(Severity::from_db_str(s.as_db_str()).unwrap(), s);
        }
        for s in Status::VALUES {
            assert_eq!(Status::from_db_str(s.as_db_str()).unwrap(), s);
        }
        for p in Priority::VALUES {
            assert_eq!(Priority::from_db_str(p.as_db_str()).unwrap(), p);
        }
    }

    #[test]
    fn test_serde_matches_db_str() {
        // JSON wire form and DB text form must agree, since list filters
        // compare raw query-string values against the stored text.
        for s in Status::VALUES {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_db_str()));
        }
        for s in Severity::VALUES {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_db_str()));
        }
        for p in Priority::VALUES {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.as_db_str()));
        }
    }

    proptest! {
        #[test]
        fn prop_arbitrary_strings_never_panic(s in ".*") {
            let _ = Severity::from_db_str(&s);
            let _ = Status::from_db_str(&s);
            let _ = Priority::from_db_str(&s);
        }
    }
}
