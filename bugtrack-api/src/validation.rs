//! Request Validation
//!
//! Validation traits shared by route handlers, plus the full bug payload
//! check used by both create and update (an update is a full replacement
//! payload and is re-validated exactly like a create).

use crate::error::{ApiError, ApiResult};
use crate::types::BugPayload;
use bugtrack_core::{Priority, Severity, Status, DEFAULT_ASSIGNEE, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};

/// Trait for validating non-empty strings.
///
/// # Example
/// ```ignore
/// use bugtrack_api::validation::ValidateNonEmpty;
///
/// fn create(name: &str) -> ApiResult<()> {
///     name.validate_non_empty("name")?;
///     // ... rest of logic
/// }
/// ```
pub trait ValidateNonEmpty {
    /// Validate that the value is non-empty.
    ///
    /// # Errors
    /// Returns `ApiError::missing_field` if the value is empty or whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ApiError::missing_field(field_name)),
        }
    }
}

/// Trait for validating string length limits.
pub trait ValidateMaxLen {
    /// Validate that the value does not exceed `max_len` characters.
    ///
    /// # Errors
    /// Returns `ApiError::field_too_long` on overflow.
    fn validate_max_len(&self, field_name: &str, max_len: usize) -> ApiResult<()>;
}

impl ValidateMaxLen for str {
    fn validate_max_len(&self, field_name: &str, max_len: usize) -> ApiResult<()> {
        if self.chars().count() > max_len {
            return Err(ApiError::field_too_long(field_name, max_len));
        }
        Ok(())
    }
}

/// Trait for validating numeric ranges on pagination inputs.
pub trait ValidateRange {
    /// Validate that the value is positive (> 0).
    fn validate_positive(&self, field_name: &str) -> ApiResult<()>;

    /// Validate that the value is within an inclusive range.
    fn validate_range(&self, field_name: &str, min: Self, max: Self) -> ApiResult<()>
    where
        Self: Sized;
}

macro_rules! impl_validate_range {
    ($($t:ty),*) => {
        $(
            impl ValidateRange for $t {
                fn validate_positive(&self, field_name: &str) -> ApiResult<()> {
                    if *self <= 0 as $t {
                        return Err(ApiError::invalid_range(field_name, 1, <$t>::MAX as i64));
                    }
                    Ok(())
                }

                fn validate_range(&self, field_name: &str, min: Self, max: Self) -> ApiResult<()> {
                    if *self < min || *self > max {
                        return Err(ApiError::invalid_range(field_name, min as i64, max as i64));
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_validate_range!(i32, i64, u32, u64, usize);

// ============================================================================
// VALIDATED BUG PAYLOAD
// ============================================================================

/// A bug payload that has passed validation, with defaults applied and
/// string fields trimmed. This is what the storage layer persists.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBug {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: Status,
    pub priority: Priority,
    pub assigned_to: String,
    pub reported_by: String,
    pub tags: Vec<String>,
}

impl BugPayload {
    /// Validate the payload against the bug schema.
    ///
    /// Checks required fields (title, description, reportedBy), length
    /// limits (100/1000 characters), applies the documented defaults, and
    /// trims every string field. Enumerated fields were already restricted
    /// to their fixed value sets by deserialization.
    pub fn validate(&self) -> ApiResult<ValidatedBug> {
        self.title.validate_non_empty("title")?;
        self.description.validate_non_empty("description")?;
        self.reported_by.validate_non_empty("reportedBy")?;

        // Required fields are present after the checks above.
        let title = self.title.as_deref().unwrap_or_default().trim().to_string();
        let description = self
            .description
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        let reported_by = self
            .reported_by
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();

        title.as_str().validate_max_len("title", TITLE_MAX_LEN)?;
        description
            .as_str()
            .validate_max_len("description", DESCRIPTION_MAX_LEN)?;

        let assigned_to = match self.assigned_to.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_ASSIGNEE.to_string(),
        };

        let tags = self
            .tags
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(ValidatedBug {
            title,
            description,
            severity: self.severity.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            assigned_to,
            reported_by,
            tags,
        })
    }
}
