//! Assignment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Links an identity to one offering of a course.
///
/// Each assignment is owned by exactly one identity. Claiming a placeholder
/// re-points `identity_id`; rows are never copied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Assignment {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub course_code: String,
    /// Term label, e.g. "Fall 2019".
    pub offering: String,
    pub workload_hours: Option<f32>,
    pub created_at: DateTime<Utc>,
}
