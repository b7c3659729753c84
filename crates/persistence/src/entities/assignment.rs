//! Assignment entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Assignment;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the assignments table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub course_code: String,
    pub offering: String,
    pub workload_hours: Option<f32>,
    pub created_at: DateTime<Utc>,
}

impl From<AssignmentEntity> for Assignment {
    fn from(entity: AssignmentEntity) -> Self {
        Self {
            id: entity.id,
            identity_id: entity.identity_id,
            course_code: entity.course_code,
            offering: entity.offering,
            workload_hours: entity.workload_hours,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_entity_to_domain() {
        let entity = AssignmentEntity {
            id: Uuid::new_v4(),
            identity_id: Uuid::new_v4(),
            course_code: "CSC148".to_string(),
            offering: "Winter 2020".to_string(),
            workload_hours: Some(54.0),
            created_at: Utc::now(),
        };

        let assignment: Assignment = entity.clone().into();
        assert_eq!(assignment.identity_id, entity.identity_id);
        assert_eq!(assignment.course_code, "CSC148");
        assert_eq!(assignment.workload_hours, Some(54.0));
    }
}
