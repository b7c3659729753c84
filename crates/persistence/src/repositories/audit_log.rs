//! Audit log writes.
//!
//! Audit records are only written inside the transaction of the change they
//! describe, so this module works on a borrowed connection rather than the
//! pool.

use domain::models::AuditRecord;
use sqlx::PgConnection;

use crate::entities::AuditLogEntity;
use crate::metrics::QueryTimer;

/// Insert an audit record on an open connection or transaction.
pub async fn insert_audit_record(
    conn: &mut PgConnection,
    record: &AuditRecord,
) -> Result<(), sqlx::Error> {
    let timer = QueryTimer::new("insert_audit_log");
    let entity = AuditLogEntity::from(record);
    let result = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, actor_id, action, resource_type, resource_id, resource_name, details, timestamp)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(entity.id)
    .bind(entity.actor_id)
    .bind(&entity.action)
    .bind(&entity.resource_type)
    .bind(&entity.resource_id)
    .bind(&entity.resource_name)
    .bind(&entity.details)
    .bind(entity.timestamp)
    .execute(conn)
    .await;
    timer.record();
    result.map(|_| ())
}
