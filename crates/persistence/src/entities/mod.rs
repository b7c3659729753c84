//! Database entity definitions.
//!
//! Entities map directly to database rows and convert into domain models.

pub mod assignment;
pub mod audit_log;
pub mod identity;
pub mod invitation;

pub use assignment::AssignmentEntity;
pub use audit_log::AuditLogEntity;
pub use identity::{IdentityEntity, IdentityRoleDb};
pub use invitation::InvitationEntity;
