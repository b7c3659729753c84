//! Domain models for the TA Directory.

pub mod assignment;
pub mod audit_log;
pub mod claim;
pub mod identity;
pub mod invitation;
pub mod invitation_tree;

pub use assignment::Assignment;
pub use audit_log::{AuditAction, AuditRecord};
pub use claim::{ClaimDecision, ClaimProfileInfo, ClaimReason, ClaimTransfer, MergedSummary};
pub use identity::{
    ClaimableProfileSummary, ClaimableProfilesPage, Identity, IdentityRole, IdentitySummary,
    ListClaimableProfilesQuery,
};
pub use invitation::{
    BulkInviteItemResult, BulkInviteItemStatus, BulkInviteOutcome, BulkInviteRequest,
    CreateInvitationRequest, InvitationEdge, InvitationHistoryEntry, InvitationHistoryQuery,
    InvitationStatus, NewInvitation, DEFAULT_INVITATION_EXPIRY_DAYS,
};
pub use invitation_tree::{
    ForestSummary, ForestSummaryQuery, InvitationNode, InvitationTreeQuery, InviterRanking,
};
