//! Domain services for the TA Directory.
//!
//! Services contain business logic that operates on domain models. Storage
//! is reached only through the traits in [`store`].

pub mod audit;
pub mod bulk_invitation;
pub mod claim_eligibility;
pub mod invitation_graph;
pub mod invitation_history;
pub mod memory_store;
pub mod name_matcher;
pub mod profile_merge;
pub mod store;

pub use audit::{audit_helpers, AuditLogBuilder};
pub use bulk_invitation::{BulkDispatchTally, BulkInvitationDispatcher, BulkInvitationPolicy};
pub use claim_eligibility::{decide_claim, ClaimEligibilityService};
pub use invitation_graph::{
    build_forest, filter_forest, summarize_forest, InvitationGraphService, DEFAULT_TOP_INVITERS,
};
pub use invitation_history::{build_history, InvitationHistoryService};
pub use memory_store::InMemoryDirectory;
pub use name_matcher::{NameMatch, NameMatcher, NicknameTable};
pub use profile_merge::{verify_claim_preconditions, verify_merge_counts, ProfileMergeEngine};
pub use store::{ClaimStore, IdentityStore, InvitationCreator, InvitationStore};
