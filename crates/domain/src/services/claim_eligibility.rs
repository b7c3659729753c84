//! Claim eligibility checks.
//!
//! Answers "may this signed-in identity claim that placeholder?" without
//! changing anything. Business outcomes come back as a [`ClaimDecision`];
//! only storage failures are errors.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use shared::pagination::encode_cursor;

use crate::errors::StoreError;
use crate::models::{ClaimDecision, ClaimReason, ClaimableProfilesPage, Identity};

use super::name_matcher::NameMatcher;
use super::store::IdentityStore;

/// Decides a claim from already-loaded records.
pub fn decide_claim(
    profile: Option<&Identity>,
    claimant: Option<&Identity>,
    matcher: &NameMatcher,
) -> ClaimDecision {
    let Some(profile) = profile else {
        return ClaimDecision::declined(ClaimReason::ProfileNotFound);
    };
    let Some(claimant) = claimant else {
        return ClaimDecision::declined(ClaimReason::CurrentUserNotFound);
    };
    if claimant.id == profile.id || claimant.is_unclaimed {
        return ClaimDecision::declined(ClaimReason::InvalidClaimant);
    }
    if !profile.is_unclaimed {
        return ClaimDecision::declined(ClaimReason::AlreadyClaimed);
    }
    if profile.claimed_by.is_some() {
        return ClaimDecision::declined(ClaimReason::ClaimedByAnotherUser);
    }
    if !matcher.matches(
        &claimant.first_name,
        &claimant.last_name,
        &profile.first_name,
        &profile.last_name,
    ) {
        return ClaimDecision::declined(ClaimReason::NameMismatch);
    }

    ClaimDecision::approved(profile)
}

/// Read-only eligibility and claimable-profile listing.
#[derive(Debug, Clone)]
pub struct ClaimEligibilityService<S> {
    store: S,
    matcher: NameMatcher,
}

impl<S: IdentityStore> ClaimEligibilityService<S> {
    pub fn new(store: S) -> Self {
        Self::with_matcher(store, NameMatcher::default())
    }

    pub fn with_matcher(store: S, matcher: NameMatcher) -> Self {
        Self { store, matcher }
    }

    pub async fn evaluate(
        &self,
        profile_id: Uuid,
        claimant_id: Uuid,
    ) -> Result<ClaimDecision, StoreError> {
        let profile = self.store.find_identity(profile_id).await?;
        let claimant = self.store.find_identity(claimant_id).await?;

        let decision = decide_claim(profile.as_ref(), claimant.as_ref(), &self.matcher);
        debug!(
            profile_id = %profile_id,
            claimant_id = %claimant_id,
            claimable = decision.claimable,
            reason = ?decision.reason_code,
            "Evaluated claim eligibility"
        );
        Ok(decision)
    }

    /// One page of claimable placeholders.
    ///
    /// `search` must already be normalized; `after` is a decoded cursor.
    pub async fn list_claimable(
        &self,
        search: Option<&str>,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: u32,
    ) -> Result<ClaimableProfilesPage, StoreError> {
        let mut profiles = self
            .store
            .list_claimable(search, after, limit.saturating_add(1))
            .await?;

        let next_cursor = if profiles.len() > limit as usize {
            profiles.truncate(limit as usize);
            profiles.last().map(|p| encode_cursor(p.created_at, p.id))
        } else {
            None
        };

        Ok(ClaimableProfilesPage {
            data: profiles.iter().map(Into::into).collect(),
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::fixtures::{account, placeholder};
    use crate::services::memory_store::InMemoryDirectory;
    use chrono::{Duration, TimeZone};
    use shared::pagination::decode_cursor;

    async fn directory_with(identities: &[&Identity]) -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();
        for identity in identities {
            directory.insert_identity((*identity).clone()).await;
        }
        directory
    }

    #[tokio::test]
    async fn test_nickname_claim_is_allowed() {
        let profile = placeholder("Will", "Smith", "wsmith@alumni.example.edu");
        let claimant = account("William", "Smith", "william.smith@example.edu");
        let service = ClaimEligibilityService::new(directory_with(&[&profile, &claimant]).await);

        let decision = service.evaluate(profile.id, claimant.id).await.unwrap();

        assert!(decision.claimable);
        assert_eq!(decision.reason, "may claim");
        let info = decision.profile_info.unwrap();
        assert_eq!(info.display_name, "Will Smith");
        assert_eq!(info.graduation_year, Some(2019));
        assert_eq!(info.program.as_deref(), Some("Computer Science"));
    }

    #[tokio::test]
    async fn test_different_last_name_is_rejected() {
        let profile = placeholder("Will", "Smith", "wsmith@alumni.example.edu");
        let claimant = account("William", "Jones", "wjones@example.edu");
        let service = ClaimEligibilityService::new(directory_with(&[&profile, &claimant]).await);

        let decision = service.evaluate(profile.id, claimant.id).await.unwrap();

        assert!(!decision.claimable);
        assert_eq!(decision.reason_code, ClaimReason::NameMismatch);
        assert_eq!(
            decision.reason,
            "name does not match; only matching names may claim"
        );
        assert!(decision.profile_info.is_none());
    }

    #[tokio::test]
    async fn test_missing_records() {
        let profile = placeholder("Will", "Smith", "wsmith@alumni.example.edu");
        let claimant = account("Will", "Smith", "will@example.edu");
        let service = ClaimEligibilityService::new(directory_with(&[&profile, &claimant]).await);

        let decision = service.evaluate(Uuid::new_v4(), claimant.id).await.unwrap();
        assert_eq!(decision.reason, "profile not found");

        let decision = service.evaluate(profile.id, Uuid::new_v4()).await.unwrap();
        assert_eq!(decision.reason, "current user not found");
    }

    #[test]
    fn test_decision_order() {
        let matcher = NameMatcher::default();
        let claimant = account("Will", "Smith", "will@example.edu");

        let regular = account("Will", "Smith", "other@example.edu");
        assert_eq!(
            decide_claim(Some(&regular), Some(&claimant), &matcher).reason,
            "already claimed"
        );

        let mut taken = placeholder("Will", "Smith", "taken@alumni.example.edu");
        taken.claimed_by = Some(Uuid::new_v4());
        assert_eq!(
            decide_claim(Some(&taken), Some(&claimant), &matcher).reason,
            "already claimed by another user"
        );

        // Claimed-by check wins over a name mismatch.
        let mut taken_mismatch = placeholder("Grace", "Hopper", "gh@alumni.example.edu");
        taken_mismatch.claimed_by = Some(Uuid::new_v4());
        assert_eq!(
            decide_claim(Some(&taken_mismatch), Some(&claimant), &matcher).reason_code,
            ClaimReason::ClaimedByAnotherUser
        );

        assert_eq!(
            decide_claim(None, None, &matcher).reason_code,
            ClaimReason::ProfileNotFound
        );
    }

    #[test]
    fn test_placeholder_cannot_claim() {
        let matcher = NameMatcher::default();
        let profile = placeholder("Will", "Smith", "a@alumni.example.edu");
        let other = placeholder("Will", "Smith", "b@alumni.example.edu");

        assert_eq!(
            decide_claim(Some(&profile), Some(&other), &matcher).reason,
            "current user cannot claim profiles"
        );
        assert_eq!(
            decide_claim(Some(&profile), Some(&profile), &matcher).reason_code,
            ClaimReason::InvalidClaimant
        );
    }

    #[tokio::test]
    async fn test_evaluate_does_not_mutate() {
        let profile = placeholder("Will", "Smith", "wsmith@alumni.example.edu");
        let claimant = account("Bill", "Smith", "bill@example.edu");
        let directory = directory_with(&[&profile, &claimant]).await;
        let service = ClaimEligibilityService::new(directory.clone());

        for _ in 0..3 {
            assert!(service.evaluate(profile.id, claimant.id).await.unwrap().claimable);
        }

        assert_eq!(directory.identity(profile.id).await.unwrap(), profile);
        assert!(directory.audit_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_claimable_cursor() {
        let directory = InMemoryDirectory::new();
        let base = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
        for i in 0..5 {
            let mut profile = placeholder(
                "Alum",
                &format!("Number{}", i),
                &format!("n{}@alumni.example.edu", i),
            );
            profile.created_at = base + Duration::seconds(i);
            directory.insert_identity(profile).await;
        }
        let service = ClaimEligibilityService::new(directory);

        let first = service.list_claimable(None, None, 2).await.unwrap();
        assert_eq!(first.data.len(), 2);
        let cursor = first.next_cursor.expect("more pages");

        let after = decode_cursor(&cursor).unwrap();
        let second = service.list_claimable(None, Some(after), 2).await.unwrap();
        assert_eq!(second.data[0].display_name, "Alum Number2");

        let after = decode_cursor(&second.next_cursor.unwrap()).unwrap();
        let last = service.list_claimable(None, Some(after), 2).await.unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(last.next_cursor.is_none());
    }
}
