//! Identity domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role tag carried by every identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityRole {
    Admin,
    Instructor,
    Ta,
    Alumni,
}

impl IdentityRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityRole::Admin => "admin",
            IdentityRole::Instructor => "instructor",
            IdentityRole::Ta => "ta",
            IdentityRole::Alumni => "alumni",
        }
    }
}

impl FromStr for IdentityRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(IdentityRole::Admin),
            "instructor" => Ok(IdentityRole::Instructor),
            "ta" => Ok(IdentityRole::Ta),
            "alumni" => Ok(IdentityRole::Alumni),
            _ => Err(format!("Invalid identity role: {}", s)),
        }
    }
}

impl fmt::Display for IdentityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A person record in the directory.
///
/// Placeholder records created by an administrator have `is_unclaimed` set.
/// Once a real account claims one, `claimed_by` points at that account and the
/// placeholder is permanently consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub graduation_year: Option<i32>,
    pub program: Option<String>,
    pub location: Option<String>,
    pub role: IdentityRole,
    pub is_unclaimed: bool,
    pub claimed_by: Option<Uuid>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// "First Last", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// True for placeholders nobody has claimed yet.
    pub fn is_claimable(&self) -> bool {
        self.is_unclaimed && self.claimed_by.is_none()
    }

    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            is_unclaimed: self.is_unclaimed,
        }
    }
}

/// Compact identity view used inside invitation trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IdentitySummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: IdentityRole,
    pub is_unclaimed: bool,
}

impl IdentitySummary {
    /// Case-insensitive substring match over "first last" and email.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        let full_name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        full_name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }
}

/// Query for listing claimable placeholder profiles.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ListClaimableProfilesQuery {
    /// Case-insensitive name filter.
    #[validate(custom(function = "shared::validation::validate_search_query"))]
    pub search: Option<String>,

    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,

    /// Page size (1-100, default 25).
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

/// Placeholder profile as shown in the claim picker.
///
/// Email is deliberately absent: the picker is visible to any signed-in user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaimableProfileSummary {
    pub id: Uuid,
    pub display_name: String,
    pub graduation_year: Option<i32>,
    pub program: Option<String>,
    pub location: Option<String>,
}

impl From<&Identity> for ClaimableProfileSummary {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            display_name: identity.display_name(),
            graduation_year: identity.graduation_year,
            program: identity.program.clone(),
            location: identity.location.clone(),
        }
    }
}

/// One page of claimable profiles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaimableProfilesPage {
    pub data: Vec<ClaimableProfileSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
