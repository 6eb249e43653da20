use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, sql::Datetime};

/// Platform-wide role. Organizational admin is *not* encoded here; it is
/// membership in `Organization.admins`, additive to this role.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformRole {
    Standard,
    SystemAdmin,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Pending,
    Suspended,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String, // ! unique, stored normalized (trimmed + lower-cased)
    pub password_hash: String,
    pub role: PlatformRole,
    pub status: AccountStatus,
    pub activated: bool,
    pub has_onboarded: bool,
    pub is_recruiter: bool,
    /// Weak reference: at most one organization, and only while this user
    /// appears in that organization's recruiter set. Written solely by the
    /// membership coordinator.
    pub organization_id: Option<RecordId>,
    pub created_at: Datetime,
    pub updated_at: Option<Datetime>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: PlatformRole,
    pub status: AccountStatus,
    pub activated: bool,
    pub has_onboarded: bool,
    pub is_recruiter: bool,
    pub organization_id: Option<RecordId>,
    pub created_at: Datetime,
    pub updated_at: Option<Datetime>,
}

impl CreateUser {
    /// Self-registration baseline: active standard account, no membership.
    pub fn registration(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
            role: PlatformRole::Standard,
            status: AccountStatus::Active,
            activated: true,
            has_onboarded: false,
            is_recruiter: false,
            organization_id: None,
            created_at: crate::utils::time::now(),
            updated_at: None,
        }
    }
}
