use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, sql::Datetime};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InviteRole {
    Recruiter,
    Admin,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Invite {
    pub id: RecordId,
    pub organization_id: RecordId,
    pub email: String, // ! normalized target email
    pub role: InviteRole,
    /// Sha-256 digest of the raw token. The raw form leaves the system once,
    /// in the redemption link.
    pub token: String,
    pub created_by: RecordId,
    /// Flipped `false -> true` exactly once, by the membership coordinator's
    /// atomic admit transition. Never written anywhere else.
    pub used: bool,
    pub expires_at: Datetime,
    pub created_at: Datetime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateInvite {
    pub organization_id: RecordId,
    pub email: String,
    pub role: InviteRole,
    pub token: String,
    pub created_by: RecordId,
    pub used: bool,
    pub expires_at: Datetime,
    pub created_at: Datetime,
}
