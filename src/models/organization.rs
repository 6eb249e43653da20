use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, sql::Datetime};

/// `admins` is a subset of `recruiters`, except for the transitional window
/// after a recruiter-only removal of a sitting admin. `admins` is never empty
/// once the organization exists. Both sets are written solely by the
/// membership coordinator.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Organization {
    pub id: RecordId,
    pub name: String,
    pub email: String, // ! the organization's own login, never a member email
    pub password_hash: String,
    pub activated: bool,
    pub admins: Vec<RecordId>,
    pub recruiters: Vec<RecordId>,
    pub created_at: Datetime,
    pub updated_at: Option<Datetime>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateOrganization {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub activated: bool,
    pub admins: Vec<RecordId>,
    pub recruiters: Vec<RecordId>,
    pub created_at: Datetime,
    pub updated_at: Option<Datetime>,
}

/// Membership view returned by the admin/recruiter removal endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MembershipSnapshot {
    pub id: RecordId,
    pub admins: Vec<RecordId>,
    pub recruiters: Vec<RecordId>,
}

impl From<Organization> for MembershipSnapshot {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            admins: org.admins,
            recruiters: org.recruiters,
        }
    }
}
