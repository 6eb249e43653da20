use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::models::user::{AccountStatus, PlatformRole, User};

/// Normalized result of credential resolution. The only contract this core
/// exposes to the session layer; any email resolves to at most one kind.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdentityClaim {
    Individual {
        id: RecordId,
        role: PlatformRole,
        is_recruiter: bool,
        organization_id: Option<RecordId>,
        status: AccountStatus,
        has_onboarded: bool,
    },
    Organization {
        id: RecordId,
    },
}

impl IdentityClaim {
    pub fn individual(user: &User) -> Self {
        Self::Individual {
            id: user.id.clone(),
            role: user.role,
            is_recruiter: user.is_recruiter,
            organization_id: user.organization_id.clone(),
            status: user.status,
            has_onboarded: user.has_onboarded,
        }
    }

    pub fn subject_id(&self) -> &RecordId {
        match self {
            Self::Individual { id, .. } | Self::Organization { id } => id,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Individual { .. } => "individual",
            Self::Organization { .. } => "organization",
        }
    }

    pub fn role_str(&self) -> &'static str {
        match self {
            Self::Individual {
                role: PlatformRole::Standard,
                ..
            } => "standard",
            Self::Individual {
                role: PlatformRole::SystemAdmin,
                ..
            } => "system-admin",
            // Synthetic role: an organization credential acts as itself.
            Self::Organization { .. } => "organization",
        }
    }

    /// The organization this identity acts for: its own id for an
    /// organization credential, the membership back-reference for an
    /// individual.
    pub fn organization_ref(&self) -> Option<&RecordId> {
        match self {
            Self::Individual {
                organization_id, ..
            } => organization_id.as_ref(),
            Self::Organization { id } => Some(id),
        }
    }
}
