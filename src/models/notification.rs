use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, sql::Datetime};

/// In-app surface of a pending invite for a recipient who already has an
/// account. Carries its own accept/reject state, independent of the invite
/// token's consumed state.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InviteNotification {
    pub id: RecordId,
    pub recipient_id: RecordId,
    pub invite_id: RecordId,
    pub organization_id: RecordId,
    pub read: bool,
    /// Tri-state: `None` until the recipient responds, then fixed.
    pub accepted: Option<bool>,
    pub created_at: Datetime,
    pub responded_at: Option<Datetime>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateInviteNotification {
    pub recipient_id: RecordId,
    pub invite_id: RecordId,
    pub organization_id: RecordId,
    pub read: bool,
    pub accepted: Option<bool>,
    pub created_at: Datetime,
    pub responded_at: Option<Datetime>,
}
