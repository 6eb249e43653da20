use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal, engine::any::Any};
use tracing::info;

use crate::{
    consts::auth_const::NOTIFICATION_TABLE,
    core::{coordinator, find_user_by_email, ledger},
    errors::{Error, Result},
    models::{
        invite::{Invite, InviteRole},
        notification::{CreateInviteNotification, InviteNotification},
        user::{CreateUser, User},
    },
    utils::{email::normalize_email, pwd, time},
};

// Stateless orchestration over the ledger and the coordinator: picks the
// delivery path at issuance and the redemption path at acceptance.

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitePath {
    Notification,
    Email,
}

#[derive(Serialize, Debug, Clone)]
pub struct IssuedInvite {
    pub path: InvitePath,
    pub target_id: RecordId,
}

#[derive(Serialize, Debug, Clone)]
pub struct InviteResponseOutcome {
    pub accepted: bool,
    pub organization_id: Option<RecordId>,
}

/// Issues an invite and picks its delivery path: recipients who already own
/// an account get an in-app notification, everyone else gets the token in a
/// redemption link. Both paths share the one underlying token.
pub async fn send_invite(
    sdb: &Surreal<Any>,
    organization_id: RecordId,
    issuer: RecordId,
    email: &str,
    role: InviteRole,
) -> Result<IssuedInvite> {
    let (invite, raw_token) = ledger::issue(sdb, organization_id, email, role, issuer).await?;

    match find_user_by_email(sdb, &invite.email).await? {
        Some(recipient) => {
            let notification = create_notification(sdb, &invite, &recipient).await?;
            Ok(IssuedInvite {
                path: InvitePath::Notification,
                target_id: notification.id,
            })
        }
        None => {
            dispatch_invite_email(&invite, &raw_token);
            Ok(IssuedInvite {
                path: InvitePath::Email,
                target_id: invite.id,
            })
        }
    }
}

/// Notification-path redemption. Accept re-validates the token and admits;
/// reject marks the notification read+rejected and leaves the token alone
/// (it stays redeemable via the link until it expires). Responding a second
/// time is a no-op reporting the recorded outcome.
pub async fn respond(
    sdb: &Surreal<Any>,
    responder: &RecordId,
    notification_id: RecordId,
    invite_id: RecordId,
    accept: bool,
) -> Result<InviteResponseOutcome> {
    let notification = sdb
        .select::<Option<InviteNotification>>(notification_id.clone())
        .await?
        .ok_or(Error::NotFound)?;
    if notification.recipient_id != *responder {
        return Err(Error::Forbidden);
    }
    if notification.invite_id != invite_id {
        return Err(Error::NotFound);
    }
    if let Some(prev) = notification.accepted {
        return Ok(InviteResponseOutcome {
            accepted: prev,
            organization_id: prev.then(|| notification.organization_id.clone()),
        });
    }

    if accept {
        let invite = ledger::load_live_by_id(sdb, invite_id).await?;
        let user = sdb
            .select::<Option<User>>(responder.clone())
            .await?
            .ok_or(Error::NotFound)?;
        coordinator::admit_member(sdb, &invite, &user).await?;
    }

    // Conditional on the tri-state still being unset, so a racing response
    // cannot record twice.
    let marked: Vec<InviteNotification> = sdb
        .query(
            "UPDATE type::table($table) SET read = true, accepted = $accept, responded_at = $now WHERE id = $id AND accepted = NONE RETURN AFTER;",
        )
        .bind(("table", NOTIFICATION_TABLE))
        .bind(("accept", accept))
        .bind(("now", time::now()))
        .bind(("id", notification_id))
        .await?
        .take(0)?;
    if let Some(current) = marked.into_iter().next() {
        let accepted = current.accepted.unwrap_or(accept);
        return Ok(InviteResponseOutcome {
            accepted,
            organization_id: accepted.then(|| current.organization_id),
        });
    }
    Ok(InviteResponseOutcome {
        accepted: accept,
        organization_id: accept.then(|| notification.organization_id),
    })
}

/// Token-link redemption for brand-new registrants: registration and
/// admission commit as one transaction.
pub async fn redeem_with_registration(
    sdb: &Surreal<Any>,
    raw_token: &str,
    name: String,
    email: &str,
    password: &str,
) -> Result<(User, RecordId)> {
    let invite = ledger::load_live(sdb, raw_token).await?;
    let email = normalize_email(email);
    if email != invite.email {
        return Err(Error::EmailMismatch);
    }
    if find_user_by_email(sdb, &email).await?.is_some() {
        // Existing accounts take the notification path instead.
        return Err(Error::EmailExist(email));
    }

    let content = CreateUser::registration(name, email, pwd::hash(password.as_bytes())?);
    let user = coordinator::admit_new_member(sdb, &invite, content).await?;
    Ok((user, invite.organization_id))
}

pub async fn notifications_for(
    sdb: &Surreal<Any>,
    recipient: &RecordId,
) -> Result<Vec<InviteNotification>> {
    let notifications = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE recipient_id = $recipient ORDER BY created_at DESC;",
        )
        .bind(("table", NOTIFICATION_TABLE))
        .bind(("recipient", recipient.clone()))
        .await?
        .take(0)?;
    Ok(notifications)
}

async fn create_notification(
    sdb: &Surreal<Any>,
    invite: &Invite,
    recipient: &User,
) -> Result<InviteNotification> {
    let notification_data = CreateInviteNotification {
        recipient_id: recipient.id.clone(),
        invite_id: invite.id.clone(),
        organization_id: invite.organization_id.clone(),
        read: false,
        accepted: None,
        created_at: time::now(),
        responded_at: None,
    };
    sdb.create::<Option<InviteNotification>>(NOTIFICATION_TABLE)
        .content(notification_data)
        .await?
        .ok_or(Error::Internal)
}

/// Outbound email is an external collaborator; hand off and move on.
fn dispatch_invite_email(invite: &Invite, raw_token: &str) {
    info!(
        email = %invite.email,
        organization = %invite.organization_id,
        "dispatching invite link /invites/{raw_token}/redeem"
    );
}
