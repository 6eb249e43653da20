use surrealdb::{RecordId, Surreal, engine::any::Any, sql::Datetime};

use crate::{
    consts::auth_const::INVITE_TABLE,
    errors::{Error, Result},
    models::invite::{CreateInvite, Invite, InviteRole},
    utils::{email::normalize_email, time, token},
};

/// Issues a new invite for `(organization, email, role)` and returns it
/// together with the raw token. At most one live invite may exist per
/// (organization, email) pair.
pub async fn issue(
    sdb: &Surreal<Any>,
    organization_id: RecordId,
    email: &str,
    role: InviteRole,
    issuer: RecordId,
) -> Result<(Invite, String)> {
    let email = normalize_email(email);

    let pending: Vec<Invite> = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE organization_id = $organization_id AND email = $email AND used = false AND expires_at > $now;",
        )
        .bind(("table", INVITE_TABLE))
        .bind(("organization_id", organization_id.clone()))
        .bind(("email", email.clone()))
        .bind(("now", time::now()))
        .await?
        .take(0)?;
    if !pending.is_empty() {
        return Err(Error::DuplicatePending(email));
    }

    let (raw, digest) = token::generate_invite_token();
    let invite_data = CreateInvite {
        organization_id,
        email,
        role,
        token: digest,
        created_by: issuer,
        used: false,
        expires_at: time::invite_expiry(),
        created_at: time::now(),
    };
    let invite = sdb
        .create::<Option<Invite>>(INVITE_TABLE)
        .content(invite_data)
        .await?
        .ok_or(Error::Internal)?;

    Ok((invite, raw))
}

/// Validates a raw token from the redemption link without consuming it.
/// Consumption is the coordinator's atomic transition.
pub async fn load_live(sdb: &Surreal<Any>, raw_token: &str) -> Result<Invite> {
    // $token is a protected SurrealDB parameter, so the digest binds under
    // its own name.
    let digest = token::digest_of(raw_token.trim());
    let invite = sdb
        .query("SELECT * FROM type::table($table) WHERE token = $digest;")
        .bind(("table", INVITE_TABLE))
        .bind(("digest", digest))
        .await?
        .take::<Vec<Invite>>(0)?
        .into_iter()
        .next()
        .ok_or(Error::InviteNotFound)?;
    ensure_live(invite)
}

/// Same validation, keyed by invite id. Used by the notification path.
pub async fn load_live_by_id(sdb: &Surreal<Any>, invite_id: RecordId) -> Result<Invite> {
    let invite = sdb
        .select::<Option<Invite>>(invite_id)
        .await?
        .ok_or(Error::InviteNotFound)?;
    ensure_live(invite)
}

/// Liveness predicate: unused and strictly before expiry. At the boundary
/// the invite is dead.
pub fn is_live(invite: &Invite, at: &Datetime) -> bool {
    !invite.used && invite.expires_at > *at
}

fn ensure_live(invite: Invite) -> Result<Invite> {
    if invite.used {
        return Err(Error::InviteAlreadyUsed);
    }
    if invite.expires_at <= time::now() {
        return Err(Error::InviteExpired);
    }
    Ok(invite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::mem_state;
    use surrealdb::RecordId;

    fn org_id() -> RecordId {
        RecordId::from_table_key("organizations", "acme")
    }

    fn issuer_id() -> RecordId {
        RecordId::from_table_key("users", "founder")
    }

    #[tokio::test]
    async fn test_issue_persists_digest_not_raw() {
        let state = mem_state().await;
        let (invite, raw) = issue(
            &state.sdb,
            org_id(),
            " New.Hire@Example.COM ",
            InviteRole::Recruiter,
            issuer_id(),
        )
        .await
        .unwrap();

        assert_eq!(invite.email, "new.hire@example.com");
        assert!(!invite.used);
        assert_ne!(invite.token, raw);
        assert_eq!(invite.token, token::digest_of(&raw));
    }

    #[tokio::test]
    async fn test_duplicate_pending_rejected() {
        let state = mem_state().await;
        issue(
            &state.sdb,
            org_id(),
            "new.hire@example.com",
            InviteRole::Recruiter,
            issuer_id(),
        )
        .await
        .unwrap();

        // Second invite for the same (organization, email) before the first
        // is consumed.
        let err = issue(
            &state.sdb,
            org_id(),
            "new.hire@example.com",
            InviteRole::Admin,
            issuer_id(),
        )
        .await;
        assert!(matches!(err, Err(Error::DuplicatePending(_))));

        // A different organization may still invite the same email.
        let other = RecordId::from_table_key("organizations", "globex");
        assert!(
            issue(
                &state.sdb,
                other,
                "new.hire@example.com",
                InviteRole::Recruiter,
                issuer_id(),
            )
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_load_live_round_trip() {
        let state = mem_state().await;
        let (invite, raw) = issue(
            &state.sdb,
            org_id(),
            "new.hire@example.com",
            InviteRole::Admin,
            issuer_id(),
        )
        .await
        .unwrap();

        let loaded = load_live(&state.sdb, &raw).await.unwrap();
        assert_eq!(loaded.id, invite.id);
        assert_eq!(loaded.role, InviteRole::Admin);

        assert!(matches!(
            load_live(&state.sdb, "not-a-token").await,
            Err(Error::InviteNotFound)
        ));
    }

    #[tokio::test]
    async fn test_expired_invite_is_dead() {
        let state = mem_state().await;
        let (invite, raw) = issue(
            &state.sdb,
            org_id(),
            "new.hire@example.com",
            InviteRole::Recruiter,
            issuer_id(),
        )
        .await
        .unwrap();

        // Redemption attempted at issuance + 8 days.
        state
            .sdb
            .query("UPDATE type::table($table) SET expires_at = $at WHERE id = $id;")
            .bind(("table", INVITE_TABLE))
            .bind(("at", time::days_ago(1)))
            .bind(("id", invite.id.clone()))
            .await
            .unwrap();

        assert!(matches!(
            load_live(&state.sdb, &raw).await,
            Err(Error::InviteExpired)
        ));
        assert!(matches!(
            load_live_by_id(&state.sdb, invite.id).await,
            Err(Error::InviteExpired)
        ));
    }

    #[tokio::test]
    async fn test_expiry_allows_reissue() {
        let state = mem_state().await;
        let (invite, _) = issue(
            &state.sdb,
            org_id(),
            "new.hire@example.com",
            InviteRole::Recruiter,
            issuer_id(),
        )
        .await
        .unwrap();

        state
            .sdb
            .query("UPDATE type::table($table) SET expires_at = $at WHERE id = $id;")
            .bind(("table", INVITE_TABLE))
            .bind(("at", time::days_ago(1)))
            .bind(("id", invite.id))
            .await
            .unwrap();

        // The dead invite no longer counts as pending.
        assert!(
            issue(
                &state.sdb,
                org_id(),
                "new.hire@example.com",
                InviteRole::Recruiter,
                issuer_id(),
            )
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_is_live_boundary() {
        let state = mem_state().await;
        let (mut invite, _) = issue(
            &state.sdb,
            org_id(),
            "new.hire@example.com",
            InviteRole::Recruiter,
            issuer_id(),
        )
        .await
        .unwrap();

        let before = invite.expires_at.clone();
        assert!(is_live(&invite, &time::now()));
        // Exactly at the boundary the invite is already dead.
        assert!(!is_live(&invite, &before));
        assert!(!is_live(&invite, &Datetime::from(chrono::Utc::now() + chrono::Duration::days(8))));

        invite.used = true;
        assert!(!is_live(&invite, &time::now()));
    }
}
