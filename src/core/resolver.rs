use surrealdb::{Surreal, engine::any::Any};

use crate::{
    core::{find_organization_by_email, find_user_by_email},
    errors::{Error, Result},
    models::{claim::IdentityClaim, user::AccountStatus},
    utils::{email::normalize_email, pwd},
};

/// Resolves a credential to exactly one identity kind, or a typed failure.
/// Pure read path: safe under arbitrary concurrency, writes nothing.
pub async fn resolve(sdb: &Surreal<Any>, email: &str, password: &str) -> Result<IdentityClaim> {
    if email.trim().is_empty() || password.is_empty() {
        let mut errs = validator::ValidationErrors::new();
        errs.add("credentials", validator::ValidationError::new("required"));
        return Err(errs.into());
    }
    let email = normalize_email(email);

    // The two namespaces are disjoint by construction. Nothing hard-enforces
    // that at the storage layer, so if an email ever appeared in both, the
    // individual record wins.
    if let Some(user) = find_user_by_email(sdb, &email).await? {
        if !user.activated {
            return Err(Error::AccountInactive);
        }
        match user.status {
            AccountStatus::Suspended => return Err(Error::AccountSuspended),
            AccountStatus::Pending => return Err(Error::AccountPending),
            AccountStatus::Active => {}
        }
        if !pwd::validate(password.as_bytes(), &user.password_hash)? {
            return Err(Error::InvalidPassword);
        }
        return Ok(IdentityClaim::individual(&user));
    }

    if let Some(organization) = find_organization_by_email(sdb, &email).await? {
        if !organization.activated {
            return Err(Error::AccountInactive);
        }
        if !pwd::validate(password.as_bytes(), &organization.password_hash)? {
            return Err(Error::InvalidPassword);
        }
        return Ok(IdentityClaim::Organization {
            id: organization.id,
        });
    }

    Err(Error::EmailNotFound(email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::auth_const::{ORGANIZATION_TABLE, USER_TABLE},
        models::{
            organization::{CreateOrganization, Organization},
            user::{CreateUser, User},
        },
        state::testing::mem_state,
        utils::time,
    };

    async fn seed_user(state: &crate::state::AppState, email: &str, password: &str) -> User {
        let content = CreateUser::registration(
            "Jane Doe".to_string(),
            email.to_string(),
            pwd::hash(password.as_bytes()).unwrap(),
        );
        state
            .sdb
            .create::<Option<User>>(USER_TABLE)
            .content(content)
            .await
            .unwrap()
            .unwrap()
    }

    async fn seed_organization(
        state: &crate::state::AppState,
        email: &str,
        password: &str,
        admins: Vec<surrealdb::RecordId>,
    ) -> Organization {
        let content = CreateOrganization {
            name: "Acme Hiring".to_string(),
            email: email.to_string(),
            password_hash: pwd::hash(password.as_bytes()).unwrap(),
            activated: true,
            admins: admins.clone(),
            recruiters: admins,
            created_at: time::now(),
            updated_at: None,
        };
        state
            .sdb
            .create::<Option<Organization>>(ORGANIZATION_TABLE)
            .content(content)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolves_individual_claim() {
        let state = mem_state().await;
        let user = seed_user(&state, "jane@example.com", "pw-123456").await;

        let claim = resolve(&state.sdb, " Jane@Example.com ", "pw-123456")
            .await
            .unwrap();
        match claim {
            IdentityClaim::Individual {
                id,
                is_recruiter,
                organization_id,
                ..
            } => {
                assert_eq!(id, user.id);
                assert!(!is_recruiter);
                assert!(organization_id.is_none());
            }
            other => panic!("expected individual claim, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolves_organization_claim() {
        let state = mem_state().await;
        let org = seed_organization(&state, "hiring@acme.com", "pw-123456", Vec::new()).await;

        let claim = resolve(&state.sdb, "hiring@acme.com", "pw-123456")
            .await
            .unwrap();
        match claim {
            IdentityClaim::Organization { id } => assert_eq!(id, org.id),
            other => panic!("expected organization claim, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_claim_kind_is_exclusive() {
        let state = mem_state().await;
        seed_user(&state, "jane@example.com", "pw-123456").await;
        seed_organization(&state, "hiring@acme.com", "pw-123456", Vec::new()).await;

        let claim = resolve(&state.sdb, "jane@example.com", "pw-123456")
            .await
            .unwrap();
        assert_eq!(claim.kind_str(), "individual");

        let claim = resolve(&state.sdb, "hiring@acme.com", "pw-123456")
            .await
            .unwrap();
        assert_eq!(claim.kind_str(), "organization");
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let state = mem_state().await;
        let err = resolve(&state.sdb, "ghost@example.com", "pw").await;
        assert!(matches!(err, Err(Error::EmailNotFound(_))));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let state = mem_state().await;
        seed_user(&state, "jane@example.com", "pw-123456").await;
        let err = resolve(&state.sdb, "jane@example.com", "nope").await;
        assert!(matches!(err, Err(Error::InvalidPassword)));
    }

    #[tokio::test]
    async fn test_account_state_gates() {
        let state = mem_state().await;
        let user = seed_user(&state, "jane@example.com", "pw-123456").await;

        state
            .sdb
            .query("UPDATE type::table($table) SET status = 'suspended' WHERE id = $id;")
            .bind(("table", USER_TABLE))
            .bind(("id", user.id.clone()))
            .await
            .unwrap();
        let err = resolve(&state.sdb, "jane@example.com", "pw-123456").await;
        assert!(matches!(err, Err(Error::AccountSuspended)));

        state
            .sdb
            .query("UPDATE type::table($table) SET status = 'pending' WHERE id = $id;")
            .bind(("table", USER_TABLE))
            .bind(("id", user.id.clone()))
            .await
            .unwrap();
        let err = resolve(&state.sdb, "jane@example.com", "pw-123456").await;
        assert!(matches!(err, Err(Error::AccountPending)));

        state
            .sdb
            .query("UPDATE type::table($table) SET status = 'active', activated = false WHERE id = $id;")
            .bind(("table", USER_TABLE))
            .bind(("id", user.id))
            .await
            .unwrap();
        let err = resolve(&state.sdb, "jane@example.com", "pw-123456").await;
        assert!(matches!(err, Err(Error::AccountInactive)));
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected() {
        let state = mem_state().await;
        assert!(matches!(
            resolve(&state.sdb, "  ", "pw").await,
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(
            resolve(&state.sdb, "jane@example.com", "").await,
            Err(Error::ValidationError(_))
        ));
    }
}
