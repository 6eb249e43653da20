use std::collections::HashMap;

use surrealdb::{RecordId, Surreal, engine::any::Any};

use crate::{
    consts::auth_const::{INVITE_TABLE, ORGANIZATION_TABLE, USER_TABLE},
    core::{find_organization_by_email, find_user_by_email},
    errors::{Error, Result},
    models::{
        invite::{Invite, InviteRole},
        organization::{CreateOrganization, Organization},
        user::{CreateUser, User},
    },
    utils::{email::normalize_email, time},
};

// The sole writer of `Organization.admins`, `Organization.recruiters`, and
// `User.organization_id`. Every mutation here is a single SurrealDB
// transaction whose guard and write see one snapshot, so concurrent callers
// can never observe partial membership state.

const THROW_INVITE_CONSUMED: &str = "invite_consumed";
const THROW_FOREIGN_MEMBERSHIP: &str = "foreign_membership";
const THROW_ADMIN_GUARD: &str = "admin_guard";
const THROW_RECRUITER_GUARD: &str = "recruiter_guard";

const ADMIT_MEMBER_SQL: &str = "
BEGIN TRANSACTION;
LET $hit = (UPDATE type::table($invite_table) SET used = true WHERE id = $invite AND used = false AND expires_at > $now);
IF array::len($hit) == 0 { THROW 'invite_consumed' };
LET $joined = (UPDATE type::table($user_table)
    SET organization_id = $org, is_recruiter = true, updated_at = $now
    WHERE id = $user AND (organization_id = NONE OR organization_id = $org));
IF array::len($joined) == 0 { THROW 'foreign_membership' };
UPDATE type::table($org_table)
    SET recruiters = array::union(recruiters, [$user]),
        admins = IF $as_admin { array::union(admins, [$user]) } ELSE { admins },
        updated_at = $now
    WHERE id = $org;
COMMIT TRANSACTION;
";

const ADMIT_NEW_MEMBER_SQL: &str = "
BEGIN TRANSACTION;
LET $hit = (UPDATE type::table($invite_table) SET used = true WHERE id = $invite AND used = false AND expires_at > $now);
IF array::len($hit) == 0 { THROW 'invite_consumed' };
LET $created = (CREATE ONLY type::table($user_table) CONTENT $content);
UPDATE type::table($org_table)
    SET recruiters = array::union(recruiters, [$created.id]),
        admins = IF $as_admin { array::union(admins, [$created.id]) } ELSE { admins },
        updated_at = $now
    WHERE id = $org;
COMMIT TRANSACTION;
";

const REMOVE_ADMIN_SQL: &str = "
BEGIN TRANSACTION;
LET $after = (UPDATE type::table($org_table) SET admins -= $target, updated_at = $now WHERE id = $org AND $target INSIDE admins AND array::len(admins) > 1);
IF array::len($after) == 0 { THROW 'admin_guard' };
IF !($target INSIDE $after[0].recruiters) {
    UPDATE type::table($user_table) SET organization_id = NONE, updated_at = $now WHERE id = $target AND organization_id = $org;
};
COMMIT TRANSACTION;
";

const REMOVE_RECRUITER_SQL: &str = "
BEGIN TRANSACTION;
LET $after = (UPDATE type::table($org_table) SET recruiters -= $target, updated_at = $now WHERE id = $org AND $target INSIDE recruiters);
IF array::len($after) == 0 { THROW 'recruiter_guard' };
IF $target INSIDE $after[0].admins {
    UPDATE type::table($user_table) SET is_recruiter = false, updated_at = $now WHERE id = $target;
} ELSE {
    UPDATE type::table($user_table) SET is_recruiter = false, organization_id = NONE, updated_at = $now WHERE id = $target AND organization_id = $org;
};
COMMIT TRANSACTION;
";

const FOUND_ORGANIZATION_SQL: &str = "
BEGIN TRANSACTION;
LET $created = (CREATE ONLY type::table($org_table) CONTENT $content);
UPDATE type::table($user_table) SET organization_id = $created.id, is_recruiter = true, updated_at = $now WHERE id = $founder;
COMMIT TRANSACTION;
";

/// First-class membership query used for issuer checks.
pub async fn is_admin(
    sdb: &Surreal<Any>,
    organization_id: &RecordId,
    user_id: &RecordId,
) -> Result<bool> {
    let hit: Vec<Organization> = sdb
        .query("SELECT * FROM type::table($table) WHERE id = $org AND $user INSIDE admins;")
        .bind(("table", ORGANIZATION_TABLE))
        .bind(("org", organization_id.clone()))
        .bind(("user", user_id.clone()))
        .await?
        .take(0)?;
    Ok(!hit.is_empty())
}

/// Admits an existing individual under a validated invite. Consuming the
/// token and applying the membership change commit together or not at all;
/// of N callers racing the same invite exactly one wins the compare-and-set
/// on `used`.
pub async fn admit_member(sdb: &Surreal<Any>, invite: &Invite, user: &User) -> Result<()> {
    if normalize_email(&user.email) != invite.email {
        return Err(Error::EmailMismatch);
    }
    // A second invite may only be redeemed for the organization the user is
    // already in (e.g. a recruiter-to-admin upgrade). Early rejection only:
    // the snapshot may be stale, so the transaction re-checks against the
    // live record.
    if let Some(current) = &user.organization_id {
        if *current != invite.organization_id {
            return Err(Error::AlreadyInAnotherOrg);
        }
    }

    let mut res = sdb
        .query(ADMIT_MEMBER_SQL)
        .bind(("invite_table", INVITE_TABLE))
        .bind(("org_table", ORGANIZATION_TABLE))
        .bind(("user_table", USER_TABLE))
        .bind(("invite", invite.id.clone()))
        .bind(("org", invite.organization_id.clone()))
        .bind(("user", user.id.clone()))
        .bind(("as_admin", invite.role == InviteRole::Admin))
        .bind(("now", time::now()))
        .await?;

    let errors = res.take_errors();
    if errors.is_empty() {
        return Ok(());
    }
    if has_throw(&errors, THROW_INVITE_CONSUMED) {
        return Err(classify_dead_invite(sdb, invite.id.clone()).await);
    }
    if has_throw(&errors, THROW_FOREIGN_MEMBERSHIP) {
        return Err(Error::AlreadyInAnotherOrg);
    }
    Err(first_error(errors))
}

/// Registration and admission as one unit: the token-link path for brand-new
/// registrants. The caller has already checked the email is unclaimed and
/// matches the invite.
pub async fn admit_new_member(
    sdb: &Surreal<Any>,
    invite: &Invite,
    mut content: CreateUser,
) -> Result<User> {
    content.email = invite.email.clone();
    content.is_recruiter = true;
    content.organization_id = Some(invite.organization_id.clone());

    let mut res = sdb
        .query(ADMIT_NEW_MEMBER_SQL)
        .bind(("invite_table", INVITE_TABLE))
        .bind(("org_table", ORGANIZATION_TABLE))
        .bind(("user_table", USER_TABLE))
        .bind(("invite", invite.id.clone()))
        .bind(("org", invite.organization_id.clone()))
        .bind(("as_admin", invite.role == InviteRole::Admin))
        .bind(("content", content))
        .bind(("now", time::now()))
        .await?;

    let errors = res.take_errors();
    if errors.is_empty() {
        return find_user_by_email(sdb, &invite.email)
            .await?
            .ok_or(Error::Internal);
    }
    if has_throw(&errors, THROW_INVITE_CONSUMED) {
        return Err(classify_dead_invite(sdb, invite.id.clone()).await);
    }
    Err(first_error(errors))
}

/// Removes an individual from the admin set, upholding the last-admin
/// invariant. Recruiter membership is untouched; the user's back-reference
/// is cleared only when no recruiter membership remains either.
pub async fn remove_admin(
    sdb: &Surreal<Any>,
    organization_id: RecordId,
    target: RecordId,
) -> Result<Organization> {
    let mut res = sdb
        .query(REMOVE_ADMIN_SQL)
        .bind(("org_table", ORGANIZATION_TABLE))
        .bind(("user_table", USER_TABLE))
        .bind(("org", organization_id.clone()))
        .bind(("target", target.clone()))
        .bind(("now", time::now()))
        .await?;

    let errors = res.take_errors();
    if errors.is_empty() {
        return load_organization(sdb, organization_id).await;
    }
    if has_throw(&errors, THROW_ADMIN_GUARD) {
        let org = load_organization(sdb, organization_id).await?;
        if !org.admins.contains(&target) {
            return Err(Error::NotAnAdmin);
        }
        // Guard refused with the target still in the set: it is the sole
        // remaining admin.
        return Err(Error::LastAdmin);
    }
    Err(first_error(errors))
}

/// Removes an individual from the recruiter set. A sitting admin keeps the
/// back-reference (the transitional `admins` superset window); anyone else
/// is detached from the organization.
pub async fn remove_recruiter(
    sdb: &Surreal<Any>,
    organization_id: RecordId,
    target: RecordId,
) -> Result<Organization> {
    let mut res = sdb
        .query(REMOVE_RECRUITER_SQL)
        .bind(("org_table", ORGANIZATION_TABLE))
        .bind(("user_table", USER_TABLE))
        .bind(("org", organization_id.clone()))
        .bind(("target", target.clone()))
        .bind(("now", time::now()))
        .await?;

    let errors = res.take_errors();
    if errors.is_empty() {
        return load_organization(sdb, organization_id).await;
    }
    if has_throw(&errors, THROW_RECRUITER_GUARD) {
        load_organization(sdb, organization_id).await?;
        return Err(Error::NotARecruiter);
    }
    Err(first_error(errors))
}

/// Creates an organization with its founder seeded as both admin and
/// recruiter. This is the only way an organization comes into existence, so
/// `|admins| >= 1` holds from birth.
pub async fn found_organization(
    sdb: &Surreal<Any>,
    mut content: CreateOrganization,
    founder: &User,
) -> Result<Organization> {
    if founder.organization_id.is_some() {
        return Err(Error::AlreadyInAnotherOrg);
    }
    let email = normalize_email(&content.email);
    if find_organization_by_email(sdb, &email).await?.is_some()
        || find_user_by_email(sdb, &email).await?.is_some()
    {
        return Err(Error::EmailExist(email));
    }
    content.email = email.clone();
    content.admins = vec![founder.id.clone()];
    content.recruiters = vec![founder.id.clone()];

    sdb.query(FOUND_ORGANIZATION_SQL)
        .bind(("org_table", ORGANIZATION_TABLE))
        .bind(("user_table", USER_TABLE))
        .bind(("content", content))
        .bind(("founder", founder.id.clone()))
        .bind(("now", time::now()))
        .await?
        .check()?;

    find_organization_by_email(sdb, &email)
        .await?
        .ok_or(Error::Internal)
}

async fn load_organization(sdb: &Surreal<Any>, id: RecordId) -> Result<Organization> {
    sdb.select::<Option<Organization>>(id)
        .await?
        .ok_or(Error::NotFound)
}

/// A `THROW` inside a transaction fails every statement in it; the throw
/// text only appears on one of them, so every statement error gets scanned.
fn has_throw(errors: &HashMap<usize, surrealdb::Error>, marker: &str) -> bool {
    errors.values().any(|e| e.to_string().contains(marker))
}

fn first_error(errors: HashMap<usize, surrealdb::Error>) -> Error {
    errors
        .into_values()
        .next()
        .map(Error::from)
        .unwrap_or(Error::Internal)
}

/// The compare-and-set lost: report why, against the invite's current state.
async fn classify_dead_invite(sdb: &Surreal<Any>, invite_id: RecordId) -> Error {
    match sdb.select::<Option<Invite>>(invite_id).await {
        Ok(Some(invite)) if invite.used => Error::InviteAlreadyUsed,
        Ok(Some(invite)) if invite.expires_at <= time::now() => Error::InviteExpired,
        Ok(Some(_)) => Error::Internal,
        Ok(None) => Error::InviteNotFound,
        Err(e) => e.into(),
    }
}
