use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    core::coordinator,
    errors::{Error, Result},
    middleware::{Session, SessionKind},
    models::{
        organization::{CreateOrganization, MembershipSnapshot},
        user::User,
    },
    state::AppState,
    utils::{pwd, record_id::get_record_id_from_string, time, validated_form::ValidatedJson},
};

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    /// The organization's own login credential, not a member email.
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 255))]
    pub password: String,
}

pub async fn create_organization(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<MembershipSnapshot>)> {
    if session.kind != SessionKind::Individual {
        return Err(Error::Forbidden);
    }
    let founder = state
        .sdb
        .select::<Option<User>>(session.id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let content = CreateOrganization {
        name: input.name,
        email: input.email,
        password_hash: pwd::hash(input.password.as_bytes())?,
        activated: true,
        admins: Vec::new(),
        recruiters: Vec::new(),
        created_at: time::now(),
        updated_at: None,
    };
    let organization = coordinator::found_organization(&state.sdb, content, &founder).await?;

    Ok((StatusCode::CREATED, Json(organization.into())))
}

pub async fn remove_admin(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((org_id, user_id)): Path<(String, String)>,
) -> Result<Json<MembershipSnapshot>> {
    // Platform-wide capability, not an organization-scoped one.
    if !session.is_system_admin() {
        return Err(Error::Forbidden);
    }
    let organization_id = get_record_id_from_string(&org_id)?;
    let target = get_record_id_from_string(&user_id)?;

    let organization = coordinator::remove_admin(&state.sdb, organization_id, target).await?;

    Ok(Json(organization.into()))
}

pub async fn remove_recruiter(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((org_id, user_id)): Path<(String, String)>,
) -> Result<Json<MembershipSnapshot>> {
    let organization_id = get_record_id_from_string(&org_id)?;
    let target = get_record_id_from_string(&user_id)?;

    let allowed = session.is_system_admin()
        || match session.kind {
            SessionKind::Organization => session.id == organization_id,
            SessionKind::Individual => {
                coordinator::is_admin(&state.sdb, &organization_id, &session.id).await?
            }
        };
    if !allowed {
        return Err(Error::Forbidden);
    }

    let organization = coordinator::remove_recruiter(&state.sdb, organization_id, target).await?;

    Ok(Json(organization.into()))
}
