use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    core::{coordinator, flow},
    errors::{Error, Result},
    middleware::{Session, SessionKind, mint_session_token},
    models::{
        claim::IdentityClaim,
        invite::InviteRole,
        notification::InviteNotification,
    },
    state::AppState,
    utils::{record_id::get_record_id_from_string, validated_form::ValidatedJson},
};

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct CreateInviteRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub role: InviteRole,
}

pub async fn create_invite(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<CreateInviteRequest>,
) -> Result<(StatusCode, Json<flow::IssuedInvite>)> {
    let organization_id = session.organization_ref().ok_or(Error::Forbidden)?;
    // Organization credentials act for themselves; individuals must be a
    // current admin of their organization.
    if session.kind == SessionKind::Individual
        && !coordinator::is_admin(&state.sdb, &organization_id, &session.id).await?
    {
        return Err(Error::Forbidden);
    }

    let issued = flow::send_invite(
        &state.sdb,
        organization_id,
        session.id,
        &input.email,
        input.role,
    )
    .await?;

    Ok((StatusCode::ACCEPTED, Json(issued)))
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct RedeemInviteRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 255))]
    pub password: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RedeemInviteResponse {
    pub token: String,
    pub claim: IdentityClaim,
    pub organization_id: String,
}

pub async fn redeem_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(input): ValidatedJson<RedeemInviteRequest>,
) -> Result<(StatusCode, Json<RedeemInviteResponse>)> {
    let (user, organization_id) = flow::redeem_with_registration(
        &state.sdb,
        &token,
        input.name,
        &input.email,
        &input.password,
    )
    .await?;

    let claim = IdentityClaim::individual(&user);
    let session_token = mint_session_token(&claim, &state)?;

    Ok((
        StatusCode::CREATED,
        Json(RedeemInviteResponse {
            token: session_token,
            claim,
            organization_id: organization_id.to_string(),
        }),
    ))
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct InviteResponseRequest {
    #[validate(length(min = 3))]
    pub notification_id: String,
    #[validate(length(min = 3))]
    pub invite_id: String,
    pub accept: bool,
}

pub async fn respond_invite(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<InviteResponseRequest>,
) -> Result<Json<flow::InviteResponseOutcome>> {
    if session.kind != SessionKind::Individual {
        return Err(Error::Forbidden);
    }
    let notification_id = get_record_id_from_string(&input.notification_id)?;
    let invite_id = get_record_id_from_string(&input.invite_id)?;

    let outcome = flow::respond(
        &state.sdb,
        &session.id,
        notification_id,
        invite_id,
        input.accept,
    )
    .await?;

    Ok(Json(outcome))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<InviteNotification>>> {
    if session.kind != SessionKind::Individual {
        return Err(Error::Forbidden);
    }
    let notifications = flow::notifications_for(&state.sdb, &session.id).await?;
    Ok(Json(notifications))
}
