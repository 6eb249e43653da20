use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    core::{find_organization_by_email, find_user_by_email, resolver},
    consts::auth_const::USER_TABLE,
    errors::{Error, Result},
    middleware::mint_session_token,
    models::{claim::IdentityClaim, user::{CreateUser, User}},
    state::AppState,
    utils::{email::normalize_email, pwd, validated_form::ValidatedJson},
};

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub claim: IdentityClaim,
}

pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> Result<Json<SignInResponse>> {
    let claim = resolver::resolve(&state.sdb, &input.email, &input.password).await?;
    let token = mint_session_token(&claim, &state)?;

    Ok(Json(SignInResponse { token, claim }))
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 255))]
    pub password: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SignUpResponse {
    msg: String,
}

pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    let email = normalize_email(&input.email);
    // Both namespaces: an organization login email is not a valid
    // individual email.
    if find_user_by_email(&state.sdb, &email).await?.is_some()
        || find_organization_by_email(&state.sdb, &email).await?.is_some()
    {
        return Err(Error::EmailExist(email));
    }

    let password_hash = pwd::hash(input.password.as_bytes())?;
    let user_data = CreateUser::registration(input.name, email.clone(), password_hash);
    let _ = state
        .sdb
        .create::<Option<User>>(USER_TABLE)
        .content(user_data)
        .await?
        .ok_or(Error::Internal)?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            msg: format!("user with email: {} created", email),
        }),
    ))
}
