use axum::{
    extract::{FromRequest, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use surrealdb::RecordId;

use crate::errors::{Error, Result as RResult};
use crate::models::claim::IdentityClaim;
use crate::state::AppState;
use crate::utils::{
    jwt::{Claims, decode_jwt, encode_jwt},
    record_id::get_record_id_from_string,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Individual,
    Organization,
}

/// Authenticated caller, parsed out of the bearer token. The session layer
/// is opaque to the core: everything in here came from an `IdentityClaim`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: RecordId,
    pub kind: SessionKind,
    pub role: String,
    pub organization_id: Option<RecordId>,
}

impl Session {
    pub fn is_system_admin(&self) -> bool {
        self.kind == SessionKind::Individual && self.role == "system-admin"
    }

    /// The organization this session acts for, if any.
    pub fn organization_ref(&self) -> Option<RecordId> {
        match self.kind {
            SessionKind::Organization => Some(self.id.clone()),
            SessionKind::Individual => self.organization_id.clone(),
        }
    }
}

/// Mints the opaque session token handed back after credential resolution.
pub fn mint_session_token(claim: &IdentityClaim, state: &AppState) -> RResult<String> {
    let iat = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: claim.subject_id().to_string(),
        kind: claim.kind_str().to_string(),
        role: claim.role_str().to_string(),
        org: claim.organization_ref().map(|id| id.to_string()),
        exp: iat + state.config.jwt_ttl_secs,
        iat,
        iss: "hirelink".to_string(),
    };
    encode_jwt(&claims, &state.config.jwt_secret)
}

pub async fn auth_jwt_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, Response> {
    let (mut parts, body) = request.into_parts();
    let session = check_auth_parts(&parts, &state.config.jwt_secret)
        .map_err(IntoResponse::into_response)?;

    parts.extensions.insert(session);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn check_auth_parts(parts: &Parts, secret: &str) -> RResult<Session> {
    let header_value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(Error::MissingToken)?
        .to_str()
        .map_err(|_| Error::InvalidToken)?;

    let mut parts = header_value.trim().splitn(2, ' ');

    let scheme = parts.next().ok_or(Error::MissingToken)?;
    let token = parts.next().ok_or(Error::MissingToken)?;

    if scheme != "Bearer" {
        tracing::warn!("Invalid auth scheme: {scheme}");
        return Err(Error::InvalidScheme);
    }

    let data = decode_jwt(token, secret).map_err(|e| match e {
        Error::JwTError(err) if *err.kind() == ErrorKind::ExpiredSignature => Error::TokenExpired,
        _ => Error::InvalidToken,
    })?;
    session_from_claims(data.claims)
}

fn session_from_claims(claims: Claims) -> RResult<Session> {
    let kind = match claims.kind.as_str() {
        "individual" => SessionKind::Individual,
        "organization" => SessionKind::Organization,
        _ => return Err(Error::InvalidToken),
    };
    let id = get_record_id_from_string(&claims.sub).map_err(|_| Error::InvalidToken)?;
    let organization_id = match claims.org {
        Some(org) => Some(get_record_id_from_string(&org).map_err(|_| Error::InvalidToken)?),
        None => None,
    };
    Ok(Session {
        id,
        kind,
        role: claims.role,
        organization_id,
    })
}

impl<S> FromRequest<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, _state: &S) -> RResult<Self> {
        req.extensions()
            .get::<Session>()
            .cloned()
            .ok_or(Error::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_claims() {
        let claims = Claims {
            sub: "users:abc".to_string(),
            kind: "individual".to_string(),
            role: "system-admin".to_string(),
            org: Some("organizations:acme".to_string()),
            exp: 0,
            iat: 0,
            iss: "hirelink".to_string(),
        };
        let session = session_from_claims(claims).unwrap();
        assert!(session.is_system_admin());
        assert_eq!(
            session.organization_ref().unwrap().to_string(),
            "organizations:acme"
        );
    }

    #[test]
    fn test_organization_session_acts_for_itself() {
        let claims = Claims {
            sub: "organizations:acme".to_string(),
            kind: "organization".to_string(),
            role: "organization".to_string(),
            org: Some("organizations:acme".to_string()),
            exp: 0,
            iat: 0,
            iss: "hirelink".to_string(),
        };
        let session = session_from_claims(claims).unwrap();
        assert!(!session.is_system_admin());
        assert_eq!(session.organization_ref(), Some(session.id.clone()));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let claims = Claims {
            sub: "users:abc".to_string(),
            kind: "robot".to_string(),
            role: "standard".to_string(),
            org: None,
            exp: 0,
            iat: 0,
            iss: "hirelink".to_string(),
        };
        assert!(session_from_claims(claims).is_err());
    }
}
