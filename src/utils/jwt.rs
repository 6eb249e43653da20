use crate::errors::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// Record id of the authenticated identity, e.g. `users:abc`.
    pub sub: String,
    /// `individual` or `organization`.
    pub kind: String,
    /// `standard`, `system-admin`, or the synthetic `organization`.
    pub role: String,
    /// Record id of the organization the subject belongs to, if any.
    pub org: Option<String>,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
}

pub fn encode_jwt(claim: &Claims, secret: &str) -> Result<String> {
    let token = encode(
        &Header::default(),
        claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<TokenData<Claims>> {
    let token = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let iat = chrono::Utc::now().timestamp() as usize;
        let claim = Claims {
            sub: "users:abc".to_string(),
            kind: "individual".to_string(),
            role: "standard".to_string(),
            org: None,
            exp: iat + 3600,
            iat,
            iss: "hirelink".to_string(),
        };
        let token = encode_jwt(&claim, "secret").unwrap();
        let decoded = decode_jwt(&token, "secret").unwrap();
        assert_eq!(decoded.claims.sub, "users:abc");
        assert_eq!(decoded.claims.kind, "individual");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let iat = chrono::Utc::now().timestamp() as usize;
        let claim = Claims {
            sub: "users:abc".to_string(),
            kind: "individual".to_string(),
            role: "standard".to_string(),
            org: None,
            exp: iat + 3600,
            iat,
            iss: "hirelink".to_string(),
        };
        let token = encode_jwt(&claim, "secret").unwrap();
        assert!(decode_jwt(&token, "other").is_err());
    }
}
