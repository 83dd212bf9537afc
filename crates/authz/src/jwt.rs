use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthError, Identity, Role, TokenVerifier};

/// Claims carried by bearer tokens.
///
/// Tokens minted by the storefront put the user id in `id`; `sub` wins when both are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().or(self.id.as_deref())
    }
}

/// HS256 verifier keyed by a shared secret.
pub struct JwtVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Mint a token for `identity` valid for `ttl`.
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> anyhow::Result<String> {
        let claims = Claims {
            sub: Some(identity.user_id.to_string()),
            id: None,
            role: identity.role,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .with_context(|| "failed to sign token")
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidToken("bad signature".to_string()),
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let subject = data
            .claims
            .subject()
            .ok_or_else(|| AuthError::InvalidToken("token has no subject".to_string()))?;
        let user_id = Uuid::parse_str(subject)
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;

        Ok(Identity {
            user_id,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let verifier = JwtVerifier::new("secret");
        let identity = admin();
        let token = verifier.issue(&identity, Duration::minutes(5)).unwrap();

        assert_eq!(verifier.verify(&token).unwrap(), identity);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = JwtVerifier::new("secret")
            .issue(&admin(), Duration::minutes(5))
            .unwrap();

        let err = JwtVerifier::new("other").verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = JwtVerifier::new("secret");
        let token = verifier.issue(&admin(), Duration::hours(-2)).unwrap();

        assert_eq!(verifier.verify(&token).unwrap_err(), AuthError::Expired);
    }

    #[test]
    fn legacy_id_claim_defaults_to_user_role() {
        let user_id = Uuid::new_v4();
        let legacy = serde_json::json!({
            "id": user_id.to_string(),
            "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &legacy,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let identity = JwtVerifier::new("secret").verify(&token).unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let claims = Claims {
            sub: Some("not-a-uuid".to_string()),
            id: None,
            role: Role::User,
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(
            JwtVerifier::new("secret").verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    fn sign(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap()
    }

    #[test]
    fn sub_wins_over_legacy_id() {
        let sub = Uuid::new_v4();
        let token = sign(serde_json::json!({
            "sub": sub.to_string(),
            "id": Uuid::new_v4().to_string(),
            "role": "admin",
            "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
        }));

        let identity = JwtVerifier::new("secret").verify(&token).unwrap();
        assert_eq!(identity.user_id, sub);
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let token = sign(serde_json::json!({
            "exp": (Utc::now() + Duration::minutes(5)).timestamp(),
        }));

        assert_eq!(
            JwtVerifier::new("secret").verify(&token).unwrap_err(),
            AuthError::InvalidToken("token has no subject".to_string())
        );
    }
}
