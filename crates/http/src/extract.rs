//! Request extractors for authenticated callers.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use bookstore_authz::{bearer_token, Identity, Role, TokenVerifier};

use crate::error::AppError;

/// Any caller holding a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
    /// The raw token, for forwarding to downstream services.
    pub token: String,
}

impl AuthUser {
    /// `Authorization` header value carrying this caller's credential.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<dyn TokenVerifier>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = <Arc<dyn TokenVerifier> as FromRef<S>>::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AppError::unauthorized("malformed authorization header"))
            })
            .transpose()?;

        let token = bearer_token(header)?;
        let identity = verifier.verify(token)?;

        Ok(Self {
            identity,
            token: token.to_string(),
        })
    }
}

/// A caller whose token carries the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<dyn TokenVerifier>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.identity.require(Role::Admin)?;
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use bookstore_authz::{AuthError, JwtVerifier};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(verifier: Arc<dyn TokenVerifier>) -> Router {
        Router::new()
            .route(
                "/me",
                get(|user: AuthUser| async move { user.identity.user_id.to_string() }),
            )
            .route("/admin", get(|_: AdminUser| async { "ok" }))
            .with_state(verifier)
    }

    fn token(verifier: &JwtVerifier, role: Role) -> String {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            role,
        };
        verifier
            .issue(&identity, chrono::Duration::minutes(5))
            .unwrap()
    }

    async fn status_of(app: Router, uri: &str, token: Option<&str>) -> StatusCode {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        app.oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtVerifier::new("secret"));
        assert_eq!(status_of(app(verifier), "/me", None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_is_accepted() {
        let jwt = JwtVerifier::new("secret");
        let token = token(&jwt, Role::User);
        let verifier: Arc<dyn TokenVerifier> = Arc::new(jwt);
        assert_eq!(status_of(app(verifier), "/me", Some(&token)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_route_rejects_plain_users() {
        let jwt = JwtVerifier::new("secret");
        let user = token(&jwt, Role::User);
        let admin = token(&jwt, Role::Admin);
        let verifier: Arc<dyn TokenVerifier> = Arc::new(jwt);

        assert_eq!(
            status_of(app(verifier.clone()), "/admin", Some(&user)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(app(verifier), "/admin", Some(&admin)).await,
            StatusCode::OK
        );
    }

    #[test]
    fn authorization_header_round_trips_token() {
        let user = AuthUser {
            identity: Identity {
                user_id: Uuid::new_v4(),
                role: Role::User,
            },
            token: "abc".to_string(),
        };
        let header = user.authorization();
        assert_eq!(header, "Bearer abc");
        assert_eq!(bearer_token(Some(header.as_str())), Ok("abc"));
        assert_ne!(bearer_token(None), Ok::<&str, AuthError>("abc"));
    }
}
